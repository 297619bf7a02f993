//! Two-slot framebuffer pool with explicit per-slot ownership tags.
//!
//! The pool tracks *who* may touch each framebuffer slot; the buffers
//! themselves live in statics owned by the binary. At any instant a slot is
//! in exactly one of `{Idle, Rendering, Transferring}`, and the pool refuses
//! any transition that would let the rasterizer and the transfer engine hold
//! the same slot - the invariant is checked at runtime, not just by call
//! ordering.

use crate::config::SLOT_COUNT;

/// Ownership tag for one framebuffer slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SlotState {
    /// Nobody owns the slot; its contents are stale but safe to reuse.
    Idle,
    /// The rasterizer is composing into the slot.
    Rendering,
    /// The transfer engine is streaming the slot to the panel.
    Transferring,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PoolError {
    /// Every slot is busy; the caller must wait for a transfer to finish.
    NoIdleSlot,
    /// The slot is not in the state the requested transition needs.
    BadState { slot: usize },
}

/// Fixed arena of framebuffer slots plus the "currently displayed" identity.
pub struct FramePool {
    slots: [SlotState; SLOT_COUNT],
    displayed: usize,
}

impl FramePool {
    pub const fn new() -> Self {
        Self {
            slots: [SlotState::Idle; SLOT_COUNT],
            displayed: 0,
        }
    }

    /// Claim an idle slot for rendering, preferring the one that is not on
    /// screen so back-to-back frames alternate deterministically.
    pub fn begin_render(&mut self) -> Result<usize, PoolError> {
        let preferred = (0..SLOT_COUNT).filter(|&s| s != self.displayed);
        let fallback = core::iter::once(self.displayed);
        for slot in preferred.chain(fallback) {
            if self.slots[slot] == SlotState::Idle {
                self.slots[slot] = SlotState::Rendering;
                return Ok(slot);
            }
        }
        Err(PoolError::NoIdleSlot)
    }

    /// Composition finished; the slot returns to idle until it is handed to
    /// the transfer engine.
    pub fn finish_render(&mut self, slot: usize) -> Result<(), PoolError> {
        self.transition(slot, SlotState::Rendering, SlotState::Idle)
    }

    /// Hand a fully composed slot to the transfer engine.
    pub fn begin_transfer(&mut self, slot: usize) -> Result<(), PoolError> {
        self.transition(slot, SlotState::Idle, SlotState::Transferring)
    }

    /// Transfer completed: the slot becomes the displayed buffer and is idle
    /// again.
    pub fn finish_transfer(&mut self, slot: usize) -> Result<(), PoolError> {
        self.transition(slot, SlotState::Transferring, SlotState::Idle)?;
        self.displayed = slot;
        Ok(())
    }

    fn transition(
        &mut self,
        slot: usize,
        from: SlotState,
        to: SlotState,
    ) -> Result<(), PoolError> {
        if slot >= SLOT_COUNT || self.slots[slot] != from {
            return Err(PoolError::BadState { slot });
        }
        self.slots[slot] = to;
        Ok(())
    }

    #[inline]
    pub fn slot_state(&self, slot: usize) -> SlotState {
        self.slots[slot]
    }

    /// Index of the buffer currently shown on the panel.
    #[inline]
    pub const fn displayed(&self) -> usize {
        self.displayed
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_and_transfer_never_share_a_slot() {
        let mut pool = FramePool::new();
        let mut in_flight: Option<usize> = None;

        // Simulated multi-frame run: render, hand off, complete the previous
        // transfer one frame later - the steady-state pipeline shape.
        for _ in 0..100 {
            let render_slot = pool.begin_render().unwrap();
            if let Some(t) = in_flight {
                assert_ne!(render_slot, t, "rasterizer touched a transferring slot");
                assert_eq!(pool.slot_state(t), SlotState::Transferring);
            }
            pool.finish_render(render_slot).unwrap();

            if let Some(t) = in_flight.take() {
                pool.finish_transfer(t).unwrap();
            }
            pool.begin_transfer(render_slot).unwrap();
            in_flight = Some(render_slot);
        }
    }

    #[test]
    fn test_slots_alternate() {
        let mut pool = FramePool::new();
        let a = pool.begin_render().unwrap();
        pool.finish_render(a).unwrap();
        pool.begin_transfer(a).unwrap();
        pool.finish_transfer(a).unwrap();

        let b = pool.begin_render().unwrap();
        assert_ne!(a, b, "next frame must use the other slot");
    }

    #[test]
    fn test_no_idle_slot_is_reported() {
        let mut pool = FramePool::new();
        let a = pool.begin_render().unwrap();
        let b = pool.begin_render().unwrap();
        assert_ne!(a, b);
        assert_eq!(pool.begin_render(), Err(PoolError::NoIdleSlot));
    }

    #[test]
    fn test_transfer_requires_finished_render() {
        let mut pool = FramePool::new();
        let slot = pool.begin_render().unwrap();
        // Still rendering: the transfer engine must not get it
        assert_eq!(pool.begin_transfer(slot), Err(PoolError::BadState { slot }));
        pool.finish_render(slot).unwrap();
        assert!(pool.begin_transfer(slot).is_ok());
    }

    #[test]
    fn test_finish_transfer_flips_displayed() {
        let mut pool = FramePool::new();
        assert_eq!(pool.displayed(), 0);
        let slot = pool.begin_render().unwrap();
        assert_eq!(slot, 1); // slot 0 is on screen, so rendering goes to 1
        pool.finish_render(slot).unwrap();
        pool.begin_transfer(slot).unwrap();
        pool.finish_transfer(slot).unwrap();
        assert_eq!(pool.displayed(), 1);
    }

    #[test]
    fn test_out_of_range_slot_rejected() {
        let mut pool = FramePool::new();
        assert_eq!(
            pool.finish_render(SLOT_COUNT),
            Err(PoolError::BadState { slot: SLOT_COUNT })
        );
    }
}
