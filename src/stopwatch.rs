//! Elapsed-time state machine for the stopwatch.
//!
//! A monotonic millisecond counter plus a running/stopped flag, mutated only
//! by the frame scheduler through the start/stop/reset/tick protocol. The
//! tick source is injected as a plain `now_ms` argument so the whole state
//! machine runs under the host test harness.

/// Stopwatch states: stopped (elapsed frozen) or running (elapsed advances).
pub struct Stopwatch {
    running: bool,
    elapsed_ms: u32,
    last_tick_ms: u32,
}

impl Stopwatch {
    pub const fn new() -> Self {
        Self {
            running: false,
            elapsed_ms: 0,
            last_tick_ms: 0,
        }
    }

    /// stopped -> running; captures the time baseline. No-op while running.
    pub fn start(&mut self, now_ms: u32) {
        if !self.running {
            self.running = true;
            self.last_tick_ms = now_ms;
        }
    }

    /// running -> stopped; freezes elapsed time at its current value.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Zero elapsed time in any state; re-captures the baseline if running.
    pub fn reset(&mut self, now_ms: u32) {
        self.elapsed_ms = 0;
        self.last_tick_ms = now_ms;
    }

    /// Advance elapsed time by the delta since the last tick, if running.
    /// Returns the current elapsed milliseconds.
    pub fn tick(&mut self, now_ms: u32) -> u32 {
        if self.running {
            self.elapsed_ms = self
                .elapsed_ms
                .wrapping_add(now_ms.wrapping_sub(self.last_tick_ms));
            self.last_tick_ms = now_ms;
        }
        self.elapsed_ms
    }

    #[inline]
    pub const fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    #[inline]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_advance_stop() {
        let mut sw = Stopwatch::new();
        sw.start(100);
        // Simulated clock advances 1500 ms in uneven steps
        sw.tick(600);
        sw.tick(1100);
        sw.tick(1600);
        sw.stop();
        assert_eq!(sw.elapsed_ms(), 1500);
        // Ticks after stop must not advance elapsed time
        sw.tick(5000);
        assert_eq!(sw.elapsed_ms(), 1500);
    }

    #[test]
    fn test_reset_zeroes_in_any_state() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.tick(700);
        sw.reset(700);
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(sw.is_running());

        sw.tick(900);
        sw.stop();
        sw.reset(900);
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.is_running());
    }

    #[test]
    fn test_reset_rebaselines_while_running() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.tick(400);
        sw.reset(1000);
        // Time between the old tick and the reset must not leak in
        sw.tick(1250);
        assert_eq!(sw.elapsed_ms(), 250);
    }

    #[test]
    fn test_start_while_running_keeps_baseline() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.tick(100);
        sw.start(900); // no-op
        sw.tick(1000);
        assert_eq!(sw.elapsed_ms(), 1000);
    }

    #[test]
    fn test_tick_source_wraparound() {
        let mut sw = Stopwatch::new();
        sw.start(u32::MAX - 10);
        sw.tick(5); // 16 ms across the wrap
        assert_eq!(sw.elapsed_ms(), 16);
    }
}
