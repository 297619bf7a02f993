//! CPU cycle counter utilities using the Cortex-M7 DWT.
//!
//! Used only for diagnostic timing of the per-frame compose work; never for
//! correctness. The CYCCNT is a 32-bit counter that wraps (at 64 MHz every
//! ~67 seconds), so elapsed measurements use `wrapping_sub` and are sane for
//! anything frame-sized.

use core::sync::atomic::{AtomicU32, Ordering};

/// CPU frequency in Hz, set at init. Defaults to the 64 MHz HSI the chip
/// boots on.
static CPU_FREQ_HZ: AtomicU32 = AtomicU32::new(64_000_000);

/// Elapsed counts beyond this (about half a second at 400 MHz) indicate a
/// wrapped or bogus measurement.
const MAX_SANE_CYCLES: u32 = 200_000_000;

/// Enable the DWT cycle counter. Idempotent; call once after clock setup.
pub fn init(freq_hz: u32) {
    CPU_FREQ_HZ.store(freq_hz, Ordering::Relaxed);

    // DEMCR.TRCENA (bit 24) must be set before DWT.CTRL.CYCCNTENA (bit 0)
    #[cfg(target_arch = "arm")]
    unsafe {
        use core::ptr::{read_volatile, write_volatile};

        const DEMCR: *mut u32 = 0xE000_EDFC as *mut u32;
        write_volatile(DEMCR, read_volatile(DEMCR) | (1 << 24));

        const DWT_CTRL: *mut u32 = 0xE000_1000 as *mut u32;
        write_volatile(DWT_CTRL, read_volatile(DWT_CTRL) | 1);
    }
}

/// Read the current cycle count (32-bit, wraps).
#[inline]
pub fn read() -> u32 {
    #[cfg(target_arch = "arm")]
    unsafe {
        const DWT_CYCCNT: *const u32 = 0xE000_1004 as *const u32;
        core::ptr::read_volatile(DWT_CYCCNT)
    }
    #[cfg(not(target_arch = "arm"))]
    {
        0 // Placeholder for tests
    }
}

/// Elapsed cycles between two reads, wrap-safe with a sanity cap.
#[inline]
pub fn elapsed(start: u32, end: u32) -> u32 {
    let elapsed = end.wrapping_sub(start);
    if elapsed > MAX_SANE_CYCLES { 0 } else { elapsed }
}

/// Convert a cycle count to microseconds at the configured CPU frequency.
#[inline]
pub fn to_us(cycles: u32) -> u32 {
    let freq = CPU_FREQ_HZ.load(Ordering::Relaxed) as u64;
    ((cycles as u64 * 1_000_000) / freq) as u32
}
