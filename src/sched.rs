//! Frame cadence and CPU-busy accounting.
//!
//! The main loop polls [`FrameScheduler::frame_due`] on every pass; a frame
//! is composed every [`DRAW_PERIOD_MS`]. Per-frame compose time (measured
//! with the cycle counter, see [`crate::cycles`]) is accumulated via
//! [`FrameScheduler::note_busy`], and once per [`REPORT_PERIOD_MS`] a
//! [`BusyReport`] summarizes the window: CPU-busy ratio, frame count and
//! average compose time.

use crate::config::{DRAW_PERIOD_MS, REPORT_PERIOD_MS};

/// One accounting window's worth of CPU-busy statistics.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BusyReport {
    /// CPU-busy ratio in tenths of a percent (e.g. 53 = 5.3%).
    pub percent_x10: u32,
    /// Frames composed during the window.
    pub frames: u32,
    /// Average compose duration per frame, in microseconds.
    pub avg_frame_us: u32,
}

pub struct FrameScheduler {
    last_draw_ms: u32,
    last_report_ms: u32,
    busy_us: u32,
    frames: u32,
}

impl FrameScheduler {
    pub const fn new(now_ms: u32) -> Self {
        Self {
            last_draw_ms: now_ms,
            last_report_ms: now_ms,
            busy_us: 0,
            frames: 0,
        }
    }

    /// True once per draw period. The caller composes and hands off a frame
    /// whenever this fires.
    pub fn frame_due(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_draw_ms) >= DRAW_PERIOD_MS {
            self.last_draw_ms = now_ms;
            return true;
        }
        false
    }

    /// Account one frame's compose-and-kickoff time.
    pub fn note_busy(&mut self, us: u32) {
        self.busy_us = self.busy_us.saturating_add(us);
        self.frames += 1;
    }

    /// Once per accounting period, emit the window's report and reset the
    /// accumulator.
    pub fn report_due(&mut self, now_ms: u32) -> Option<BusyReport> {
        let period_ms = now_ms.wrapping_sub(self.last_report_ms);
        if period_ms < REPORT_PERIOD_MS {
            return None;
        }

        // busy_us / (period_ms * 1000) * 100, scaled x10 for one decimal:
        // that collapses to busy_us / period_ms
        let report = BusyReport {
            percent_x10: self.busy_us / period_ms,
            frames: self.frames,
            avg_frame_us: if self.frames > 0 {
                self.busy_us / self.frames
            } else {
                0
            },
        };

        self.last_report_ms = now_ms;
        self.busy_us = 0;
        self.frames = 0;
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_cadence() {
        let mut sched = FrameScheduler::new(0);
        let mut frames = 0;
        for now in 1..=1000 {
            if sched.frame_due(now) {
                frames += 1;
            }
        }
        assert_eq!(frames, 1000 / DRAW_PERIOD_MS);
    }

    #[test]
    fn test_frame_not_due_twice_in_one_period() {
        let mut sched = FrameScheduler::new(0);
        assert!(sched.frame_due(10));
        assert!(!sched.frame_due(10));
        assert!(!sched.frame_due(19));
        assert!(sched.frame_due(20));
    }

    #[test]
    fn test_busy_ratio_over_one_window() {
        let mut sched = FrameScheduler::new(0);
        // 100 frames at 500 us each = 50,000 us busy in a 1,000 ms window
        for _ in 0..100 {
            sched.note_busy(500);
        }
        assert_eq!(sched.report_due(999), None);
        let report = sched.report_due(1000).unwrap();
        assert_eq!(report.percent_x10, 50); // 5.0% busy
        assert_eq!(report.frames, 100);
        assert_eq!(report.avg_frame_us, 500);
    }

    #[test]
    fn test_report_resets_accumulator() {
        let mut sched = FrameScheduler::new(0);
        sched.note_busy(4000);
        sched.report_due(1000).unwrap();

        // Next window starts empty
        let report = sched.report_due(2000).unwrap();
        assert_eq!(report.percent_x10, 0);
        assert_eq!(report.frames, 0);
        assert_eq!(report.avg_frame_us, 0);
    }

    #[test]
    fn test_report_uses_actual_window_length() {
        let mut sched = FrameScheduler::new(0);
        sched.note_busy(30_000);
        // Window ran long (1500 ms): ratio is relative to the real window
        let report = sched.report_due(1500).unwrap();
        assert_eq!(report.percent_x10, 20); // 2.0%
    }
}
