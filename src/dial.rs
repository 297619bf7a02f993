//! Stopwatch face composition: the pre-rendered dial and the per-frame hands.
//!
//! The static dial (background, rings, tick marks) is rendered exactly once
//! into its own buffer and bulk-copied at the start of every frame, so the
//! per-frame cost is one memcpy plus the three hands and the center cap.

use micromath::F32Ext;

use crate::color::{CHAMPAGNE, DARK_GOLD, DIAL_BG, DIM_GOLD, PEARL, ROSE_GOLD, SILVER};
use crate::config::{
    CENTER_X, CENTER_Y, DIAL_RADIUS, DRAW_PERIOD_MS, MINUTES_HAND_LEN, SECONDS_HAND_LEN,
    SWEEP_HAND_LEN, TICK_INNER_MAJOR, TICK_INNER_MINOR, TICK_OUTER,
};
use crate::raster::{circle, fill, filled_circle, line, line_aa, line_blended, thick_line, thick_line_aa};

/// Fixed-point sine table, one entry per 6 degrees, scaled by 1000.
const SIN_TABLE: [i16; 60] = [
    0, 105, 208, 309, 407, 500, 588, 669, 743, 809, //
    866, 914, 951, 978, 995, 1000, 995, 978, 951, 914, //
    866, 809, 743, 669, 588, 500, 407, 309, 208, 105, //
    0, -105, -208, -309, -407, -500, -588, -669, -743, -809, //
    -866, -914, -951, -978, -995, -1000, -995, -978, -951, -914, //
    -866, -809, -743, -669, -588, -500, -407, -309, -208, -105,
];

/// Sine of `angle_deg` scaled by 1000, at the table's 6-degree resolution.
pub fn sin_milli(angle_deg: u16) -> i16 {
    SIN_TABLE[((angle_deg % 360) / 6) as usize]
}

/// Cosine of `angle_deg` scaled by 1000: `cos(a) = sin(a + 90)`.
pub fn cos_milli(angle_deg: u16) -> i16 {
    sin_milli((angle_deg % 360) + 90)
}

/// Alpha levels for the sweep hand's motion-blur trail, oldest sample first.
const TRAIL_ALPHAS: [u8; 2] = [60, 120];

/// Render the static dial background. Called exactly once after panel init;
/// the result is treated as read-only for the rest of program life.
pub fn render_dial(fb: &mut [u16]) {
    fill(fb, DIAL_BG);

    // Decorative rings: a 3-pixel champagne outer band, 2-pixel dark gold inner
    for i in 0..3 {
        circle(fb, CENTER_X, CENTER_Y, DIAL_RADIUS + i, CHAMPAGNE);
    }
    for i in 0..2 {
        circle(fb, CENTER_X, CENTER_Y, DIAL_RADIUS - 5 + i, DARK_GOLD);
    }

    // 60 tick marks at 6-degree steps, 12 o'clock first; every 5th is larger
    for i in 0..60u16 {
        let angle = (i * 6 + 270) % 360;
        let (color, thickness, inner) = if i % 5 == 0 {
            (ROSE_GOLD, 3, TICK_INNER_MAJOR)
        } else {
            (DIM_GOLD, 1, TICK_INNER_MINOR)
        };

        let cos = cos_milli(angle) as i32;
        let sin = sin_milli(angle) as i32;
        let x0 = CENTER_X + inner * cos / 1000;
        let y0 = CENTER_Y + inner * sin / 1000;
        let x1 = CENTER_X + TICK_OUTER * cos / 1000;
        let y1 = CENTER_Y + TICK_OUTER * sin / 1000;

        if thickness > 1 {
            thick_line(fb, x0, y0, x1, y1, thickness, color);
        } else {
            line(fb, x0, y0, x1, y1, color);
        }
    }
}

/// Tip coordinates of a hand at `angle_rad` (0 = 3 o'clock, clockwise).
fn hand_tip(angle_rad: f32, len: i32) -> (i32, i32) {
    let x = CENTER_X + (len as f32 * angle_rad.cos()) as i32;
    let y = CENTER_Y + (len as f32 * angle_rad.sin()) as i32;
    (x, y)
}

/// Angle of a hand that completes one revolution per `period_ms`, rotated so
/// zero points at 12 o'clock.
fn rev_angle(phase_ms: u32, period_ms: u32) -> f32 {
    phase_ms as f32 * (core::f32::consts::TAU / period_ms as f32) - core::f32::consts::FRAC_PI_2
}

/// Compose one stopwatch frame: dial copy, three hands, center ornament.
pub fn compose_frame(fb: &mut [u16], dial: &[u16], elapsed_ms: u32) {
    fb.copy_from_slice(dial);

    // Seconds hand: continuous sweep, one revolution per minute
    let sec = rev_angle(elapsed_ms % 60_000, 60_000);
    let (sx, sy) = hand_tip(sec, SECONDS_HAND_LEN);
    thick_line_aa(fb, CENTER_X, CENTER_Y, sx, sy, 2, ROSE_GOLD);

    // Minutes-equivalent hand: steps once per second instead of sweeping
    let min = rev_angle((elapsed_ms / 1000) % 60 * 1000, 60_000);
    let (mx, my) = hand_tip(min, MINUTES_HAND_LEN);
    thick_line_aa(fb, CENTER_X, CENTER_Y, mx, my, 3, CHAMPAGNE);

    // Sub-second sweep hand with a 3-sample motion-blur trail: two trailing
    // ghosts at decreasing alpha, then the current position on top
    let phase = elapsed_ms % 1000;
    for (k, &alpha) in (1u32..=2).rev().zip(TRAIL_ALPHAS.iter()) {
        let ghost_phase = (phase + 1000 - k * DRAW_PERIOD_MS) % 1000;
        let (gx, gy) = hand_tip(rev_angle(ghost_phase, 1000), SWEEP_HAND_LEN);
        line_blended(fb, CENTER_X, CENTER_Y, gx, gy, SILVER, alpha);
    }
    let (wx, wy) = hand_tip(rev_angle(phase, 1000), SWEEP_HAND_LEN);
    line_aa(fb, CENTER_X, CENTER_Y, wx, wy, SILVER);

    // Two-tier center ornament
    filled_circle(fb, CENTER_X, CENTER_Y, 5, ROSE_GOLD);
    filled_circle(fb, CENTER_X, CENTER_Y, 3, PEARL);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FRAME_HEIGHT, FRAME_PIXELS, FRAME_WIDTH};

    fn frame() -> Vec<u16> {
        vec![0u16; FRAME_PIXELS]
    }

    fn pixel(fb: &[u16], x: i32, y: i32) -> u16 {
        fb[y as usize * FRAME_WIDTH + x as usize]
    }

    #[test]
    fn test_sin_table_cardinal_points() {
        assert_eq!(sin_milli(0), 0);
        assert_eq!(sin_milli(90), 1000);
        assert_eq!(sin_milli(180), 0);
        assert_eq!(sin_milli(270), -1000);
        assert_eq!(cos_milli(0), 1000);
        assert_eq!(cos_milli(180), -1000);
    }

    #[test]
    fn test_sin_table_odd_symmetry() {
        for a in (0..360).step_by(6) {
            assert_eq!(sin_milli(a), -sin_milli(a + 180), "angle {a}");
        }
    }

    #[test]
    fn test_sin_table_resolution_rounds_down() {
        // Angles within one 6-degree step share a table entry
        assert_eq!(sin_milli(91), sin_milli(90));
        assert_eq!(sin_milli(95), sin_milli(90));
        assert_ne!(sin_milli(96), sin_milli(90));
    }

    #[test]
    fn test_dial_background_and_rings() {
        let mut dial = frame();
        render_dial(&mut dial);
        assert_eq!(pixel(&dial, 0, 0), DIAL_BG);
        assert_eq!(pixel(&dial, CENTER_X + DIAL_RADIUS, CENTER_Y), CHAMPAGNE);
        // Major tick at 12 o'clock
        assert_eq!(pixel(&dial, CENTER_X, CENTER_Y - TICK_OUTER), ROSE_GOLD);
    }

    #[test]
    fn test_inner_ring_survives_between_ticks() {
        let mut dial = frame();
        render_dial(&mut dial);
        // Ticks are drawn after the rings and overpaint the inner ring along
        // their rays, so sample it by scanning: every surviving DARK_GOLD
        // pixel must sit in the ring band, and some must survive.
        let band = (DIAL_RADIUS - 6) * (DIAL_RADIUS - 6)..=(DIAL_RADIUS - 3) * (DIAL_RADIUS - 3);
        let mut ring_pixels = 0;
        for y in 0..FRAME_HEIGHT as i32 {
            for x in 0..FRAME_WIDTH as i32 {
                if pixel(&dial, x, y) == DARK_GOLD {
                    let (dx, dy) = (x - CENTER_X, y - CENTER_Y);
                    assert!(band.contains(&(dx * dx + dy * dy)), "stray pixel at ({x}, {y})");
                    ring_pixels += 1;
                }
            }
        }
        assert!(ring_pixels > 0, "inner ring fully overdrawn");
    }

    #[test]
    fn test_cos_accepts_full_angle_range() {
        // The reduction must happen before the quarter-turn shift so large
        // inputs cannot overflow
        assert_eq!(cos_milli(u16::MAX), cos_milli(u16::MAX % 360));
        assert_eq!(cos_milli(65_500), cos_milli(65_500 % 360));
    }

    #[test]
    fn test_compose_copies_dial_then_draws_hands() {
        let mut dial = frame();
        render_dial(&mut dial);
        let mut fb = frame();
        compose_frame(&mut fb, &dial, 0);

        // Untouched corner comes straight from the dial cache
        assert_eq!(pixel(&fb, 0, 0), DIAL_BG);
        // Center ornament sits on top of everything
        assert_eq!(pixel(&fb, CENTER_X, CENTER_Y), PEARL);
        assert_eq!(pixel(&fb, CENTER_X + 5, CENTER_Y), ROSE_GOLD);
        // At t=0 all hands point at 12 o'clock; only the sweep hand reaches
        // past the seconds hand (sampled short of the tip to stay clear of
        // float truncation at the endpoint)
        assert_eq!(pixel(&fb, CENTER_X, CENTER_Y - SWEEP_HAND_LEN + 5), SILVER);
    }

    #[test]
    fn test_compose_frames_differ_over_time() {
        let mut dial = frame();
        render_dial(&mut dial);
        let mut a = frame();
        let mut b = frame();
        compose_frame(&mut a, &dial, 0);
        compose_frame(&mut b, &dial, 250);
        assert_ne!(a, b);
    }

    #[test]
    fn test_minutes_hand_steps_per_second() {
        let mut dial = frame();
        render_dial(&mut dial);
        // Pick elapsed times where only the minutes hand could differ: the
        // seconds and sweep phases match 10s apart at the same sub-second.
        let mut early = frame();
        let mut late = frame();
        compose_frame(&mut early, &dial, 500);
        compose_frame(&mut late, &dial, 900);
        // Within one second the minutes hand must not move; mask out the
        // other hands by comparing the minutes tip region only.
        let min_tip_y = CENTER_Y - MINUTES_HAND_LEN;
        assert_eq!(
            pixel(&early, CENTER_X, min_tip_y),
            pixel(&late, CENTER_X, min_tip_y)
        );
    }
}
