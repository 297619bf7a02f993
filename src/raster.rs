//! Software rasterizer primitives over a raw RGB565 framebuffer.
//!
//! All functions operate on a caller-supplied `&mut [u16]` with the fixed
//! [`FRAME_WIDTH`] row stride. Out-of-bounds pixels are silently clipped,
//! so callers never need to pre-clip geometry.

use micromath::F32Ext;

use crate::color::blend;
use crate::config::{FRAME_HEIGHT, FRAME_WIDTH};

/// Alpha level for the soft edge pixels of anti-aliased lines.
const EDGE_ALPHA: u8 = 96;

/// Write one pixel, clipping to the frame bounds.
#[inline]
pub fn set_pixel(fb: &mut [u16], x: i32, y: i32, color: u16) {
    if x >= 0 && x < FRAME_WIDTH as i32 && y >= 0 && y < FRAME_HEIGHT as i32 {
        fb[y as usize * FRAME_WIDTH + x as usize] = color;
    }
}

/// Alpha-blend one pixel over whatever the framebuffer already holds.
#[inline]
pub fn set_pixel_blended(fb: &mut [u16], x: i32, y: i32, color: u16, alpha: u8) {
    if x >= 0 && x < FRAME_WIDTH as i32 && y >= 0 && y < FRAME_HEIGHT as i32 {
        let idx = y as usize * FRAME_WIDTH + x as usize;
        fb[idx] = blend(color, fb[idx], alpha);
    }
}

/// Fill the whole frame with one color.
pub fn fill(fb: &mut [u16], color: u16) {
    fb.fill(color);
}

/// Walk the integer Bresenham path from `(x0, y0)` to `(x1, y1)` inclusive,
/// invoking `plot` for every pixel on the way.
fn trace_line(x0: i32, y0: i32, x1: i32, y1: i32, mut plot: impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw a 1-pixel Bresenham line, both endpoints included.
pub fn line(fb: &mut [u16], x0: i32, y0: i32, x1: i32, y1: i32, color: u16) {
    trace_line(x0, y0, x1, y1, |x, y| set_pixel(fb, x, y, color));
}

/// Draw a 1-pixel line where every path pixel is alpha-blended over the
/// background instead of overwritten.
pub fn line_blended(fb: &mut [u16], x0: i32, y0: i32, x1: i32, y1: i32, color: u16, alpha: u8) {
    trace_line(x0, y0, x1, y1, |x, y| set_pixel_blended(fb, x, y, color, alpha));
}

/// Unit step along the dominant perpendicular of the line direction.
///
/// X-major lines get a vertical step, Y-major lines a horizontal one.
#[inline]
fn perp_step(x0: i32, y0: i32, x1: i32, y1: i32) -> (i32, i32) {
    if (x1 - x0).abs() >= (y1 - y0).abs() {
        (0, 1)
    } else {
        (1, 0)
    }
}

/// Perpendicular pixel offset for one parallel copy of a thick line.
///
/// Returns `(0, 0)` for a zero-length line: there is no perpendicular
/// direction to offset along, and dividing by the length would be undefined.
fn thick_offset(x0: i32, y0: i32, x1: i32, y1: i32, offset: i32) -> (i32, i32) {
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return (0, 0);
    }
    let off = offset as f32;
    ((-dy * off / len) as i32, (dx * off / len) as i32)
}

/// Draw a thick line as `thickness` parallel 1-pixel copies, offset along the
/// line's perpendicular unit vector by `t - thickness/2` for `t` in
/// `[0, thickness)`. A zero-length line has no perpendicular and draws
/// nothing.
pub fn thick_line(fb: &mut [u16], x0: i32, y0: i32, x1: i32, y1: i32, thickness: i32, color: u16) {
    if x0 == x1 && y0 == y1 {
        return;
    }
    for t in 0..thickness {
        let (ox, oy) = thick_offset(x0, y0, x1, y1, t - thickness / 2);
        line(fb, x0 + ox, y0 + oy, x1 + ox, y1 + oy, color);
    }
}

/// Anti-aliased 1-pixel line: solid Bresenham core plus semi-transparent
/// pixels one unit along the dominant perpendicular on both sides.
pub fn line_aa(fb: &mut [u16], x0: i32, y0: i32, x1: i32, y1: i32, color: u16) {
    let (px, py) = perp_step(x0, y0, x1, y1);
    trace_line(x0, y0, x1, y1, |x, y| {
        set_pixel(fb, x, y, color);
        set_pixel_blended(fb, x + px, y + py, color, EDGE_ALPHA);
        set_pixel_blended(fb, x - px, y - py, color, EDGE_ALPHA);
    });
}

/// Anti-aliased thick line: solid parallel copies plus one blended edge line
/// just outside each outermost copy.
pub fn thick_line_aa(
    fb: &mut [u16],
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    thickness: i32,
    color: u16,
) {
    thick_line(fb, x0, y0, x1, y1, thickness, color);

    if x0 == x1 && y0 == y1 {
        return;
    }
    let below = -(thickness / 2) - 1;
    let above = thickness - thickness / 2;
    for edge in [below, above] {
        let (ox, oy) = thick_offset(x0, y0, x1, y1, edge);
        line_blended(fb, x0 + ox, y0 + oy, x1 + ox, y1 + oy, color, EDGE_ALPHA);
    }
}

/// Midpoint circle outline using 8-way symmetry.
pub fn circle(fb: &mut [u16], cx: i32, cy: i32, r: i32, color: u16) {
    let mut x = r;
    let mut y = 0;
    let mut err = 0;

    while x >= y {
        set_pixel(fb, cx + x, cy + y, color);
        set_pixel(fb, cx + y, cy + x, color);
        set_pixel(fb, cx - y, cy + x, color);
        set_pixel(fb, cx - x, cy + y, color);
        set_pixel(fb, cx - x, cy - y, color);
        set_pixel(fb, cx - y, cy - x, color);
        set_pixel(fb, cx + y, cy - x, color);
        set_pixel(fb, cx + x, cy - y, color);

        if err <= 0 {
            y += 1;
            err += 2 * y + 1;
        }
        if err > 0 {
            x -= 1;
            err -= 2 * x + 1;
        }
    }
}

/// Filled circle via bounding-box scan with an `x^2 + y^2 <= r^2` inside test.
pub fn filled_circle(fb: &mut [u16], cx: i32, cy: i32, r: i32, color: u16) {
    for y in -r..=r {
        for x in -r..=r {
            if x * x + y * y <= r * r {
                set_pixel(fb, cx + x, cy + y, color);
            }
        }
    }
}
