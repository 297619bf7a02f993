//! RGB565 color packing, blending and the dial palette.
//!
//! Pixels are 16-bit RGB565: 5 bits red, 6 bits green, 5 bits blue. The
//! rasterizer stores them in native byte order; the panel driver sends the
//! pixel burst as 16-bit words so the wire sees big-endian, as the ST7789
//! expects.

/// Red channel field width mask (5 bits).
const R_MASK: u16 = 0x1F;
/// Green channel field width mask (6 bits).
const G_MASK: u16 = 0x3F;
/// Blue channel field width mask (5 bits).
const B_MASK: u16 = 0x1F;

/// Pack 8-bit-per-channel RGB into RGB565.
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    (((r as u16) >> 3) << 11) | (((g as u16) >> 2) << 5) | ((b as u16) >> 3)
}

/// Blend `fg` over `bg` with the given alpha.
///
/// `out = (fg * alpha + bg * (255 - alpha)) / 255` computed independently
/// per 5/6/5 channel field. `alpha == 0` returns `bg` unchanged,
/// `alpha == 255` returns `fg` unchanged.
pub fn blend(fg: u16, bg: u16, alpha: u8) -> u16 {
    let a = alpha as u32;
    let na = 255 - a;

    let fr = ((fg >> 11) & R_MASK) as u32;
    let fgr = ((fg >> 5) & G_MASK) as u32;
    let fb = (fg & B_MASK) as u32;

    let br = ((bg >> 11) & R_MASK) as u32;
    let bgr = ((bg >> 5) & G_MASK) as u32;
    let bb = (bg & B_MASK) as u32;

    let r = (fr * a + br * na) / 255;
    let g = (fgr * a + bgr * na) / 255;
    let b = (fb * a + bb * na) / 255;

    ((r as u16) << 11) | ((g as u16) << 5) | (b as u16)
}

// =============================================================================
// Dial Palette
// =============================================================================

/// Dial background (near-black ink).
pub const DIAL_BG: u16 = rgb565(12, 12, 12);

/// Champagne gold - outer ring and the minutes hand.
pub const CHAMPAGNE: u16 = rgb565(200, 170, 120);

/// Darker gold - inner ring.
pub const DARK_GOLD: u16 = rgb565(150, 130, 100);

/// Rose gold - major ticks, seconds hand, center cap.
pub const ROSE_GOLD: u16 = rgb565(220, 150, 130);

/// Dim gold - minor ticks.
pub const DIM_GOLD: u16 = rgb565(120, 100, 80);

/// Silver gray - sub-second sweep hand.
pub const SILVER: u16 = rgb565(180, 180, 180);

/// Pearl white - innermost center cap.
pub const PEARL: u16 = rgb565(240, 235, 230);

/// Deep navy boot splash.
pub const MIDNIGHT: u16 = rgb565(15, 25, 45);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_extremes() {
        assert_eq!(rgb565(0, 0, 0), 0x0000);
        assert_eq!(rgb565(255, 255, 255), 0xFFFF);
    }

    #[test]
    fn test_pack_single_channels() {
        assert_eq!(rgb565(255, 0, 0), 0xF800);
        assert_eq!(rgb565(0, 255, 0), 0x07E0);
        assert_eq!(rgb565(0, 0, 255), 0x001F);
    }

    #[test]
    fn test_blend_alpha_endpoints() {
        let fg = rgb565(220, 150, 130);
        let bg = rgb565(12, 12, 12);
        assert_eq!(blend(fg, bg, 0), bg);
        assert_eq!(blend(fg, bg, 255), fg);
    }

    #[test]
    fn test_blend_identical_colors_is_identity() {
        // (c*a + c*(255-a)) / 255 == c exactly, per channel
        let c = rgb565(200, 170, 120);
        for alpha in 0..=255u16 {
            assert_eq!(blend(c, c, alpha as u8), c);
        }
    }

    #[test]
    fn test_blend_midpoint_between_extremes() {
        // 50% white over black lands near mid-scale in every field
        let mid = blend(0xFFFF, 0x0000, 128);
        let r = (mid >> 11) & 0x1F;
        let g = (mid >> 5) & 0x3F;
        let b = mid & 0x1F;
        assert!((14..=16).contains(&r));
        assert!((30..=32).contains(&g));
        assert!((14..=16).contains(&b));
    }
}
