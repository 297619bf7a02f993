//! Panel geometry and timing configuration.
//!
//! # Optimization: Pre-computed Layout Constants
//!
//! Values like the frame pixel count and tick radii are computed at compile
//! time as `const` and used throughout the rendering code instead of being
//! recalculated every frame.

// =============================================================================
// Panel Geometry
// =============================================================================

/// Frame width in pixels (ST7789 1.69" module: 240x280, portrait).
pub const FRAME_WIDTH: usize = 240;

/// Frame height in pixels.
pub const FRAME_HEIGHT: usize = 280;

/// Pixels per frame.
pub const FRAME_PIXELS: usize = FRAME_WIDTH * FRAME_HEIGHT;

/// The 280-line glass sits centered in the controller's 240x320 RAM, so the
/// row address window is shifted down by 20 lines.
pub const PANEL_Y_OFFSET: u16 = 20;

// =============================================================================
// Dial Layout
// =============================================================================

/// Dial center X coordinate.
pub const CENTER_X: i32 = (FRAME_WIDTH / 2) as i32;

/// Dial center Y coordinate.
pub const CENTER_Y: i32 = (FRAME_HEIGHT / 2) as i32;

/// Dial radius in pixels.
pub const DIAL_RADIUS: i32 = 100;

/// Tick marks end this far inside the outer ring.
pub const TICK_OUTER: i32 = DIAL_RADIUS - 2;

/// Inner radius of the minor (1-unit) tick marks.
pub const TICK_INNER_MINOR: i32 = DIAL_RADIUS - 8;

/// Inner radius of the major (5-unit) tick marks.
pub const TICK_INNER_MAJOR: i32 = DIAL_RADIUS - 15;

/// Seconds hand length (continuous sweep, one revolution per minute).
pub const SECONDS_HAND_LEN: i32 = 88;

/// Minutes-equivalent hand length (steps once per second).
pub const MINUTES_HAND_LEN: i32 = 70;

/// Sub-second sweep hand length (one revolution per second).
pub const SWEEP_HAND_LEN: i32 = 95;

// =============================================================================
// Frame Scheduling
// =============================================================================

/// Draw period in milliseconds (100 FPS target).
pub const DRAW_PERIOD_MS: u32 = 10;

/// CPU-busy accounting period in milliseconds.
pub const REPORT_PERIOD_MS: u32 = 1000;

// =============================================================================
// Transfer Engine
// =============================================================================

/// Number of framebuffer slots in the pool.
pub const SLOT_COUNT: usize = 2;

/// Maximum pixels per DMA chunk.
///
/// The DMA stream length register is 16 bits wide, so a full 67,200-pixel
/// frame cannot go out in a single transfer. Half a frame fits, giving two
/// equal chunks per frame.
pub const MAX_CHUNK_PIXELS: usize = FRAME_PIXELS / 2;
