//! Stopwatch face firmware for the STM32H743 + ST7789 1.69" panel.
//!
//! Renders a live analog stopwatch face at 100 FPS while DMA streams the
//! previous frame to the panel.
//!
//! # Architecture
//!
//! Uses double buffering for parallel render/flush:
//! - Main task: composes the face into one buffer, signals flush, swaps to
//!   the other buffer, continues rendering
//! - Flush task: waits for the signal, streams the completed buffer to the
//!   panel as chunked 16-bit DMA transfers
//!
//! All pure logic (rasterizer, dial composition, stopwatch, buffer pool,
//! chunk sequencing, busy accounting) lives in the `sweephand` library and is
//! tested on the host; this binary adds the hardware wiring.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

#[cfg(target_arch = "arm")]
mod app;
#[cfg(target_arch = "arm")]
mod board;
#[cfg(target_arch = "arm")]
mod panel;

/// The firmware entry point is ARM-only; host builds only exercise the
/// library and its tests.
#[cfg(not(target_arch = "arm"))]
fn main() {}
