//! Sweephand library - testable modules for the stopwatch face firmware.
//!
//! This library contains the core logic that can be tested on the host machine.
//! The binary (`main.rs`) uses this library and adds the embedded-specific code:
//! the ST7789 panel driver, SPI/DMA wiring and the embassy tasks.
//!
//! # Architecture
//!
//! - [`raster`] + [`dial`]: software rasterizer and the stopwatch face
//! - [`pool`]: two-slot framebuffer arena with explicit ownership tags
//! - [`transfer`]: chunked DMA transfer state machine
//! - [`stopwatch`] + [`sched`]: elapsed-time state machine and frame cadence
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod color;
pub mod config;
pub mod cycles;
pub mod dial;
pub mod pool;
pub mod raster;
pub mod sched;
pub mod stopwatch;
pub mod transfer;
