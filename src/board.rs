//! Board wiring for the STM32H743 + ST7789 1.69" module.
//!
//! Pin mapping:
//! - SCK: PF7 (SPI5)
//! - MOSI: PF9 (SPI5)
//! - CS: PF6
//! - DC: PJ11
//! - Backlight: PH6
//! - Reset: tied to NRST (resets with the MCU)

use embassy_stm32::spi::Config as SpiConfig;
use embassy_stm32::time::Hertz;

/// SPI configuration for the ST7789 panel.
///
/// 25 MHz keeps the write cycle inside the controller's serial timing spec
/// while still flushing a full frame in well under the 10 ms draw period.
pub fn panel_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = Hertz(25_000_000);
    config
}
