//! Async ST7789 panel driver with chunked 16-bit DMA transfers.
//!
//! Commands and parameters go out as single bytes with the DC line low/high;
//! the pixel burst goes out as 16-bit words so the wire sees the big-endian
//! order the controller expects, split into chunks by the
//! [`ChunkedTransfer`] sequencer because the DMA stream length register
//! cannot cover a full frame. Before every DMA kickoff the D-cache is cleaned
//! over the buffer range so the engine reads the rasterizer's writes instead
//! of stale cache lines.
//!
//! The bring-up delays in [`St7789::init`] are controller timing contracts
//! (datasheet section 9.16), not tunables: skipping them yields a blank or
//! corrupted panel.

use cortex_m::peripheral::SCB;
use defmt::{info, warn};
use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Async;
use embassy_stm32::spi::{self, Spi};
use embassy_time::Timer;

use sweephand::config::{FRAME_HEIGHT, FRAME_WIDTH, MAX_CHUNK_PIXELS, PANEL_Y_OFFSET};
use sweephand::transfer::ChunkedTransfer;

// ST7789 command set
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

#[derive(Debug, defmt::Format)]
pub enum PanelError {
    /// SPI transport failure.
    Link(spi::Error),
    /// The chunk sequencer still had a transfer in flight when a new frame
    /// arrived; the frame was dropped.
    TransferBusy,
}

impl From<spi::Error> for PanelError {
    fn from(e: spi::Error) -> Self {
        Self::Link(e)
    }
}

/// ST7789 driver: owns the SPI link, the DC/CS/backlight control lines and
/// the chunk sequencer.
pub struct St7789<'d> {
    spi: Spi<'d, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
    backlight: Output<'d>,
    scb: SCB,
    xfer: ChunkedTransfer,
}

impl<'d> St7789<'d> {
    pub fn new(
        spi: Spi<'d, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
        backlight: Output<'d>,
        scb: SCB,
    ) -> Self {
        Self {
            spi,
            dc,
            cs,
            backlight,
            scb,
            xfer: ChunkedTransfer::new(MAX_CHUNK_PIXELS),
        }
    }

    /// Mandatory bring-up sequence. The two 120 ms delays (after reset and
    /// after sleep-out) are hard minimums from the controller datasheet.
    pub async fn init(&mut self) -> Result<(), PanelError> {
        self.write_command(SWRESET).await?;
        Timer::after_millis(120).await;

        // Memory access control: top-to-bottom, left-to-right, RGB order
        self.write_command(MADCTL).await?;
        self.write_data(&[0x00]).await?;

        // Pixel format: 16-bit RGB565
        self.write_command(COLMOD).await?;
        self.write_data(&[0x55]).await?;

        // The glass is normally-black, so inversion must be on
        self.write_command(INVON).await?;

        self.write_command(SLPOUT).await?;
        Timer::after_millis(120).await;

        self.write_command(DISPON).await?;
        self.backlight.set_high();

        info!("panel initialized ({}x{})", FRAME_WIDTH, FRAME_HEIGHT);
        Ok(())
    }

    /// Fill the supplied back buffer with one color and push it to the panel.
    pub async fn fill_uniform(&mut self, fb: &mut [u16], color: u16) -> Result<(), PanelError> {
        fb.fill(color);
        self.transfer_buffer(fb).await
    }

    /// Stream a full frame to the panel as chunked DMA transfers.
    ///
    /// Each chunk range comes from the [`ChunkedTransfer`] sequencer; each
    /// completed DMA write feeds one completion event back to it. On a
    /// transport error the in-flight plan is aborted, CS is released and the
    /// error is returned to the caller. A frame offered while the sequencer
    /// is still busy is dropped with [`PanelError::TransferBusy`].
    pub async fn transfer_buffer(&mut self, fb: &[u16]) -> Result<(), PanelError> {
        self.set_window(0, 0, (FRAME_WIDTH - 1) as u16, (FRAME_HEIGHT - 1) as u16)
            .await?;

        // The DMA engine must observe the CPU's most recent writes
        self.scb.clean_dcache_by_slice(fb);

        // RAMWR, then the pixel burst with CS held low for the whole frame
        self.cs.set_low();
        self.dc.set_low();
        if let Err(e) = self.spi.write(&[RAMWR]).await {
            self.cs.set_high();
            return Err(e.into());
        }
        self.dc.set_high();

        let mut next = match self.xfer.begin(fb.len()) {
            Ok(range) => Some(range),
            Err(_) => {
                // A transfer is already in flight; the caller's busy gate is
                // broken. Refuse, report, and drop the frame rather than
                // corrupt the in-flight plan.
                self.cs.set_high();
                warn!("chunk sequencer busy, dropping frame");
                return Err(PanelError::TransferBusy);
            }
        };
        while let Some(range) = next {
            // 16-bit words on the wire; byte-wide command/data writes above
            // and below restore the 8-bit width implicitly
            if let Err(e) = self.spi.write(&fb[range]).await {
                self.xfer.abort();
                self.cs.set_high();
                return Err(e.into());
            }
            next = self.xfer.chunk_complete();
        }

        self.cs.set_high();
        Ok(())
    }

    /// Send a command byte (DC low, CS low during the transaction).
    async fn write_command(&mut self, cmd: u8) -> Result<(), PanelError> {
        self.cs.set_low();
        self.dc.set_low();
        let res = self.spi.write(&[cmd]).await;
        self.cs.set_high();
        res.map_err(PanelError::Link)
    }

    /// Send parameter bytes (DC high, CS low during the transaction).
    async fn write_data(&mut self, data: &[u8]) -> Result<(), PanelError> {
        self.cs.set_low();
        self.dc.set_high();
        let res = self.spi.write(data).await;
        self.cs.set_high();
        res.map_err(PanelError::Link)
    }

    /// Set the drawing window. Each bound goes out as a big-endian u16 pair;
    /// rows are shifted by the panel's fixed Y offset.
    async fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), PanelError> {
        let (y0, y1) = (y0 + PANEL_Y_OFFSET, y1 + PANEL_Y_OFFSET);

        self.write_command(CASET).await?;
        self.write_data(&coord_pair(x0, x1)).await?;

        self.write_command(RASET).await?;
        self.write_data(&coord_pair(y0, y1)).await?;
        Ok(())
    }
}

/// Pack a start/end coordinate pair as four big-endian bytes.
fn coord_pair(start: u16, end: u16) -> [u8; 4] {
    let s = start.to_be_bytes();
    let e = end.to_be_bytes();
    [s[0], s[1], e[0], e[1]]
}
