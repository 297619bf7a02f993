//! Embassy wiring: framebuffer statics, the flush task and the main render
//! loop.
//!
//! # Double Buffering Synchronization
//!
//! The main task composes into the slot the [`FramePool`] hands out, then
//! signals the flush task with the slot index. The flush task clears
//! `LINK_BUSY` and signals `FLUSH_DONE` when the chunked DMA transfer has
//! fully completed. The main task is the only reader of `LINK_BUSY` and the
//! flush task its only writer past kickoff, so no lock is needed; the pool's
//! ownership tags additionally reject any overlap at runtime.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sweephand::color::MIDNIGHT;
use sweephand::config::FRAME_PIXELS;
use sweephand::pool::FramePool;
use sweephand::sched::FrameScheduler;
use sweephand::stopwatch::Stopwatch;
use sweephand::{cycles, dial};

use crate::board;
use crate::panel::St7789;

/// Boot-default HSI clock; [`cycles`] diagnostics are scaled to this.
const CPU_FREQ_HZ: u32 = 64_000_000;

// =============================================================================
// Framebuffer Statics
// =============================================================================

/// Frame slot 0 (134,400 bytes).
static mut FRAME_A: [u16; FRAME_PIXELS] = [0; FRAME_PIXELS];
/// Frame slot 1 (134,400 bytes).
static mut FRAME_B: [u16; FRAME_PIXELS] = [0; FRAME_PIXELS];
/// Pre-rendered dial background; written once, read-only afterwards.
static mut DIAL_CACHE: [u16; FRAME_PIXELS] = [0; FRAME_PIXELS];

/// Get a mutable reference to a frame slot for rendering.
///
/// # Safety
/// The caller must hold the slot in `Rendering` state in the [`FramePool`],
/// which guarantees the flush task is not reading it.
unsafe fn frame_mut(slot: usize) -> &'static mut [u16] {
    unsafe {
        if slot == 0 {
            &mut *core::ptr::addr_of_mut!(FRAME_A)
        } else {
            &mut *core::ptr::addr_of_mut!(FRAME_B)
        }
    }
}

/// Get an immutable reference to a frame slot for flushing.
///
/// # Safety
/// The caller must hold the slot in `Transferring` state in the
/// [`FramePool`], which guarantees the main task is not writing it.
unsafe fn frame(slot: usize) -> &'static [u16] {
    unsafe {
        if slot == 0 {
            &*core::ptr::addr_of!(FRAME_A)
        } else {
            &*core::ptr::addr_of!(FRAME_B)
        }
    }
}

// =============================================================================
// Flush Synchronization
// =============================================================================

/// Signal carrying the slot index the flush task should stream out.
static FLUSH_SIGNAL: Signal<CriticalSectionRawMutex, usize> = Signal::new();

/// Signal raised by the flush task once a transfer has fully completed.
static FLUSH_DONE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Transfer-in-flight flag. Set by the main task at kickoff, cleared only by
/// the flush task on completion; the main task only ever reads it to decide
/// whether to wait.
static LINK_BUSY: AtomicBool = AtomicBool::new(false);

/// Panel flush task - runs in parallel with rendering.
#[embassy_executor::task]
async fn flush_task(panel: &'static mut St7789<'static>) {
    info!("panel flush task started");

    loop {
        let slot = FLUSH_SIGNAL.wait().await;

        // SAFETY: the main task moved this slot to Transferring before
        // signaling and renders to the other slot until FLUSH_DONE
        let fb = unsafe { frame(slot) };

        if let Err(e) = panel.transfer_buffer(fb).await {
            warn!("panel transfer failed: {}", e);
        }

        LINK_BUSY.store(false, Ordering::Release);
        FLUSH_DONE.signal(());
    }
}

/// Milliseconds since `t0`, truncated to the stopwatch's u32 domain.
fn millis_since(t0: Instant) -> u32 {
    t0.elapsed().as_millis() as u32
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());
    info!("stopwatch face starting");

    let mut cp = unwrap!(cortex_m::Peripherals::take());
    cp.SCB.enable_icache();
    cp.SCB.enable_dcache(&mut cp.CPUID);
    cycles::init(CPU_FREQ_HZ);

    // Panel control lines and TX-only SPI with DMA
    let dc = Output::new(p.PJ11, Level::Low, Speed::VeryHigh);
    let cs = Output::new(p.PF6, Level::High, Speed::VeryHigh);
    let backlight = Output::new(p.PH6, Level::Low, Speed::Low);
    let spi = Spi::new_txonly(p.SPI5, p.PF7, p.PF9, p.DMA1_CH0, board::panel_spi_config());

    let mut panel = St7789::new(spi, dc, cs, backlight, cp.SCB);

    // Bring-up is fatal on failure: nothing downstream works without the link
    unwrap!(panel.init().await);

    // Pre-render the static dial, exactly once; read-only from here on
    // SAFETY: single-threaded at this point, nothing else touches the cache
    dial::render_dial(unsafe { &mut *core::ptr::addr_of_mut!(DIAL_CACHE) });

    // Boot splash before the pipeline starts
    // SAFETY: the pool is not live yet; slot 0 is untouched by anyone else
    if let Err(e) = panel.fill_uniform(unsafe { frame_mut(0) }, MIDNIGHT).await {
        warn!("splash fill failed: {}", e);
    }

    // Move the panel to a static so the flush task can borrow it for 'static
    static PANEL: StaticCell<St7789<'static>> = StaticCell::new();
    let panel: &'static mut St7789<'static> = PANEL.init(panel);
    unwrap!(spawner.spawn(flush_task(panel)));

    let mut pool = FramePool::new();
    let mut watch = Stopwatch::new();
    let t0 = Instant::now();

    // Stopwatch auto-starts, as the reference hardware does
    watch.start(millis_since(t0));
    let mut sched = FrameScheduler::new(millis_since(t0));
    let mut in_flight: Option<usize> = None;

    info!("main loop starting");

    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        ticker.next().await;
        let now = millis_since(t0);
        watch.tick(now);

        if sched.frame_due(now) {
            let work_start = cycles::read();

            let Ok(slot) = pool.begin_render() else {
                // Both slots busy: skip this frame rather than stall
                warn!("no idle slot, skipping frame");
                continue;
            };

            {
                // SAFETY: slot is in Rendering state; DIAL_CACHE is read-only
                // after the one-time pre-render above
                let fb = unsafe { frame_mut(slot) };
                let dial_cache = unsafe { &*core::ptr::addr_of!(DIAL_CACHE) };
                dial::compose_frame(fb, dial_cache, watch.elapsed_ms());
            }
            if pool.finish_render(slot).is_err() {
                warn!("pool rejected finish_render for slot {}", slot);
            }

            // Bounded wait for the previous transfer; a started transfer
            // always runs to completion
            if let Some(prev) = in_flight.take() {
                if LINK_BUSY.load(Ordering::Acquire) {
                    FLUSH_DONE.wait().await;
                } else {
                    // Completed already; consume the latched signal
                    let _ = FLUSH_DONE.try_take();
                }
                if pool.finish_transfer(prev).is_err() {
                    warn!("pool rejected finish_transfer for slot {}", prev);
                }
            }

            if pool.begin_transfer(slot).is_err() {
                warn!("pool rejected begin_transfer for slot {}", slot);
                continue;
            }
            LINK_BUSY.store(true, Ordering::Release);
            FLUSH_SIGNAL.signal(slot);
            in_flight = Some(slot);

            let work_cycles = cycles::elapsed(work_start, cycles::read());
            sched.note_busy(cycles::to_us(work_cycles));
        }

        if let Some(report) = sched.report_due(now) {
            info!(
                "stopwatch {} ms | cpu {}.{} % | draw avg {} us ({} frames)",
                watch.elapsed_ms(),
                report.percent_x10 / 10,
                report.percent_x10 % 10,
                report.avg_frame_us,
                report.frames
            );
        }
    }
}
