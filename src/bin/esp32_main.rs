//! ESP32-C3 SuperMini EC11 encoder monitor.
//!
//! This is the main entry point for the physical hardware. It samples the
//! encoder from a tight loop and reports watch-point events over the serial
//! console:
//! - Polls channel A/B levels and feeds the decoder
//! - Delivers limit and watch-point events to a callback
//! - Reports the count once per second and any dropped events
//!
//! # Hardware Setup
//!
//! EC11 channel A on GPIO6, channel B on GPIO7, common pin to GND.
//!
//! # Sampling Rate
//!
//! The loop yields to FreeRTOS for one tick between samples so the IDLE
//! task runs and the task watchdog stays fed. With the default 100Hz tick
//! that is 10ms per sample, enough for slow turning only; set
//! `CONFIG_FREERTOS_HZ=1000` in `sdkconfig.defaults` for 1ms sampling.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! ```

use ec11_decoder::hal::esp32::{pins, Esp32Clock, Esp32Ec11};
use ec11_decoder::{Clock, DecoderConfig, Ec11Encoder};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;

/// Sampling interval in milliseconds (rounded up to one FreeRTOS tick)
const SAMPLE_INTERVAL_MS: u32 = 1;

/// Time between status lines in nanoseconds
const STATUS_INTERVAL_NS: u64 = 1_000_000_000;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();

    println!();
    println!("================================");
    println!("  EC11 Decoder SuperMini Monitor");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = DecoderConfig::new(pins::ENC_A, pins::ENC_B)
        .with_limits(-100, 100)
        .with_watch_point(0);

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Encoder (EC11 on GPIO6/7)
    // =========================================================================
    let input = Esp32Ec11::new(peripherals.pins.gpio6, peripherals.pins.gpio7)?;
    // Fails if the config names other pins than the ones wired here
    let mut encoder = Ec11Encoder::<_, _>::new(config, input, Esp32Clock::new())?;
    println!("[OK] Encoder initialized (GPIO6/7)");

    encoder.register_event_callback(|value| {
        println!("[EVENT] count reached {}", value);
    });

    println!();
    println!("Starting sample loop ({}ms)...", SAMPLE_INTERVAL_MS);
    println!();

    let clock = Esp32Clock::new();
    let mut last_status_ns = clock.now_ns();
    let mut last_reported = encoder.count();

    loop {
        encoder.poll()?;
        encoder.poll_events();

        let now = clock.now_ns();
        if now.saturating_sub(last_status_ns) >= STATUS_INTERVAL_NS {
            last_status_ns = now;
            let count = encoder.count();
            if count != last_reported {
                println!("[STATUS] count={}", count);
                last_reported = count;
            }
            let dropped = encoder.take_dropped_events();
            if dropped > 0 {
                println!("[WARN] {} events dropped", dropped);
            }
        }

        // Blocks for at least one tick; shorter std sleeps busy-wait
        FreeRtos::delay_ms(SAMPLE_INTERVAL_MS);
    }
}
