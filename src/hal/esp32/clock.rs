//! ESP32 clock implementation using the ESP-IDF timer.

use crate::traits::{ns_from_micros, Clock};

/// ESP32 clock using the hardware timer.
///
/// `esp_timer_get_time()` has microsecond resolution; timestamps are scaled
/// to nanoseconds, so glitch filter widths below 1µs round up to one tick.
///
/// # Example
///
/// ```ignore
/// use ec11_decoder::hal::esp32::Esp32Clock;
/// use ec11_decoder::traits::Clock;
///
/// let clock = Esp32Clock::new();
/// let start = clock.now_ns();
/// // ... do work ...
/// let elapsed = clock.now_ns() - start;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Esp32Clock;

impl Esp32Clock {
    /// Creates a new ESP32 clock instance.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for Esp32Clock {
    #[inline]
    fn now_ns(&self) -> u64 {
        // Safe: this is a simple read of the hardware timer, no side effects
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        ns_from_micros(micros)
    }
}
