//! Hardware abstraction traits for encoder inputs and time.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`QuadratureInput`] | Level sampling of the two encoder channels |
//! | [`Clock`] | Monotonic nanosecond time source |
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::traits::QuadratureInput;
//! use ec11_decoder::hal::MockEncoder;
//! use ec11_decoder::Step;
//!
//! let mut knob = MockEncoder::new();
//! knob.turn(Step::Forward);
//!
//! let levels = knob.read_levels().unwrap();
//! assert!(!levels.a && levels.b);
//! ```

use crate::quadrature::ChannelLevels;

/// Quadrature signal input.
///
/// Implement this for the pins (or peripheral) your encoder is wired to.
/// Reading must be cheap and must not block; it runs on the edge path.
///
/// # Implementation Notes
///
/// - Report electrical levels as seen after any pull-up inversion, so a
///   channel reads `true` when its signal is high.
/// - Construction of the implementation owns the pin setup; dropping it
///   must release the pins.
pub trait QuadratureInput {
    /// Error type for input reads.
    type Error;

    /// Samples both channels at a single instant.
    fn read_levels(&mut self) -> Result<ChannelLevels, Self::Error>;

    /// GPIO numbers of channel A and B, if the input knows them.
    ///
    /// [`Ec11Encoder::new`](crate::Ec11Encoder::new) rejects a
    /// configuration naming different pins.
    fn channel_ids(&self) -> Option<(i32, i32)> {
        None
    }
}

/// Time source for edge timestamps.
///
/// # Example
///
/// ```rust
/// use ec11_decoder::traits::Clock;
/// use ec11_decoder::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ns(), 0);
///
/// clock.advance_us(3);
/// assert_eq!(clock.now_ns(), 3_000);
/// ```
pub trait Clock {
    /// Returns current time in nanoseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ns(&self) -> u64;
}

/// Converts a signed microsecond timer reading to nanoseconds.
///
/// Negative readings map to 0 and the result saturates at `u64::MAX`.
#[inline]
pub fn ns_from_micros(micros: i64) -> u64 {
    u64::try_from(micros).unwrap_or(0).saturating_mul(1_000)
}

impl<T: QuadratureInput + ?Sized> QuadratureInput for &mut T {
    type Error = T::Error;

    fn read_levels(&mut self) -> Result<ChannelLevels, Self::Error> {
        (**self).read_levels()
    }

    fn channel_ids(&self) -> Option<(i32, i32)> {
        (**self).channel_ids()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ns(&self) -> u64 {
        (**self).now_ns()
    }
}
