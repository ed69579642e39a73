//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware traits, enabling
//! development and testing on desktop without a physical encoder.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockEncoder`] | [`QuadratureInput`] | Simulated knob walking the Gray code |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::hal::{MockClock, MockEncoder};
//! use ec11_decoder::{DecoderConfig, Ec11Encoder, Step};
//!
//! let clock = MockClock::new();
//! let mut encoder: Ec11Encoder<MockEncoder, &MockClock> =
//!     Ec11Encoder::new(DecoderConfig::default(), MockEncoder::new(), &clock).unwrap();
//!
//! for _ in 0..4 {
//!     encoder.input_mut().turn(Step::Forward);
//!     clock.advance_us(50);
//!     encoder.poll().unwrap();
//! }
//! assert_eq!(encoder.count(), 4);
//! ```
//!
//! [`QuadratureInput`]: crate::traits::QuadratureInput
//! [`Clock`]: crate::traits::Clock

use crate::quadrature::{Channel, ChannelLevels, Edge, Step};
use crate::traits::{Clock, QuadratureInput};
use core::cell::Cell;

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Read failure injected into a [`MockEncoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockInputError;

impl core::fmt::Display for MockInputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("simulated input read failure")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MockInputError {}

/// Mock encoder for testing.
///
/// Holds the two channel levels of a simulated knob. Turning it moves
/// exactly one channel per quarter-step, following the Gray code in the
/// requested direction.
///
/// # Example
///
/// ```rust
/// use ec11_decoder::hal::MockEncoder;
/// use ec11_decoder::traits::QuadratureInput;
/// use ec11_decoder::{Channel, Edge, Step};
///
/// let mut encoder = MockEncoder::new();
///
/// // Clockwise: B leads A
/// assert_eq!(encoder.turn(Step::Forward), Some((Channel::B, Edge::Rising)));
/// assert_eq!(encoder.turn(Step::Forward), Some((Channel::A, Edge::Rising)));
///
/// // Simulate a broken input
/// encoder.fail_reads(true);
/// assert!(encoder.read_levels().is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockEncoder {
    levels: ChannelLevels,
    failing: bool,
    channel_ids: Option<(i32, i32)>,
    /// Number of successful `read_levels` calls.
    pub reads: usize,
}

impl MockEncoder {
    /// Creates a new mock encoder with both channels low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock encoder resting at the given levels.
    pub fn with_levels(mut self, levels: ChannelLevels) -> Self {
        self.levels = levels;
        self
    }

    /// Reports the given GPIO numbers from `channel_ids`.
    pub fn with_channel_ids(mut self, a: i32, b: i32) -> Self {
        self.channel_ids = Some((a, b));
        self
    }

    /// Moves the knob one quarter-step and returns the edge it produced.
    ///
    /// `Step::Hold` leaves the levels alone and returns `None`.
    pub fn turn(&mut self, step: Step) -> Option<(Channel, Edge)> {
        let (channel, next) = self.levels.advance(step)?;
        self.levels = next;
        Some((channel, Edge::towards(next.level(channel))))
    }

    /// Forces both levels, e.g. to simulate a missed phase.
    pub fn set_levels(&mut self, levels: ChannelLevels) {
        self.levels = levels;
    }

    /// Current simulated levels.
    pub fn levels(&self) -> ChannelLevels {
        self.levels
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn fail_reads(&mut self, failing: bool) {
        self.failing = failing;
    }
}

impl QuadratureInput for MockEncoder {
    type Error = MockInputError;

    fn read_levels(&mut self) -> Result<ChannelLevels, MockInputError> {
        if self.failing {
            return Err(MockInputError);
        }
        self.reads += 1;
        Ok(self.levels)
    }

    fn channel_ids(&self) -> Option<(i32, i32)> {
        self.channel_ids
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source. Time advances through `&self` so a
/// clock can be shared by reference with an encoder while the test moves it.
///
/// # Example
///
/// ```rust
/// use ec11_decoder::hal::MockClock;
/// use ec11_decoder::traits::Clock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ns(), 0);
///
/// clock.set_ns(1_000);
/// assert_eq!(clock.now_ns(), 1_000);
///
/// clock.advance_ns(500);
/// assert_eq!(clock.now_ns(), 1_500);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ns: Cell<u64>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in nanoseconds.
    pub fn set_ns(&self, ns: u64) {
        self.current_ns.set(ns);
    }

    /// Advances the clock by the given number of nanoseconds.
    pub fn advance_ns(&self, ns: u64) {
        self.current_ns.set(self.current_ns.get() + ns);
    }

    /// Advances the clock by the given number of microseconds.
    pub fn advance_us(&self, us: u64) {
        self.advance_ns(us * 1_000);
    }
}

impl Clock for MockClock {
    fn now_ns(&self) -> u64 {
        self.current_ns.get()
    }
}

// ============================================================================
// Tests
// ============================================================================
