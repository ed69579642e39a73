//! Decoder configuration.
//!
//! A [`DecoderConfig`] is built once, validated at construction, and never
//! changed afterwards. Reconfiguring means dropping the decoder and building
//! a new one.
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::config::DecoderConfig;
//!
//! // Use defaults (GPIO6/GPIO7, -1000..=1000, 1µs glitch filter)
//! let config = DecoderConfig::default();
//! assert!(config.validate().is_ok());
//!
//! // Or customize
//! let config = DecoderConfig::new(4, 5)
//!     .with_limits(-24, 24)
//!     .with_glitch_filter_ns(2_000)
//!     .with_watch_point(0);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::ConfigError;
use crate::watch::{WatchPolicy, MAX_WATCH_POINTS};
use heapless::Vec as HVec;

/// Default lower counter limit.
pub const DEFAULT_LOW_LIMIT: i32 = -1000;

/// Default upper counter limit.
pub const DEFAULT_HIGH_LIMIT: i32 = 1000;

/// Default minimum pulse width in nanoseconds.
pub const DEFAULT_GLITCH_FILTER_NS: u32 = 1000;

/// Immutable decoder configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderConfig {
    /// GPIO number of channel A
    pub channel_a: i32,
    /// GPIO number of channel B
    pub channel_b: i32,
    /// Lowest counter value
    pub low_limit: i32,
    /// Highest counter value
    pub high_limit: i32,
    /// Value at construction and after a clear
    pub initial_count: i32,
    /// Minimum pulse width in nanoseconds (0 disables the filter)
    pub glitch_filter_ns: u32,
    /// Intermediate values that raise events when reached
    pub watch_points: HVec<i32, MAX_WATCH_POINTS>,
    #[cfg_attr(feature = "serde", serde(skip))]
    watch_points_overflowed: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new(6, 7)
    }
}

impl DecoderConfig {
    /// Creates a configuration for the given channel inputs with default
    /// limits and filter width.
    pub fn new(channel_a: i32, channel_b: i32) -> Self {
        Self {
            channel_a,
            channel_b,
            low_limit: DEFAULT_LOW_LIMIT,
            high_limit: DEFAULT_HIGH_LIMIT,
            initial_count: 0,
            glitch_filter_ns: DEFAULT_GLITCH_FILTER_NS,
            watch_points: HVec::new(),
            watch_points_overflowed: false,
        }
    }

    /// Set the counter limits
    pub fn with_limits(mut self, low: i32, high: i32) -> Self {
        self.low_limit = low;
        self.high_limit = high;
        self
    }

    /// Set the initial (and post-clear) count
    pub fn with_initial_count(mut self, initial: i32) -> Self {
        self.initial_count = initial;
        self
    }

    /// Set the glitch filter width
    pub fn with_glitch_filter_ns(mut self, ns: u32) -> Self {
        self.glitch_filter_ns = ns;
        self
    }

    /// Add an intermediate watch point
    ///
    /// Duplicates are stored once. Adding more than [`MAX_WATCH_POINTS`]
    /// makes [`validate`](Self::validate) fail.
    pub fn with_watch_point(mut self, value: i32) -> Self {
        if !self.watch_points.contains(&value) && self.watch_points.push(value).is_err() {
            self.watch_points_overflowed = true;
        }
        self
    }

    /// Checks every construction invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.low_limit >= self.high_limit {
            return Err(ConfigError::InvalidBounds {
                low: self.low_limit,
                high: self.high_limit,
            });
        }
        if self.channel_a == self.channel_b {
            return Err(ConfigError::DuplicateChannel(self.channel_a));
        }
        if !self.in_bounds(self.initial_count) {
            return Err(ConfigError::InitialOutOfBounds(self.initial_count));
        }
        if self.watch_points_overflowed {
            return Err(ConfigError::TooManyWatchPoints);
        }
        if let Some(&point) = self.watch_points.iter().find(|&&p| !self.in_bounds(p)) {
            return Err(ConfigError::WatchPointOutOfBounds(point));
        }
        Ok(())
    }

    /// Watch policy derived from `watch_points`.
    pub fn watch_policy(&self) -> WatchPolicy {
        WatchPolicy::new(&self.watch_points)
    }

    fn in_bounds(&self, value: i32) -> bool {
        (self.low_limit..=self.high_limit).contains(&value)
    }
}
