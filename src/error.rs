//! Error types.
//!
//! Only construction can fail. Once a decoder exists, stepping, reading and
//! clearing the counter are infallible and queue overflow is counted rather
//! than reported.

use core::fmt;

/// Rejected [`DecoderConfig`](crate::DecoderConfig).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `low_limit` is not strictly below `high_limit`.
    InvalidBounds {
        /// Configured lower limit.
        low: i32,
        /// Configured upper limit.
        high: i32,
    },
    /// Both channels name the same input.
    DuplicateChannel(i32),
    /// `initial_count` lies outside the limits.
    InitialOutOfBounds(i32),
    /// A watch point lies outside the limits.
    WatchPointOutOfBounds(i32),
    /// More intermediate watch points than
    /// [`MAX_WATCH_POINTS`](crate::watch::MAX_WATCH_POINTS).
    TooManyWatchPoints,
    /// The input is wired to a different GPIO than configured.
    ChannelMismatch {
        /// GPIO named in the configuration.
        configured: i32,
        /// GPIO the input actually reads.
        wired: i32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBounds { low, high } => {
                write!(f, "low limit {} must be below high limit {}", low, high)
            }
            ConfigError::DuplicateChannel(gpio) => {
                write!(f, "channel A and channel B both use GPIO{}", gpio)
            }
            ConfigError::InitialOutOfBounds(value) => {
                write!(f, "initial count {} is outside the counter limits", value)
            }
            ConfigError::WatchPointOutOfBounds(value) => {
                write!(f, "watch point {} is outside the counter limits", value)
            }
            ConfigError::TooManyWatchPoints => write!(
                f,
                "at most {} watch points are supported",
                crate::watch::MAX_WATCH_POINTS
            ),
            ConfigError::ChannelMismatch { configured, wired } => write!(
                f,
                "channel configured on GPIO{} but the input reads GPIO{}",
                configured, wired
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Construction failure of an encoder bound to real inputs.
///
/// `E` is the error type of the platform's
/// [`QuadratureInput`](crate::traits::QuadratureInput).
#[derive(Debug, PartialEq, Eq)]
pub enum DecoderError<E> {
    /// The configuration was rejected before touching any input.
    Config(ConfigError),
    /// Reading the channel inputs failed.
    Channel(E),
}

impl<E> From<ConfigError> for DecoderError<E> {
    fn from(err: ConfigError) -> Self {
        DecoderError::Config(err)
    }
}

impl<E: fmt::Debug> fmt::Display for DecoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderError::Config(err) => write!(f, "invalid configuration: {}", err),
            DecoderError::Channel(err) => write!(f, "channel setup failed: {:?}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for DecoderError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecoderError::Config(err) => Some(err),
            DecoderError::Channel(_) => None,
        }
    }
}
