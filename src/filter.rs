//! Minimum pulse width filtering of raw channel edges.
//!
//! Mechanical EC11 contacts ring for a short time on every detent. The
//! filter runs on physical edges, before classification: an edge that
//! arrives within `min_pulse_ns` of the last *accepted* edge on the same
//! channel is discarded.
//!
//! The filter itself holds only its configuration. The per-channel
//! timestamps of the last accepted edge live with the edge state of the
//! decoder and are passed in.
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::filter::GlitchFilter;
//!
//! let filter = GlitchFilter::new(1_000);
//! assert!(filter.accepts(None, 0));          // first edge ever
//! assert!(!filter.accepts(Some(0), 400));    // contact bounce
//! assert!(filter.accepts(Some(0), 1_000));   // a real pulse
//! ```

/// Suppresses edges narrower than a minimum pulse width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct GlitchFilter {
    min_pulse_ns: u32,
}

impl GlitchFilter {
    /// Creates a filter. A width of 0 accepts every edge.
    #[inline]
    pub const fn new(min_pulse_ns: u32) -> Self {
        Self { min_pulse_ns }
    }

    /// Configured minimum pulse width in nanoseconds.
    #[inline]
    pub const fn min_pulse_ns(&self) -> u32 {
        self.min_pulse_ns
    }

    /// Returns true if an edge at `now_ns` should be forwarded.
    ///
    /// `last_accepted_ns` is the timestamp of the previous accepted edge on
    /// the same channel, `None` if the channel has not moved yet.
    #[inline]
    pub fn accepts(&self, last_accepted_ns: Option<u64>, now_ns: u64) -> bool {
        match last_accepted_ns {
            Some(last) => now_ns.wrapping_sub(last) >= u64::from(self.min_pulse_ns),
            None => true,
        }
    }
}
