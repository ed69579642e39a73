//! Watch points and the events they produce.
//!
//! Most counter changes are internal. Only arriving on a watch point turns
//! into a [`TransitionEvent`] for the application:
//!
//! - `low_limit` and `high_limit` are always watched; sitting on a bound and
//!   pushing further against it produces nothing new.
//! - Up to [`MAX_WATCH_POINTS`] intermediate values can be configured.
//!
//! Evaluation is a bounded scan over a `heapless::Vec`, so it is safe to run
//! on the edge path.

use crate::counter::{Bound, StepOutcome};
use heapless::Vec;

/// Maximum number of intermediate watch values.
pub const MAX_WATCH_POINTS: usize = 8;

/// Which watch point a [`TransitionEvent`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchPoint {
    /// The counter reached `low_limit`.
    LowLimit,
    /// The counter reached `high_limit`.
    HighLimit,
    /// The counter reached a configured intermediate value.
    Value(i32),
}

/// A single watch point crossing. Immutable once produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransitionEvent {
    /// The watch point that was reached.
    pub point: WatchPoint,
    /// Counter value at the crossing.
    pub count: i32,
    /// Timestamp of the edge that caused the crossing.
    pub timestamp_ns: u64,
}

impl TransitionEvent {
    /// Numeric value of the reached watch point.
    #[inline]
    pub fn watch_value(&self) -> i32 {
        match self.point {
            WatchPoint::Value(value) => value,
            WatchPoint::LowLimit | WatchPoint::HighLimit => self.count,
        }
    }

    /// True for `LowLimit` and `HighLimit`.
    #[inline]
    pub fn is_limit(&self) -> bool {
        matches!(self.point, WatchPoint::LowLimit | WatchPoint::HighLimit)
    }
}

/// Decides which counter changes are reported.
#[derive(Clone, Debug, Default)]
pub struct WatchPolicy {
    points: Vec<i32, MAX_WATCH_POINTS>,
}

impl WatchPolicy {
    /// Watches only the limits.
    pub fn limits_only() -> Self {
        Self::default()
    }

    /// Watches the limits plus the given intermediate values.
    ///
    /// Values past [`MAX_WATCH_POINTS`] and duplicates are ignored; use
    /// [`DecoderConfig::validate`](crate::DecoderConfig::validate) to reject
    /// such configurations up front.
    pub fn new(points: &[i32]) -> Self {
        let mut policy = Self::default();
        for &point in points {
            if !policy.points.contains(&point) {
                let _ = policy.points.push(point);
            }
        }
        policy
    }

    /// Configured intermediate values.
    pub fn points(&self) -> &[i32] {
        &self.points
    }

    /// Returns an event if `outcome` arrived on a watch point.
    ///
    /// A step that left the value unchanged never reports, so a counter
    /// pinned at a bound produces one event, not one per pushed step.
    pub fn evaluate(&self, outcome: &StepOutcome, timestamp_ns: u64) -> Option<TransitionEvent> {
        if !outcome.changed() {
            return None;
        }

        let point = match outcome.reached {
            Some(Bound::High) => WatchPoint::HighLimit,
            Some(Bound::Low) => WatchPoint::LowLimit,
            None if self.points.contains(&outcome.value) => WatchPoint::Value(outcome.value),
            None => return None,
        };

        Some(TransitionEvent {
            point,
            count: outcome.value,
            timestamp_ns,
        })
    }
}
