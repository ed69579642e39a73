//! Saturating position counter shared between the edge path and the
//! application.
//!
//! The value lives in an [`AtomicI32`]; steps are applied with a
//! compare-and-swap loop so the edge path never waits on a lock held by
//! the application. A step that would leave `[low, high]` leaves the value
//! at the bound.
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::counter::{Bound, BoundedCounter};
//! use ec11_decoder::Step;
//!
//! let counter = BoundedCounter::new(-2, 2, 0);
//! counter.apply_step(Step::Forward);
//! let outcome = counter.apply_step(Step::Forward);
//! assert_eq!(outcome.value, 2);
//! assert_eq!(outcome.reached, Some(Bound::High));
//!
//! // Already saturated: no change, nothing newly reached.
//! let outcome = counter.apply_step(Step::Forward);
//! assert_eq!(outcome.value, 2);
//! assert_eq!(outcome.reached, None);
//! ```

use crate::quadrature::Step;
use core::sync::atomic::{AtomicI32, Ordering};

/// One end of the counter range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bound {
    /// `low_limit`.
    Low,
    /// `high_limit`.
    High,
}

/// Result of [`BoundedCounter::apply_step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepOutcome {
    /// Value before the step.
    pub previous: i32,
    /// Value after the step (clamped).
    pub value: i32,
    /// Set when this step moved the counter onto a bound.
    ///
    /// Stays `None` while the counter sits at a bound it had already reached.
    pub reached: Option<Bound>,
}

impl StepOutcome {
    /// True if the value moved.
    #[inline]
    pub fn changed(&self) -> bool {
        self.previous != self.value
    }
}

/// Counter clamped to `[low, high]`.
#[derive(Debug)]
pub struct BoundedCounter {
    value: AtomicI32,
    low: i32,
    high: i32,
    initial: i32,
}

impl BoundedCounter {
    /// Creates a counter at `initial`.
    ///
    /// Callers validate `low < high` and `initial` in range through
    /// [`DecoderConfig::validate`](crate::DecoderConfig::validate); out of
    /// range initial values are clamped here.
    pub fn new(low: i32, high: i32, initial: i32) -> Self {
        let initial = initial.max(low).min(high);
        Self {
            value: AtomicI32::new(initial),
            low,
            high,
            initial,
        }
    }

    /// Applies a ±1 step with saturation. `Step::Hold` is a no-op.
    ///
    /// Lock-free; safe to call from the edge path while the application
    /// reads or clears the counter.
    pub fn apply_step(&self, step: Step) -> StepOutcome {
        let delta = step.as_i32();
        let (low, high) = (self.low, self.high);
        let result = self
            .value
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                if delta == 0 {
                    return None;
                }
                let next = current.saturating_add(delta).max(low).min(high);
                (next != current).then_some(next)
            });

        let (previous, value) = match result {
            Ok(previous) => (previous, previous.saturating_add(delta).max(low).min(high)),
            Err(current) => (current, current),
        };

        let reached = if previous == value {
            None
        } else if value == high {
            Some(Bound::High)
        } else if value == low {
            Some(Bound::Low)
        } else {
            None
        };

        StepOutcome {
            previous,
            value,
            reached,
        }
    }

    /// Current value. No side effects.
    #[inline]
    pub fn get(&self) -> i32 {
        self.value.load(Ordering::Acquire)
    }

    /// Resets to the initial value, whatever the current state.
    ///
    /// A step racing with the reset lands on either side of it.
    #[inline]
    pub fn clear(&self) {
        self.value.store(self.initial, Ordering::Release);
    }

    /// Lower bound.
    #[inline]
    pub fn low(&self) -> i32 {
        self.low
    }

    /// Upper bound.
    #[inline]
    pub fn high(&self) -> i32 {
        self.high
    }

    /// Value restored by [`clear`](Self::clear).
    #[inline]
    pub fn initial(&self) -> i32 {
        self.initial
    }

    /// True while the value sits on either bound.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        let value = self.get();
        value == self.low || value == self.high
    }
}
