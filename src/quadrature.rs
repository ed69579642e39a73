//! Quadrature edge classification.
//!
//! An EC11-style encoder drives two square waves (channel A and channel B)
//! 90° out of phase. Each physical detent walks the pair of levels through
//! the four-state Gray code; the channel that moves first tells the direction.
//!
//! # Direction Convention
//!
//! [`Step::Forward`] (+1, clockwise on a standard EC11 wiring) is the
//! sequence in which channel B leads channel A:
//!
//! ```text
//! A B      A B      A B      A B      A B
//! 0 0  ->  0 1  ->  1 1  ->  1 0  ->  0 0
//! ```
//!
//! Every edge of that sequence classifies as +1, every edge of the reverse
//! sequence classifies as −1:
//!
//! | Channel | Edge    | Other channel | Step |
//! |---------|---------|---------------|------|
//! | A       | rising  | B high        | +1   |
//! | A       | rising  | B low         | −1   |
//! | A       | falling | B high        | −1   |
//! | A       | falling | B low         | +1   |
//! | B       | rising  | A high        | −1   |
//! | B       | rising  | A low         | +1   |
//! | B       | falling | A high        | +1   |
//! | B       | falling | A low         | −1   |
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::quadrature::{classify, Channel, Edge, Step};
//!
//! assert_eq!(classify(Channel::A, Edge::Rising, true), Step::Forward);
//! assert_eq!(classify(Channel::B, Edge::Rising, true), Step::Backward);
//! ```

/// One of the two encoder signal channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel A (CLK on most EC11 breakouts).
    A,
    /// Channel B (DT on most EC11 breakouts).
    B,
}

impl Channel {
    /// Returns the other channel.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Channel::A => Channel::B,
            Channel::B => Channel::A,
        }
    }

    /// Index into per-channel arrays (A = 0, B = 1).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }
}

/// Direction of a single signal transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
}

impl Edge {
    /// The edge that leads to the given level.
    #[inline]
    pub const fn towards(high: bool) -> Self {
        if high {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }

    /// Level of the channel after this edge.
    #[inline]
    pub const fn level_after(self) -> bool {
        matches!(self, Edge::Rising)
    }
}

/// Counter adjustment decided for one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// +1 (clockwise).
    Forward,
    /// −1 (counter-clockwise).
    Backward,
    /// 0, the transition carries no movement.
    #[default]
    Hold,
}

impl Step {
    /// Signed counter delta.
    #[inline]
    pub const fn as_i32(self) -> i32 {
        match self {
            Step::Forward => 1,
            Step::Backward => -1,
            Step::Hold => 0,
        }
    }

    /// The step a transition in the opposite direction produces.
    #[inline]
    pub const fn reverse(self) -> Self {
        match self {
            Step::Forward => Step::Backward,
            Step::Backward => Step::Forward,
            Step::Hold => Step::Hold,
        }
    }
}

/// Classifies a single edge.
///
/// `other_high` is the current level of the channel that did *not* move.
/// Total over its domain: every edge maps to exactly one of +1 or −1.
#[inline]
pub const fn classify(channel: Channel, edge: Edge, other_high: bool) -> Step {
    let rising = edge.level_after();
    let forward = match channel {
        Channel::A => rising == other_high,
        Channel::B => rising != other_high,
    };
    if forward {
        Step::Forward
    } else {
        Step::Backward
    }
}

/// Instantaneous levels of both channels, one of the four quadrature phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelLevels {
    /// Channel A is high.
    pub a: bool,
    /// Channel B is high.
    pub b: bool,
}

/// Difference between two level samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelChange {
    /// Neither channel moved.
    Unchanged,
    /// Exactly one channel moved.
    Edge(Channel, Edge),
    /// Both channels moved between samples; direction cannot be recovered.
    Skipped,
}

impl ChannelLevels {
    /// Creates a level pair.
    #[inline]
    pub const fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }

    /// Packs the levels as `0bAB`.
    #[inline]
    pub const fn bits(self) -> u8 {
        ((self.a as u8) << 1) | (self.b as u8)
    }

    /// Inverse of [`bits`](Self::bits). Higher bits are ignored.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            a: bits & 0b10 != 0,
            b: bits & 0b01 != 0,
        }
    }

    /// Level of one channel.
    #[inline]
    pub const fn level(self, channel: Channel) -> bool {
        match channel {
            Channel::A => self.a,
            Channel::B => self.b,
        }
    }

    /// Returns a copy with one channel set to `high`.
    #[inline]
    pub const fn with_level(self, channel: Channel, high: bool) -> Self {
        match channel {
            Channel::A => Self { a: high, b: self.b },
            Channel::B => Self { a: self.a, b: high },
        }
    }

    /// The channel that moves next when rotating by `step`, and the levels
    /// after it moved. `Step::Hold` returns `None`.
    pub const fn advance(self, step: Step) -> Option<(Channel, Self)> {
        let in_phase = self.a == self.b;
        let channel = match step {
            Step::Forward if in_phase => Channel::B,
            Step::Forward => Channel::A,
            Step::Backward if in_phase => Channel::A,
            Step::Backward => Channel::B,
            Step::Hold => return None,
        };
        Some((channel, self.with_level(channel, !self.level(channel))))
    }

    /// Compares this sample with a later one.
    pub const fn change_to(self, next: Self) -> LevelChange {
        match (self.a != next.a, self.b != next.b) {
            (false, false) => LevelChange::Unchanged,
            (true, false) => LevelChange::Edge(Channel::A, Edge::towards(next.a)),
            (false, true) => LevelChange::Edge(Channel::B, Edge::towards(next.b)),
            (true, true) => LevelChange::Skipped,
        }
    }
}

/// Classifies the move between two level samples.
///
/// A single-channel change is classified with [`classify`]; no change and
/// a double change (a missed intermediate phase) both yield [`Step::Hold`].
pub const fn classify_transition(prev: ChannelLevels, next: ChannelLevels) -> Step {
    match prev.change_to(next) {
        LevelChange::Edge(channel, edge) => classify(channel, edge, next.level(channel.other())),
        LevelChange::Unchanged | LevelChange::Skipped => Step::Hold,
    }
}
