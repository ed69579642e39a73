//! The quadrature decoder.
//!
//! [`Ec11Decoder`] owns the counter, the channel levels, the event queue and
//! the application callback. It runs in two contexts:
//!
//! - **Edge path** ([`EdgeInput`]): called for every electrical edge (from an
//!   interrupt, a high-rate sampler, or a dedicated thread). Bounded work,
//!   no allocation, no locks, no logging.
//! - **Application** ([`DecoderHandle`]): reads and clears the counter and
//!   drains queued events into the registered callback.
//!
//! [`Ec11Decoder::split`] hands out one of each. For single-context use the
//! decoder exposes the same operations directly.
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::{Channel, DecoderConfig, Ec11Decoder, Edge, EdgeEvent};
//! use std::sync::{Arc, Mutex};
//!
//! let config = DecoderConfig::default().with_limits(-2, 2).with_glitch_filter_ns(0);
//! let mut decoder: Ec11Decoder = Ec11Decoder::new(config).unwrap();
//!
//! let reached = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&reached);
//! decoder.register_event_callback(move |value| sink.lock().unwrap().push(value));
//!
//! // Two clockwise quarter-steps: B rises, then A rises.
//! decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 0));
//! decoder.on_edge(EdgeEvent::new(Channel::A, Edge::Rising, 10));
//! assert_eq!(decoder.count(), 2);
//!
//! decoder.poll_events();
//! assert_eq!(*reached.lock().unwrap(), [2]);
//! ```

use crate::channel::{EventChannel, EventReceiver, EventSender, DEFAULT_EVENT_SLOTS};
use crate::config::DecoderConfig;
use crate::counter::BoundedCounter;
use crate::error::ConfigError;
use crate::filter::GlitchFilter;
use crate::quadrature::{classify, Channel, ChannelLevels, Edge, LevelChange, Step};
use crate::watch::{TransitionEvent, WatchPolicy};
use alloc::boxed::Box;
use core::sync::atomic::{AtomicU8, Ordering};

/// Application callback, invoked with the reached watch value.
pub type EventCallback = Box<dyn FnMut(i32) + Send>;

/// One electrical edge on one channel, as reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    /// The channel that moved.
    pub channel: Channel,
    /// Direction of the move.
    pub edge: Edge,
    /// When it happened.
    pub timestamp_ns: u64,
}

impl EdgeEvent {
    /// Creates an edge event.
    #[inline]
    pub const fn new(channel: Channel, edge: Edge, timestamp_ns: u64) -> Self {
        Self {
            channel,
            edge,
            timestamp_ns,
        }
    }
}

/// Counters for edges that did not move the position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeStats {
    /// Edges rejected by the glitch filter.
    pub suppressed: u32,
    /// Edges that did not change the recorded level of their channel.
    pub duplicates: u32,
    /// Samples in which both channels changed at once.
    pub skipped: u32,
}

/// Edge-path private state.
#[derive(Debug, Default)]
struct EdgeState {
    last_accepted_ns: [Option<u64>; 2],
    stats: EdgeStats,
}

/// Quadrature decoder with a saturating counter and watch-point events.
///
/// `SLOTS` sizes the event queue (capacity `SLOTS - 1`).
pub struct Ec11Decoder<const SLOTS: usize = DEFAULT_EVENT_SLOTS> {
    config: DecoderConfig,
    filter: GlitchFilter,
    policy: WatchPolicy,
    counter: BoundedCounter,
    levels: AtomicU8,
    edges: EdgeState,
    channel: EventChannel<SLOTS>,
    callback: Option<EventCallback>,
}

impl<const SLOTS: usize> Ec11Decoder<SLOTS> {
    /// Creates a decoder.
    ///
    /// # Errors
    ///
    /// Returns the first invariant `config` violates; no decoder is built.
    pub fn new(config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let decoder = Self {
            filter: GlitchFilter::new(config.glitch_filter_ns),
            policy: config.watch_policy(),
            counter: BoundedCounter::new(
                config.low_limit,
                config.high_limit,
                config.initial_count,
            ),
            levels: AtomicU8::new(ChannelLevels::default().bits()),
            edges: EdgeState::default(),
            channel: EventChannel::new(),
            callback: None,
            config,
        };

        tracing::info!(
            channel_a = decoder.config.channel_a,
            channel_b = decoder.config.channel_b,
            low = decoder.config.low_limit,
            high = decoder.config.high_limit,
            glitch_ns = decoder.config.glitch_filter_ns,
            capacity = decoder.channel.capacity(),
            "quadrature decoder created"
        );
        Ok(decoder)
    }

    /// Sets the channel levels the first edge is judged against.
    pub fn with_channel_levels(self, levels: ChannelLevels) -> Self {
        self.levels.store(levels.bits(), Ordering::Release);
        self
    }

    /// Splits into the edge-path and application halves.
    ///
    /// Both halves borrow the decoder; they can be moved to different
    /// threads (e.g. with `std::thread::scope`).
    pub fn split(&mut self) -> (EdgeInput<'_, SLOTS>, DecoderHandle<'_, SLOTS>) {
        let Self {
            filter,
            policy,
            counter,
            levels,
            edges,
            channel,
            callback,
            ..
        } = self;
        let (sender, receiver) = channel.split();
        let counter: &BoundedCounter = counter;
        let levels: &AtomicU8 = levels;

        (
            EdgeInput {
                filter,
                policy,
                counter,
                levels,
                edges,
                sender,
            },
            DecoderHandle {
                counter,
                levels,
                receiver,
                callback,
            },
        )
    }

    /// Feeds one edge. See [`EdgeInput::on_edge`].
    pub fn on_edge(&mut self, edge: EdgeEvent) -> Step {
        self.split().0.on_edge(edge)
    }

    /// Feeds one level sample. See [`EdgeInput::on_sample`].
    pub fn on_sample(&mut self, levels: ChannelLevels, timestamp_ns: u64) -> Step {
        self.split().0.on_sample(levels, timestamp_ns)
    }

    /// Current counter value. No side effects.
    #[inline]
    pub fn count(&self) -> i32 {
        self.counter.get()
    }

    /// Resets the counter to the initial value.
    pub fn clear_count(&self) {
        self.counter.clear();
        tracing::debug!(count = self.counter.initial(), "count cleared");
    }

    /// Installs the event callback, replacing any previous one.
    pub fn register_event_callback<F>(&mut self, callback: F)
    where
        F: FnMut(i32) + Send + 'static,
    {
        self.split().1.register_event_callback(callback);
    }

    /// Delivers the queued events to the registered callback.
    /// See [`DecoderHandle::poll_events`].
    pub fn poll_events(&mut self) -> usize {
        self.split().1.poll_events()
    }

    /// Drains queued events into `f` instead of the registered callback.
    pub fn poll_events_with<F>(&mut self, f: F) -> usize
    where
        F: FnMut(TransitionEvent),
    {
        self.split().1.poll_events_with(f)
    }

    /// Number of events waiting to be polled.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.channel.len()
    }

    /// Maximum number of queued events.
    #[inline]
    pub fn event_capacity(&self) -> usize {
        self.channel.capacity()
    }

    /// Events lost to a full queue since the last
    /// [`take_dropped_events`](Self::take_dropped_events).
    #[inline]
    pub fn dropped_events(&self) -> u32 {
        self.channel.dropped()
    }

    /// Returns and resets the count of events lost to a full queue.
    pub fn take_dropped_events(&mut self) -> u32 {
        self.split().1.take_dropped_events()
    }

    /// Last recorded channel levels.
    #[inline]
    pub fn channel_levels(&self) -> ChannelLevels {
        ChannelLevels::from_bits(self.levels.load(Ordering::Acquire))
    }

    /// Edges that were filtered or ignored so far.
    #[inline]
    pub fn edge_stats(&self) -> EdgeStats {
        self.edges.stats
    }

    /// Configuration the decoder was built with.
    #[inline]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }
}

impl<const SLOTS: usize> core::fmt::Debug for Ec11Decoder<SLOTS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ec11Decoder")
            .field("count", &self.count())
            .field("levels", &self.channel_levels())
            .field("channel", &self.channel)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl<const SLOTS: usize> Drop for Ec11Decoder<SLOTS> {
    fn drop(&mut self) {
        tracing::debug!(
            count = self.counter.get(),
            undelivered = self.channel.len(),
            "quadrature decoder dropped"
        );
    }
}

/// Edge-path half of a split decoder.
pub struct EdgeInput<'a, const SLOTS: usize> {
    filter: &'a GlitchFilter,
    policy: &'a WatchPolicy,
    counter: &'a BoundedCounter,
    levels: &'a AtomicU8,
    edges: &'a mut EdgeState,
    sender: EventSender<'a, SLOTS>,
}

impl<const SLOTS: usize> EdgeInput<'_, SLOTS> {
    /// Handles one electrical edge and returns the step applied.
    ///
    /// 1. The glitch filter drops edges closer than the minimum pulse width
    ///    to the last accepted edge on the same channel.
    /// 2. An edge that does not change the recorded level is ignored.
    /// 3. The edge is classified against the other channel's level, the
    ///    counter is stepped, and a watch-point crossing is queued.
    pub fn on_edge(&mut self, event: EdgeEvent) -> Step {
        let EdgeEvent {
            channel,
            edge,
            timestamp_ns,
        } = event;
        let slot = &mut self.edges.last_accepted_ns[channel.index()];

        if !self.filter.accepts(*slot, timestamp_ns) {
            self.edges.stats.suppressed = self.edges.stats.suppressed.wrapping_add(1);
            return Step::Hold;
        }
        *slot = Some(timestamp_ns);

        let current = ChannelLevels::from_bits(self.levels.load(Ordering::Acquire));
        let high = edge.level_after();
        if current.level(channel) == high {
            self.edges.stats.duplicates = self.edges.stats.duplicates.wrapping_add(1);
            return Step::Hold;
        }
        self.levels
            .store(current.with_level(channel, high).bits(), Ordering::Release);

        let step = classify(channel, edge, current.level(channel.other()));
        let outcome = self.counter.apply_step(step);
        if let Some(event) = self.policy.evaluate(&outcome, timestamp_ns) {
            // Full queue: the event is counted as dropped by the sender.
            let _ = self.sender.push(event);
        }
        step
    }

    /// Handles one sample of both levels, as taken by a polling loop.
    ///
    /// A single-channel change becomes an edge for [`on_edge`](Self::on_edge).
    /// If both channels changed the intermediate phase was missed; the new
    /// levels are recorded and no step is applied.
    pub fn on_sample(&mut self, levels: ChannelLevels, timestamp_ns: u64) -> Step {
        let current = ChannelLevels::from_bits(self.levels.load(Ordering::Acquire));
        match current.change_to(levels) {
            LevelChange::Unchanged => Step::Hold,
            LevelChange::Edge(channel, edge) => {
                self.on_edge(EdgeEvent::new(channel, edge, timestamp_ns))
            }
            LevelChange::Skipped => {
                self.levels.store(levels.bits(), Ordering::Release);
                self.edges.stats.skipped = self.edges.stats.skipped.wrapping_add(1);
                Step::Hold
            }
        }
    }

    /// Last recorded channel levels.
    #[inline]
    pub fn channel_levels(&self) -> ChannelLevels {
        ChannelLevels::from_bits(self.levels.load(Ordering::Acquire))
    }
}

/// Application half of a split decoder.
pub struct DecoderHandle<'a, const SLOTS: usize> {
    counter: &'a BoundedCounter,
    levels: &'a AtomicU8,
    receiver: EventReceiver<'a, SLOTS>,
    callback: &'a mut Option<EventCallback>,
}

impl<const SLOTS: usize> DecoderHandle<'_, SLOTS> {
    /// Current counter value. No side effects.
    #[inline]
    pub fn count(&self) -> i32 {
        self.counter.get()
    }

    /// Resets the counter to the initial value.
    ///
    /// Safe while the edge path is running; a concurrent step lands on
    /// either side of the reset.
    pub fn clear_count(&self) {
        self.counter.clear();
        tracing::debug!(count = self.counter.initial(), "count cleared");
    }

    /// Installs the event callback, replacing any previous one.
    pub fn register_event_callback<F>(&mut self, callback: F)
    where
        F: FnMut(i32) + Send + 'static,
    {
        let replaced = self.callback.replace(Box::new(callback)).is_some();
        tracing::debug!(replaced, "event callback registered");
    }

    /// Removes the event callback. Events polled afterwards are discarded.
    pub fn clear_event_callback(&mut self) {
        *self.callback = None;
    }

    /// Delivers the queued events to the registered callback, oldest
    /// first. Events queued during delivery wait for the next poll.
    ///
    /// Without a callback the events are consumed and discarded. Returns the
    /// number of events taken from the queue.
    pub fn poll_events(&mut self) -> usize {
        let Self {
            receiver, callback, ..
        } = self;
        let delivered = match callback.as_mut() {
            Some(cb) => receiver.drain(|event| cb(event.watch_value())),
            None => receiver.drain(|_| {}),
        };
        self.report_dropped();
        delivered
    }

    /// Drains queued events into `f` instead of the registered callback.
    pub fn poll_events_with<F>(&mut self, f: F) -> usize
    where
        F: FnMut(TransitionEvent),
    {
        let delivered = self.receiver.drain(f);
        self.report_dropped();
        delivered
    }

    /// Number of events waiting to be polled.
    #[inline]
    pub fn pending_events(&self) -> usize {
        self.receiver.len()
    }

    /// Events lost to a full queue since the last
    /// [`take_dropped_events`](Self::take_dropped_events).
    #[inline]
    pub fn dropped_events(&self) -> u32 {
        self.receiver.dropped()
    }

    /// Returns and resets the count of events lost to a full queue.
    #[inline]
    pub fn take_dropped_events(&mut self) -> u32 {
        self.receiver.take_dropped()
    }

    /// Last recorded channel levels.
    #[inline]
    pub fn channel_levels(&self) -> ChannelLevels {
        ChannelLevels::from_bits(self.levels.load(Ordering::Acquire))
    }

    fn report_dropped(&mut self) {
        let dropped = self.receiver.take_unreported();
        if dropped > 0 {
            tracing::warn!(dropped, "event queue overflowed, events lost");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::WatchPoint;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    fn decoder(low: i32, high: i32) -> Ec11Decoder {
        Ec11Decoder::new(
            DecoderConfig::default()
                .with_limits(low, high)
                .with_glitch_filter_ns(0),
        )
        .unwrap()
    }

    /// Feeds `n` quarter-steps in one direction, 10µs apart.
    fn turn<const N: usize>(decoder: &mut Ec11Decoder<N>, step: Step, n: usize, t0: u64) -> u64 {
        let mut t = t0;
        for _ in 0..n {
            let (channel, next) = decoder.channel_levels().advance(step).unwrap();
            let edge = Edge::towards(next.level(channel));
            assert_eq!(decoder.on_edge(EdgeEvent::new(channel, edge, t)), step);
            t += 10_000;
        }
        t
    }

    fn recorder() -> (Arc<Mutex<Vec<i32>>>, impl FnMut(i32) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value| sink.lock().unwrap().push(value))
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn rejects_invalid_config() {
        let result: Result<Ec11Decoder, _> =
            Ec11Decoder::new(DecoderConfig::default().with_limits(1, 0));
        assert!(matches!(result, Err(ConfigError::InvalidBounds { .. })));
    }

    #[test]
    fn starts_at_initial_count() {
        let decoder: Ec11Decoder =
            Ec11Decoder::new(DecoderConfig::default().with_initial_count(7)).unwrap();
        assert_eq!(decoder.count(), 7);
        assert_eq!(decoder.pending_events(), 0);
        assert_eq!(decoder.event_capacity(), 10);
        assert_eq!(decoder.config().initial_count, 7);
    }

    #[test]
    fn seeded_levels_used_for_first_edge() {
        let mut decoder = decoder(-10, 10).with_channel_levels(ChannelLevels::new(true, true));
        // B falls while A is high: forward.
        assert_eq!(
            decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Falling, 0)),
            Step::Forward
        );
        assert_eq!(decoder.channel_levels(), ChannelLevels::new(true, false));
    }

    // =========================================================================
    // Counting
    // =========================================================================

    #[test]
    fn forward_and_back() {
        let mut decoder = decoder(-100, 100);
        let t = turn(&mut decoder, Step::Forward, 12, 0);
        assert_eq!(decoder.count(), 12);
        turn(&mut decoder, Step::Backward, 12, t);
        assert_eq!(decoder.count(), 0);
    }

    #[test]
    fn duplicate_edge_ignored() {
        let mut decoder = decoder(-10, 10);
        assert_eq!(
            decoder.on_edge(EdgeEvent::new(Channel::A, Edge::Rising, 0)),
            Step::Backward
        );
        assert_eq!(
            decoder.on_edge(EdgeEvent::new(Channel::A, Edge::Rising, 5_000)),
            Step::Hold
        );
        assert_eq!(decoder.count(), -1);
        assert_eq!(decoder.edge_stats().duplicates, 1);
    }

    #[test]
    fn glitch_filter_drops_bounce() {
        let mut decoder: Ec11Decoder = Ec11Decoder::new(
            DecoderConfig::default().with_glitch_filter_ns(1_000),
        )
        .unwrap();

        assert_eq!(
            decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 10_000)),
            Step::Forward
        );
        // Contact bounce on B within 1µs.
        assert_eq!(
            decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Falling, 10_300)),
            Step::Hold
        );
        assert_eq!(
            decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 10_600)),
            Step::Hold
        );
        // A on its own channel is not affected by B's window.
        assert_eq!(
            decoder.on_edge(EdgeEvent::new(Channel::A, Edge::Rising, 10_700)),
            Step::Forward
        );
        assert_eq!(decoder.count(), 2);
        assert_eq!(decoder.edge_stats().suppressed, 2);
    }

    #[test]
    fn sample_with_both_channels_changed_is_skipped() {
        let mut decoder = decoder(-10, 10);
        assert_eq!(decoder.on_sample(ChannelLevels::new(false, false), 0), Step::Hold);
        assert_eq!(decoder.on_sample(ChannelLevels::new(false, true), 10), Step::Forward);
        assert_eq!(decoder.on_sample(ChannelLevels::new(true, false), 20), Step::Hold);
        assert_eq!(decoder.channel_levels(), ChannelLevels::new(true, false));
        assert_eq!(decoder.edge_stats().skipped, 1);
        assert_eq!(decoder.count(), 1);
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[test]
    fn high_limit_event_delivered_once() {
        let mut decoder = decoder(-3, 3);
        let (seen, callback) = recorder();
        decoder.register_event_callback(callback);

        turn(&mut decoder, Step::Forward, 10, 0);
        assert_eq!(decoder.count(), 3);
        assert_eq!(decoder.pending_events(), 1);
        assert_eq!(decoder.poll_events(), 1);
        assert_eq!(*seen.lock().unwrap(), [3]);
        assert_eq!(decoder.poll_events(), 0);
    }

    #[test]
    fn poll_with_sees_full_event() {
        let mut decoder: Ec11Decoder = Ec11Decoder::new(
            DecoderConfig::default()
                .with_limits(-5, 5)
                .with_glitch_filter_ns(0)
                .with_watch_point(-2),
        )
        .unwrap();
        turn(&mut decoder, Step::Backward, 2, 1_000);

        let mut events = Vec::new();
        decoder.poll_events_with(|event| events.push(event));
        assert_eq!(
            events,
            [TransitionEvent {
                point: WatchPoint::Value(-2),
                count: -2,
                timestamp_ns: 11_000,
            }]
        );
    }

    #[test]
    fn callback_replaced_on_register() {
        let mut decoder = decoder(-1, 1);
        let (first, callback) = recorder();
        decoder.register_event_callback(callback);
        let (second, callback) = recorder();
        decoder.register_event_callback(callback);

        turn(&mut decoder, Step::Forward, 1, 0);
        decoder.poll_events();
        assert!(first.lock().unwrap().is_empty());
        assert_eq!(*second.lock().unwrap(), [1]);
    }

    #[test]
    fn events_without_callback_are_consumed() {
        let mut decoder = decoder(-1, 1);
        turn(&mut decoder, Step::Forward, 1, 0);
        assert_eq!(decoder.poll_events(), 1);
        assert_eq!(decoder.pending_events(), 0);
    }

    #[test]
    fn overflow_drops_newest() {
        let mut decoder: Ec11Decoder<3> = Ec11Decoder::new(
            DecoderConfig::default()
                .with_limits(-1, 1)
                .with_glitch_filter_ns(0),
        )
        .unwrap();

        // Bounce between the limits: every step hits a bound.
        let mut t = turn(&mut decoder, Step::Forward, 1, 0);
        for _ in 0..4 {
            t = turn(&mut decoder, Step::Backward, 2, t);
            t = turn(&mut decoder, Step::Forward, 2, t);
        }
        assert_eq!(decoder.pending_events(), 2);
        assert_eq!(decoder.take_dropped_events(), 7);

        let mut values = Vec::new();
        decoder.poll_events_with(|event| values.push(event.watch_value()));
        assert_eq!(values, [1, -1]);
    }

    #[test]
    fn dropped_count_survives_poll() {
        let mut decoder: Ec11Decoder<3> = Ec11Decoder::new(
            DecoderConfig::default()
                .with_limits(-1, 1)
                .with_glitch_filter_ns(0),
        )
        .unwrap();

        let mut t = turn(&mut decoder, Step::Forward, 1, 0);
        for _ in 0..2 {
            t = turn(&mut decoder, Step::Backward, 2, t);
            t = turn(&mut decoder, Step::Forward, 2, t);
        }
        assert_eq!(decoder.poll_events(), 2);
        assert_eq!(decoder.poll_events(), 0);

        let (_, mut handle) = decoder.split();
        assert_eq!(handle.dropped_events(), 3);
        assert_eq!(handle.take_dropped_events(), 3);
        assert_eq!(handle.dropped_events(), 0);
    }

    // =========================================================================
    // Split Halves
    // =========================================================================

    #[test]
    fn split_halves_share_counter() {
        let mut decoder = decoder(-10, 10);
        let (mut edges, mut handle) = decoder.split();

        edges.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 0));
        assert_eq!(handle.count(), 1);
        assert_eq!(handle.channel_levels(), ChannelLevels::new(false, true));

        handle.clear_count();
        assert_eq!(handle.count(), 0);
        handle.clear_event_callback();
        assert_eq!(handle.poll_events(), 0);
        assert_eq!(edges.channel_levels(), ChannelLevels::new(false, true));
    }
}
