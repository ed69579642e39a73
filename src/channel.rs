//! Bounded event hand-off from the edge path to the application.
//!
//! Built on [`heapless::spsc::Queue`]: one producer (the edge path), one
//! consumer (the application's poll), no locks and no allocation.
//!
//! - [`EventSender::push`] never blocks. When the queue is full the new
//!   event is dropped, the events already queued are kept, and a drop
//!   counter is bumped.
//! - [`EventReceiver::drain`] hands the events queued at entry to a
//!   callback in production order and returns without waiting for more.
//!
//! # Capacity
//!
//! `SLOTS` is the storage size. The SPSC ring keeps one slot free, so the
//! usable capacity is `SLOTS - 1`; the default of
//! [`DEFAULT_EVENT_SLOTS`] holds 10 events.
//!
//! # Example
//!
//! ```rust
//! use ec11_decoder::channel::EventChannel;
//! use ec11_decoder::{TransitionEvent, WatchPoint};
//!
//! let mut channel: EventChannel<4> = EventChannel::new();
//! let (mut tx, mut rx) = channel.split();
//!
//! for count in 0..5 {
//!     tx.push(TransitionEvent { point: WatchPoint::Value(count), count, timestamp_ns: 0 });
//! }
//!
//! let mut seen = Vec::new();
//! rx.drain(|event| seen.push(event.count));
//! assert_eq!(seen, [0, 1, 2]); // capacity 3, the last two were dropped
//! assert_eq!(rx.take_dropped(), 2);
//! ```

use crate::watch::TransitionEvent;
use core::sync::atomic::{AtomicU32, Ordering};
use heapless::spsc::{Consumer, Producer, Queue};

/// Default storage size: 10 usable event slots.
pub const DEFAULT_EVENT_SLOTS: usize = 11;

/// Fixed-capacity event queue with drop-on-overflow.
pub struct EventChannel<const SLOTS: usize = DEFAULT_EVENT_SLOTS> {
    queue: Queue<TransitionEvent, SLOTS>,
    drops: DropCounters,
}

/// Overflow counts: `dropped` until the application takes it, `unreported`
/// until the next overflow warning.
#[derive(Debug, Default)]
struct DropCounters {
    dropped: AtomicU32,
    unreported: AtomicU32,
}

impl<const SLOTS: usize> EventChannel<SLOTS> {
    /// Creates an empty channel.
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
            drops: DropCounters {
                dropped: AtomicU32::new(0),
                unreported: AtomicU32::new(0),
            },
        }
    }

    /// Maximum number of queued events.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Number of queued events.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Events dropped since the last [`EventReceiver::take_dropped`].
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.drops.dropped.load(Ordering::Relaxed)
    }

    /// Splits into the producer and consumer ends.
    pub fn split(&mut self) -> (EventSender<'_, SLOTS>, EventReceiver<'_, SLOTS>) {
        let Self { queue, drops } = self;
        let (producer, consumer) = queue.split();
        let drops: &DropCounters = drops;
        (
            EventSender { producer, drops },
            EventReceiver { consumer, drops },
        )
    }
}

impl<const SLOTS: usize> Default for EventChannel<SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SLOTS: usize> core::fmt::Debug for EventChannel<SLOTS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventChannel")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Producer end, held by the edge path.
pub struct EventSender<'a, const SLOTS: usize> {
    producer: Producer<'a, TransitionEvent, SLOTS>,
    drops: &'a DropCounters,
}

impl<const SLOTS: usize> EventSender<'_, SLOTS> {
    /// Enqueues an event without blocking.
    ///
    /// Returns false if the queue was full and the event was dropped.
    #[inline]
    pub fn push(&mut self, event: TransitionEvent) -> bool {
        match self.producer.enqueue(event) {
            Ok(()) => true,
            Err(_) => {
                self.drops.dropped.fetch_add(1, Ordering::Relaxed);
                self.drops.unreported.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// True if the next push would be accepted.
    #[inline]
    pub fn ready(&self) -> bool {
        self.producer.ready()
    }
}

/// Consumer end, held by the application.
pub struct EventReceiver<'a, const SLOTS: usize> {
    consumer: Consumer<'a, TransitionEvent, SLOTS>,
    drops: &'a DropCounters,
}

impl<const SLOTS: usize> EventReceiver<'_, SLOTS> {
    /// Removes the oldest queued event.
    #[inline]
    pub fn pop(&mut self) -> Option<TransitionEvent> {
        self.consumer.dequeue()
    }

    /// Hands the events queued at entry to `f`, oldest first. Never waits
    /// for new events. Returns the number delivered.
    ///
    /// Events pushed while draining stay queued for the next call, so a busy
    /// producer cannot keep the consumer inside one drain.
    pub fn drain<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(TransitionEvent),
    {
        let pending = self.consumer.len();
        let mut delivered = 0;
        while delivered < pending {
            let Some(event) = self.consumer.dequeue() else {
                break;
            };
            f(event);
            delivered += 1;
        }
        delivered
    }

    /// Number of queued events.
    #[inline]
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// True if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events dropped since the last [`take_dropped`](Self::take_dropped).
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.drops.dropped.load(Ordering::Relaxed)
    }

    /// Returns and resets the overflow counter.
    #[inline]
    pub fn take_dropped(&mut self) -> u32 {
        self.drops.dropped.swap(0, Ordering::Relaxed)
    }

    /// Drops not yet logged. Independent of [`take_dropped`](Self::take_dropped).
    #[inline]
    pub(crate) fn take_unreported(&mut self) -> u32 {
        self.drops.unreported.swap(0, Ordering::Relaxed)
    }
}
