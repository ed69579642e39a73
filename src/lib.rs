//! # ec11-decoder
//!
//! A quadrature decoder for EC11-style rotary encoders with a saturating
//! counter, glitch filtering and watch-point events.
//!
//! ## Features
//!
//! - **Edge classification**: Every edge on channel A or B is turned into a
//!   forward, backward or hold step using the level of the other channel
//! - **Bounded counter**: Lock-free, saturates at configurable limits
//! - **Glitch filter**: Edges closer than a minimum pulse width are discarded
//! - **Watch points**: Reaching a limit or a configured value queues an event
//! - **Split contexts**: The edge path never blocks, allocates or logs; the
//!   application drains events and delivers them to a callback
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `quadrature` - Channel levels and the edge classification table
//! - `filter` - Minimum pulse width check
//! - `counter` - Saturating atomic counter
//! - `watch` - Watch policy and transition events
//! - `channel` - Bounded event queue between the two contexts
//! - `decoder` - The decoder tying these together
//! - `encoder` - A decoder bound to a sampled input and clock
//! - `traits` - Hardware abstractions
//! - `hal` - Concrete implementations (mock for testing, GPIO, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use ec11_decoder::{Channel, DecoderConfig, Ec11Decoder, Edge, EdgeEvent};
//!
//! let config = DecoderConfig::default().with_limits(-10, 10);
//! let mut decoder: Ec11Decoder = Ec11Decoder::new(config).unwrap();
//!
//! // One clockwise quarter-step: B rises while A is low
//! decoder.on_edge(EdgeEvent::new(Channel::B, Edge::Rising, 5_000));
//! assert_eq!(decoder.count(), 1);
//!
//! decoder.register_event_callback(|value| println!("reached {}", value));
//! decoder.poll_events();
//!
//! decoder.clear_count();
//! assert_eq!(decoder.count(), 0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Bounded single-producer event queue.
pub mod channel;
/// Decoder configuration and validation.
pub mod config;
/// Saturating lock-free step counter.
pub mod counter;
/// Quadrature decoder with split edge and application contexts.
pub mod decoder;
/// Encoder bound to a platform input and clock.
pub mod encoder;
/// Error types.
pub mod error;
/// Glitch filter for contact bounce.
pub mod filter;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Quadrature signal model and edge classification.
pub mod quadrature;
/// Core traits for hardware abstraction.
pub mod traits;
/// Watch points and transition events.
pub mod watch;

// Re-exports for convenience
pub use channel::{EventChannel, EventReceiver, EventSender, DEFAULT_EVENT_SLOTS};
pub use config::DecoderConfig;
pub use counter::{Bound, BoundedCounter, StepOutcome};
pub use decoder::{
    DecoderHandle, Ec11Decoder, EdgeEvent, EdgeInput, EdgeStats, EventCallback,
};
pub use encoder::{Ec11Encoder, EncoderSampler};
pub use error::{ConfigError, DecoderError};
pub use filter::GlitchFilter;
pub use quadrature::{classify, Channel, ChannelLevels, Edge, LevelChange, Step};
pub use traits::{Clock, QuadratureInput};
pub use watch::{TransitionEvent, WatchPoint, WatchPolicy, MAX_WATCH_POINTS};
