//! EC11 encoder bound to a platform input and clock.
//!
//! [`Ec11Encoder`] owns a [`QuadratureInput`], a [`Clock`] and an
//! [`Ec11Decoder`]. Construction validates the configuration and reads the
//! resting channel levels; a failure at either point drops whatever was
//! acquired and returns an error, so no half-built encoder exists.
//!
//! [`poll`](Ec11Encoder::poll) samples the input and feeds the decoder. Call
//! it from a fast loop or timer; a full detent of an EC11 spans four
//! samples, so the sampling period must be well below a quarter detent at
//! the fastest expected rotation.
//!
//! # Two Contexts
//!
//! ```rust
//! use ec11_decoder::hal::{MockClock, MockEncoder};
//! use ec11_decoder::{DecoderConfig, Ec11Encoder, Step};
//!
//! let clock = MockClock::new();
//! let mut encoder: Ec11Encoder<MockEncoder, &MockClock> =
//!     Ec11Encoder::new(DecoderConfig::default(), MockEncoder::new(), &clock).unwrap();
//!
//! let (mut sampler, app) = encoder.split();
//! sampler.input_mut().turn(Step::Backward);
//! clock.advance_us(10);
//! sampler.poll().unwrap();
//! assert_eq!(app.count(), -1);
//! ```

use crate::channel::DEFAULT_EVENT_SLOTS;
use crate::config::DecoderConfig;
use crate::decoder::{DecoderHandle, Ec11Decoder, EdgeInput};
use crate::error::{ConfigError, DecoderError};
use crate::quadrature::Step;
use crate::traits::{Clock, QuadratureInput};
use crate::watch::TransitionEvent;

/// Rotary encoder: input, clock and decoder in one owner.
pub struct Ec11Encoder<I, C, const SLOTS: usize = DEFAULT_EVENT_SLOTS>
where
    I: QuadratureInput,
    C: Clock,
{
    decoder: Ec11Decoder<SLOTS>,
    input: I,
    clock: C,
}

impl<I, C, const SLOTS: usize> Ec11Encoder<I, C, SLOTS>
where
    I: QuadratureInput,
    C: Clock,
{
    /// Creates an encoder.
    ///
    /// # Errors
    ///
    /// - [`DecoderError::Config`] if `config` is invalid or names other pins
    ///   than `input` reads
    /// - [`DecoderError::Channel`] if the initial level read fails
    pub fn new(config: DecoderConfig, mut input: I, clock: C) -> Result<Self, DecoderError<I::Error>> {
        let decoder = Ec11Decoder::new(config)?;
        if let Some((a, b)) = input.channel_ids() {
            let config = decoder.config();
            for (configured, wired) in [(config.channel_a, a), (config.channel_b, b)] {
                if configured != wired {
                    return Err(ConfigError::ChannelMismatch { configured, wired }.into());
                }
            }
        }
        let levels = input.read_levels().map_err(DecoderError::Channel)?;
        tracing::debug!(a = levels.a, b = levels.b, "initial channel levels");

        Ok(Self {
            decoder: decoder.with_channel_levels(levels),
            input,
            clock,
        })
    }

    /// Samples the input once and applies any resulting step.
    pub fn poll(&mut self) -> Result<Step, I::Error> {
        let levels = self.input.read_levels()?;
        let now = self.clock.now_ns();
        Ok(self.decoder.on_sample(levels, now))
    }

    /// Splits into a sampler (edge path) and the application handle.
    pub fn split(&mut self) -> (EncoderSampler<'_, I, C, SLOTS>, DecoderHandle<'_, SLOTS>) {
        let (edges, handle) = self.decoder.split();
        (
            EncoderSampler {
                input: &mut self.input,
                clock: &self.clock,
                edges,
            },
            handle,
        )
    }

    /// Current counter value.
    #[inline]
    pub fn count(&self) -> i32 {
        self.decoder.count()
    }

    /// Resets the counter to the initial value.
    pub fn clear_count(&self) {
        self.decoder.clear_count();
    }

    /// Installs the event callback, replacing any previous one.
    pub fn register_event_callback<F>(&mut self, callback: F)
    where
        F: FnMut(i32) + Send + 'static,
    {
        self.decoder.register_event_callback(callback);
    }

    /// Delivers the queued events to the registered callback.
    pub fn poll_events(&mut self) -> usize {
        self.decoder.poll_events()
    }

    /// Drains queued events into `f` instead of the registered callback.
    pub fn poll_events_with<F>(&mut self, f: F) -> usize
    where
        F: FnMut(TransitionEvent),
    {
        self.decoder.poll_events_with(f)
    }

    /// Returns and resets the count of events lost to a full queue.
    pub fn take_dropped_events(&mut self) -> u32 {
        self.decoder.take_dropped_events()
    }

    /// The underlying decoder.
    pub fn decoder(&self) -> &Ec11Decoder<SLOTS> {
        &self.decoder
    }

    /// The platform input.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// The platform input, mutably.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Tears the encoder down and returns the input and clock.
    ///
    /// Queued events and the callback are dropped with the decoder.
    pub fn release(self) -> (I, C) {
        (self.input, self.clock)
    }
}

/// Edge-path half of a split [`Ec11Encoder`].
pub struct EncoderSampler<'a, I, C, const SLOTS: usize> {
    input: &'a mut I,
    clock: &'a C,
    edges: EdgeInput<'a, SLOTS>,
}

impl<I, C, const SLOTS: usize> EncoderSampler<'_, I, C, SLOTS>
where
    I: QuadratureInput,
    C: Clock,
{
    /// Samples the input once and applies any resulting step.
    pub fn poll(&mut self) -> Result<Step, I::Error> {
        let levels = self.input.read_levels()?;
        let now = self.clock.now_ns();
        Ok(self.edges.on_sample(levels, now))
    }

    /// The platform input, mutably.
    pub fn input_mut(&mut self) -> &mut I {
        self.input
    }
}
