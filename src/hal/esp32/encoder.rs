//! EC11 rotary encoder inputs for ESP32.
//!
//! The EC11 is a mechanical quadrature encoder with two switch contacts
//! (A and B) against a common pin. With the common pin on GND, both contacts
//! read high at rest and pull low while closed.
//!
//! # Wiring
//!
//! - A → GPIO6
//! - B → GPIO7
//! - C (common) → GND

use crate::quadrature::ChannelLevels;
use crate::traits::QuadratureInput;
use core::convert::Infallible;
use esp_idf_hal::gpio::{Input, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;

/// EC11 channel pair for ESP32.
///
/// Reads both contacts through internal pull-ups and reports its GPIO
/// numbers, so an encoder built from a config naming other pins is
/// rejected. Feed it to an
/// [`Ec11Encoder`](crate::Ec11Encoder) together with an
/// [`Esp32Clock`](super::Esp32Clock) and poll the encoder from a fast loop.
///
/// # Example
///
/// ```ignore
/// use ec11_decoder::hal::esp32::{Esp32Clock, Esp32Ec11};
/// use ec11_decoder::{DecoderConfig, Ec11Encoder};
///
/// let peripherals = Peripherals::take()?;
/// let input = Esp32Ec11::new(
///     peripherals.pins.gpio6, // A
///     peripherals.pins.gpio7, // B
/// )?;
/// let mut encoder = Ec11Encoder::new(DecoderConfig::default(), input, Esp32Clock::new())?;
///
/// loop {
///     encoder.poll()?;
///     encoder.poll_events();
/// }
/// ```
pub struct Esp32Ec11<'d, A, B>
where
    A: InputPin + OutputPin,
    B: InputPin + OutputPin,
{
    /// Channel A input
    a: PinDriver<'d, A, Input>,
    /// Channel B input
    b: PinDriver<'d, B, Input>,
}

impl<'d, A, B> Esp32Ec11<'d, A, B>
where
    A: InputPin + OutputPin,
    B: InputPin + OutputPin,
{
    /// Configures both pins as inputs with internal pull-ups.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails. Any pin driver created
    /// before the failure is dropped, which returns the pin to its reset state.
    pub fn new(
        a_pin: impl Peripheral<P = A> + 'd,
        b_pin: impl Peripheral<P = B> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut a = PinDriver::input(a_pin)?;
        let mut b = PinDriver::input(b_pin)?;

        // EC11 contacts switch to GND
        a.set_pull(Pull::Up)?;
        b.set_pull(Pull::Up)?;

        Ok(Self { a, b })
    }
}

impl<A, B> QuadratureInput for Esp32Ec11<'_, A, B>
where
    A: InputPin + OutputPin,
    B: InputPin + OutputPin,
{
    type Error = Infallible;

    #[inline]
    fn read_levels(&mut self) -> Result<ChannelLevels, Infallible> {
        Ok(ChannelLevels::new(self.a.is_high(), self.b.is_high()))
    }

    fn channel_ids(&self) -> Option<(i32, i32)> {
        Some((self.a.pin(), self.b.pin()))
    }
}
