//! Quadrature input over two `embedded-hal` digital input pins.
//!
//! Works with any HAL implementing `embedded_hal::digital::InputPin` 1.0.
//! Both pins must share an error type.
//!
//! Inverted (active-low) wiring does not need special handling: inverting
//! both channels flips every edge and every level together, which leaves the
//! classified direction unchanged.

use crate::quadrature::ChannelLevels;
use crate::traits::QuadratureInput;
use embedded_hal::digital::InputPin;

/// Channel A and B read from two GPIO inputs.
#[derive(Debug)]
pub struct GpioQuadrature<A, B> {
    a: A,
    b: B,
}

impl<A, B> GpioQuadrature<A, B> {
    /// Wraps two configured input pins.
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// Releases the pins.
    pub fn release(self) -> (A, B) {
        (self.a, self.b)
    }
}

impl<A, B, E> QuadratureInput for GpioQuadrature<A, B>
where
    A: InputPin<Error = E>,
    B: InputPin<Error = E>,
{
    type Error = E;

    fn read_levels(&mut self) -> Result<ChannelLevels, E> {
        Ok(ChannelLevels::new(self.a.is_high()?, self.b.is_high()?))
    }
}
