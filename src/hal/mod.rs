//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `gpio`: Any pair of `embedded-hal` input pins (requires `gpio` feature)
//! - `esp32`: ESP32-C3 SuperMini with an EC11 on GPIO6/7 (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "gpio")]
pub mod gpio;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "gpio")]
pub use gpio::GpioQuadrature;

#[cfg(feature = "esp32")]
pub use esp32::*;
