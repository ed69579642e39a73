//! Trait definitions for hardware abstraction.
//!
//! This module defines the seams that let the decoder run on different
//! platforms (ESP32 GPIO, any `embedded-hal` input pair, desktop mocks):
//!
//! - [`QuadratureInput`]: reads the instantaneous levels of channel A and B
//! - [`Clock`]: monotonic time source used to timestamp edges

pub mod hardware;

pub use hardware::*;
