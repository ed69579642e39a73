//! ESP32-C3 SuperMini hardware abstraction layer for an EC11 encoder.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Encoder**: EC11 with common pin to GND, A/B pulled up internally
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod clock;
mod encoder;

pub use clock::Esp32Clock;
pub use encoder::Esp32Ec11;

/// Pin assignments for SuperMini ESP32-C3.
pub mod pins {
    /// Encoder channel A (CLK)
    pub const ENC_A: i32 = 6;

    /// Encoder channel B (DT)
    pub const ENC_B: i32 = 7;
}
