//! # aircontrol
//!
//! Sends Manchester-coded air commands to 433 MHz roller shutters and
//! blinds by toggling one GPIO line that keys a transmitter module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     APPLICATION (std)                    │
//! │   CLI  │  Parameter Store (TOML)  │  Command flow        │
//! ├──────────────────────────────────────────────────────────┤
//! │                    AIR COMMAND CORE                      │
//! │   Code Assembler  │  Encoding  │  Transmitter            │
//! ├──────────────────────────────────────────────────────────┤
//! │                         HAL                              │
//! │   PinDriver  │  rppal  │  embedded-hal  │  recording     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The core builds without `std`: symbols, encodings, the driver trait and
//! the transmitter only depend on `heapless` and `embedded-hal`.
//!
//! A symbol string is sent as a fixed trace of level changes and holds:
//!
//! ```
//! use aircontrol::air::transmit::Transmitter;
//! use aircontrol::hal::HalDriver;
//! use aircontrol::symbol::SymbolString;
//! use aircontrol::types::{TimingProfile, TransmissionPlan};
//! # use core::convert::Infallible;
//! # struct Pin;
//! # impl embedded_hal::digital::ErrorType for Pin { type Error = Infallible; }
//! # impl embedded_hal::digital::OutputPin for Pin {
//! #     fn set_low(&mut self) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct NoDelay;
//! # impl embedded_hal::delay::DelayNs for NoDelay { fn delay_ns(&mut self, _: u32) {} }
//!
//! let symbols = SymbolString::parse("sS0110S").unwrap();
//! let plan = TransmissionPlan::once(symbols);
//! let timing = TimingProfile::new(1780, 5000);
//!
//! let mut transmitter = Transmitter::new(HalDriver::new(Pin, NoDelay));
//! let report = transmitter.transmit(&plan, &timing).unwrap();
//! assert_eq!(report.level_changes, 3 + 4 * 2);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Air Command Logic
///
/// Code assembly and the transmitter state machine.
pub mod air;

/// System configuration and constants
pub mod config;

/// Line encodings
pub mod encoding;

/// Hardware Abstraction Layer
///
/// The pin driver capability and its implementations.
pub mod hal;

/// Symbol alphabet and validated symbol strings
pub mod symbol;

/// Shared types used across modules
pub mod types;

/// Command flow from descriptor to report
#[cfg(feature = "std")]
pub mod app;

/// Crate error type
#[cfg(feature = "std")]
pub mod error;

/// Parameter Store
#[cfg(feature = "std")]
pub mod params;

#[cfg(feature = "std")]
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::air::assembler::{assemble, Action, ActionCodes, DeviceCommand};
    pub use crate::air::transmit::{TransmitReport, Transmitter, TxState};
    pub use crate::encoding::{Encoding, Pulse};
    pub use crate::hal::PinDriver;
    pub use crate::symbol::{Symbol, SymbolString};
    pub use crate::types::{GpioPin, Level, PinMode, TimingProfile, TransmissionPlan};

    #[cfg(feature = "std")]
    pub use crate::params::{DeviceParameters, ParameterStore, TargetParameters, TomlStore};
}
