//! Hardware Abstraction Layer
//!
//! The transmitter only ever talks to a [`PinDriver`]: switch the line
//! between input and output, set its level, block for a hold. Everything
//! platform specific sits behind that trait.

pub mod gpio;
#[cfg(feature = "std")]
pub mod recording;
#[cfg(feature = "rpi")]
pub mod rpi;
#[cfg(feature = "std")]
pub mod timer;

pub use gpio::{HalDriver, PinDriver};
#[cfg(feature = "std")]
pub use recording::{DriverEvent, InjectedFault, RecordingDriver};
#[cfg(feature = "rpi")]
pub use rpi::RppalDriver;
#[cfg(feature = "std")]
pub use timer::SpinDelay;
