//! GPIO Abstractions
//!
//! The pin driver capability used by the transmitter, plus an adapter for
//! any `embedded-hal` output pin and delay.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::types::{Level, PinMode};

/// Exclusive access to one transmitter line
///
/// Level changes take effect immediately; `hold` blocks the calling
/// thread for the requested time without yielding.
pub trait PinDriver {
    /// Failure reported by the hardware access layer
    type Error: fmt::Debug;

    /// Switch the line between input (released) and output (driven)
    ///
    /// # Errors
    ///
    /// Returns the driver error if the mode cannot be set.
    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error>;

    /// Drive the line to `level`
    ///
    /// # Errors
    ///
    /// Returns the driver error if the level cannot be set.
    fn set_level(&mut self, level: Level) -> Result<(), Self::Error>;

    /// Block for `micros` microseconds
    fn hold(&mut self, micros: u32);
}

impl<T: PinDriver + ?Sized> PinDriver for &mut T {
    type Error = T::Error;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        (**self).set_mode(mode)
    }

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        (**self).set_level(level)
    }

    fn hold(&mut self, micros: u32) {
        (**self).hold(micros);
    }
}

/// Driver over an `embedded-hal` output pin and delay
///
/// `embedded-hal` has no direction control, so input mode is approximated
/// by parking the line low.
pub struct HalDriver<P, D> {
    pin: P,
    delay: D,
    mode: PinMode,
}

impl<P, D> HalDriver<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Wrap a pin and a delay (starts in input mode)
    #[must_use]
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            mode: PinMode::Input,
        }
    }

    /// Get the last requested mode
    #[must_use]
    pub const fn mode(&self) -> PinMode {
        self.mode
    }

    /// Give the pin and delay back
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P, D> PinDriver for HalDriver<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    type Error = P::Error;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        if mode == PinMode::Input {
            self.pin.set_low()?;
        }
        self.mode = mode;
        Ok(())
    }

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        match level {
            Level::High => self.pin.set_high(),
            Level::Low => self.pin.set_low(),
        }
    }

    fn hold(&mut self, micros: u32) {
        self.delay.delay_us(micros);
    }
}
