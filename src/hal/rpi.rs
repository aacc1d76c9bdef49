//! Raspberry Pi pin driver
//!
//! Drives the transmitter data line through `rppal`, switching the pin
//! between input and output around each transmission.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use log::debug;
use rppal::gpio::{self, Gpio, IoPin, Mode};

use crate::hal::gpio::PinDriver;
use crate::hal::timer::SpinDelay;
use crate::types::{GpioPin, Level, PinMode};

/// `rppal` backed driver for one BCM pin
///
/// Acquiring the pin is the only fallible step; once open, mode and level
/// changes are plain register writes.
pub struct RppalDriver {
    pin: IoPin,
    delay: SpinDelay,
}

impl RppalDriver {
    /// Open `pin`, leaving it in input mode
    ///
    /// # Errors
    ///
    /// Returns the `rppal` error if the GPIO peripheral cannot be mapped
    /// (permissions, unsupported board) or the pin is already claimed.
    pub fn open(pin: GpioPin) -> Result<Self, gpio::Error> {
        let io = Gpio::new()?.get(pin.number())?.into_io(Mode::Input);
        debug!("opened GPIO{pin} in input mode");
        Ok(Self {
            pin: io,
            delay: SpinDelay::new(),
        })
    }
}

impl PinDriver for RppalDriver {
    type Error = Infallible;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        self.pin.set_mode(match mode {
            PinMode::Input => Mode::Input,
            PinMode::Output => Mode::Output,
        });
        Ok(())
    }

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        self.pin.write(match level {
            Level::Low => gpio::Level::Low,
            Level::High => gpio::Level::High,
        });
        Ok(())
    }

    fn hold(&mut self, micros: u32) {
        self.delay.delay_us(micros);
    }
}
