//! Shared types used across the transmitter
//!
//! This module defines domain-specific types that enforce invariants
//! for pins, pulse timing and transmission schedules.

use core::fmt;
use core::num::NonZeroU32;

use crate::config::{GPIO_PIN_MAX, GPIO_PIN_MIN, GPIO_PIN_UNSET};
use crate::encoding::Encoding;
use crate::symbol::SymbolString;

/// Logic level of the transmitter line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Line driven low (carrier off)
    Low,
    /// Line driven high (carrier on)
    High,
}

impl Level {
    /// The opposite level
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Direction of the transmitter line
///
/// Input is the idle state: the line is released and nothing is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PinMode {
    /// Released, undriven
    #[default]
    Input,
    /// Driven by the transmitter
    Output,
}

/// GPIO pin number (BCM numbering) within the platform range
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GpioPin(u8);

impl GpioPin {
    /// Lowest valid pin
    pub const MIN: u8 = GPIO_PIN_MIN;

    /// Highest valid pin
    pub const MAX: u8 = GPIO_PIN_MAX;

    /// Configuration value meaning "unset, defer to the caller"
    pub const UNSET: u8 = GPIO_PIN_UNSET;

    /// Create a pin, returns None if out of range
    #[must_use]
    pub const fn new(pin: u8) -> Option<Self> {
        if pin >= Self::MIN && pin <= Self::MAX {
            Some(Self(pin))
        } else {
            None
        }
    }

    /// Create a pin from any integer, returns None if out of range
    #[must_use]
    pub fn from_number(number: i64) -> Option<Self> {
        u8::try_from(number).ok().and_then(Self::new)
    }

    /// Check if a raw configuration value is the unset sentinel
    #[must_use]
    pub const fn is_unset(number: i64) -> bool {
        number == Self::UNSET as i64
    }

    /// Get the BCM pin number
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GpioPin({})", self.0)
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pulse lengths of one device or target, in microseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TimingProfile {
    /// Length of one data bit, split into two half-pulses
    data_length_us: u32,
    /// Length of one flat sync element
    sync_length_us: u32,
}

impl TimingProfile {
    /// Create a timing profile
    #[must_use]
    pub const fn new(data_length_us: u32, sync_length_us: u32) -> Self {
        Self {
            data_length_us,
            sync_length_us,
        }
    }

    /// Length of one data bit
    #[must_use]
    pub const fn data_length_us(&self) -> u32 {
        self.data_length_us
    }

    /// Length of one sync element
    #[must_use]
    pub const fn sync_length_us(&self) -> u32 {
        self.sync_length_us
    }

    /// Hold on each side of the mid-pulse edge of a data bit
    ///
    /// Truncates, so an odd data length loses its last microsecond.
    #[must_use]
    pub const fn half_data_us(&self) -> u32 {
        self.data_length_us / 2
    }

    /// Time a data bit actually occupies on the line
    #[must_use]
    pub const fn data_bit_us(&self) -> u32 {
        2 * self.half_data_us()
    }

    /// Check if data bits can be sent with this profile
    #[must_use]
    pub const fn supports_data(&self) -> bool {
        self.data_length_us > 0
    }
}

/// One symbol string with its repeat schedule
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransmissionPlan {
    symbols: SymbolString,
    repeat_count: NonZeroU32,
    inter_repeat_delay_us: u32,
}

impl TransmissionPlan {
    /// Create a plan
    #[must_use]
    pub const fn new(symbols: SymbolString, repeat_count: NonZeroU32, inter_repeat_delay_us: u32) -> Self {
        Self {
            symbols,
            repeat_count,
            inter_repeat_delay_us,
        }
    }

    /// Create a plan that sends the symbols once
    #[must_use]
    pub const fn once(symbols: SymbolString) -> Self {
        Self::new(symbols, NonZeroU32::MIN, 0)
    }

    /// Symbols of one pass
    #[must_use]
    pub const fn symbols(&self) -> &SymbolString {
        &self.symbols
    }

    /// Number of passes
    #[must_use]
    pub const fn repeat_count(&self) -> u32 {
        self.repeat_count.get()
    }

    /// Low settle time between passes
    #[must_use]
    pub const fn inter_repeat_delay_us(&self) -> u32 {
        self.inter_repeat_delay_us
    }

    /// Number of inter-repeat delays, one fewer than the passes
    #[must_use]
    pub const fn settle_count(&self) -> u32 {
        self.repeat_count.get() - 1
    }

    /// Blocked time of the whole plan
    ///
    /// `repeat_count * pass + (repeat_count - 1) * inter_repeat_delay`
    #[must_use]
    pub fn total_duration_us(&self, encoding: Encoding, timing: &TimingProfile) -> u64 {
        let pass = encoding.pass_duration_us(&self.symbols, timing);
        u64::from(self.repeat_count()) * pass
            + u64::from(self.settle_count()) * u64::from(self.inter_repeat_delay_us)
    }
}
