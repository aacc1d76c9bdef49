//! Recording pin driver
//!
//! Captures every mode change, level change and hold instead of touching
//! hardware. Used by the tests and by `--dry-run`.

use std::vec::Vec;

use crate::encoding::Pulse;
use crate::hal::gpio::PinDriver;
use crate::types::{Level, PinMode};

/// One call made on the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverEvent {
    /// Line direction changed
    Mode(PinMode),
    /// Line level changed
    Level(Level),
    /// Blocking hold in microseconds
    Hold(u32),
}

/// Failure injected by a [`RecordingDriver`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InjectedFault {
    /// Switching to output mode was refused
    #[error("output mode refused")]
    Mode,
    /// The n-th level change (1-indexed) was refused
    #[error("level change {0} refused")]
    Level(usize),
}

/// Driver that records instead of driving
#[derive(Clone, Debug, Default)]
pub struct RecordingDriver {
    events: Vec<DriverEvent>,
    mode: PinMode,
    level_attempts: usize,
    fail_output_mode: bool,
    fail_at_level: Option<usize>,
}

impl RecordingDriver {
    /// Create a driver with the line in input mode
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every switch to output mode
    #[must_use]
    pub fn failing_output_mode(mut self) -> Self {
        self.fail_output_mode = true;
        self
    }

    /// Refuse the n-th level change (1-indexed)
    #[must_use]
    pub fn failing_at_level(mut self, n: usize) -> Self {
        self.fail_at_level = Some(n);
        self
    }

    /// Everything recorded so far
    #[must_use]
    pub fn events(&self) -> &[DriverEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty
    pub fn take_events(&mut self) -> Vec<DriverEvent> {
        self.level_attempts = 0;
        std::mem::take(&mut self.events)
    }

    /// Current line direction
    #[must_use]
    pub const fn mode(&self) -> PinMode {
        self.mode
    }

    /// Number of level changes recorded
    #[must_use]
    pub fn level_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, DriverEvent::Level(_)))
            .count()
    }

    /// Sum of all holds
    #[must_use]
    pub fn total_held_us(&self) -> u64 {
        self.events
            .iter()
            .map(|event| match event {
                DriverEvent::Hold(us) => u64::from(*us),
                _ => 0,
            })
            .sum()
    }

    /// Every mode change, in order
    #[must_use]
    pub fn modes(&self) -> Vec<PinMode> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DriverEvent::Mode(mode) => Some(*mode),
                _ => None,
            })
            .collect()
    }

    /// Level/duration trace: each level change with the holds that follow it
    #[must_use]
    pub fn trace(&self) -> Vec<Pulse> {
        let mut trace: Vec<Pulse> = Vec::new();
        for event in &self.events {
            match *event {
                DriverEvent::Level(level) => trace.push(Pulse::new(level, 0)),
                DriverEvent::Hold(us) => {
                    if let Some(last) = trace.last_mut() {
                        last.duration_us += us;
                    }
                }
                DriverEvent::Mode(_) => {}
            }
        }
        trace
    }
}

impl PinDriver for RecordingDriver {
    type Error = InjectedFault;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        if mode == PinMode::Output && self.fail_output_mode {
            return Err(InjectedFault::Mode);
        }
        self.mode = mode;
        self.events.push(DriverEvent::Mode(mode));
        Ok(())
    }

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        self.level_attempts += 1;
        if self.fail_at_level == Some(self.level_attempts) {
            return Err(InjectedFault::Level(self.level_attempts));
        }
        self.events.push(DriverEvent::Level(level));
        Ok(())
    }

    fn hold(&mut self, micros: u32) {
        self.events.push(DriverEvent::Hold(micros));
    }
}
