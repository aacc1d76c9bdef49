//! Transmit Control
//!
//! Runs a [`TransmissionPlan`] against a pin driver: arm the line as an
//! output, emit every pass, settle low between passes and release the line
//! again, also when the driver fails part way.

use log::{debug, trace};

use crate::encoding::{Encoding, Pulse};
use crate::hal::gpio::PinDriver;
use crate::types::{PinMode, TimingProfile, TransmissionPlan};

/// Transmit state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TxState {
    /// Line released (input mode), nothing in progress
    #[default]
    Idle,
    /// Line switched to output, first symbol not yet sent
    OutputArmed,
    /// Emitting the symbols of a pass
    Encoding,
    /// Line held low between passes
    LowSettle,
}

/// Transmit failure
#[derive(Debug, thiserror::Error)]
pub enum TransmitError<E> {
    /// Data symbols present but the data length is zero
    #[error("data length must be positive to send data symbols")]
    InvalidTiming,
    /// The driver could not set the mode or level
    #[error("hardware access failed: {0:?}")]
    Hardware(E),
}

/// Summary of a completed transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TransmitReport {
    /// Passes sent
    pub passes: u32,
    /// Level changes issued, settle periods included
    pub level_changes: u32,
    /// Total blocked time in microseconds
    pub held_us: u64,
}

/// Air command transmitter owning one pin driver
pub struct Transmitter<D> {
    driver: D,
    encoding: Encoding,
    state: TxState,
}

impl<D: PinDriver> Transmitter<D> {
    /// Create a Manchester transmitter
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::with_encoding(driver, Encoding::Manchester)
    }

    /// Create a transmitter for a specific encoding
    #[must_use]
    pub fn with_encoding(driver: D, encoding: Encoding) -> Self {
        Self {
            driver,
            encoding,
            state: TxState::Idle,
        }
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> TxState {
        self.state
    }

    /// Get the encoding in use
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Borrow the driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Give the driver back
    pub fn into_inner(self) -> D {
        self.driver
    }

    /// Send `plan` with `timing`
    ///
    /// Blocks until every pass has been emitted. The line is in input mode
    /// when this returns, on success and on failure.
    ///
    /// # Errors
    ///
    /// [`TransmitError::InvalidTiming`] before the line is touched when data
    /// symbols would be sent with a zero data length;
    /// [`TransmitError::Hardware`] when the driver fails.
    pub fn transmit(
        &mut self,
        plan: &TransmissionPlan,
        timing: &TimingProfile,
    ) -> Result<TransmitReport, TransmitError<D::Error>> {
        if plan.symbols().contains_data() && !timing.supports_data() {
            return Err(TransmitError::InvalidTiming);
        }

        debug!(
            "transmitting {} symbols x{} ({} us between, {} us total)",
            plan.symbols().len(),
            plan.repeat_count(),
            plan.inter_repeat_delay_us(),
            plan.total_duration_us(self.encoding, timing)
        );

        let result = self.run(plan, timing);

        // Release the line even if the run failed part way
        let released = self.driver.set_mode(PinMode::Input);
        self.state = TxState::Idle;

        let report = result?;
        released.map_err(TransmitError::Hardware)?;
        debug!(
            "transmission done: {} passes, {} level changes, {} us",
            report.passes, report.level_changes, report.held_us
        );
        Ok(report)
    }

    fn run(
        &mut self,
        plan: &TransmissionPlan,
        timing: &TimingProfile,
    ) -> Result<TransmitReport, TransmitError<D::Error>> {
        self.driver
            .set_mode(PinMode::Output)
            .map_err(TransmitError::Hardware)?;
        self.state = TxState::OutputArmed;

        let mut report = TransmitReport::default();
        for pass in 0..plan.repeat_count() {
            self.state = TxState::Encoding;
            trace!("pass {}/{}", pass + 1, plan.repeat_count());
            for symbol in plan.symbols() {
                for pulse in self.encoding.pulses(*symbol, timing) {
                    self.emit(pulse, &mut report)?;
                }
            }
            report.passes += 1;

            if pass + 1 < plan.repeat_count() {
                self.state = TxState::LowSettle;
                self.emit(Pulse::low(plan.inter_repeat_delay_us()), &mut report)?;
            }
        }

        Ok(report)
    }

    fn emit(
        &mut self,
        pulse: Pulse,
        report: &mut TransmitReport,
    ) -> Result<(), TransmitError<D::Error>> {
        self.driver
            .set_level(pulse.level)
            .map_err(TransmitError::Hardware)?;
        self.driver.hold(pulse.duration_us);
        report.level_changes += 1;
        report.held_us += u64::from(pulse.duration_us);
        Ok(())
    }
}
