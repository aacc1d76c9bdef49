//! Command flow
//!
//! Ties the parameter store, the code assembler and the transmitter
//! together. Every check happens in the `prepare_*` step, so by the time a
//! driver is opened the only failure left is hardware access.

use log::info;

use crate::air::assembler::{assemble, split_descriptor, Action, DeviceCommand, TERMINATOR};
use crate::air::transmit::{TransmitReport, Transmitter};
use crate::error::{assemble_error, Error, Result};
use crate::hal::gpio::PinDriver;
use crate::params::{resolve_pin, DeviceParameters, ParameterStore, TargetParameters};
use crate::symbol::SymbolString;
use crate::types::{GpioPin, TimingProfile, TransmissionPlan};

/// A validated transmission, ready to run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prepared {
    /// Section the parameters came from
    pub section: String,
    /// Pin to drive
    pub pin: GpioPin,
    /// Pulse lengths
    pub timing: TimingProfile,
    /// Symbols and repeat schedule
    pub plan: TransmissionPlan,
}

impl Prepared {
    /// Symbols of one pass
    #[must_use]
    pub const fn symbols(&self) -> &SymbolString {
        self.plan.symbols()
    }
}

/// Parse a `<device>.<action>` descriptor
///
/// # Errors
///
/// [`Error::MalformedInput`] naming the descriptor, or
/// [`Error::InvalidAction`] naming the action token.
pub fn parse_descriptor(descriptor: &str) -> Result<DeviceCommand<'_>> {
    let (device, token) =
        split_descriptor(descriptor).map_err(|err| assemble_error(err, descriptor))?;
    let action = token
        .parse::<Action>()
        .map_err(|err| assemble_error(err, token))?;
    Ok(DeviceCommand { device, action })
}

/// Load device parameters and assemble the command
///
/// # Errors
///
/// Any configuration error of the device, [`Error::InvalidPin`] for a bad
/// override, or [`Error::InvalidSymbols`] if the command does not fit.
pub fn prepare_device<S: ParameterStore + ?Sized>(
    store: &S,
    command: &DeviceCommand<'_>,
    gpio_override: Option<i64>,
) -> Result<Prepared> {
    let params = DeviceParameters::load(store, command.device)?;
    let pin = resolve_pin(gpio_override, params.gpio_pin, &params.section)?;
    let symbols = assemble(&params.codes, command.action).map_err(|err| {
        let codes = &params.codes;
        let code = format!("{}{}{TERMINATOR}", codes.prefix(command.action), codes.device);
        assemble_error(err, &code)
    })?;
    info!("{}.{} on GPIO{pin}: {symbols}", command.device, command.action);

    Ok(Prepared {
        pin,
        timing: params.timing,
        plan: params.plan(symbols),
        section: params.section,
    })
}

/// Validate a direct code and load the target parameters
///
/// # Errors
///
/// [`Error::InvalidSymbols`] for an illegal code, any configuration error
/// of the target, or [`Error::InvalidPin`] for a bad override.
pub fn prepare_code<S: ParameterStore + ?Sized>(
    store: &S,
    target: &str,
    code: &str,
    gpio_override: Option<i64>,
) -> Result<Prepared> {
    let symbols = SymbolString::parse(code).map_err(|source| Error::InvalidSymbols {
        code: code.to_string(),
        source,
    })?;
    let params = TargetParameters::load(store, target)?;
    let pin = resolve_pin(gpio_override, params.gpio_pin, &params.section)?;
    info!("{target} on GPIO{pin}: {symbols}");

    Ok(Prepared {
        pin,
        timing: params.timing,
        plan: params.plan(symbols),
        section: params.section,
    })
}

/// Send a prepared transmission through `driver`
///
/// # Errors
///
/// [`Error::InvalidTiming`] or [`Error::HardwareAccess`].
pub fn execute<D: PinDriver>(prepared: &Prepared, driver: D) -> Result<TransmitReport> {
    let mut transmitter = Transmitter::new(driver);
    Ok(transmitter.transmit(&prepared.plan, &prepared.timing)?)
}
