//! Parameter Store
//!
//! Resolves pin, timing and code values for a device or a direct-code
//! target. Lookups walk an ordered list of sections: a device reads its own
//! `waremasend_<device>` section first and falls back to the type-wide
//! `waremasend` section.
//!
//! ```toml
//! [waremasend]
//! gpioPin = 17
//! dataLength = 1780
//! syncLength = 5000
//! sendCommand = 10
//! sendDelay = 100000
//! manchesterCodeUp = "ssSS0"
//! manchesterCodeDown = "ssSS1"
//! manchesterCodeStop = "ssSS01"
//!
//! [waremasend_livingroom]
//! manchesterCodeDevice = "0110100111"
//! ```

use std::fs;
use std::num::NonZeroU32;
use std::path::Path;
use std::str::FromStr;

use log::{debug, info};

use crate::air::assembler::ActionCodes;
use crate::config::{keys, DEVICE_SECTION, DEVICE_SECTION_SEPARATOR};
use crate::error::{Error, Result};
use crate::symbol::SymbolString;
use crate::types::{GpioPin, TimingProfile, TransmissionPlan};

/// Raw configuration value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamValue<'a> {
    /// Integer value
    Integer(i64),
    /// String value
    Text(&'a str),
    /// Any other value, carrying its type name
    Other(&'static str),
}

impl ParamValue<'_> {
    /// Type name for error messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Text(_) => "string",
            Self::Other(kind) => *kind,
        }
    }
}

/// Read interface over sectioned key/value configuration
pub trait ParameterStore {
    /// Check if a section exists
    fn has_section(&self, section: &str) -> bool;

    /// Look up `key` in `section` only
    fn value(&self, section: &str, key: &str) -> Option<ParamValue<'_>>;
}

/// TOML file whose top-level tables are the sections
#[derive(Clone, Debug, Default)]
pub struct TomlStore {
    table: toml::Table,
}

impl TomlStore {
    /// Read and parse a configuration file
    ///
    /// # Errors
    ///
    /// [`Error::ConfigurationRead`] if the file cannot be read,
    /// [`Error::ConfigurationSyntax`] if it is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigurationRead {
            path: path.display().to_string(),
            source,
        })?;
        let store = text.parse::<Self>().map_err(|source| Error::ConfigurationSyntax {
            path: path.display().to_string(),
            source,
        })?;
        debug!("loaded configuration from {}", path.display());
        Ok(store)
    }

    /// Names of all sections
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.table
            .iter()
            .filter(|(_, value)| value.is_table())
            .map(|(name, _)| name.as_str())
    }
}

impl FromStr for TomlStore {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Ok(Self { table: s.parse()? })
    }
}

impl ParameterStore for TomlStore {
    fn has_section(&self, section: &str) -> bool {
        self.table.get(section).is_some_and(toml::Value::is_table)
    }

    fn value(&self, section: &str, key: &str) -> Option<ParamValue<'_>> {
        let value = self.table.get(section)?.as_table()?.get(key)?;
        Some(match value {
            toml::Value::Integer(i) => ParamValue::Integer(*i),
            toml::Value::String(s) => ParamValue::Text(s.as_str()),
            other => ParamValue::Other(other.type_str()),
        })
    }
}

/// Section name of a device
#[must_use]
pub fn device_section(device: &str) -> String {
    format!("{DEVICE_SECTION}{DEVICE_SECTION_SEPARATOR}{device}")
}

/// Typed, validated lookups over an ordered list of sections
pub struct ScopedReader<'s, S: ?Sized> {
    store: &'s S,
    scopes: Vec<String>,
}

impl<'s, S: ParameterStore + ?Sized> ScopedReader<'s, S> {
    /// Search `scopes` in order, most specific first
    #[must_use]
    pub fn new(store: &'s S, scopes: Vec<String>) -> Self {
        Self { store, scopes }
    }

    /// Most specific section, used to name errors
    #[must_use]
    pub fn scope(&self) -> &str {
        self.scopes.first().map_or("", String::as_str)
    }

    /// First value of `key` along the scopes
    ///
    /// # Errors
    ///
    /// [`Error::ConfigurationMissing`] if no scope has the key.
    pub fn lookup(&self, key: &str) -> Result<ParamValue<'s>> {
        self.scopes
            .iter()
            .find_map(|section| self.store.value(section, key))
            .ok_or_else(|| Error::missing(self.scope(), key))
    }

    /// Integer value of `key`
    ///
    /// # Errors
    ///
    /// Missing key, or a value that is not an integer.
    pub fn integer(&self, key: &str) -> Result<i64> {
        match self.lookup(key)? {
            ParamValue::Integer(value) => Ok(value),
            other => Err(Error::invalid(
                self.scope(),
                key,
                format!("must be an integer, found {}", other.kind()),
            )),
        }
    }

    /// String value of `key`
    ///
    /// # Errors
    ///
    /// Missing key, or a value that is not a string.
    pub fn text(&self, key: &str) -> Result<&'s str> {
        match self.lookup(key)? {
            ParamValue::Text(value) => Ok(value),
            other => Err(Error::invalid(
                self.scope(),
                key,
                format!("must be a string, found {}", other.kind()),
            )),
        }
    }

    /// Strictly positive microsecond or count value
    ///
    /// # Errors
    ///
    /// Missing key, wrong type, or a value outside `1..=u32::MAX`.
    pub fn positive(&self, key: &str) -> Result<NonZeroU32> {
        let value = self.integer(key)?;
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| Error::invalid(self.scope(), key, format!("is invalid ({value})")))
    }

    /// Non-negative microsecond value
    ///
    /// # Errors
    ///
    /// Missing key, wrong type, or a value outside `0..=u32::MAX`.
    pub fn non_negative(&self, key: &str) -> Result<u32> {
        let value = self.integer(key)?;
        u32::try_from(value)
            .map_err(|_| Error::invalid(self.scope(), key, format!("is invalid ({value})")))
    }

    /// Code fragment over `{0, 1, s, S}`
    ///
    /// # Errors
    ///
    /// Missing key, wrong type, an empty fragment, or an illegal character
    /// (reported with its 1-indexed position).
    pub fn symbols(&self, key: &str) -> Result<SymbolString> {
        SymbolString::parse(self.text(key)?).map_err(|err| Error::invalid(self.scope(), key, err))
    }

    /// Configured pin, `None` when set to [`GpioPin::UNSET`]
    ///
    /// # Errors
    ///
    /// Missing key, wrong type, or a pin outside the platform range.
    pub fn gpio_pin(&self, key: &str) -> Result<Option<GpioPin>> {
        let value = self.integer(key)?;
        if GpioPin::is_unset(value) {
            return Ok(None);
        }
        GpioPin::from_number(value)
            .map(Some)
            .ok_or_else(|| Error::invalid(self.scope(), key, format!("{value} is invalid")))
    }
}

/// Everything needed to send commands to one device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceParameters {
    /// Device section name
    pub section: String,
    /// Configured pin, `None` if left to the caller
    pub gpio_pin: Option<GpioPin>,
    /// Pulse lengths
    pub timing: TimingProfile,
    /// Device and action code fragments
    pub codes: ActionCodes,
    /// Number of transmissions
    pub send_command: NonZeroU32,
    /// Delay between transmissions in microseconds
    pub send_delay_us: u32,
}

impl DeviceParameters {
    /// Load the parameters of `device`
    ///
    /// Keys are read in a fixed order (pin, data length, sync length, device
    /// code, down, up, stop, send count, send delay); the first failure is
    /// reported.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSection`] if the device section does not exist, or
    /// the first [`Error::ConfigurationMissing`] /
    /// [`Error::ConfigurationInvalid`] encountered.
    pub fn load<S: ParameterStore + ?Sized>(store: &S, device: &str) -> Result<Self> {
        let section = device_section(device);
        if !store.has_section(&section) {
            return Err(Error::UnknownSection { section });
        }

        let reader = ScopedReader::new(store, vec![section.clone(), DEVICE_SECTION.to_string()]);
        let gpio_pin = reader.gpio_pin(keys::GPIO_PIN)?;
        let data_length = reader.positive(keys::DATA_LENGTH)?;
        let sync_length = reader.non_negative(keys::SYNC_LENGTH)?;
        let device_code = reader.symbols(keys::CODE_DEVICE)?;
        let down = reader.symbols(keys::CODE_DOWN)?;
        let up = reader.symbols(keys::CODE_UP)?;
        let stop = reader.symbols(keys::CODE_STOP)?;
        let send_command = reader.positive(keys::SEND_COMMAND)?;
        let send_delay_us = reader.non_negative(keys::SEND_DELAY)?;

        let params = Self {
            section,
            gpio_pin,
            timing: TimingProfile::new(data_length.get(), sync_length),
            codes: ActionCodes {
                device: device_code,
                up,
                down,
                stop,
            },
            send_command,
            send_delay_us,
        };
        info!(
            "{}: pin {:?}, data {} us, sync {} us, {} sends {} us apart",
            params.section,
            params.gpio_pin,
            data_length,
            sync_length,
            send_command,
            send_delay_us
        );
        Ok(params)
    }

    /// Plan for sending `symbols` with this device's repeat schedule
    #[must_use]
    pub fn plan(&self, symbols: SymbolString) -> TransmissionPlan {
        TransmissionPlan::new(symbols, self.send_command, self.send_delay_us)
    }
}

/// Parameters of a direct-code target section
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetParameters {
    /// Target section name
    pub section: String,
    /// Configured pin, `None` if left to the caller
    pub gpio_pin: Option<GpioPin>,
    /// Pulse lengths
    pub timing: TimingProfile,
    /// Number of transmissions
    pub send_command: NonZeroU32,
    /// Delay between transmissions in microseconds
    pub send_delay_us: u32,
}

impl TargetParameters {
    /// Load the parameters of the `target` section
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSection`] if the section does not exist, or the first
    /// [`Error::ConfigurationMissing`] / [`Error::ConfigurationInvalid`].
    pub fn load<S: ParameterStore + ?Sized>(store: &S, target: &str) -> Result<Self> {
        if !store.has_section(target) {
            return Err(Error::UnknownSection {
                section: target.to_string(),
            });
        }

        let reader = ScopedReader::new(store, vec![target.to_string()]);
        let gpio_pin = reader.gpio_pin(keys::GPIO_PIN)?;
        let data_length = reader.positive(keys::DATA_LENGTH)?;
        let sync_length = reader.non_negative(keys::SYNC_LENGTH)?;
        let send_command = reader.positive(keys::SEND_COMMAND)?;
        let send_delay_us = reader.non_negative(keys::SEND_DELAY)?;

        Ok(Self {
            section: target.to_string(),
            gpio_pin,
            timing: TimingProfile::new(data_length.get(), sync_length),
            send_command,
            send_delay_us,
        })
    }

    /// Plan for sending `symbols` with this target's repeat schedule
    #[must_use]
    pub fn plan(&self, symbols: SymbolString) -> TransmissionPlan {
        TransmissionPlan::new(symbols, self.send_command, self.send_delay_us)
    }
}

/// Pick the pin to drive
///
/// A caller override wins and must be in range; otherwise the configured
/// pin is used.
///
/// # Errors
///
/// [`Error::InvalidPin`] for an out-of-range override,
/// [`Error::ConfigurationMissing`] when neither an override nor a configured
/// pin exists.
pub fn resolve_pin(override_pin: Option<i64>, configured: Option<GpioPin>, scope: &str) -> Result<GpioPin> {
    match override_pin {
        Some(number) => GpioPin::from_number(number).ok_or(Error::InvalidPin(number)),
        None => configured.ok_or_else(|| Error::missing(scope, keys::GPIO_PIN)),
    }
}
