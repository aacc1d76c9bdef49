//! Code Assembler
//!
//! A device command is an action prefix, the device identity code and a
//! closing high sync element:
//!
//! ```text
//! <action code> <device code> S
//! ```

use core::fmt;
use core::str::FromStr;

use crate::config::DESCRIPTOR_SEPARATOR;
use crate::symbol::{Symbol, SymbolError, SymbolString};

/// Symbol closing every device command
pub const TERMINATOR: Symbol = Symbol::SyncHigh;

/// Shutter action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Raise
    Up,
    /// Lower
    Down,
    /// Halt movement
    Stop,
}

impl Action {
    /// All actions
    pub const ALL: [Self; 3] = [Self::Up, Self::Down, Self::Stop];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stop => "stop",
        }
    }
}

impl FromStr for Action {
    type Err = AssembleError;

    /// Case-insensitive match on `up`, `down` or `stop`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or(AssembleError::InvalidAction)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assembly failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    /// Action token is not up, down or stop
    #[error("action must be one of up, down or stop")]
    InvalidAction,
    /// Descriptor is not `<device>.<action>`
    #[error("descriptor must have the form <device>{}<action>", DESCRIPTOR_SEPARATOR)]
    MalformedInput,
    /// Assembled command does not fit
    #[error("assembled code {0}")]
    Symbols(#[from] SymbolError),
}

/// Split a `<device>.<action>` descriptor
///
/// # Errors
///
/// [`AssembleError::MalformedInput`] unless there are exactly two parts and
/// the device part is non-empty.
pub fn split_descriptor(descriptor: &str) -> Result<(&str, &str), AssembleError> {
    let mut parts = descriptor.split(DESCRIPTOR_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(device), Some(action), None) if !device.is_empty() => Ok((device, action)),
        _ => Err(AssembleError::MalformedInput),
    }
}

/// Parsed `<device>.<action>` descriptor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceCommand<'a> {
    /// Device name, selects the `waremasend_<device>` section
    pub device: &'a str,
    /// Requested action
    pub action: Action,
}

impl<'a> DeviceCommand<'a> {
    /// Parse a descriptor such as `livingroom.up`
    ///
    /// # Errors
    ///
    /// [`AssembleError::MalformedInput`] for a bad descriptor,
    /// [`AssembleError::InvalidAction`] for an unknown action.
    pub fn parse(descriptor: &'a str) -> Result<Self, AssembleError> {
        let (device, action) = split_descriptor(descriptor)?;
        Ok(Self {
            device,
            action: action.parse()?,
        })
    }
}

/// Code fragments of one device
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCodes {
    /// Device identity code
    pub device: SymbolString,
    /// Prefix for [`Action::Up`]
    pub up: SymbolString,
    /// Prefix for [`Action::Down`]
    pub down: SymbolString,
    /// Prefix for [`Action::Stop`]
    pub stop: SymbolString,
}

impl ActionCodes {
    /// Prefix fragment for `action`
    #[must_use]
    pub const fn prefix(&self, action: Action) -> &SymbolString {
        match action {
            Action::Up => &self.up,
            Action::Down => &self.down,
            Action::Stop => &self.stop,
        }
    }
}

/// Build the air command for `action`
///
/// # Errors
///
/// [`AssembleError::Symbols`] if the command exceeds the symbol capacity.
pub fn assemble(codes: &ActionCodes, action: Action) -> Result<SymbolString, AssembleError> {
    let mut symbols = codes.prefix(action).clone();
    symbols.append(&codes.device)?;
    symbols.push(TERMINATOR)?;
    Ok(symbols)
}

/// Build the air command for an action token
///
/// # Errors
///
/// [`AssembleError::InvalidAction`] for an unknown token, otherwise as
/// [`assemble`].
pub fn assemble_token(codes: &ActionCodes, action: &str) -> Result<SymbolString, AssembleError> {
    assemble(codes, action.parse()?)
}
