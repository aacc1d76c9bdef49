//! Crate error type
//!
//! Every failure is terminal for the current invocation. Messages name the
//! failing key or value together with the section it was looked up in.

use core::fmt;
use std::io;

use crate::air::assembler::AssembleError;
use crate::air::transmit::TransmitError;
use crate::symbol::SymbolError;

/// aircontrol error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required key is absent from every scope
    #[error("missing configuration parameter '{key}' (section {scope})")]
    ConfigurationMissing {
        /// Most specific section searched
        scope: String,
        /// Missing key
        key: String,
    },
    /// A value is present but outside its domain
    #[error("configuration error (section {scope}): {key} {reason}")]
    ConfigurationInvalid {
        /// Section the value came from
        scope: String,
        /// Offending key
        key: String,
        /// What is wrong with the value
        reason: String,
    },
    /// The device or target section does not exist
    #[error("section {section} cannot be found")]
    UnknownSection {
        /// Section name
        section: String,
    },
    /// The configuration file cannot be read
    #[error("cannot read configuration {path}: {source}")]
    ConfigurationRead {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML
    #[error("cannot parse configuration {path}: {source}")]
    ConfigurationSyntax {
        /// File path
        path: String,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },
    /// Action token is not up, down or stop
    #[error("action {0} is invalid")]
    InvalidAction(String),
    /// Descriptor cannot be split into device and action
    #[error("device and action descriptor '{0}' is malformed, expected <device>.<action>")]
    MalformedInput(String),
    /// Pin number outside the platform range
    #[error("given GPIO pin {0} is invalid")]
    InvalidPin(i64),
    /// A directly supplied code is not a valid symbol string
    #[error("manchester code '{code}' {source}")]
    InvalidSymbols {
        /// The rejected code
        code: String,
        /// Why it was rejected
        #[source]
        source: SymbolError,
    },
    /// Data symbols with a zero data length
    #[error("data length must be positive to send data symbols")]
    InvalidTiming,
    /// Mode or level set failed at the driver
    #[error("hardware access failed: {0}")]
    HardwareAccess(String),
}

/// Result alias for aircontrol operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn missing(scope: &str, key: &str) -> Self {
        Self::ConfigurationMissing {
            scope: scope.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(scope: &str, key: &str, reason: impl fmt::Display) -> Self {
        Self::ConfigurationInvalid {
            scope: scope.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn hardware(err: impl fmt::Debug) -> Self {
        Self::HardwareAccess(format!("{err:?}"))
    }
}

impl<E: fmt::Debug> From<TransmitError<E>> for Error {
    fn from(err: TransmitError<E>) -> Self {
        match err {
            TransmitError::InvalidTiming => Self::InvalidTiming,
            TransmitError::Hardware(e) => Self::hardware(e),
        }
    }
}

/// Attach the offending input to an assembler error
pub(crate) fn assemble_error(err: AssembleError, input: &str) -> Error {
    match err {
        AssembleError::InvalidAction => Error::InvalidAction(input.to_string()),
        AssembleError::MalformedInput => Error::MalformedInput(input.to_string()),
        AssembleError::Symbols(source) => Error::InvalidSymbols {
            code: input.to_string(),
            source,
        },
    }
}
