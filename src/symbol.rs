//! Air command symbols
//!
//! A symbol string is the textual form of one air command over the
//! alphabet `{0, 1, s, S}`. Strings are validated once when parsed, so
//! everything downstream works with the closed [`Symbol`] enum.

use core::fmt;
use core::str::FromStr;

use heapless::Vec;

use crate::config::MAX_SYMBOLS;

/// One transmission primitive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `s`: flat low sync element
    SyncLow,
    /// `S`: flat high sync element
    SyncHigh,
    /// `0`: data bit with a falling edge mid-pulse
    Zero,
    /// `1`: data bit with a rising edge mid-pulse
    One,
}

impl Symbol {
    /// Map a character to its symbol, `None` for characters outside the alphabet
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Self::SyncLow),
            'S' => Some(Self::SyncHigh),
            '0' => Some(Self::Zero),
            '1' => Some(Self::One),
            _ => None,
        }
    }

    /// Character used for this symbol in configuration and on the console
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::SyncLow => 's',
            Self::SyncHigh => 'S',
            Self::Zero => '0',
            Self::One => '1',
        }
    }

    /// Check if this is a data bit
    #[must_use]
    pub const fn is_data(self) -> bool {
        matches!(self, Self::Zero | Self::One)
    }

    /// Check if this is a sync element
    #[must_use]
    pub const fn is_sync(self) -> bool {
        !self.is_data()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Reasons a symbol string is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// No symbols at all
    #[error("is undefined")]
    Empty,
    /// A character outside `{0, 1, s, S}`; `position` is 1-indexed
    #[error("contains illegal character '{character}' at position {position}")]
    IllegalCharacter {
        /// 1-indexed character position
        position: usize,
        /// The offending character
        character: char,
    },
    /// More than [`MAX_SYMBOLS`] symbols
    #[error("exceeds {} symbols", MAX_SYMBOLS)]
    TooLong,
}

/// Validated, non-empty sequence of symbols
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SymbolString(Vec<Symbol, MAX_SYMBOLS>);

impl SymbolString {
    /// Parse and validate a symbol string
    ///
    /// # Errors
    ///
    /// Returns [`SymbolError::Empty`] for an empty input,
    /// [`SymbolError::IllegalCharacter`] naming the first character outside
    /// the alphabet, or [`SymbolError::TooLong`] past [`MAX_SYMBOLS`].
    pub fn parse(text: &str) -> Result<Self, SymbolError> {
        if text.is_empty() {
            return Err(SymbolError::Empty);
        }

        let mut symbols = Vec::new();
        for (index, character) in text.chars().enumerate() {
            let symbol = Symbol::from_char(character).ok_or(SymbolError::IllegalCharacter {
                position: index + 1,
                character,
            })?;
            symbols.push(symbol).map_err(|_| SymbolError::TooLong)?;
        }

        Ok(Self(symbols))
    }

    /// Number of symbols
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed string, kept for slice-like ergonomics
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Symbols in transmission order
    #[must_use]
    pub fn as_slice(&self) -> &[Symbol] {
        &self.0
    }

    /// Iterate over the symbols in transmission order
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }

    /// Check if any data bit is present
    #[must_use]
    pub fn contains_data(&self) -> bool {
        self.0.iter().any(|symbol| symbol.is_data())
    }

    /// Number of data bits
    #[must_use]
    pub fn data_count(&self) -> usize {
        self.0.iter().filter(|symbol| symbol.is_data()).count()
    }

    /// Number of sync elements
    #[must_use]
    pub fn sync_count(&self) -> usize {
        self.len() - self.data_count()
    }

    pub(crate) fn append(&mut self, other: &Self) -> Result<(), SymbolError> {
        self.0
            .extend_from_slice(other.as_slice())
            .map_err(|()| SymbolError::TooLong)
    }

    pub(crate) fn push(&mut self, symbol: Symbol) -> Result<(), SymbolError> {
        self.0.push(symbol).map_err(|_| SymbolError::TooLong)
    }
}

impl FromStr for SymbolString {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a SymbolString {
    type Item = &'a Symbol;
    type IntoIter = core::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SymbolString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolString(\"{self}\")")
    }
}
