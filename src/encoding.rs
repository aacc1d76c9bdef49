//! Line encodings
//!
//! An encoding turns one [`Symbol`] into the level/hold pulses that the
//! transmitter drives onto the line. Schemes form a closed set; each variant
//! of [`Encoding`] has exactly one handler.

use heapless::Vec;

use crate::symbol::{Symbol, SymbolString};
use crate::types::{Level, TimingProfile};

/// Most pulses a single symbol can expand to
pub const MAX_PULSES_PER_SYMBOL: usize = 2;

/// One level change followed by a blocking hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pulse {
    /// Level driven onto the line
    pub level: Level,
    /// Hold after the level change, in microseconds
    pub duration_us: u32,
}

impl Pulse {
    /// Create a pulse
    #[must_use]
    pub const fn new(level: Level, duration_us: u32) -> Self {
        Self { level, duration_us }
    }

    /// High pulse
    #[must_use]
    pub const fn high(duration_us: u32) -> Self {
        Self::new(Level::High, duration_us)
    }

    /// Low pulse
    #[must_use]
    pub const fn low(duration_us: u32) -> Self {
        Self::new(Level::Low, duration_us)
    }
}

/// Pulses of one symbol
pub type Pulses = Vec<Pulse, MAX_PULSES_PER_SYMBOL>;

/// Encoding scheme used for the air command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Mid-pulse edge data bits with flat sync elements
    #[default]
    Manchester,
}

impl Encoding {
    /// Expand one symbol into its pulses
    #[must_use]
    pub fn pulses(self, symbol: Symbol, timing: &TimingProfile) -> Pulses {
        match self {
            Self::Manchester => manchester(symbol, timing),
        }
    }

    /// Blocked time of one symbol
    #[must_use]
    pub fn symbol_duration_us(self, symbol: Symbol, timing: &TimingProfile) -> u32 {
        self.pulses(symbol, timing)
            .iter()
            .map(|pulse| pulse.duration_us)
            .sum()
    }

    /// Blocked time of one pass over the symbols
    #[must_use]
    pub fn pass_duration_us(self, symbols: &SymbolString, timing: &TimingProfile) -> u64 {
        symbols
            .iter()
            .map(|symbol| u64::from(self.symbol_duration_us(symbol, timing)))
            .sum()
    }

    /// Level changes issued for one pass over the symbols
    #[must_use]
    pub fn pass_level_changes(self, symbols: &SymbolString, timing: &TimingProfile) -> usize {
        symbols
            .iter()
            .map(|symbol| self.pulses(symbol, timing).len())
            .sum()
    }
}

/// Manchester handler
///
/// Sync elements are held flat for the sync length. Data bits hold one
/// level for half the data length and the other for another half: a falling
/// edge encodes `0`, a rising edge encodes `1`.
fn manchester(symbol: Symbol, timing: &TimingProfile) -> Pulses {
    let sync = timing.sync_length_us();
    let half = timing.half_data_us();

    let pulses: &[Pulse] = match symbol {
        Symbol::SyncLow => &[Pulse::low(sync)],
        Symbol::SyncHigh => &[Pulse::high(sync)],
        Symbol::Zero => &[Pulse::high(half), Pulse::low(half)],
        Symbol::One => &[Pulse::low(half), Pulse::high(half)],
    };

    // At most MAX_PULSES_PER_SYMBOL per arm
    Vec::from_slice(pulses).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMING: TimingProfile = TimingProfile::new(1000, 3000);

    #[test]
    fn manchester_sync_is_flat() {
        let low = Encoding::Manchester.pulses(Symbol::SyncLow, &TIMING);
        assert_eq!(low.as_slice(), &[Pulse::low(3000)]);

        let high = Encoding::Manchester.pulses(Symbol::SyncHigh, &TIMING);
        assert_eq!(high.as_slice(), &[Pulse::high(3000)]);
    }

    #[test]
    fn manchester_zero_falls_mid_pulse() {
        let pulses = Encoding::Manchester.pulses(Symbol::Zero, &TIMING);
        assert_eq!(pulses.as_slice(), &[Pulse::high(500), Pulse::low(500)]);
    }

    #[test]
    fn manchester_one_rises_mid_pulse() {
        let pulses = Encoding::Manchester.pulses(Symbol::One, &TIMING);
        assert_eq!(pulses.as_slice(), &[Pulse::low(500), Pulse::high(500)]);
    }

    #[test]
    fn symbol_durations() {
        assert_eq!(Encoding::Manchester.symbol_duration_us(Symbol::Zero, &TIMING), 1000);
        assert_eq!(Encoding::Manchester.symbol_duration_us(Symbol::SyncLow, &TIMING), 3000);
    }

    #[test]
    fn odd_data_length_truncates_both_halves() {
        let timing = TimingProfile::new(1001, 0);
        let pulses = Encoding::Manchester.pulses(Symbol::Zero, &timing);
        assert_eq!(pulses.as_slice(), &[Pulse::high(500), Pulse::low(500)]);
        assert_eq!(Encoding::Manchester.symbol_duration_us(Symbol::Zero, &timing), 1000);
    }

    #[test]
    fn pass_totals() {
        let symbols = SymbolString::parse("sS0110S").unwrap();
        assert_eq!(
            Encoding::Manchester.pass_duration_us(&symbols, &TIMING),
            3 * 3000 + 4 * 1000
        );
        assert_eq!(Encoding::Manchester.pass_level_changes(&symbols, &TIMING), 3 + 4 * 2);
    }
}
