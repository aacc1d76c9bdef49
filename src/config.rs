//! System configuration and protocol constants
//!
//! Section names, parameter keys and platform limits used when resolving
//! transmitter parameters. All tunable values live in the configuration
//! file; this module only fixes its shape.

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/aircontrol.toml";

/// Type-wide section holding defaults for every Warema device
pub const DEVICE_SECTION: &str = "waremasend";

/// Joins [`DEVICE_SECTION`] and a device name into the device section name
pub const DEVICE_SECTION_SEPARATOR: char = '_';

/// Section used by direct code transmissions unless another is named
pub const DEFAULT_TARGET_SECTION: &str = "warema_sample";

/// Separates device and action in a `<device>.<action>` descriptor
pub const DESCRIPTOR_SEPARATOR: char = '.';

/// Maximum number of symbols in one air command
pub const MAX_SYMBOLS: usize = 256;

/// Lowest usable BCM GPIO number on the 40-pin header
pub const GPIO_PIN_MIN: u8 = 0;

/// Highest usable BCM GPIO number on the 40-pin header
pub const GPIO_PIN_MAX: u8 = 27;

/// Configured pin value meaning "unset, the caller supplies the pin"
pub const GPIO_PIN_UNSET: u8 = u8::MAX;

/// Holds longer than this are slept for, minus [`SPIN_MARGIN_US`]
pub const SPIN_THRESHOLD_US: u32 = 10_000;

/// Tail of a long hold that is always busy-waited
pub const SPIN_MARGIN_US: u32 = 1_000;

/// Parameter keys, as spelled in the configuration file
pub mod keys {
    //! Keys looked up in device and target sections

    /// BCM number of the transmitter data pin
    pub const GPIO_PIN: &str = "gpioPin";

    /// Data element length in microseconds
    pub const DATA_LENGTH: &str = "dataLength";

    /// Sync element length in microseconds
    pub const SYNC_LENGTH: &str = "syncLength";

    /// Device identity code fragment
    pub const CODE_DEVICE: &str = "manchesterCodeDevice";

    /// Prefix fragment for the "up" action
    pub const CODE_UP: &str = "manchesterCodeUp";

    /// Prefix fragment for the "down" action
    pub const CODE_DOWN: &str = "manchesterCodeDown";

    /// Prefix fragment for the "stop" action
    pub const CODE_STOP: &str = "manchesterCodeStop";

    /// Number of times the air command is transmitted
    pub const SEND_COMMAND: &str = "sendCommand";

    /// Delay between repeated transmissions in microseconds
    pub const SEND_DELAY: &str = "sendDelay";
}
