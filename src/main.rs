//! aircontrol command line
//!
//! Sends one air command through a 433 MHz transmitter wired to a
//! Raspberry Pi GPIO line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use aircontrol::app::{self, Prepared};
use aircontrol::config::{DEFAULT_CONFIG_PATH, DEFAULT_TARGET_SECTION};
use aircontrol::hal::{RecordingDriver, RppalDriver};
use aircontrol::params::TomlStore;
use aircontrol::{Error, Result};

#[derive(Parser)]
#[command(version, about = "Send 433 MHz air commands to roller shutters")]
struct Opts {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// GPIO pin (BCM numbering), overrides the configured gpioPin
    #[arg(long, allow_negative_numbers = true)]
    gpio: Option<i64>,
    /// Record the transmission instead of driving the pin
    #[arg(long)]
    dry_run: bool,
    /// More log output, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send an action to a configured device
    Send {
        /// `<device>.<action>`, action is up, down or stop
        descriptor: String,
    },
    /// Send a symbol string over {0, 1, s, S} as is
    Code {
        /// Symbols to send
        symbols: String,
        /// Section holding pin and timing
        #[arg(long, default_value = DEFAULT_TARGET_SECTION)]
        target: String,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_micros()
        .init();
}

fn prepare(opts: &Opts) -> Result<Prepared> {
    match &opts.command {
        Command::Send { descriptor } => {
            // Descriptor errors come before the configuration is read
            let command = app::parse_descriptor(descriptor)?;
            println!("Device: {}, action: {}", command.device, command.action);
            let store = TomlStore::load(&opts.config)?;
            app::prepare_device(&store, &command, opts.gpio)
        }
        Command::Code { symbols, target } => {
            let store = TomlStore::load(&opts.config)?;
            app::prepare_code(&store, target, symbols, opts.gpio)
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    let prepared = prepare(opts)?;
    println!("Manchester code to send: {}", prepared.symbols());

    if opts.dry_run {
        let mut driver = RecordingDriver::new();
        let report = app::execute(&prepared, &mut driver)?;
        println!(
            "dry run on GPIO{} ({}): {} passes, {} level changes, {} us",
            prepared.pin, prepared.section, report.passes, report.level_changes, report.held_us
        );
        for pulse in driver.trace() {
            log::debug!("{} {} us", pulse.level, pulse.duration_us);
        }
    } else {
        let driver = RppalDriver::open(prepared.pin)
            .map_err(|err| Error::HardwareAccess(err.to_string()))?;
        app::execute(&prepared, driver)?;
    }

    println!("successful");
    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    init_logger(opts.verbose);

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Opts::command().debug_assert();
    }

    #[test]
    fn negative_gpio_reaches_pin_validation() {
        let opts = Opts::try_parse_from(["aircontrol", "--gpio", "-1", "send", "livingroom.up"])
            .unwrap();
        assert_eq!(opts.gpio, Some(-1));
        assert!(matches!(
            aircontrol::params::resolve_pin(opts.gpio, None, "waremasend"),
            Err(Error::InvalidPin(-1))
        ));
    }

    #[test]
    fn code_command_defaults_to_sample_target() {
        let opts = Opts::try_parse_from(["aircontrol", "code", "sS01S"]).unwrap();
        assert_eq!(opts.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!opts.dry_run);
        match opts.command {
            Command::Code { symbols, target } => {
                assert_eq!(symbols, "sS01S");
                assert_eq!(target, DEFAULT_TARGET_SECTION);
            }
            Command::Send { .. } => panic!("parsed as send"),
        }
    }
}
