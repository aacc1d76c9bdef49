//! HAL Tests
//!
//! Tests for the embedded-hal adapter, the recording driver and the spin delay
//! Run with: cargo test --no-default-features --features std --test hal_tests

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use aircontrol::air::transmit::{TransmitError, Transmitter};
use aircontrol::encoding::Pulse;
use aircontrol::hal::{DriverEvent, HalDriver, InjectedFault, PinDriver, RecordingDriver, SpinDelay};
use aircontrol::symbol::SymbolString;
use aircontrol::types::{Level, PinMode, TimingProfile, TransmissionPlan};

/// What the fake pin and delay saw, in order
#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    High,
    Low,
    DelayUs(u32),
}

type Log = Rc<RefCell<Vec<Call>>>;

struct FakePin {
    log: Log,
    fail: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl ErrorType for FakePin {
    type Error = PinFault;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), PinFault> {
        if self.fail {
            return Err(PinFault);
        }
        self.log.borrow_mut().push(Call::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        if self.fail {
            return Err(PinFault);
        }
        self.log.borrow_mut().push(Call::High);
        Ok(())
    }
}

struct FakeDelay {
    log: Log,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Call::DelayUs(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Call::DelayUs(us));
    }
}

fn fake_driver(fail: bool) -> (HalDriver<FakePin, FakeDelay>, Log) {
    let log = Log::default();
    let driver = HalDriver::new(
        FakePin {
            log: Rc::clone(&log),
            fail,
        },
        FakeDelay {
            log: Rc::clone(&log),
        },
    );
    (driver, log)
}

// =============================================================================
// HalDriver Tests
// =============================================================================

#[test]
fn test_hal_driver_levels_and_holds() {
    let (mut driver, log) = fake_driver(false);
    assert_eq!(driver.mode(), PinMode::Input);

    driver.set_mode(PinMode::Output).unwrap();
    driver.set_level(Level::High).unwrap();
    driver.hold(250);
    driver.set_level(Level::Low).unwrap();
    driver.hold(750);

    assert_eq!(driver.mode(), PinMode::Output);
    assert_eq!(
        *log.borrow(),
        [Call::High, Call::DelayUs(250), Call::Low, Call::DelayUs(750)]
    );
}

#[test]
fn test_hal_driver_input_parks_low() {
    let (mut driver, log) = fake_driver(false);
    driver.set_mode(PinMode::Output).unwrap();
    driver.set_level(Level::High).unwrap();
    driver.set_mode(PinMode::Input).unwrap();

    assert_eq!(driver.mode(), PinMode::Input);
    assert_eq!(*log.borrow(), [Call::High, Call::Low]);
}

#[test]
fn test_hal_driver_transmission() {
    let (driver, log) = fake_driver(false);
    let mut transmitter = Transmitter::new(driver);
    let plan = TransmissionPlan::once(SymbolString::parse("s0S").unwrap());

    transmitter
        .transmit(&plan, &TimingProfile::new(1000, 2000))
        .unwrap();

    assert_eq!(
        *log.borrow(),
        [
            Call::Low,
            Call::DelayUs(2000),
            Call::High,
            Call::DelayUs(500),
            Call::Low,
            Call::DelayUs(500),
            Call::High,
            Call::DelayUs(2000),
            // Released
            Call::Low,
        ]
    );
    let (_pin, _delay) = transmitter.into_inner().release();
}

#[test]
fn test_hal_driver_pin_error() {
    let (driver, _log) = fake_driver(true);
    let mut transmitter = Transmitter::new(driver);
    let plan = TransmissionPlan::once(SymbolString::parse("1").unwrap());

    let err = transmitter
        .transmit(&plan, &TimingProfile::new(1000, 0))
        .unwrap_err();
    assert!(matches!(err, TransmitError::Hardware(PinFault)));
}

// =============================================================================
// RecordingDriver Tests
// =============================================================================

#[test]
fn test_recording_driver_events() {
    let mut driver = RecordingDriver::new();
    driver.set_mode(PinMode::Output).unwrap();
    driver.set_level(Level::High).unwrap();
    driver.hold(10);
    driver.hold(5);
    driver.set_level(Level::Low).unwrap();
    driver.set_mode(PinMode::Input).unwrap();

    assert_eq!(driver.level_changes(), 2);
    assert_eq!(driver.total_held_us(), 15);
    assert_eq!(driver.modes(), [PinMode::Output, PinMode::Input]);
    assert_eq!(
        driver.trace(),
        [Pulse::high(15), Pulse::low(0)]
    );

    let events = driver.take_events();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0], DriverEvent::Mode(PinMode::Output));
    assert!(driver.events().is_empty());
}

#[test]
fn test_recording_driver_faults() {
    let mut driver = RecordingDriver::new().failing_at_level(2);
    assert_eq!(driver.set_level(Level::High), Ok(()));
    assert_eq!(driver.set_level(Level::Low), Err(InjectedFault::Level(2)));
    assert_eq!(driver.set_level(Level::Low), Ok(()));
    assert_eq!(driver.level_changes(), 2);

    let mut driver = RecordingDriver::new().failing_output_mode();
    assert_eq!(driver.set_mode(PinMode::Output), Err(InjectedFault::Mode));
    assert_eq!(driver.set_mode(PinMode::Input), Ok(()));
    assert_eq!(driver.mode(), PinMode::Input);
}

// =============================================================================
// SpinDelay Tests
// =============================================================================

#[test]
fn test_spin_delay_short_hold() {
    let mut delay = SpinDelay::new();
    let start = Instant::now();
    delay.delay_us(500);
    assert!(start.elapsed() >= Duration::from_micros(500));
}

#[test]
fn test_spin_delay_long_hold() {
    let mut delay = SpinDelay::new();
    let start = Instant::now();
    delay.delay_ms(20);
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn test_spin_delay_past_deadline() {
    let start = Instant::now();
    SpinDelay::wait_until(start);
    assert!(start.elapsed() < Duration::from_millis(5));
}
