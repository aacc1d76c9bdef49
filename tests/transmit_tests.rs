//! Transmitter Tests
//!
//! Tests for the transmit state machine against the recording driver
//! Run with: cargo test --no-default-features --features std --test transmit_tests

use std::num::NonZeroU32;

use aircontrol::air::transmit::{TransmitError, Transmitter, TxState};
use aircontrol::encoding::{Encoding, Pulse};
use aircontrol::hal::{DriverEvent, InjectedFault, RecordingDriver};
use aircontrol::symbol::SymbolString;
use aircontrol::types::{Level, PinMode, TimingProfile, TransmissionPlan};

const TIMING: TimingProfile = TimingProfile::new(1780, 5000);

fn plan(symbols: &str, repeats: u32, delay_us: u32) -> TransmissionPlan {
    TransmissionPlan::new(
        SymbolString::parse(symbols).unwrap(),
        NonZeroU32::new(repeats).unwrap(),
        delay_us,
    )
}

fn send(plan: &TransmissionPlan, timing: &TimingProfile) -> RecordingDriver {
    let mut transmitter = Transmitter::new(RecordingDriver::new());
    transmitter.transmit(plan, timing).unwrap();
    transmitter.into_inner()
}

// =============================================================================
// Trace Tests
// =============================================================================

#[test]
fn test_single_pass_trace() {
    let driver = send(&plan("s0S1", 1, 0), &TIMING);

    assert_eq!(
        driver.events(),
        [
            DriverEvent::Mode(PinMode::Output),
            DriverEvent::Level(Level::Low),
            DriverEvent::Hold(5000),
            DriverEvent::Level(Level::High),
            DriverEvent::Hold(890),
            DriverEvent::Level(Level::Low),
            DriverEvent::Hold(890),
            DriverEvent::Level(Level::High),
            DriverEvent::Hold(5000),
            DriverEvent::Level(Level::Low),
            DriverEvent::Hold(890),
            DriverEvent::Level(Level::High),
            DriverEvent::Hold(890),
            DriverEvent::Mode(PinMode::Input),
        ]
    );
}

#[test]
fn test_level_changes_per_symbol() {
    // One per sync element, two per data bit, nothing else
    let driver = send(&plan("sS0110S", 1, 0), &TIMING);
    assert_eq!(driver.level_changes(), 3 + 4 * 2);

    let driver = send(&plan("ssss", 1, 0), &TIMING);
    assert_eq!(driver.level_changes(), 4);

    let driver = send(&plan("0000", 1, 0), &TIMING);
    assert_eq!(driver.level_changes(), 8);
}

#[test]
fn test_single_symbol_strings() {
    assert_eq!(send(&plan("s", 1, 0), &TIMING).trace(), [Pulse::low(5000)]);
    assert_eq!(send(&plan("S", 1, 0), &TIMING).trace(), [Pulse::high(5000)]);
    assert_eq!(
        send(&plan("0", 1, 0), &TIMING).trace(),
        [Pulse::high(890), Pulse::low(890)]
    );
    assert_eq!(
        send(&plan("1", 1, 0), &TIMING).trace(),
        [Pulse::low(890), Pulse::high(890)]
    );
}

#[test]
fn test_identical_calls_identical_traces() {
    let plan = plan("ssSS0110S", 3, 1000);
    let first = send(&plan, &TIMING);
    let second = send(&plan, &TIMING);
    assert_eq!(first.events(), second.events());
}

#[test]
fn test_zero_sync_length_is_allowed() {
    let timing = TimingProfile::new(1000, 0);
    let driver = send(&plan("s1S", 1, 0), &timing);
    assert_eq!(
        driver.trace(),
        [Pulse::low(0), Pulse::low(500), Pulse::high(500), Pulse::high(0)]
    );
}

// =============================================================================
// Repeat Tests
// =============================================================================

#[test]
fn test_single_repeat_has_no_settle() {
    let plan = plan("0S", 1, 100_000);
    let driver = send(&plan, &TIMING);
    assert!(!driver.events().contains(&DriverEvent::Hold(100_000)));
    assert_eq!(driver.total_held_us(), 1780 + 5000);
}

#[test]
fn test_settle_between_repeats_only() {
    let plan = plan("S", 3, 7777);
    let driver = send(&plan, &TIMING);

    assert_eq!(
        driver.trace(),
        [
            Pulse::high(5000),
            Pulse::low(7777),
            Pulse::high(5000),
            Pulse::low(7777),
            Pulse::high(5000),
        ]
    );
    // Last hold is a symbol, not a settle
    let holds: Vec<u32> = driver
        .events()
        .iter()
        .filter_map(|event| match event {
            DriverEvent::Hold(us) => Some(*us),
            _ => None,
        })
        .collect();
    assert_eq!(holds.last(), Some(&5000));
}

#[test]
fn test_total_duration_formula() {
    let plan = plan("ssSS0110S", 4, 12_345);
    let driver = send(&plan, &TIMING);

    let pass = Encoding::Manchester.pass_duration_us(plan.symbols(), &TIMING);
    assert_eq!(pass, 5 * 5000 + 4 * 1780);
    assert_eq!(driver.total_held_us(), 4 * pass + 3 * 12_345);
    assert_eq!(plan.total_duration_us(Encoding::Manchester, &TIMING), driver.total_held_us());
}

#[test]
fn test_odd_data_length_total_duration() {
    let timing = TimingProfile::new(1001, 300);
    let plan = plan("s01S", 2, 40);
    let driver = send(&plan, &timing);

    // Each data bit holds 2 * (1001 / 2)
    assert_eq!(driver.total_held_us(), 2 * (2 * 300 + 2 * 1000) + 40);
    assert_eq!(plan.total_duration_us(Encoding::Manchester, &timing), driver.total_held_us());
}

#[test]
fn test_report() {
    let plan = plan("s01", 2, 50);
    let mut transmitter = Transmitter::new(RecordingDriver::new());
    let report = transmitter.transmit(&plan, &TIMING).unwrap();

    assert_eq!(report.passes, 2);
    // 5 level changes per pass plus one settle
    assert_eq!(report.level_changes, 2 * 5 + 1);
    assert_eq!(report.held_us, 2 * (5000 + 2 * 1780) + 50);
    assert_eq!(report.level_changes as usize, transmitter.driver().level_changes());
}

// =============================================================================
// Mode and State Tests
// =============================================================================

#[test]
fn test_encoding_selection() {
    let transmitter = Transmitter::new(RecordingDriver::new());
    assert_eq!(transmitter.encoding(), Encoding::Manchester);

    let transmitter = Transmitter::with_encoding(RecordingDriver::new(), Encoding::default());
    assert_eq!(transmitter.encoding(), Encoding::Manchester);
}

#[test]
fn test_input_mode_around_transmission() {
    let mut transmitter = Transmitter::new(RecordingDriver::new());
    assert_eq!(transmitter.driver().mode(), PinMode::Input);
    assert_eq!(transmitter.state(), TxState::Idle);

    transmitter.transmit(&plan("0S", 2, 10), &TIMING).unwrap();

    assert_eq!(transmitter.state(), TxState::Idle);
    assert_eq!(transmitter.driver().mode(), PinMode::Input);
    assert_eq!(
        transmitter.driver().modes(),
        [PinMode::Output, PinMode::Input]
    );
    // Output is set before the first level change
    assert_eq!(
        transmitter.driver().events().first(),
        Some(&DriverEvent::Mode(PinMode::Output))
    );
}

#[test]
fn test_level_failure_releases_line() {
    let mut transmitter = Transmitter::new(RecordingDriver::new().failing_at_level(3));
    let err = transmitter.transmit(&plan("0101", 1, 0), &TIMING).unwrap_err();

    assert!(matches!(err, TransmitError::Hardware(InjectedFault::Level(3))));
    assert_eq!(transmitter.state(), TxState::Idle);
    assert_eq!(transmitter.driver().mode(), PinMode::Input);
    assert_eq!(transmitter.driver().level_changes(), 2);
    assert_eq!(
        transmitter.driver().events().last(),
        Some(&DriverEvent::Mode(PinMode::Input))
    );
}

#[test]
fn test_output_mode_failure() {
    let mut transmitter = Transmitter::new(RecordingDriver::new().failing_output_mode());
    let err = transmitter.transmit(&plan("0S", 1, 0), &TIMING).unwrap_err();

    assert!(matches!(err, TransmitError::Hardware(InjectedFault::Mode)));
    assert_eq!(transmitter.driver().level_changes(), 0);
    assert_eq!(transmitter.driver().mode(), PinMode::Input);
    assert_eq!(transmitter.state(), TxState::Idle);
}

#[test]
fn test_zero_data_length_rejected_before_pin_use() {
    let timing = TimingProfile::new(0, 5000);
    let mut transmitter = Transmitter::new(RecordingDriver::new());
    let err = transmitter.transmit(&plan("sS0", 1, 0), &timing).unwrap_err();

    assert!(matches!(err, TransmitError::InvalidTiming));
    assert!(transmitter.driver().events().is_empty());
    assert_eq!(transmitter.state(), TxState::Idle);
}

#[test]
fn test_zero_data_length_allowed_without_data() {
    let timing = TimingProfile::new(0, 5000);
    let driver = send(&plan("sSsS", 1, 0), &timing);
    assert_eq!(driver.level_changes(), 4);
}

#[test]
fn test_transmitter_reuse() {
    let mut transmitter = Transmitter::new(RecordingDriver::new());
    let plan = plan("10", 1, 0);
    let first = transmitter.transmit(&plan, &TIMING).unwrap();
    let second = transmitter.transmit(&plan, &TIMING).unwrap();
    assert_eq!(first, second);
    assert_eq!(transmitter.driver().level_changes(), 8);
}

#[test]
fn test_borrowed_driver() {
    let mut driver = RecordingDriver::new();
    Transmitter::new(&mut driver)
        .transmit(&plan("S", 1, 0), &TIMING)
        .unwrap();
    assert_eq!(driver.trace(), [Pulse::high(5000)]);
}
