//! Integration Tests für Uhren-Logik
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockPwmOutput / MockTimeSource

use amclock_core::{
    ClockDriver, DisplayPhase, MAX_LEVEL, OutputError, OutputSmoother, PwmOutput, StatusIndicator,
    StatusPattern, TimeOfDay, TimeSource, display_phase, hours_level, minutes_level,
};

// ============================================================================
// Mock PWM Output
// ============================================================================

#[derive(Default)]
pub struct MockPwmOutput {
    pub written: Vec<u16>,
    pub fail_next_write: bool,
}

impl MockPwmOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PwmOutput for MockPwmOutput {
    fn write_level(&mut self, level: u16) -> Result<(), OutputError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(OutputError::WriteFailed);
        }

        self.written.push(level);
        Ok(())
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

#[derive(Default)]
pub struct MockTimeSource {
    pub now: Option<TimeOfDay>,
    pub update_count: usize,
}

impl MockTimeSource {
    pub fn at(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            now: TimeOfDay::new(hours, minutes, seconds),
            update_count: 0,
        }
    }
}

impl TimeSource for MockTimeSource {
    fn update(&mut self) {
        self.update_count += 1;
    }

    fn time_of_day(&self) -> Option<TimeOfDay> {
        self.now
    }
}

/// Treibt den Smoother bis zum Ziel und schreibt jeden Schritt auf den Ausgang
fn run_smoother(smoother: &mut OutputSmoother, output: &mut MockPwmOutput) -> usize {
    let mut ticks = 0;
    while let Some(level) = smoother.tick() {
        output.write_level(level).unwrap();
        ticks += 1;
    }
    ticks
}

// ============================================================================
// Tests: StatusIndicator
// ============================================================================

#[test]
fn test_status_pattern_round_trip_after_16_ticks() {
    for pattern in StatusPattern::ALL {
        let mut indicator = StatusIndicator::new(pattern);
        let emitted: Vec<bool> = (0..16).map(|_| indicator.tick()).collect();
        assert_eq!(indicator.word(), pattern.word());

        // Die ausgegebenen Bits entsprechen dem Wort, LSB zuerst
        let rebuilt = emitted
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &bit)| acc | (u16::from(bit) << i));
        assert_eq!(rebuilt, pattern.word());
    }
}

#[test]
fn test_status_patterns_are_distinct() {
    assert_ne!(StatusPattern::NORMAL_WORD, StatusPattern::CONNECTING_WORD);
    assert_ne!(StatusPattern::CONNECTING_WORD, StatusPattern::PROVISIONING_WORD);
    assert_ne!(StatusPattern::NORMAL_WORD, StatusPattern::PROVISIONING_WORD);
}

// ============================================================================
// Tests: OutputSmoother
// ============================================================================

#[test]
fn test_smoother_sequence_0_to_100() {
    let mut smoother = OutputSmoother::new(32);
    let mut output = MockPwmOutput::new();
    smoother.set_target(100);
    run_smoother(&mut smoother, &mut output);
    assert_eq!(output.written, vec![32, 64, 96, 100]);
}

#[test]
fn test_smoother_converges_without_overshoot() {
    let starts = [0u16, 1, 31, 32, 500, 1000, 1023];
    let targets = [0u16, 1, 33, 511, 512, 990, 1023];

    for &start in &starts {
        for &target in &targets {
            let mut smoother = OutputSmoother::new(32);
            smoother.set_target(start);
            while smoother.tick().is_some() {}

            smoother.set_target(target);
            let mut output = MockPwmOutput::new();
            let ticks = run_smoother(&mut smoother, &mut output);

            let expected_ticks = usize::from(start.abs_diff(target).div_ceil(32));
            assert_eq!(ticks, expected_ticks, "start={start} target={target}");
            assert_eq!(smoother.current(), target);

            if target >= start {
                assert!(output.written.iter().all(|&v| v <= target));
                assert!(output.written.windows(2).all(|w| w[0] < w[1]));
            } else {
                assert!(output.written.iter().all(|&v| v >= target));
                assert!(output.written.windows(2).all(|w| w[0] > w[1]));
            }
        }
    }
}

#[test]
fn test_smoother_retarget_mid_ramp() {
    let mut smoother = OutputSmoother::new(32);
    smoother.set_target(MAX_LEVEL);
    assert_eq!(smoother.tick(), Some(32));
    assert_eq!(smoother.tick(), Some(64));
    smoother.set_target(40);
    assert_eq!(smoother.tick(), Some(40));
    assert_eq!(smoother.tick(), None);
}

#[test]
fn test_mock_pwm_output_recovers_after_fail() {
    let mut output = MockPwmOutput::new();
    output.fail_next_write = true;

    assert_eq!(output.write_level(10), Err(OutputError::WriteFailed));
    assert!(output.write_level(20).is_ok());
    assert_eq!(output.written, vec![20]);
}

// ============================================================================
// Tests: Level-Berechnung
// ============================================================================

#[test]
fn test_minutes_level_formula() {
    for m in 0..60u8 {
        assert_eq!(u32::from(minutes_level(m)), u32::from(m) * 1023 / 60);
    }
}

#[test]
fn test_hours_level_formula() {
    for s in (0..43_200u32).step_by(97).chain([43_199]) {
        assert_eq!(u32::from(hours_level(s)), s * 1023 / 43_200);
    }
}

#[test]
fn test_phase_scenarios() {
    assert_eq!(display_phase(25), DisplayPhase::Hours);
    assert_eq!(display_phase(35), DisplayPhase::Minutes);
}

// ============================================================================
// Tests: ClockDriver
// ============================================================================

#[test]
fn test_driver_hours_phase() {
    let mut driver = ClockDriver::new(0);
    let mut time = MockTimeSource::at(15, 30, 25);

    let frame = driver.poll(1000, false, &mut time).unwrap();
    assert_eq!(frame.phase, DisplayPhase::Hours);
    assert!(frame.hour_led);
    assert!(!frame.minute_led);
    assert_eq!(frame.target, hours_level(3 * 3600 + 30 * 60 + 25));
    assert_eq!(time.update_count, 1);
}

#[test]
fn test_driver_minutes_phase_blinks_minute_led() {
    let mut driver = ClockDriver::new(0);
    let mut time = MockTimeSource::at(9, 45, 35);

    let first = driver.poll(1000, false, &mut time).unwrap();
    let second = driver.poll(2000, false, &mut time).unwrap();
    let third = driver.poll(3000, false, &mut time).unwrap();

    for frame in [first, second, third] {
        assert_eq!(frame.phase, DisplayPhase::Minutes);
        assert!(!frame.hour_led);
        assert_eq!(frame.target, minutes_level(45));
    }
    assert!(first.minute_led);
    assert!(!second.minute_led);
    assert!(third.minute_led);
}

#[test]
fn test_driver_calibration_overrides_time() {
    let mut driver = ClockDriver::new(0);
    let mut time = MockTimeSource::at(2, 10, 5);

    let frame = driver.poll(1000, true, &mut time).unwrap();
    assert_eq!(frame.phase, DisplayPhase::Calibration);
    assert!(frame.hour_led);
    assert!(frame.minute_led);
    assert_eq!(frame.target, MAX_LEVEL);
    // Zeitquelle wird während der Kalibrierung nicht abgefragt
    assert_eq!(time.update_count, 0);

    // Ohne gültige Zeit bleibt die Kalibrierung trotzdem verfügbar
    let mut no_time = MockTimeSource::default();
    let frame = driver.poll(1200, true, &mut no_time).unwrap();
    assert_eq!(frame.target, MAX_LEVEL);
}

#[test]
fn test_driver_without_time_keeps_previous_output() {
    let mut driver = ClockDriver::new(0);
    let mut time = MockTimeSource::default();

    assert_eq!(driver.poll(1000, false, &mut time), None);
    assert_eq!(time.update_count, 1);
    // Gate wurde trotzdem weitergesetzt
    assert_eq!(driver.poll(1500, false, &mut time), None);
    assert_eq!(time.update_count, 1);
}

#[test]
fn test_driver_feeds_smoother() {
    let mut driver = ClockDriver::new(0);
    let mut smoother = OutputSmoother::default();
    let mut output = MockPwmOutput::new();
    let mut time = MockTimeSource::at(0, 30, 15);

    let frame = driver.poll(1000, false, &mut time).unwrap();
    smoother.set_target(frame.target);
    run_smoother(&mut smoother, &mut output);

    assert_eq!(output.written.last(), Some(&minutes_level(30)));
}
