use super::*;
use crate::testing::{BrokenPin, FakeEcho, FakeTrigger};
use crate::wire::encode_distance;
use embassy_futures::block_on;
use embassy_time::{Delay, Duration};

fn sensor(pulse: Option<Duration>) -> Hcsr04<FakeTrigger, FakeEcho, Delay> {
    Hcsr04::new(
        FakeTrigger::default(),
        FakeEcho { pulse },
        Delay,
        RangingConfig::default(),
    )
}

#[test]
fn test_pulse_conversion() {
    let d = pulse_to_distance_cm(Some(1500), SPEED_OF_SOUND_CM_PER_US);
    assert!((d - 25.725).abs() < 1e-3);

    let d = pulse_to_distance_cm(Some(30_000), SPEED_OF_SOUND_CM_PER_US);
    assert!((d - 514.5).abs() < 1e-2);
}

#[test]
fn test_no_echo_is_sentinel() {
    assert_eq!(pulse_to_distance_cm(None, SPEED_OF_SOUND_CM_PER_US), NO_ECHO_CM);
    assert_eq!(pulse_to_distance_cm(Some(0), SPEED_OF_SOUND_CM_PER_US), NO_ECHO_CM);
    assert!(NO_ECHO_CM < 0.0);
}

#[test]
fn test_trigger_pulse_sequence() {
    let mut s = sensor(Some(Duration::from_micros(500)));
    block_on(s.echo_pulse_us());
    let (trigger, _, _) = s.release();
    assert_eq!(trigger.levels, vec![false, true, false]);
}

#[test]
fn test_echo_pulse_measured() {
    let mut s = sensor(Some(Duration::from_micros(1500)));
    let width = block_on(s.echo_pulse_us()).expect("echo");
    assert!(width >= 1500, "width {width}");
    assert!(width < 30_000, "width {width}");
}

#[test]
fn test_silent_echo_times_out() {
    let mut s = sensor(None);
    let start = Instant::now();
    assert_eq!(block_on(s.echo_pulse_us()), None);
    assert!(start.elapsed() >= RangingConfig::default().echo_timeout);
}

#[test]
fn test_pulse_longer_than_timeout_is_no_echo() {
    let mut s = sensor(Some(Duration::from_millis(40)));
    assert_eq!(block_on(s.measure_distance_cm()), NO_ECHO_CM);
}

#[test]
fn test_measure_distance_cm() {
    let mut s = sensor(Some(Duration::from_micros(2000)));
    let d = block_on(s.measure_distance_cm());
    // 2000 us is 34.3 cm; scheduling can only lengthen the pulse
    assert!(d >= 34.0, "distance {d}");
    assert!(d < 515.0, "distance {d}");
}

#[test]
fn test_microsecond_pulse_encodes_to_whole_cm() {
    // 1500 us is 25.7 cm; 25 us of timing error already reads as 26
    let encode = |us| encode_distance(pulse_to_distance_cm(Some(us), SPEED_OF_SOUND_CM_PER_US));
    assert_eq!(encode(1500), 25);
    assert_eq!(encode(1501), 25);
    assert_eq!(encode(1525), 26);
}

#[test]
fn test_trigger_pin_error_is_no_echo() {
    let mut s = Hcsr04::new(
        BrokenPin,
        FakeEcho {
            pulse: Some(Duration::from_micros(1500)),
        },
        Delay,
        RangingConfig::default(),
    );
    assert_eq!(block_on(s.echo_pulse_us()), None);
    assert_eq!(block_on(s.measure_distance_cm()), NO_ECHO_CM);
}

#[test]
fn test_echo_pin_error_is_no_echo() {
    let mut s = Hcsr04::new(FakeTrigger::default(), BrokenPin, Delay, RangingConfig::default());
    let start = Instant::now();
    assert_eq!(block_on(s.echo_pulse_us()), None);
    // fails fast instead of waiting out the echo timeout
    assert!(start.elapsed() < RangingConfig::default().echo_timeout);
    assert_eq!(block_on(s.measure_distance_cm()), NO_ECHO_CM);
}
