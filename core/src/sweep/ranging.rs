//! HC-SR04 style pulse timing with a bounded echo wait.

use crate::prelude::{RadarError, RadarResult};
use std::time::{Duration, Instant};

/// Speed of sound, in centimetres per microsecond.
const SOUND_CM_PER_US: f64 = 0.0343;

/// Source of distance samples.
pub trait RangingDriver {
    /// Returns the distance in centimetres, or `RangingTimeout` when no
    /// echo was seen in time.
    fn measure(&mut self) -> RadarResult<f64>;
}

/// Raw trigger/echo lines of an ultrasonic sensor.
pub trait EchoPins {
    fn set_trigger(&mut self, high: bool);
    fn echo_is_high(&mut self) -> bool;
    fn delay_us(&mut self, us: u64);
}

/// Converts a round-trip echo pulse width into a one-way distance.
pub fn pulse_to_cm(pulse: Duration) -> f64 {
    (pulse.as_secs_f64() * 1_000_000.0 / 2.0) * SOUND_CM_PER_US
}

#[derive(Debug, Clone)]
pub struct EchoTiming {
    /// Upper bound for each of the two edge waits.
    pub timeout: Duration,
    /// Sleep between two polls of the echo line. Zero spins.
    pub poll_interval: Duration,
}

impl Default for EchoTiming {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30),
            poll_interval: Duration::ZERO,
        }
    }
}

/// Ranging driver that times the echo pulse itself.
pub struct EchoRanger<P: EchoPins> {
    pins: P,
    timing: EchoTiming,
}

impl<P: EchoPins> EchoRanger<P> {
    pub fn new(pins: P, timing: EchoTiming) -> Self {
        Self { pins, timing }
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    fn fire_trigger(&mut self) {
        self.pins.set_trigger(false);
        self.pins.delay_us(2);
        self.pins.set_trigger(true);
        self.pins.delay_us(10);
        self.pins.set_trigger(false);
    }

    /// Polls until the echo line reads `level`, returning the instant the
    /// level was seen.
    fn wait_for_level(&mut self, level: bool, since: Instant) -> RadarResult<Instant> {
        loop {
            if self.pins.echo_is_high() == level {
                return Ok(Instant::now());
            }
            let waited = since.elapsed();
            if waited >= self.timing.timeout {
                return Err(RadarError::RangingTimeout { waited });
            }
            if !self.timing.poll_interval.is_zero() {
                std::thread::sleep(self.timing.poll_interval);
            }
        }
    }
}

impl<P: EchoPins> RangingDriver for EchoRanger<P> {
    fn measure(&mut self) -> RadarResult<f64> {
        self.fire_trigger();
        let start = self.wait_for_level(true, Instant::now())?;
        let end = self.wait_for_level(false, start)?;
        Ok(pulse_to_cm(end.duration_since(start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echo line that rises after `rise_after` polls and stays high for
    /// `high_for` polls. `None` never rises.
    struct ScriptedPins {
        rise_after: Option<usize>,
        high_for: usize,
        polls: usize,
        trigger_edges: Vec<bool>,
    }

    impl ScriptedPins {
        fn new(rise_after: Option<usize>, high_for: usize) -> Self {
            Self {
                rise_after,
                high_for,
                polls: 0,
                trigger_edges: Vec::new(),
            }
        }
    }

    impl EchoPins for ScriptedPins {
        fn set_trigger(&mut self, high: bool) {
            self.trigger_edges.push(high);
        }

        fn echo_is_high(&mut self) -> bool {
            self.polls += 1;
            match self.rise_after {
                Some(rise) => self.polls > rise && self.polls <= rise + self.high_for,
                None => false,
            }
        }

        fn delay_us(&mut self, _us: u64) {}
    }

    #[test]
    fn pulse_width_converts_to_centimetres() {
        // 1166 us round trip is roughly 20 cm
        let cm = pulse_to_cm(Duration::from_micros(1166));
        assert!((cm - 19.9969).abs() < 1e-3);
        assert_eq!(pulse_to_cm(Duration::ZERO), 0.0);
    }

    #[test]
    fn measure_fires_trigger_pulse_and_reads_echo() {
        let mut ranger = EchoRanger::new(ScriptedPins::new(Some(3), 5), EchoTiming::default());
        let cm = ranger.measure().unwrap();
        assert!(cm >= 0.0);
        assert_eq!(ranger.pins().trigger_edges, vec![false, true, false]);
    }

    #[test]
    fn missing_echo_times_out_instead_of_hanging() {
        let timing = EchoTiming {
            timeout: Duration::from_millis(5),
            poll_interval: Duration::from_micros(100),
        };
        let mut ranger = EchoRanger::new(ScriptedPins::new(None, 0), timing);
        match ranger.measure() {
            Err(RadarError::RangingTimeout { waited }) => {
                assert!(waited >= Duration::from_millis(5))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn echo_stuck_high_times_out() {
        let timing = EchoTiming {
            timeout: Duration::from_millis(5),
            poll_interval: Duration::ZERO,
        };
        let mut ranger = EchoRanger::new(ScriptedPins::new(Some(0), usize::MAX - 1), timing);
        assert!(matches!(
            ranger.measure(),
            Err(RadarError::RangingTimeout { .. })
        ));
    }
}
