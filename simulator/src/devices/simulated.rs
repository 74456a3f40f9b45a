use log::{debug, info};
use std::cell::Cell;
use std::rc::Rc;
use sweepcore::sweep::{angle_to_duty, Actuator, AuxOutput, StatusDisplay};

/// Servo model: remembers the commanded angle on a shaft shared with the
/// simulated sensor.
pub struct SimulatedServo {
    shaft: Rc<Cell<f64>>,
}

impl SimulatedServo {
    pub fn new(shaft: Rc<Cell<f64>>) -> Self {
        Self { shaft }
    }
}

impl Actuator for SimulatedServo {
    fn set_angle(&mut self, angle_degrees: f64) {
        debug!(
            "servo -> {}° (duty {})",
            angle_degrees,
            angle_to_duty(angle_degrees)
        );
        self.shaft.set(angle_degrees);
    }
}

/// Buzzer that logs level changes instead of beeping.
#[derive(Default)]
pub struct LoggedBuzzer {
    level: u16,
}

impl LoggedBuzzer {
    pub fn level(&self) -> u16 {
        self.level
    }
}

impl AuxOutput for LoggedBuzzer {
    fn set_intensity(&mut self, level: u16) {
        if level != self.level {
            if level > 0 {
                info!("proximity alert, buzzer at {}", level);
            } else {
                debug!("buzzer off");
            }
        }
        self.level = level;
    }
}

/// Single-line status screen mirrored to the debug log.
#[derive(Default)]
pub struct LoggedScreen {
    text: String,
}

impl LoggedScreen {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl StatusDisplay for LoggedScreen {
    fn show_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        debug!("screen: {}", text);
    }
}
