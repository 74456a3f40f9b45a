use crate::prelude::{RadarError, RadarResult};
use crate::wire::MAX_ANGLE_DEGREES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Angle/direction pair walking a triangular wave over `0..=180`.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepState {
    current_angle: f64,
    direction: Direction,
    step_size: f64,
}

impl SweepState {
    /// Starts at 0° heading towards 180°.
    pub fn new(step_size: f64) -> RadarResult<Self> {
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "step size must be positive, got {}",
                step_size
            )));
        }
        Ok(Self {
            current_angle: 0.0,
            direction: Direction::Ascending,
            step_size,
        })
    }

    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Moves one step. A step that would overshoot lands on the boundary,
    /// and reaching a boundary flips the direction for the following step.
    pub fn advance(&mut self) {
        match self.direction {
            Direction::Ascending => {
                self.current_angle = (self.current_angle + self.step_size).min(MAX_ANGLE_DEGREES);
                if self.current_angle >= MAX_ANGLE_DEGREES {
                    self.direction = Direction::Descending;
                }
            }
            Direction::Descending => {
                self.current_angle = (self.current_angle - self.step_size).max(0.0);
                if self.current_angle <= 0.0 {
                    self.direction = Direction::Ascending;
                }
            }
        }
    }
}

impl Iterator for SweepState {
    type Item = f64;

    /// Yields the current angle, then advances.
    fn next(&mut self) -> Option<f64> {
        let angle = self.current_angle;
        self.advance();
        Some(angle)
    }
}
