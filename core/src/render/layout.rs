use crate::prelude::{RadarError, RadarResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pixel position on the drawing surface (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Upper bound on range rings per frame.
pub const MAX_RANGE_RINGS: usize = 100;

/// Geometry and scale of the half-disc radar display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarLayout {
    pub center: ScreenPoint,
    /// Pixel radius of the outermost ring.
    pub radius: f32,
    /// Distance mapped onto `radius`; farther echoes are clipped.
    pub max_range_cm: f64,
    pub ring_step_cm: f64,
    pub grid_step_degrees: u32,
    /// Vertical offset of ring labels below the baseline.
    pub ring_label_drop: f32,
    /// Radial offset of angle labels outside the arc.
    pub angle_label_offset: f32,
    /// Top-left corner of the two status lines.
    pub status_origin: ScreenPoint,
    pub status_line_height: f32,
    pub frame_rate_hz: u32,
}

impl Default for RadarLayout {
    fn default() -> Self {
        Self::fit(1200.0, 800.0)
    }
}

impl RadarLayout {
    /// Places the baseline three quarters down the surface and sizes the arc
    /// to leave room for labels on every side.
    pub fn fit(width: f32, height: f32) -> Self {
        let center = ScreenPoint::new(width / 2.0, height * 0.75);
        let radius = (width / 2.0 - 100.0).min(center.y - 100.0).max(10.0);
        Self {
            center,
            radius,
            max_range_cm: 20.0,
            ring_step_cm: 5.0,
            grid_step_degrees: 30,
            ring_label_drop: 50.0,
            angle_label_offset: 40.0,
            status_origin: ScreenPoint::new(40.0, height - 120.0),
            status_line_height: 60.0,
            frame_rate_hz: 60,
        }
    }

    pub fn validate(&self) -> RadarResult<()> {
        if !self.max_range_cm.is_finite() || self.max_range_cm <= 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "max_range_cm must be a positive number, got {}",
                self.max_range_cm
            )));
        }
        if !self.ring_step_cm.is_finite() || self.ring_step_cm <= 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "ring_step_cm must be a positive number, got {}",
                self.ring_step_cm
            )));
        }
        if self.max_range_cm / self.ring_step_cm > MAX_RANGE_RINGS as f64 {
            return Err(RadarError::InvalidConfig(format!(
                "{} cm in {} cm rings exceeds {} rings",
                self.max_range_cm, self.ring_step_cm, MAX_RANGE_RINGS
            )));
        }
        if self.frame_rate_hz == 0 {
            return Err(RadarError::InvalidConfig(
                "frame_rate_hz must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Same scale settings, new surface size.
    pub fn resized(&self, width: f32, height: f32) -> Self {
        Self {
            max_range_cm: self.max_range_cm,
            ring_step_cm: self.ring_step_cm,
            grid_step_degrees: self.grid_step_degrees,
            frame_rate_hz: self.frame_rate_hz,
            ..Self::fit(width, height)
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz.max(1)))
    }

    /// Maps a polar (angle, pixel radius) pair to the surface. 0° points
    /// right, 90° straight up.
    pub fn polar(&self, angle_degrees: f64, radius: f32) -> ScreenPoint {
        let radians = angle_degrees.to_radians();
        let r = f64::from(radius);
        ScreenPoint::new(
            self.center.x + (r * radians.cos()) as f32,
            self.center.y - (r * radians.sin()) as f32,
        )
    }

    /// Pixel radius of a distance, `None` when beyond `max_range_cm`.
    pub fn range_to_radius(&self, distance_cm: f64) -> Option<f32> {
        if !(0.0..=self.max_range_cm).contains(&distance_cm) {
            return None;
        }
        Some((distance_cm / self.max_range_cm) as f32 * self.radius)
    }
}
