use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sweep geometry and timing for the acquisition loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Angular increment between two samples, in degrees.
    pub step_degrees: f64,
    /// Time given to the servo to reach a commanded angle before ranging.
    pub settle_ms: u64,
    /// Pause after a sample has been emitted.
    pub dwell_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            step_degrees: 2.0,
            settle_ms: 100,
            dwell_ms: 100,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> RadarResult<()> {
        if !self.step_degrees.is_finite() || self.step_degrees <= 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "step_degrees must be a positive number, got {}",
                self.step_degrees
            )));
        }
        Ok(())
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }
}

/// Proximity alert driving the auxiliary (buzzer) output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Distances at or below this value raise the alert, in centimetres.
    pub max_alert_distance_cm: f64,
    /// Output level reached at zero distance (16-bit PWM duty).
    pub max_intensity: u16,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            max_alert_distance_cm: 20.0,
            max_intensity: 10_000,
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> RadarResult<()> {
        if !self.max_alert_distance_cm.is_finite() || self.max_alert_distance_cm <= 0.0 {
            return Err(RadarError::InvalidConfig(format!(
                "max_alert_distance_cm must be positive, got {}",
                self.max_alert_distance_cm
            )));
        }
        Ok(())
    }
}

/// Bounded history kept by the receiving side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub capacity: usize,
    /// Optional age limit. `None` keeps the most recent points unconditionally.
    pub lifetime_ms: Option<u64>,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            lifetime_ms: None,
        }
    }
}

impl TrailConfig {
    /// Capacities above 255 would make two consecutive opacities collide.
    pub fn validate(&self) -> RadarResult<()> {
        if self.capacity == 0 || self.capacity > 255 {
            return Err(RadarError::InvalidConfig(format!(
                "trail capacity must be within 1..=255, got {}",
                self.capacity
            )));
        }
        Ok(())
    }

    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime_ms.map(Duration::from_millis)
    }
}

/// Common error type for the acquisition and display pipelines.
#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    #[error("no echo within {waited:?}")]
    RangingTimeout { waited: Duration },
    #[error("malformed record {line:?}: {reason}")]
    MalformedRecord { line: String, reason: String },
    #[error("transport closed: {0}")]
    TransportClosed(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serial(#[from] serialport::Error),
}

impl RadarError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        RadarError::MalformedRecord {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

pub type RadarResult<T> = Result<T, RadarError>;
