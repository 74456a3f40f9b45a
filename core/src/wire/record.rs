use serde::{Deserialize, Serialize};

/// Highest angle the servo can be commanded to.
pub const MAX_ANGLE_DEGREES: f64 = 180.0;

/// Distance reported for one sweep step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Distance {
    /// A measured echo, in centimetres.
    Echo(f64),
    /// The sensor timed out waiting for a return pulse.
    NoEcho,
}

impl Distance {
    pub fn centimetres(&self) -> Option<f64> {
        match self {
            Distance::Echo(cm) => Some(*cm),
            Distance::NoEcho => None,
        }
    }

    /// True when a real echo lies at or below `max_range_cm`.
    pub fn within(&self, max_range_cm: f64) -> bool {
        matches!(self, Distance::Echo(cm) if *cm <= max_range_cm)
    }
}

/// One angle/distance sample emitted per sweep step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub angle_degrees: f64,
    pub distance: Distance,
}

impl TelemetryRecord {
    pub fn new(angle_degrees: f64, distance: Distance) -> Self {
        Self {
            angle_degrees,
            distance,
        }
    }

    pub fn echo(angle_degrees: f64, distance_cm: f64) -> Self {
        Self::new(angle_degrees, Distance::Echo(distance_cm))
    }

    pub fn no_echo(angle_degrees: f64) -> Self {
        Self::new(angle_degrees, Distance::NoEcho)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_excludes_no_echo_and_far_targets() {
        assert!(Distance::Echo(20.0).within(20.0));
        assert!(!Distance::Echo(20.01).within(20.0));
        assert!(!Distance::NoEcho.within(20.0));
        assert_eq!(Distance::NoEcho.centimetres(), None);
    }
}
