use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use sweepcore::sweep::RangingDriver;
use sweepcore::{RadarError, RadarResult};

/// A reflecting surface occupying an angular sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub from_degrees: f64,
    pub to_degrees: f64,
    pub distance_cm: f64,
}

impl Obstacle {
    fn covers(&self, angle: f64) -> bool {
        let (lo, hi) = if self.from_degrees <= self.to_degrees {
            (self.from_degrees, self.to_degrees)
        } else {
            (self.to_degrees, self.from_degrees)
        };
        (lo..=hi).contains(&angle)
    }
}

/// Configuration for the synthetic obstacle field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub obstacles: Vec<Obstacle>,
    /// Uniform jitter added to every echo, in centimetres.
    pub noise_cm: f64,
    /// Echoes farther than this never come back.
    pub max_echo_cm: f64,
    pub echo_timeout_ms: u64,
    /// Sleep for the echo timeout on a miss, like the real sensor would.
    pub realtime: bool,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            obstacles: vec![
                Obstacle {
                    from_degrees: 30.0,
                    to_degrees: 55.0,
                    distance_cm: 12.0,
                },
                Obstacle {
                    from_degrees: 95.0,
                    to_degrees: 115.0,
                    distance_cm: 6.5,
                },
                Obstacle {
                    from_degrees: 140.0,
                    to_degrees: 170.0,
                    distance_cm: 35.0,
                },
            ],
            noise_cm: 0.3,
            max_echo_cm: 400.0,
            echo_timeout_ms: 30,
            realtime: true,
            seed: 0,
        }
    }
}

impl SceneConfig {
    pub fn echo_timeout(&self) -> Duration {
        Duration::from_millis(self.echo_timeout_ms)
    }

    /// Nearest obstacle distance at `angle`, if any reflects back in range.
    pub fn echo_at(&self, angle: f64) -> Option<f64> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.covers(angle))
            .map(|obstacle| obstacle.distance_cm)
            .filter(|&cm| cm <= self.max_echo_cm)
            .fold(None, |nearest: Option<f64>, cm| {
                Some(nearest.map_or(cm, |n| n.min(cm)))
            })
    }
}

/// Ultrasonic sensor looking into a [`SceneConfig`] from wherever the shaft
/// currently points.
pub struct SimulatedSonar {
    scene: SceneConfig,
    shaft: Rc<Cell<f64>>,
    rng: StdRng,
}

impl SimulatedSonar {
    pub fn new(scene: SceneConfig, shaft: Rc<Cell<f64>>) -> Self {
        let rng = StdRng::seed_from_u64(scene.seed);
        Self { scene, shaft, rng }
    }
}

impl RangingDriver for SimulatedSonar {
    fn measure(&mut self) -> RadarResult<f64> {
        let Some(distance) = self.scene.echo_at(self.shaft.get()) else {
            let waited = self.scene.echo_timeout();
            if self.scene.realtime {
                std::thread::sleep(waited);
            }
            return Err(RadarError::RangingTimeout { waited });
        };
        let jitter = if self.scene.noise_cm > 0.0 {
            self.rng.gen_range(-self.scene.noise_cm..self.scene.noise_cm)
        } else {
            0.0
        };
        Ok((distance + jitter).max(0.0))
    }
}
