use crate::generator::profile::SceneConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use sweepcore::transport::DEFAULT_BAUD_RATE;
use sweepcore::{AlertConfig, SweepConfig};

/// Where telemetry lines go.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Serial device; stdout when absent.
    pub port: Option<String>,
    pub baud_rate: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub sweep: SweepConfig,
    pub alert: AlertConfig,
    pub scene: SceneConfig,
    pub link: LinkConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub step_degrees: Option<f64>,
    pub settle_ms: Option<u64>,
    pub dwell_ms: Option<u64>,
    pub max_intensity: Option<u16>,
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading simulator config {}", path_ref.display()))?;
        let config: SimulatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing simulator config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.port.is_some() {
            self.link.port = overrides.port;
        }
        if let Some(baud_rate) = overrides.baud_rate {
            self.link.baud_rate = baud_rate;
        }
        if let Some(step) = overrides.step_degrees {
            self.sweep.step_degrees = step;
        }
        if let Some(settle_ms) = overrides.settle_ms {
            self.sweep.settle_ms = settle_ms;
        }
        if let Some(dwell_ms) = overrides.dwell_ms {
            self.sweep.dwell_ms = dwell_ms;
        }
        if let Some(max_intensity) = overrides.max_intensity {
            self.alert.max_intensity = max_intensity;
        }
        if let Some(seed) = overrides.seed {
            self.scene.seed = seed;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.sweep.validate().context("sweep settings")?;
        self.alert.validate().context("alert settings")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn overrides_take_precedence() {
        let cfg = SimulatorConfig::default().apply(Overrides {
            port: Some("/dev/ttyACM0".into()),
            step_degrees: Some(5.0),
            max_intensity: Some(5_000),
            ..Default::default()
        });
        assert_eq!(cfg.link.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(cfg.link.baud_rate, 115_200);
        assert_eq!(cfg.sweep.step_degrees, 5.0);
        assert_eq!(cfg.alert.max_intensity, 5_000);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"sweep:\n  step_degrees: 3\nalert:\n  max_intensity: 5000\nscene:\n  seed: 7\n  obstacles:\n    - {from_degrees: 10, to_degrees: 20, distance_cm: 4.5}\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = SimulatorConfig::load(&path).unwrap();
        assert_eq!(cfg.sweep.step_degrees, 3.0);
        assert_eq!(cfg.sweep.settle_ms, 100);
        assert_eq!(cfg.alert.max_intensity, 5_000);
        assert_eq!(cfg.alert.max_alert_distance_cm, 20.0);
        assert_eq!(cfg.scene.seed, 7);
        assert_eq!(cfg.scene.obstacles.len(), 1);
        assert!(cfg.link.port.is_none());
    }

    #[test]
    fn invalid_step_fails_validation() {
        let cfg = SimulatorConfig::default().apply(Overrides {
            step_degrees: Some(0.0),
            ..Default::default()
        });
        assert!(cfg.validate().is_err());
    }
}
