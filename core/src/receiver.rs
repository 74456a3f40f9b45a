use crate::prelude::{RadarError, RadarResult};
use crate::telemetry::{Counters, LinkMetrics, LogManager};
use crate::trail::TrailStore;
use crate::transport::LineSource;

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub accepted: usize,
    pub dropped: usize,
    pub skipped: usize,
}

/// Moves lines from the link into the trail, once per frame.
pub struct TelemetryReceiver<S: LineSource> {
    source: S,
    metrics: LinkMetrics,
    logger: LogManager,
}

impl<S: LineSource> TelemetryReceiver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            metrics: LinkMetrics::new(),
            logger: LogManager::new("receiver"),
        }
    }

    pub fn metrics(&self) -> Counters {
        self.metrics.snapshot()
    }

    /// Ingests every complete line currently buffered, without waiting for
    /// more. Blank lines are skipped and malformed ones dropped; only a
    /// closed transport ends the pass with an error.
    pub fn drain(&mut self, store: &mut TrailStore) -> RadarResult<DrainReport> {
        let mut report = DrainReport::default();
        while let Some(line) = self.source.try_read_line()? {
            if line.trim().is_empty() {
                report.skipped += 1;
                continue;
            }
            match store.ingest(&line) {
                Ok(record) => {
                    report.accepted += 1;
                    self.metrics.record_accepted();
                    self.logger.trace_step(&format!(
                        "received {}° {:?}",
                        record.angle_degrees, record.distance
                    ));
                }
                Err(err @ RadarError::MalformedRecord { .. }) => {
                    report.dropped += 1;
                    self.metrics.record_dropped();
                    self.logger.warn(&err.to_string());
                }
                Err(err) => return Err(err),
            }
        }
        Ok(report)
    }
}
