use crate::prelude::{RadarResult, TrailConfig};
use crate::wire::{decode, Distance, TelemetryRecord};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A decoded sample together with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub angle_degrees: f64,
    pub distance: Distance,
    pub captured_at: Instant,
}

impl TrailPoint {
    pub fn record(&self) -> TelemetryRecord {
        TelemetryRecord::new(self.angle_degrees, self.distance)
    }
}

/// Most recent samples, oldest first. The position of a point is its decay
/// rank when drawn.
#[derive(Debug)]
pub struct TrailStore {
    points: VecDeque<TrailPoint>,
    capacity: usize,
    lifetime: Option<Duration>,
}

impl Default for TrailStore {
    fn default() -> Self {
        let config = TrailConfig::default();
        Self {
            points: VecDeque::with_capacity(config.capacity + 1),
            capacity: config.capacity,
            lifetime: config.lifetime(),
        }
    }
}

impl TrailStore {
    pub fn new(config: &TrailConfig) -> RadarResult<Self> {
        config.validate()?;
        Ok(Self {
            points: VecDeque::with_capacity(config.capacity + 1),
            capacity: config.capacity,
            lifetime: config.lifetime(),
        })
    }

    /// Decodes `line` and appends it. A malformed line leaves the store
    /// untouched and is returned as an error for the caller to report.
    pub fn ingest(&mut self, line: &str) -> RadarResult<TelemetryRecord> {
        self.ingest_at(line, Instant::now())
    }

    pub fn ingest_at(&mut self, line: &str, now: Instant) -> RadarResult<TelemetryRecord> {
        let record = decode(line)?;
        self.push(record, now);
        Ok(record)
    }

    pub fn push(&mut self, record: TelemetryRecord, captured_at: Instant) {
        self.points.push_back(TrailPoint {
            angle_degrees: record.angle_degrees,
            distance: record.distance,
            captured_at,
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Drops points older than the configured lifetime. Without a lifetime
    /// only capacity bounds the trail.
    pub fn expire(&mut self, now: Instant) -> usize {
        let Some(lifetime) = self.lifetime else {
            return 0;
        };
        let before = self.points.len();
        self.points
            .retain(|p| now.saturating_duration_since(p.captured_at) <= lifetime);
        before - self.points.len()
    }

    pub fn snapshot(&self) -> Vec<TrailPoint> {
        self.points.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&TrailPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
