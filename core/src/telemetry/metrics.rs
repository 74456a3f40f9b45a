use std::sync::Mutex;

/// Counters describing the health of the telemetry link.
pub struct LinkMetrics {
    inner: Mutex<Counters>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Records produced or decoded successfully.
    pub accepted: usize,
    /// Lines that failed to decode.
    pub dropped: usize,
    /// Steps where the sensor saw no echo.
    pub timeouts: usize,
}

impl LinkMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
        }
    }

    pub fn record_accepted(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.accepted += 1;
        }
    }

    pub fn record_dropped(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.dropped += 1;
        }
    }

    pub fn record_timeout(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.timeouts += 1;
        }
    }

    pub fn snapshot(&self) -> Counters {
        self.inner.lock().map(|c| *c).unwrap_or_default()
    }
}

impl Default for LinkMetrics {
    fn default() -> Self {
        Self::new()
    }
}
