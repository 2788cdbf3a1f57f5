use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::event::FleetEvent;
use super::metrics::TelemetrySnapshot;

pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded event history plus running totals.
///
/// The totals count every event ever recorded; eviction from the history
/// never changes them.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<FleetEvent>,
    capacity: usize,
    totals: TelemetrySnapshot,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Zero is treated as one; the newest event is always kept.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            totals: TelemetrySnapshot::default(),
        }
    }

    pub fn record(&mut self, event: FleetEvent) {
        self.totals.apply(&event);
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn events(&self) -> impl Iterator<Item = &FleetEvent> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.totals.clone().finish()
    }

    /// Drops the history and resets the totals.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.totals = TelemetrySnapshot::default();
    }
}

/// Cloneable handle so spawned tasks and the session share one buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedRecorder {
    inner: Arc<Mutex<TelemetryRecorder>>,
}

impl SharedRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TelemetryRecorder::with_capacity(capacity))),
        }
    }

    pub fn record(&self, event: FleetEvent) {
        self.inner.lock().record(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.inner.lock().snapshot()
    }

    pub fn events(&self) -> Vec<FleetEvent> {
        self.inner.lock().events().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
