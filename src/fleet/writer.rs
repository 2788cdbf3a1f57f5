use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::collection::RecordHandle;
use super::record::{Readings, VehicleId};
use crate::telemetry::event::FleetEvent;
use crate::telemetry::recorder::SharedRecorder;

/// Half-open `[low, high)` range for simulated values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low < self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingRanges {
    pub speed: ValueRange,
    pub temperature: ValueRange,
    pub fuel: ValueRange,
}

impl Default for ReadingRanges {
    fn default() -> Self {
        Self {
            speed: ValueRange::new(40.0, 120.0),
            temperature: ValueRange::new(80.0, 130.0),
            fuel: ValueRange::new(5.0, 100.0),
        }
    }
}

/// Produces the next simulated update for one vehicle.
pub trait ReadingSource: Send + 'static {
    fn next_readings(&mut self) -> Readings;
}

/// Uniform values within `ReadingRanges`. Each task owns its own RNG.
pub struct RandomReadings {
    rng: SmallRng,
    ranges: ReadingRanges,
}

impl RandomReadings {
    pub fn new(ranges: ReadingRanges) -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
            ranges,
        }
    }

    pub fn seeded(ranges: ReadingRanges, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            ranges,
        }
    }

    fn sample(&mut self, range: ValueRange) -> f64 {
        self.rng.random_range(range.low..range.high)
    }
}

impl ReadingSource for RandomReadings {
    fn next_readings(&mut self) -> Readings {
        let ranges = self.ranges;
        Readings {
            speed: self.sample(ranges.speed),
            temperature: self.sample(ranges.temperature),
            fuel: self.sample(ranges.fuel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterSummary {
    pub vehicle_id: VehicleId,
    pub updates: u64,
}

/// Repeatedly overwrites one record until the token is cancelled.
pub struct WriterTask<S> {
    handle: RecordHandle,
    source: S,
    pacing: Duration,
    cancel: CancellationToken,
}

impl<S: ReadingSource> WriterTask<S> {
    pub fn new(handle: RecordHandle, source: S, pacing: Duration, cancel: CancellationToken) -> Self {
        Self {
            handle,
            source,
            pacing,
            cancel,
        }
    }

    /// Checks the token at each iteration boundary and races it against the
    /// pacing sleep, so a cancelled writer exits within one interval.
    pub async fn run(mut self) -> WriterSummary {
        let vehicle_id = self.handle.id();
        let mut updates = 0u64;

        while !self.cancel.is_cancelled() {
            let Some(record) = self.handle.upgrade() else {
                debug!(vehicle_id, "record dropped, writer exiting");
                break;
            };
            let next = self.source.next_readings();
            record.set_speed(next.speed);
            record.set_temperature(next.temperature);
            record.set_fuel(next.fuel);
            drop(record);
            updates += 1;

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.pacing) => {}
            }
        }

        WriterSummary { vehicle_id, updates }
    }
}

/// One spawned writer per record, all sharing a single cancellation token.
pub struct WriterPool {
    cancel: CancellationToken,
    tasks: Vec<(VehicleId, JoinHandle<WriterSummary>)>,
    recorder: Option<SharedRecorder>,
}

impl WriterPool {
    /// Spawns writers fed by `RandomReadings` over `ranges`.
    pub fn spawn(
        handles: Vec<RecordHandle>,
        ranges: ReadingRanges,
        pacing: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self::spawn_with(handles, pacing, cancel, |_| RandomReadings::new(ranges))
    }

    pub fn spawn_with<S, F>(
        handles: Vec<RecordHandle>,
        pacing: Duration,
        cancel: CancellationToken,
        mut make_source: F,
    ) -> Self
    where
        S: ReadingSource,
        F: FnMut(&RecordHandle) -> S,
    {
        let tasks = handles
            .into_iter()
            .map(|handle| {
                let vehicle_id = handle.id();
                let source = make_source(&handle);
                let task = WriterTask::new(handle, source, pacing, cancel.clone());
                (vehicle_id, tokio::spawn(task.run()))
            })
            .collect();

        Self {
            cancel,
            tasks,
            recorder: None,
        }
    }

    /// Records a start event now and a stop event per writer on `join`.
    pub fn with_recorder(mut self, recorder: SharedRecorder) -> Self {
        for (vehicle_id, _) in &self.tasks {
            recorder.record(FleetEvent::WriterStarted {
                vehicle_id: *vehicle_id,
            });
        }
        self.recorder = Some(recorder);
        self
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Clears the run flag for every writer.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Waits for every writer. Panicked writers are logged and left out.
    pub async fn join(self) -> Vec<WriterSummary> {
        let mut summaries = Vec::with_capacity(self.tasks.len());
        for (vehicle_id, task) in self.tasks {
            match task.await {
                Ok(summary) => {
                    if let Some(recorder) = &self.recorder {
                        recorder.record(FleetEvent::WriterStopped {
                            vehicle_id: summary.vehicle_id,
                            updates: summary.updates,
                        });
                    }
                    summaries.push(summary);
                }
                Err(e) => warn!(vehicle_id, "writer task failed: {}", e),
            }
        }
        summaries
    }

    /// `stop` followed by `join`.
    pub async fn shutdown(self) -> Vec<WriterSummary> {
        self.stop();
        self.join().await
    }
}
