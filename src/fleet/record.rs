use std::cell::Cell;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Caller-assigned vehicle identifier. Unique within a run, never reused.
pub type VehicleId = u32;

/// One vehicle's telemetry triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Readings {
    /// km/h, never negative once past ingestion.
    pub speed: f64,
    /// Engine temperature in Celsius. May be negative.
    pub temperature: f64,
    /// Fuel level as a percentage.
    pub fuel: f64,
}

impl Readings {
    pub fn new(speed: f64, temperature: f64, fuel: f64) -> Self {
        Self { speed, temperature, fuel }
    }
}

/// Synchronization strategy for a record's readings.
///
/// Every call to `read` or `write` is one acquisition. Callers keep the
/// closure to a single field so lock hold time stays minimal.
pub trait Access {
    fn new(readings: Readings) -> Self;
    fn read<T>(&self, f: impl FnOnce(&Readings) -> T) -> T;
    fn write(&self, f: impl FnOnce(&mut Readings));
}

/// Per-record exclusive lock. Shared freely across threads.
#[derive(Debug)]
pub struct Locked(Mutex<Readings>);

impl Access for Locked {
    fn new(readings: Readings) -> Self {
        Locked(Mutex::new(readings))
    }

    fn read<T>(&self, f: impl FnOnce(&Readings) -> T) -> T {
        let guard = self.0.lock();
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut Readings)) {
        let mut guard = self.0.lock();
        f(&mut guard);
    }
}

/// No locking at all. `Cell` makes the record `!Sync`, so the compiler
/// keeps it on a single thread.
#[derive(Debug)]
pub struct Unsynchronized(Cell<Readings>);

impl Access for Unsynchronized {
    fn new(readings: Readings) -> Self {
        Unsynchronized(Cell::new(readings))
    }

    fn read<T>(&self, f: impl FnOnce(&Readings) -> T) -> T {
        f(&self.0.get())
    }

    fn write(&self, f: impl FnOnce(&mut Readings)) {
        let mut readings = self.0.get();
        f(&mut readings);
        self.0.set(readings);
    }
}

/// A vehicle's identity plus its mutable readings, guarded by `A`.
#[derive(Debug)]
pub struct TelemetryRecord<A: Access = Locked> {
    id: VehicleId,
    access: A,
}

impl<A: Access> TelemetryRecord<A> {
    pub fn new(id: VehicleId, readings: Readings) -> Self {
        Self {
            id,
            access: A::new(readings),
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn speed(&self) -> f64 {
        self.access.read(|r| r.speed)
    }

    pub fn temperature(&self) -> f64 {
        self.access.read(|r| r.temperature)
    }

    pub fn fuel(&self) -> f64 {
        self.access.read(|r| r.fuel)
    }

    pub fn set_speed(&self, speed: f64) {
        self.access.write(|r| r.speed = speed);
    }

    pub fn set_temperature(&self, temperature: f64) {
        self.access.write(|r| r.temperature = temperature);
    }

    pub fn set_fuel(&self, fuel: f64) {
        self.access.write(|r| r.fuel = fuel);
    }

    /// Momentary read of all three fields, one acquisition per field.
    /// The fields may come from different writer updates.
    pub fn readings(&self) -> Readings {
        Readings {
            speed: self.speed(),
            temperature: self.temperature(),
            fuel: self.fuel(),
        }
    }
}
