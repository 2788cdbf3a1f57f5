use std::fmt;

use serde::{Deserialize, Serialize};

use super::collection::{Fleet, FleetSnapshot};
use super::error::FleetError;
use super::record::{Access, Readings, TelemetryRecord, VehicleId};

/// Overheating triggers at or above this temperature.
pub const OVERHEAT_THRESHOLD: f64 = 110.0;
/// Low fuel triggers strictly below this level.
pub const LOW_FUEL_THRESHOLD: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Speed,
    Temperature,
    Fuel,
}

impl Statistic {
    fn read<A: Access>(self, record: &TelemetryRecord<A>) -> f64 {
        match self {
            Statistic::Speed => record.speed(),
            Statistic::Temperature => record.temperature(),
            Statistic::Fuel => record.fuel(),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Statistic::Speed => "speed",
            Statistic::Temperature => "temperature",
            Statistic::Fuel => "fuel",
        };
        f.write_str(name)
    }
}

/// Alert kinds, declared in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Alert {
    CriticalOverheating,
    LowFuelWarning,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::CriticalOverheating => f.write_str("Critical Overheating"),
            Alert::LowFuelWarning => f.write_str("Low Fuel Warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Inclusive: a temperature equal to this raises Critical Overheating.
    pub overheat: f64,
    /// Strict: a fuel level equal to this does not raise Low Fuel Warning.
    pub low_fuel: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            overheat: OVERHEAT_THRESHOLD,
            low_fuel: LOW_FUEL_THRESHOLD,
        }
    }
}

/// Alert evaluation over one momentary read, using the default thresholds.
pub fn check_alerts(readings: &Readings) -> Vec<Alert> {
    check_alerts_with(readings, &AlertThresholds::default())
}

/// Pure. Rules are independent; Overheating is always listed before Low Fuel.
pub fn check_alerts_with(readings: &Readings, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if readings.temperature >= thresholds.overheat {
        alerts.push(Alert::CriticalOverheating);
    }
    if readings.fuel < thresholds.low_fuel {
        alerts.push(Alert::LowFuelWarning);
    }
    alerts
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetStats {
    pub vehicles: usize,
    pub average_speed: f64,
    pub average_temperature: f64,
    pub average_fuel: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleAlerts {
    pub vehicle_id: VehicleId,
    pub alerts: Vec<Alert>,
}

/// Fleet-wide statistics over a borrowed fleet.
///
/// Each average takes one snapshot of membership, then locks every record
/// for a single field read at a time. The result is best-effort: writers
/// keep running between reads.
pub struct Aggregator<'a, A: Access = super::record::Locked> {
    fleet: &'a Fleet<A>,
}

impl<'a, A: Access> Aggregator<'a, A> {
    pub fn new(fleet: &'a Fleet<A>) -> Self {
        Self { fleet }
    }

    pub fn average_speed(&self) -> Result<f64, FleetError> {
        self.average(Statistic::Speed)
    }

    pub fn average_temperature(&self) -> Result<f64, FleetError> {
        self.average(Statistic::Temperature)
    }

    pub fn average_fuel(&self) -> Result<f64, FleetError> {
        self.average(Statistic::Fuel)
    }

    pub fn average(&self, statistic: Statistic) -> Result<f64, FleetError> {
        average_over(&self.fleet.snapshot(), statistic)
    }

    /// All three averages over one membership snapshot.
    pub fn stats(&self) -> Result<FleetStats, FleetError> {
        let snapshot = self.fleet.snapshot();
        Ok(FleetStats {
            vehicles: snapshot.len(),
            average_speed: average_over(&snapshot, Statistic::Speed)?,
            average_temperature: average_over(&snapshot, Statistic::Temperature)?,
            average_fuel: average_over(&snapshot, Statistic::Fuel)?,
        })
    }

    /// Vehicles carrying at least one alert, in insertion order.
    pub fn alerts(&self, thresholds: &AlertThresholds) -> Vec<VehicleAlerts> {
        self.fleet
            .snapshot()
            .iter()
            .filter_map(|record| {
                let alerts = check_alerts_with(&record.readings(), thresholds);
                (!alerts.is_empty()).then(|| VehicleAlerts {
                    vehicle_id: record.id(),
                    alerts,
                })
            })
            .collect()
    }
}

fn average_over<A: Access>(
    snapshot: &FleetSnapshot<A>,
    statistic: Statistic,
) -> Result<f64, FleetError> {
    if snapshot.is_empty() {
        return Err(FleetError::EmptyFleet { statistic });
    }
    let sum: f64 = snapshot.iter().map(|record| statistic.read(record)).sum();
    Ok(sum / snapshot.len() as f64)
}
