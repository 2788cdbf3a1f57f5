use fleetwatch::fleet::{Alert, Statistic};
use fleetwatch::ingest::IngestError;
use std::collections::VecDeque;

use fleetwatch::telemetry::{
    compute_snapshot, AggregationMode, FleetEvent, RejectionKind, SharedRecorder,
    TelemetryRecorder,
};

#[test]
fn test_snapshot_counts_and_averages() {
    let mut recorder = TelemetryRecorder::new();
    recorder.record(FleetEvent::RecordLoaded { vehicle_id: 1 });
    recorder.record(FleetEvent::RecordLoaded { vehicle_id: 2 });
    recorder.record(FleetEvent::RecordRejected { line: 3, kind: RejectionKind::Malformed });
    recorder.record(FleetEvent::WriterStopped { vehicle_id: 1, updates: 10 });
    recorder.record(FleetEvent::WriterStopped { vehicle_id: 2, updates: 20 });
    recorder.record(FleetEvent::AggregationWindow {
        mode: AggregationMode::Concurrent,
        passes: 4,
        elapsed_us: 100,
    });
    recorder.record(FleetEvent::AlertRaised { vehicle_id: 2, alert: Alert::LowFuelWarning });

    let snap = recorder.snapshot();
    assert_eq!(snap.ingest_stats.loaded, 2);
    assert_eq!(snap.ingest_stats.rejected, 1);
    assert_eq!(snap.ingest_stats.malformed, 1);
    assert_eq!(snap.writer_stats.stopped, 2);
    assert_eq!(snap.writer_stats.total_updates, 30);
    assert_eq!(snap.writer_stats.avg_updates_per_writer, 15.0);
    assert_eq!(snap.aggregation_stats.concurrent_windows, 1);
    assert_eq!(snap.aggregation_stats.avg_pass_us, 25.0);
    assert_eq!(snap.alert_stats.low_fuel, 1);
    assert_eq!(snap.alert_stats.overheating, 0);
}

#[test]
fn test_empty_recorder_has_zero_averages() {
    let snap = TelemetryRecorder::new().snapshot();
    assert_eq!(snap.writer_stats.avg_updates_per_writer, 0.0);
    assert_eq!(snap.aggregation_stats.avg_pass_us, 0.0);
}

#[test]
fn test_capacity_drops_oldest() {
    let mut recorder = TelemetryRecorder::with_capacity(3);
    for id in 0..5 {
        recorder.record(FleetEvent::RecordLoaded { vehicle_id: id });
    }
    assert_eq!(recorder.len(), 3);
    let ids: Vec<u32> = recorder
        .events()
        .map(|e| match e {
            FleetEvent::RecordLoaded { vehicle_id } => *vehicle_id,
            other => panic!("unexpected event {:?}", other),
        })
        .collect();
    assert_eq!(ids, vec![2, 3, 4]);

    recorder.clear();
    assert!(recorder.is_empty());
    assert_eq!(recorder.snapshot().ingest_stats.loaded, 0);
}

#[test]
fn test_totals_survive_eviction() {
    let mut recorder = TelemetryRecorder::with_capacity(4);
    for id in 0..10 {
        recorder.record(FleetEvent::RecordLoaded { vehicle_id: id });
        recorder.record(FleetEvent::WriterStarted { vehicle_id: id });
        recorder.record(FleetEvent::WriterStopped { vehicle_id: id, updates: 3 });
    }
    assert_eq!(recorder.len(), 4);

    let snap = recorder.snapshot();
    assert_eq!(snap.ingest_stats.loaded, 10);
    assert_eq!(snap.writer_stats.started, 10);
    assert_eq!(snap.writer_stats.stopped, 10);
    assert_eq!(snap.writer_stats.total_updates, 30);
    assert_eq!(snap.writer_stats.avg_updates_per_writer, 3.0);
}

#[test]
fn test_running_totals_match_full_history_fold() {
    let events = vec![
        FleetEvent::RecordLoaded { vehicle_id: 1 },
        FleetEvent::RecordRejected { line: 2, kind: RejectionKind::DuplicateId },
        FleetEvent::AggregationWindow {
            mode: AggregationMode::Baseline,
            passes: 10,
            elapsed_us: 50,
        },
        FleetEvent::SessionCompleted { vehicles: 1 },
    ];
    let mut recorder = TelemetryRecorder::new();
    for event in &events {
        recorder.record(event.clone());
    }
    let history: VecDeque<FleetEvent> = events.into_iter().collect();
    assert_eq!(recorder.snapshot(), compute_snapshot(&history));
}

#[test]
fn test_rejection_kind_strips_reason() {
    let err = IngestError::InvalidField { line: 9, reason: "negative speed -1".into() };
    assert_eq!(RejectionKind::from(&err), RejectionKind::InvalidField);
}

#[test]
fn test_shared_recorder_across_threads() {
    let recorder = SharedRecorder::new(1000);
    let threads: Vec<_> = (0..4)
        .map(|t| {
            let recorder = recorder.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    recorder.record(FleetEvent::WriterStarted { vehicle_id: t });
                }
            })
        })
        .collect();
    for th in threads {
        th.join().unwrap();
    }
    assert_eq!(recorder.len(), 200);
    assert_eq!(recorder.snapshot().writer_stats.started, 200);
}

#[test]
fn test_failure_event_serializes() {
    let json = serde_json::to_string(&FleetEvent::AggregationFailed { statistic: Statistic::Fuel })
        .unwrap();
    assert!(json.contains("AggregationFailed"));
    assert!(json.contains("Fuel"));
}
