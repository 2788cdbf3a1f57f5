use std::sync::Arc;
use std::thread;

use fleetwatch::fleet::{Fleet, Locked, Readings, TelemetryRecord, Unsynchronized};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_locked_record_is_shareable() {
    assert_send_sync::<TelemetryRecord<Locked>>();
    assert_send_sync::<Fleet<Locked>>();
}

#[test]
fn test_accessors_round_trip_each_field() {
    let record: TelemetryRecord = TelemetryRecord::new(4, Readings::new(1.0, 2.0, 3.0));
    assert_eq!(record.id(), 4);

    record.set_speed(55.5);
    assert_eq!(record.speed(), 55.5);
    assert_eq!(record.temperature(), 2.0);

    record.set_temperature(-8.0);
    record.set_fuel(0.0);
    assert_eq!(record.readings(), Readings::new(55.5, -8.0, 0.0));
}

#[test]
fn test_unsynchronized_record_behaves_the_same() {
    let record: TelemetryRecord<Unsynchronized> =
        TelemetryRecord::new(1, Readings::new(10.0, 20.0, 30.0));
    record.set_fuel(12.5);
    assert_eq!(record.readings(), Readings::new(10.0, 20.0, 12.5));
}

#[test]
fn test_no_value_validation_at_record_layer() {
    let record: TelemetryRecord = TelemetryRecord::new(1, Readings::default());
    record.set_speed(-1.0);
    record.set_fuel(250.0);
    assert_eq!(record.speed(), -1.0);
    assert_eq!(record.fuel(), 250.0);
}

#[test]
fn test_concurrent_field_writes_are_atomic() {
    let record: Arc<TelemetryRecord> = Arc::new(TelemetryRecord::new(1, Readings::default()));
    let a = f64::from_bits(0x4059_0000_0000_0000); // 100.0
    let b = f64::from_bits(0x3FF5_5555_5555_5555); // ~1.333

    let writers: Vec<_> = [a, b]
        .into_iter()
        .map(|value| {
            let record = Arc::clone(&record);
            thread::spawn(move || {
                for _ in 0..10_000 {
                    record.set_speed(value);
                }
            })
        })
        .collect();

    for _ in 0..10_000 {
        let seen = record.speed();
        assert!(seen == 0.0 || seen == a || seen == b, "torn read: {}", seen);
    }
    for w in writers {
        w.join().unwrap();
    }
}

#[test]
fn test_handles_do_not_keep_records_alive() {
    let fleet: Fleet = Fleet::new();
    fleet.add(TelemetryRecord::new(3, Readings::default()));
    let handles = fleet.handles();
    assert_eq!(handles[0].id(), 3);
    assert!(handles[0].upgrade().is_some());

    drop(fleet);
    assert!(handles[0].upgrade().is_none());
}
