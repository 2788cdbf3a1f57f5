use std::slice;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::record::{Access, Locked, TelemetryRecord, VehicleId};

/// Insertion-ordered, append-only set of records.
///
/// The membership lock is separate from every record's own lock and is
/// never held while a record lock is taken: `snapshot()` only clones the
/// `Arc` handles under it, and callers read the records afterwards.
#[derive(Debug)]
pub struct Fleet<A: Access = Locked> {
    members: Mutex<Vec<Arc<TelemetryRecord<A>>>>,
}

impl<A: Access> Default for Fleet<A> {
    fn default() -> Self {
        Self {
            members: Mutex::new(Vec::new()),
        }
    }
}

impl<A: Access> Fleet<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends under the collection lock. Never rejects.
    pub fn add(&self, record: TelemetryRecord<A>) {
        self.members.lock().push(Arc::new(record));
    }

    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.lock().is_empty()
    }

    /// Stable view of the current membership. Record contents are not
    /// copied; reads through the snapshot see live values.
    pub fn snapshot(&self) -> FleetSnapshot<A> {
        let records = self.members.lock().clone();
        FleetSnapshot { records }
    }

    /// Non-owning handles for writer tasks. The fleet stays the sole owner.
    pub fn handles(&self) -> Vec<RecordHandle<A>> {
        self.members
            .lock()
            .iter()
            .map(|record| RecordHandle {
                id: record.id(),
                record: Arc::downgrade(record),
            })
            .collect()
    }
}

/// Membership as of one acquisition of the collection lock.
#[derive(Debug)]
pub struct FleetSnapshot<A: Access = Locked> {
    records: Vec<Arc<TelemetryRecord<A>>>,
}

impl<A: Access> FleetSnapshot<A> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Arc<TelemetryRecord<A>>> {
        self.records.iter()
    }
}

impl<'a, A: Access> IntoIterator for &'a FleetSnapshot<A> {
    type Item = &'a Arc<TelemetryRecord<A>>;
    type IntoIter = slice::Iter<'a, Arc<TelemetryRecord<A>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Weak reference handed to a writer task at creation time.
#[derive(Debug)]
pub struct RecordHandle<A: Access = Locked> {
    id: VehicleId,
    record: Weak<TelemetryRecord<A>>,
}

// Manual impl: the strategy itself is not `Clone`, only the weak pointer is.
impl<A: Access> Clone for RecordHandle<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            record: Weak::clone(&self.record),
        }
    }
}

impl<A: Access> RecordHandle<A> {
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// `None` once the owning fleet has been dropped.
    pub fn upgrade(&self) -> Option<Arc<TelemetryRecord<A>>> {
        self.record.upgrade()
    }
}
