use crate::models::{Occurrence, TimeRange};
use std::collections::HashMap;

/// Cache of previously fetched calendar windows. Keys are exact `[start, end]`
/// tuples: an overlapping-but-different range is always a miss, there is no
/// merging or splitting.
#[derive(Debug, Default)]
pub struct RangeCache {
    entries: HashMap<TimeRange, Vec<Occurrence>>,
}

impl RangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, range: TimeRange) -> Option<&[Occurrence]> {
        self.entries.get(&range).map(Vec::as_slice)
    }

    pub fn put(&mut self, range: TimeRange, records: Vec<Occurrence>) {
        self.entries.insert(range, records);
    }

    /// Appends `record` to the entry for `range` if one exists. Any other
    /// cached entry whose window spans the record's timestamp no longer
    /// reflects the backend, so it is evicted.
    pub fn insert(&mut self, range: TimeRange, record: Occurrence) {
        self.entries
            .retain(|key, _| *key == range || !key.contains(record.timestamp));
        if let Some(records) = self.entries.get_mut(&range) {
            records.push(record);
        }
    }

    /// Drops the record with `id` from the entry for `range` if one exists,
    /// and evicts any other entry still holding that record.
    pub fn remove(&mut self, range: TimeRange, id: i64) {
        self.entries.retain(|key, records| {
            *key == range || !records.iter().any(|record| record.id == id)
        });
        if let Some(records) = self.entries.get_mut(&range) {
            records.retain(|record| record.id != id);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
