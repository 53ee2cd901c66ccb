//! Sparse sequential index over a record file.
//!
//! The index keeps the key of every `interval`-th record. A lookup walks the
//! index to the last sampled key not above the target and scans the record
//! file from there. This only finds every key when the file is sorted in
//! ascending order; on other files a present key may be reported missing.

use crate::record::{Record, RecordFile};
use crate::storage::{SlotIndex, StorageError};
use crate::types::{Cost, Key};

/// One sampled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: Key,
    pub slot: SlotIndex,
}

/// An in-memory sparse index.
#[derive(Debug)]
pub struct SequentialIndex {
    entries: Vec<IndexEntry>,
    interval: u64,
}

impl SequentialIndex {
    /// Build the index by reading every record once.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn build(
        records: &mut RecordFile,
        interval: u64,
        cost: &mut Cost,
    ) -> Result<Self, StorageError> {
        assert!(interval > 0, "index interval must be at least 1");

        let mut entries = Vec::new();
        let mut slot = 0;
        while let Some(record) = records.read_record(slot, cost)? {
            if slot % interval == 0 {
                entries.push(IndexEntry {
                    key: record.key,
                    slot,
                });
            }
            slot += 1;
        }

        tracing::debug!(
            "Sequential index built: {} entries over {slot} records (interval {interval})",
            entries.len()
        );
        Ok(Self { entries, interval })
    }

    /// The sampled entries, in file order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Records per index entry.
    #[must_use]
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    /// Look up `key`, returning the first matching record at or after the
    /// starting slot chosen from the index.
    pub fn search(
        &self,
        records: &mut RecordFile,
        key: Key,
        cost: &mut Cost,
    ) -> Result<Option<(SlotIndex, Record)>, StorageError> {
        let mut start = 0;
        for entry in &self.entries {
            cost.comparison();
            if entry.key > key {
                break;
            }
            start = entry.slot;
        }

        let mut slot = start;
        while let Some(record) = records.read_record(slot, cost)? {
            cost.comparison();
            if record.key == key {
                return Ok(Some((slot, record)));
            }
            slot += 1;
        }

        Ok(None)
    }
}
