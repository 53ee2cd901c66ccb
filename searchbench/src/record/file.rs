//! The record store: read-at and write-at over a flat file of records.

use std::path::Path;

use crate::record::{RECORD_SIZE, Record};
use crate::storage::{SlotFile, SlotIndex, StorageError};
use crate::types::Cost;

/// A flat file of fixed-size records addressed by slot index.
#[derive(Debug)]
pub struct RecordFile {
    file: SlotFile<RECORD_SIZE>,
}

impl RecordFile {
    /// Create a new, empty record file (truncating any existing file).
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            file: SlotFile::create(path)?,
        })
    }

    /// Open an existing record file.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            file: SlotFile::open(path)?,
        })
    }

    /// Number of records in the file.
    #[must_use]
    pub const fn record_count(&self) -> u64 {
        self.file.slot_count()
    }

    /// Read the record at `slot`.
    ///
    /// Returns `Ok(None)` at or past the end of the file. Each record read
    /// counts one transfer.
    pub fn read_record(
        &mut self,
        slot: SlotIndex,
        cost: &mut Cost,
    ) -> Result<Option<Record>, StorageError> {
        if slot >= self.file.slot_count() {
            return Ok(None);
        }

        let data = self.file.read_slot(slot)?;
        cost.transfer();
        Ok(Some(Record::from_slot(&data)))
    }

    /// Write `record` at `slot`.
    ///
    /// `slot` may be an existing record or exactly `record_count()`.
    pub fn write_record(&mut self, slot: SlotIndex, record: &Record) -> Result<(), StorageError> {
        self.file.write_slot(slot, &record.to_slot())
    }

    /// Sync all pending writes to disk.
    pub fn sync(&self) -> Result<(), StorageError> {
        self.file.sync()
    }
}
