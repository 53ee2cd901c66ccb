//! Slot file I/O operations.
//!
//! This module handles reading and writing fixed-size slots to a flat file.
//! The file has no header and no free list: slot `i` lives at byte offset
//! `i * N`, new slots are appended at the end, and existing slots are
//! rewritten in place.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::storage::error::StorageError;
use crate::storage::slot::{Slot, SlotIndex};

/// A flat file of `N`-byte slots.
pub struct SlotFile<const N: usize> {
    file: File,
    path: PathBuf,
    slot_count: u64,
}

impl<const N: usize> SlotFile<N> {
    /// Create a new, empty slot file at the given path.
    ///
    /// An existing file at the path is truncated.
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            slot_count: 0,
        })
    }

    /// Open an existing slot file.
    ///
    /// The slot count is derived from the file length. Trailing bytes that do
    /// not form a whole slot are ignored.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            slot_count: size / Slot::<N>::SIZE_U64,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of whole slots in the file.
    #[must_use]
    pub const fn slot_count(&self) -> u64 {
        self.slot_count
    }

    /// Read the slot at `slot`.
    ///
    /// Returns an error if the slot is past the end of the file.
    pub fn read_slot(&mut self, slot: SlotIndex) -> Result<Slot<N>, StorageError> {
        if slot >= self.slot_count {
            return Err(StorageError::SlotOutOfBounds {
                slot,
                total_slots: self.slot_count,
            });
        }

        let mut buf = Slot::<N>::new();
        self.file
            .seek(SeekFrom::Start(slot * Slot::<N>::SIZE_U64))?;
        self.file.read_exact(buf.as_bytes_mut())?;

        Ok(buf)
    }

    /// Write `data` to `slot`.
    ///
    /// `slot` may be an existing slot (rewrite in place) or exactly
    /// `slot_count()` (append).
    pub fn write_slot(&mut self, slot: SlotIndex, data: &Slot<N>) -> Result<(), StorageError> {
        if slot > self.slot_count {
            return Err(StorageError::SlotOutOfBounds {
                slot,
                total_slots: self.slot_count,
            });
        }

        self.file
            .seek(SeekFrom::Start(slot * Slot::<N>::SIZE_U64))?;
        self.file.write_all(data.as_bytes())?;

        if slot == self.slot_count {
            self.slot_count += 1;
        }

        Ok(())
    }

    /// Append `data` as a new slot at the end of the file.
    ///
    /// Returns the index of the new slot.
    pub fn append_slot(&mut self, data: &Slot<N>) -> Result<SlotIndex, StorageError> {
        let slot = self.slot_count;
        self.write_slot(slot, data)?;
        Ok(slot)
    }

    /// Sync all pending writes to disk.
    pub fn sync(&self) -> Result<(), StorageError> {
        self.file.sync_all().map_err(StorageError::Io)
    }
}

impl<const N: usize> std::fmt::Debug for SlotFile<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotFile")
            .field("path", &self.path)
            .field("slot_size", &N)
            .field("slot_count", &self.slot_count)
            .finish_non_exhaustive()
    }
}
