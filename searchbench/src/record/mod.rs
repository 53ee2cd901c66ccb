//! Fixed-format records and the flat record file.
//!
//! # Record Format
//!
//! Each record occupies one 62-byte slot (little-endian, no padding):
//!
//! - `key`: 4 bytes (i32)
//! - `payload1`: 8 bytes (i64)
//! - `payload2`: 50 bytes (NUL-terminated text)
//!
//! Records are identified by their slot index and never change once written.

mod file;
mod generator;

pub use file::RecordFile;
pub use generator::{GenerateOutcome, KeyOrder, SAMPLE_LIMIT, generate, record_file_name, sample};

use crate::storage::Slot;
use crate::types::Key;

/// Size of `payload2` in bytes.
pub const PAYLOAD_SIZE: usize = 50;

/// Size of an encoded record in bytes.
pub const RECORD_SIZE: usize = 4 + 8 + PAYLOAD_SIZE;

/// One encoded record.
pub type RecordSlot = Slot<RECORD_SIZE>;

const KEY_OFFSET: usize = 0;
const PAYLOAD1_OFFSET: usize = 4;
const PAYLOAD2_OFFSET: usize = 12;

/// A fixed-format record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub key: Key,
    pub payload1: i64,
    pub payload2: [u8; PAYLOAD_SIZE],
}

impl Record {
    /// Create a record.
    #[must_use]
    pub const fn new(key: Key, payload1: i64, payload2: [u8; PAYLOAD_SIZE]) -> Self {
        Self {
            key,
            payload1,
            payload2,
        }
    }

    /// Encode this record into a slot.
    #[must_use]
    pub fn to_slot(&self) -> RecordSlot {
        let mut slot = RecordSlot::new();
        slot.write_i32(KEY_OFFSET, self.key);
        slot.write_i64(PAYLOAD1_OFFSET, self.payload1);
        slot.write_bytes(PAYLOAD2_OFFSET, &self.payload2);
        slot
    }

    /// Decode a record from a slot.
    #[must_use]
    pub fn from_slot(slot: &RecordSlot) -> Self {
        let mut payload2 = [0u8; PAYLOAD_SIZE];
        payload2.copy_from_slice(slot.read_bytes(PAYLOAD2_OFFSET, PAYLOAD_SIZE));

        Self {
            key: slot.read_i32(KEY_OFFSET),
            payload1: slot.read_i64(PAYLOAD1_OFFSET),
            payload2,
        }
    }

    /// `payload2` up to its first NUL byte, lossily decoded as UTF-8.
    #[must_use]
    pub fn payload_text(&self) -> std::borrow::Cow<'_, str> {
        let end = self
            .payload2
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PAYLOAD_SIZE);
        String::from_utf8_lossy(&self.payload2[..end])
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Key: {}", self.key)?;
        writeln!(f, "Payload1: {}", self.payload1)?;
        write!(f, "Payload2: {}", self.payload_text())
    }
}
