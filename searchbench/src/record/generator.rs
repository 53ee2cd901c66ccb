//! Record file generation.
//!
//! Files are generated with ascending, descending or random keys and random
//! payloads. A file that already exists is reused as-is so repeated runs
//! benchmark the same data.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::record::{PAYLOAD_SIZE, Record, RecordFile};
use crate::storage::{SlotIndex, StorageError};
use crate::types::{Cost, Key};

/// Maximum number of records listed by `sample`.
pub const SAMPLE_LIMIT: u64 = 20;

/// Random keys are drawn from `1..=quantity * RANDOM_KEY_SPREAD`, capped at `Key::MAX`.
const RANDOM_KEY_SPREAD: u64 = 1000;

/// Order of the keys in a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyOrder {
    Ascending = 1,
    Descending = 2,
    Random = 3,
}

impl KeyOrder {
    /// Short label used in file names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
            Self::Random => "rand",
        }
    }
}

impl TryFrom<u8> for KeyOrder {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascending),
            2 => Ok(Self::Descending),
            3 => Ok(Self::Random),
            _ => Err(value),
        }
    }
}

/// What `generate` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    Created,
    AlreadyExists,
}

/// File name for a generated record file.
#[must_use]
pub fn record_file_name(order: KeyOrder, quantity: u64) -> String {
    format!("records_{}_{quantity}.bin", order.label())
}

/// Generate a record file of `quantity` records at `path`.
///
/// Does nothing if the file already exists. Records are written to a
/// `.partial` sibling that is renamed into place only once every record is
/// on disk, so an interrupted run never leaves a short file at `path`.
pub fn generate<R: Rng + ?Sized>(
    path: &Path,
    quantity: u64,
    order: KeyOrder,
    rng: &mut R,
) -> Result<GenerateOutcome, StorageError> {
    if path.exists() {
        tracing::info!("Record file already exists: {}", path.display());
        return Ok(GenerateOutcome::AlreadyExists);
    }

    let partial = partial_path(path);
    if let Err(e) = write_records(&partial, quantity, order, rng) {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }
    std::fs::rename(&partial, path)?;

    tracing::info!(
        "Created record file: {} ({quantity} records, {} keys)",
        path.display(),
        order.label()
    );
    Ok(GenerateOutcome::Created)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

fn write_records<R: Rng + ?Sized>(
    path: &Path,
    quantity: u64,
    order: KeyOrder,
    rng: &mut R,
) -> Result<(), StorageError> {
    let mut file = RecordFile::create(path)?;

    for slot in 0..quantity {
        let key = match order {
            KeyOrder::Ascending => clamp_key(slot + 1),
            KeyOrder::Descending => clamp_key(quantity - slot),
            KeyOrder::Random => random_key(quantity, rng),
        };
        file.write_record(slot, &random_record(key, rng))?;
    }
    file.sync()
}

/// Up to `SAMPLE_LIMIT` evenly spaced records, for listing.
pub fn sample(
    file: &mut RecordFile,
    quantity: u64,
) -> Result<Vec<(SlotIndex, Record)>, StorageError> {
    let step = if quantity > SAMPLE_LIMIT {
        quantity / SAMPLE_LIMIT
    } else {
        1
    };

    // Listing is not part of any measured phase.
    let mut cost = Cost::new();
    let mut records = Vec::new();
    let mut slot = 0;
    let mut listed = 0;
    while listed < SAMPLE_LIMIT && slot < quantity {
        let Some(record) = file.read_record(slot, &mut cost)? else {
            break;
        };
        records.push((slot, record));
        listed += 1;
        slot += step;
    }

    Ok(records)
}

fn clamp_key(value: u64) -> Key {
    Key::try_from(value).unwrap_or(Key::MAX)
}

/// A key drawn uniformly from `1..=quantity * RANDOM_KEY_SPREAD`, with the
/// upper bound capped at `Key::MAX`.
fn random_key<R: Rng + ?Sized>(quantity: u64, rng: &mut R) -> Key {
    let max = Key::try_from(quantity.saturating_mul(RANDOM_KEY_SPREAD)).unwrap_or(Key::MAX);
    rng.random_range(1..=max.max(1))
}

fn random_record<R: Rng + ?Sized>(key: Key, rng: &mut R) -> Record {
    let mut payload2 = [0u8; PAYLOAD_SIZE];
    for byte in &mut payload2[..PAYLOAD_SIZE - 1] {
        *byte = b'A' + rng.random_range(0..26u8);
    }
    Record::new(key, rng.random_range(0..=i64::from(i32::MAX)), payload2)
}
