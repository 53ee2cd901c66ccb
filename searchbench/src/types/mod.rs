//! Types shared by every search structure.

mod cost;

pub use cost::{Cost, Measurement};

/// A record key.
pub type Key = i32;

/// A record position (slot index in the record file).
pub type RecordPosition = u64;

/// Result of inserting a key into a search structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was new and has been stored.
    Inserted,
    /// The key was already present. The structure is unchanged and the
    /// first-inserted record position is kept.
    Duplicate,
}

impl InsertOutcome {
    /// Whether the insert stored a new key.
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}
