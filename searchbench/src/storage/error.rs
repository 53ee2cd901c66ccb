//! Storage error type shared by the record store and the node files.

use crate::storage::slot::SlotIndex;

/// Errors that can occur during storage operations.
///
/// Any of these aborts the enclosing build or query. Nothing is retried.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error (seek, read, write or sync).
    Io(std::io::Error),
    /// Slot out of bounds.
    SlotOutOfBounds { slot: SlotIndex, total_slots: u64 },
    /// A slot decoded to an impossible value.
    Corruption(String),
    /// Injected fault for simulation.
    InjectedFault(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::SlotOutOfBounds { slot, total_slots } => write!(
                f,
                "slot {slot} out of bounds (total slots: {total_slots})"
            ),
            Self::Corruption(msg) => write!(f, "corruption: {msg}"),
            Self::InjectedFault(msg) => write!(f, "injected fault: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::SlotOutOfBounds { .. } | Self::Corruption(_) | Self::InjectedFault(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
