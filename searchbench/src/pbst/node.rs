//! Binary search tree node type and serialization.
//!
//! Node layout (28 bytes, little-endian):
//! - `key`: 4 bytes (i32)
//! - `record`: 8 bytes (record slot index, as i64)
//! - `left`: 8 bytes (node slot index, -1 if absent)
//! - `right`: 8 bytes (node slot index, -1 if absent)

use crate::storage::{Slot, SlotIndex, StorageError};
use crate::types::{Key, RecordPosition};

/// Size of an encoded node in bytes.
pub const NODE_SIZE: usize = 4 + 8 + 8 + 8;

/// One encoded node.
pub type NodeSlot = Slot<NODE_SIZE>;

/// On-disk child offset meaning "no child".
pub const NO_CHILD: i64 = -1;

const KEY_OFFSET: usize = 0;
const RECORD_OFFSET: usize = 4;
const LEFT_OFFSET: usize = 12;
const RIGHT_OFFSET: usize = 20;

/// Position of a node in its node file.
///
/// This is the node's identity. It is only ever dereferenced by reading the
/// node back from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePosition(pub SlotIndex);

impl NodePosition {
    /// The slot index of this node.
    #[must_use]
    pub const fn slot(self) -> SlotIndex {
        self.0
    }
}

impl std::fmt::Display for NodePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node@{}", self.0)
    }
}

/// A binary search tree node as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PbstNode {
    pub key: Key,
    pub record: RecordPosition,
    pub left: Option<NodePosition>,
    pub right: Option<NodePosition>,
}

impl PbstNode {
    /// A node with no children.
    #[must_use]
    pub const fn leaf(key: Key, record: RecordPosition) -> Self {
        Self {
            key,
            record,
            left: None,
            right: None,
        }
    }

    /// Encode this node into a slot.
    ///
    /// # Panics
    ///
    /// Panics if a position does not fit in an i64, which would need a file
    /// of more than 2^63 slots.
    #[must_use]
    pub fn to_slot(&self) -> NodeSlot {
        let mut slot = NodeSlot::new();
        slot.write_i32(KEY_OFFSET, self.key);
        slot.write_i64(RECORD_OFFSET, encode_index(self.record));
        slot.write_i64(LEFT_OFFSET, encode_child(self.left));
        slot.write_i64(RIGHT_OFFSET, encode_child(self.right));
        slot
    }

    /// Decode a node from a slot.
    pub fn from_slot(slot: &NodeSlot) -> Result<Self, StorageError> {
        let record = slot.read_i64(RECORD_OFFSET);
        let record = RecordPosition::try_from(record).map_err(|_| {
            StorageError::Corruption(format!("negative record position {record}"))
        })?;

        Ok(Self {
            key: slot.read_i32(KEY_OFFSET),
            record,
            left: decode_child(slot.read_i64(LEFT_OFFSET))?,
            right: decode_child(slot.read_i64(RIGHT_OFFSET))?,
        })
    }
}

fn encode_index(index: u64) -> i64 {
    i64::try_from(index).unwrap_or_else(|_| panic!("slot index {index} exceeds i64::MAX"))
}

fn encode_child(child: Option<NodePosition>) -> i64 {
    child.map_or(NO_CHILD, |position| encode_index(position.slot()))
}

fn decode_child(raw: i64) -> Result<Option<NodePosition>, StorageError> {
    if raw == NO_CHILD {
        return Ok(None);
    }
    SlotIndex::try_from(raw)
        .map(|slot| Some(NodePosition(slot)))
        .map_err(|_| StorageError::Corruption(format!("invalid child offset {raw}")))
}
