//! Node storage for the binary search tree.
//!
//! The tree only talks to its nodes through `NodeStorage`, so the same
//! algorithms run against the real node file and against simulated storage
//! with injected faults in tests.

use std::path::Path;

use crate::pbst::node::{NODE_SIZE, NodePosition, PbstNode};
use crate::storage::{SlotFile, StorageError};

/// Abstraction over node-addressed storage.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - `read_node` returns the last written content for a position
/// - `append_node` returns positions `0, 1, 2, ...` in order
/// - nothing is cached: every call is one storage access
pub trait NodeStorage {
    /// Read the node at `position`.
    fn read_node(&mut self, position: NodePosition) -> Result<PbstNode, StorageError>;

    /// Rewrite the node at an existing `position` in place.
    fn write_node(&mut self, position: NodePosition, node: &PbstNode) -> Result<(), StorageError>;

    /// Append `node` at the end of storage and return its position.
    fn append_node(&mut self, node: &PbstNode) -> Result<NodePosition, StorageError>;

    /// Number of nodes in storage.
    fn node_count(&self) -> u64;
}

/// The tree's private flat file of fixed-size nodes.
#[derive(Debug)]
pub struct NodeFile {
    file: SlotFile<NODE_SIZE>,
}

impl NodeFile {
    /// Create a new, empty node file (truncating any existing file).
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            file: SlotFile::create(path)?,
        })
    }

    /// Open an existing node file.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            file: SlotFile::open(path)?,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Sync all pending writes to disk.
    pub fn sync(&self) -> Result<(), StorageError> {
        self.file.sync()
    }
}

impl NodeStorage for NodeFile {
    fn read_node(&mut self, position: NodePosition) -> Result<PbstNode, StorageError> {
        let slot = self.file.read_slot(position.slot())?;
        PbstNode::from_slot(&slot)
    }

    fn write_node(&mut self, position: NodePosition, node: &PbstNode) -> Result<(), StorageError> {
        if position.slot() >= self.file.slot_count() {
            return Err(StorageError::SlotOutOfBounds {
                slot: position.slot(),
                total_slots: self.file.slot_count(),
            });
        }
        self.file.write_slot(position.slot(), &node.to_slot())
    }

    fn append_node(&mut self, node: &PbstNode) -> Result<NodePosition, StorageError> {
        self.file.append_slot(&node.to_slot()).map(NodePosition)
    }

    fn node_count(&self) -> u64 {
        self.file.slot_count()
    }
}
