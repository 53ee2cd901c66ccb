//! Binary search tree operations over node storage.
//!
//! The tree is unbalanced: keys are placed in insertion order, so an
//! ascending input produces a chain. Every operation is an explicit loop
//! rather than a recursion, so chains of any length are fine.

use std::cmp::Ordering;

use crate::pbst::node::{NodePosition, PbstNode};
use crate::pbst::storage::NodeStorage;
use crate::record::RecordFile;
use crate::storage::StorageError;
use crate::types::{Cost, InsertOutcome, Key, RecordPosition};

/// A position-addressed binary search tree.
///
/// Only the root position is kept in memory. Every node access goes through
/// the storage and is counted as one transfer.
#[derive(Debug)]
pub struct Pbst<S: NodeStorage> {
    storage: S,
    root: Option<NodePosition>,
    len: u64,
}

impl<S: NodeStorage> Pbst<S> {
    /// Create an empty tree over `storage`.
    ///
    /// `storage` is expected to be empty. Existing nodes are not adopted.
    pub const fn new(storage: S) -> Self {
        Self {
            storage,
            root: None,
            len: 0,
        }
    }

    /// Build a tree from every record in `records`, in file order.
    ///
    /// Record reads, node accesses and comparisons all go into `cost`.
    pub fn build(
        storage: S,
        records: &mut RecordFile,
        cost: &mut Cost,
    ) -> Result<Self, StorageError> {
        let mut tree = Self::new(storage);
        let mut slot = 0;
        let mut duplicates = 0u64;

        while let Some(record) = records.read_record(slot, cost)? {
            if !tree.insert(record.key, slot, cost)?.is_inserted() {
                duplicates += 1;
            }
            slot += 1;
        }

        tracing::debug!(
            "Binary tree built: {} nodes, {duplicates} duplicate keys dropped",
            tree.len
        );
        Ok(tree)
    }

    /// Position of the root node, if the tree is not empty.
    #[must_use]
    pub const fn root(&self) -> Option<NodePosition> {
        self.root
    }

    /// Number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the tree is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert `key` pointing at `record`.
    ///
    /// A duplicate key leaves the tree untouched and keeps the first record
    /// position. The only node rewritten is the parent of the new node.
    pub fn insert(
        &mut self,
        key: Key,
        record: RecordPosition,
        cost: &mut Cost,
    ) -> Result<InsertOutcome, StorageError> {
        let Some(mut position) = self.root else {
            let root = self.storage.append_node(&PbstNode::leaf(key, record))?;
            cost.transfer();
            self.root = Some(root);
            self.len += 1;
            return Ok(InsertOutcome::Inserted);
        };

        loop {
            let mut node = self.storage.read_node(position)?;
            cost.transfer();
            cost.comparison();

            let child = match key.cmp(&node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return Ok(InsertOutcome::Duplicate),
            };

            if let Some(next) = *child {
                position = next;
                continue;
            }

            let created = self.storage.append_node(&PbstNode::leaf(key, record))?;
            cost.transfer();
            *child = Some(created);
            self.storage.write_node(position, &node)?;
            cost.transfer();
            self.len += 1;
            return Ok(InsertOutcome::Inserted);
        }
    }

    /// Look up the record position stored for `key`.
    pub fn search(
        &mut self,
        key: Key,
        cost: &mut Cost,
    ) -> Result<Option<RecordPosition>, StorageError> {
        let mut current = self.root;

        while let Some(position) = current {
            let node = self.storage.read_node(position)?;
            cost.transfer();
            cost.comparison();

            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Ok(Some(node.record)),
            };
        }

        Ok(None)
    }

    /// All `(key, record)` pairs in key order.
    ///
    /// Used for verification; reads are not counted.
    pub fn in_order(&mut self) -> Result<Vec<(Key, RecordPosition)>, StorageError> {
        let mut entries = Vec::new();
        let mut stack: Vec<PbstNode> = Vec::new();
        let mut current = self.root;

        loop {
            while let Some(position) = current {
                let node = self.storage.read_node(position)?;
                current = node.left;
                stack.push(node);
            }
            let Some(node) = stack.pop() else {
                break;
            };
            entries.push((node.key, node.record));
            current = node.right;
        }

        Ok(entries)
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    ///
    /// Used for verification; reads are not counted.
    pub fn height(&mut self) -> Result<u64, StorageError> {
        let mut height = 0;
        let mut stack: Vec<(NodePosition, u64)> =
            self.root.map(|root| (root, 1)).into_iter().collect();

        while let Some((position, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.storage.read_node(position)?;
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }

        Ok(height)
    }

    /// Release the tree and hand back its storage.
    ///
    /// The nodes stay in storage; removing the backing file is up to the
    /// caller.
    pub fn release(self) -> S {
        tracing::debug!("Releasing binary tree with {} nodes", self.len);
        self.storage
    }
}
