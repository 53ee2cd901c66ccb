//! In-memory B-tree nodes.
//!
//! A node of a tree of order `m` holds at most `m - 1` entries in ascending
//! key order. An internal node with `k` entries owns exactly `k + 1`
//! children; a leaf owns none.

use std::cmp::Ordering;

use crate::types::{Cost, InsertOutcome, Key, RecordPosition};

/// A key and the position of its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: Key,
    pub record: RecordPosition,
}

/// A B-tree node.
///
/// Children are exclusively owned, so dropping a node drops its subtree.
#[derive(Debug, Default)]
pub struct Node {
    /// Entries in ascending key order.
    pub entries: Vec<Entry>,
    /// Child subtrees. Empty for a leaf.
    pub children: Vec<Box<Self>>,
}

impl Node {
    /// Create an empty leaf.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Whether this node has no children.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node holds the maximum `order - 1` entries.
    #[must_use]
    pub fn is_full(&self, order: usize) -> bool {
        self.entries.len() >= order - 1
    }

    /// Keys of this node, in order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|entry| entry.key).collect()
    }

    /// Split the full child at `index` around its median.
    ///
    /// The median entry moves up into this node at `index` and the upper
    /// half becomes a new sibling at `index + 1`. Counts one transfer for
    /// the new sibling.
    ///
    /// # Panics
    ///
    /// Panics if this node is full or the child is not.
    pub fn split_child(&mut self, index: usize, order: usize, cost: &mut Cost) {
        assert!(!self.is_full(order), "split into a full parent");
        let child = &mut self.children[index];
        assert!(child.is_full(order), "split of a non-full child");

        let mid = (order - 1) / 2;
        let upper = child.entries.split_off(mid + 1);
        let median = child.entries.remove(mid);
        let upper_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(mid + 1)
        };

        self.entries.insert(index, median);
        self.children.insert(
            index + 1,
            Box::new(Self {
                entries: upper,
                children: upper_children,
            }),
        );
        cost.transfer();
    }

    /// Insert `entry` into the subtree rooted at this node.
    ///
    /// Full children are split on the way down, so the leaf that receives
    /// the entry always has room. A key already present anywhere on the
    /// path leaves its entry unchanged.
    ///
    /// # Panics
    ///
    /// Panics if this node is full. Callers split before descending.
    pub fn insert_non_full(
        &mut self,
        entry: Entry,
        order: usize,
        cost: &mut Cost,
    ) -> InsertOutcome {
        assert!(
            !self.is_full(order),
            "insert into a full node ({} entries, order {order})",
            self.entries.len()
        );
        cost.transfer();

        let mut index = self.entries.len();
        while index > 0 {
            cost.comparison();
            match entry.key.cmp(&self.entries[index - 1].key) {
                Ordering::Less => index -= 1,
                Ordering::Equal => return InsertOutcome::Duplicate,
                Ordering::Greater => break,
            }
        }

        if self.is_leaf() {
            self.entries.insert(index, entry);
            return InsertOutcome::Inserted;
        }

        if self.children[index].is_full(order) {
            self.split_child(index, order, cost);
            cost.comparison();
            match entry.key.cmp(&self.entries[index].key) {
                Ordering::Less => {}
                Ordering::Equal => return InsertOutcome::Duplicate,
                Ordering::Greater => index += 1,
            }
        }

        self.children[index].insert_non_full(entry, order, cost)
    }

    /// Look up `key` in the subtree rooted at this node.
    pub fn search(&self, key: Key, cost: &mut Cost) -> Option<RecordPosition> {
        let mut node = self;

        loop {
            cost.transfer();

            let mut index = node.entries.len();
            for (i, entry) in node.entries.iter().enumerate() {
                cost.comparison();
                match key.cmp(&entry.key) {
                    Ordering::Greater => {}
                    Ordering::Equal => return Some(entry.record),
                    Ordering::Less => {
                        index = i;
                        break;
                    }
                }
            }

            node = node.children.get(index).map(Box::as_ref)?;
        }
    }
}
