//! In-memory B-tree with top-down splitting.
//!
//! Full nodes are split on the way down during insertion, so an insert never
//! has to walk back up the tree. All leaves stay at the same depth.

use crate::btree::node::{Entry, Node};
use crate::record::RecordFile;
use crate::storage::StorageError;
use crate::types::{Cost, InsertOutcome, Key, RecordPosition};

/// Smallest supported order.
pub const MIN_ORDER: usize = 4;

/// Order used when none is configured.
pub const DEFAULT_ORDER: usize = 4;

/// A B-tree of order `m` mapping keys to record positions.
#[derive(Debug)]
pub struct BTree {
    order: usize,
    root: Option<Box<Node>>,
    len: u64,
}

impl BTree {
    /// Create an empty tree of the given order.
    ///
    /// The order must be even and at least `MIN_ORDER`. Splitting a full
    /// node of an odd order would leave one half under the minimum fill.
    pub const fn new(order: usize) -> Result<Self, BTreeError> {
        if order < MIN_ORDER || order % 2 != 0 {
            return Err(BTreeError::InvalidOrder(order));
        }
        Ok(Self {
            order,
            root: None,
            len: 0,
        })
    }

    /// Build a tree from every record in `records`, in file order.
    pub fn build(
        order: usize,
        records: &mut RecordFile,
        cost: &mut Cost,
    ) -> Result<Self, BTreeError> {
        let mut tree = Self::new(order)?;
        let mut slot = 0;
        let mut duplicates = 0u64;

        while let Some(record) = records.read_record(slot, cost)? {
            if !tree.insert(record.key, slot, cost).is_inserted() {
                duplicates += 1;
            }
            slot += 1;
        }

        tracing::debug!(
            "B-tree built: order {order}, {} keys, height {}, {duplicates} duplicate keys dropped",
            tree.len,
            tree.height()
        );
        Ok(tree)
    }

    /// The order of this tree.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
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

    /// The root node, if any.
    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Insert `key` pointing at `record`.
    ///
    /// A duplicate key keeps the first record position.
    pub fn insert(&mut self, key: Key, record: RecordPosition, cost: &mut Cost) -> InsertOutcome {
        let entry = Entry { key, record };
        let order = self.order;

        let root = match self.root.take() {
            None => {
                let mut leaf = Node::new();
                leaf.entries.push(entry);
                self.root = Some(Box::new(leaf));
                self.len += 1;
                return InsertOutcome::Inserted;
            }
            Some(root) if root.is_full(order) => {
                let mut grown = Box::new(Node::new());
                grown.children.push(root);
                grown.split_child(0, order, cost);
                grown
            }
            Some(root) => root,
        };

        let outcome = self.root.insert(root).insert_non_full(entry, order, cost);
        if outcome.is_inserted() {
            self.len += 1;
        }
        outcome
    }

    /// Look up the record position stored for `key`.
    pub fn search(&self, key: Key, cost: &mut Cost) -> Option<RecordPosition> {
        self.root.as_ref()?.search(key, cost)
    }

    /// All `(key, record)` pairs in key order.
    #[must_use]
    pub fn in_order(&self) -> Vec<(Key, RecordPosition)> {
        fn walk(node: &Node, out: &mut Vec<(Key, RecordPosition)>) {
            for (i, entry) in node.entries.iter().enumerate() {
                if let Some(child) = node.children.get(i) {
                    walk(child, out);
                }
                out.push((entry.key, entry.record));
            }
            if let Some(last) = node.children.get(node.entries.len()) {
                walk(last, out);
            }
        }

        let mut out = Vec::new();
        if let Some(root) = &self.root {
            walk(root, &mut out);
        }
        out
    }

    /// Number of levels (0 when empty).
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            height += 1;
            node = current.children.first().map(Box::as_ref);
        }
        height
    }

    /// Check the structural invariants of the whole tree.
    ///
    /// - keys strictly ascending, within each node and across subtrees
    /// - every node holds at most `order - 1` entries
    /// - every non-root node holds at least `order / 2 - 1` entries
    /// - an internal node with `k` entries has `k + 1` children
    /// - all leaves are at the same depth
    pub fn verify(&self) -> Result<(), BTreeError> {
        let Some(root) = &self.root else {
            return Ok(());
        };

        let mut leaf_depth = None;
        self.verify_node(root, 0, None, None, &mut leaf_depth)?;

        let counted = self.in_order().len() as u64;
        if counted != self.len {
            return Err(BTreeError::InvariantViolation(format!(
                "length is {} but tree holds {counted} keys",
                self.len
            )));
        }
        Ok(())
    }

    fn verify_node(
        &self,
        node: &Node,
        depth: usize,
        lower: Option<Key>,
        upper: Option<Key>,
        leaf_depth: &mut Option<usize>,
    ) -> Result<(), BTreeError> {
        let violation = |message: String| Err(BTreeError::InvariantViolation(message));
        let count = node.entries.len();

        if count > self.order - 1 {
            return violation(format!("node at depth {depth} has {count} entries"));
        }
        if depth > 0 && count < self.order / 2 - 1 {
            return violation(format!("node at depth {depth} is underfull ({count} entries)"));
        }
        if depth == 0 && count == 0 {
            return violation("root is empty".to_string());
        }

        let keys = node.keys();
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return violation(format!("keys out of order at depth {depth}: {keys:?}"));
        }
        let (Some(&first), Some(&last)) = (keys.first(), keys.last()) else {
            return Ok(());
        };
        if lower.is_some_and(|bound| first <= bound) || upper.is_some_and(|bound| last >= bound) {
            return violation(format!("keys {keys:?} escape bounds {lower:?}..{upper:?}"));
        }

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return violation(format!("leaf at depth {depth}, expected {expected}"));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.children.len() != count + 1 {
            return violation(format!(
                "node at depth {depth} has {count} entries and {} children",
                node.children.len()
            ));
        }

        for (i, child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(keys[i - 1]) };
            let child_upper = keys.get(i).copied().or(upper);
            self.verify_node(child, depth + 1, child_lower, child_upper, leaf_depth)?;
        }
        Ok(())
    }

    /// Release every node, children before their parent.
    ///
    /// Returns the number of nodes released.
    pub fn release(self) -> usize {
        fn release_node(mut node: Box<Node>) -> usize {
            let children = std::mem::take(&mut node.children);
            let released: usize = children.into_iter().map(release_node).sum();
            drop(node);
            released + 1
        }

        let released = self.root.map_or(0, release_node);
        tracing::debug!("Released B-tree: {released} nodes");
        released
    }
}

/// Errors from B-tree construction.
#[derive(Debug)]
pub enum BTreeError {
    /// The order is odd or below `MIN_ORDER`.
    InvalidOrder(usize),
    /// A structural invariant does not hold.
    InvariantViolation(String),
    /// Reading the source records failed.
    Storage(StorageError),
}

impl std::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrder(order) => write!(
                f,
                "invalid B-tree order {order} (must be even and at least {MIN_ORDER})"
            ),
            Self::InvariantViolation(msg) => write!(f, "B-tree invariant violated: {msg}"),
            Self::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for BTreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::InvalidOrder(_) | Self::InvariantViolation(_) => None,
        }
    }
}

impl From<StorageError> for BTreeError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
