//! In-memory B-tree search structure.
//!
//! # Structure
//!
//! A tree of order `m` stores up to `m - 1` entries per node. Internal nodes
//! own their children directly. Entries are `(key, record position)` pairs,
//! so a lookup returns the slot of the record in the record file.
//!
//! # Usage
//!
//! ```ignore
//! use btree::BTree;
//!
//! let mut tree = BTree::new(4)?;
//! tree.insert(10, 0, &mut cost);
//! tree.insert(20, 1, &mut cost);
//!
//! assert_eq!(tree.search(20, &mut cost), Some(1));
//! ```

mod node;
mod tree;

pub use node::{Entry, Node};
pub use tree::{BTree, BTreeError, DEFAULT_ORDER, MIN_ORDER};
