//! Position-addressed binary search tree.
//!
//! The tree lives in its own flat file of 28-byte nodes. Nodes refer to
//! each other by slot index instead of memory address, so the whole tree can
//! be larger than memory and every step of a lookup is a storage access.
//!
//! # Usage
//!
//! ```ignore
//! use pbst::{NodeFile, Pbst};
//!
//! let mut tree = Pbst::new(NodeFile::create(path)?);
//! tree.insert(50, 0, &mut cost)?;
//! tree.insert(30, 1, &mut cost)?;
//!
//! assert_eq!(tree.search(30, &mut cost)?, Some(1));
//! ```

mod node;
mod storage;
mod tree;

pub use node::{NODE_SIZE, NodePosition, PbstNode};
pub use storage::{NodeFile, NodeStorage};
pub use tree::Pbst;
