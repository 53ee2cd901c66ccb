//! Flat-file slot storage.
//!
//! Both persistent structures in the benchmark are flat files of fixed-size
//! slots with no header:
//!
//! - the record file (one `Record` per slot)
//! - the binary search tree node file (one node per slot)
//!
//! # Usage
//!
//! ```ignore
//! use storage::{Slot, SlotFile};
//!
//! let mut file = SlotFile::<16>::create(path)?;
//!
//! let mut slot = Slot::new();
//! slot.write_i64(0, 42);
//! let index = file.append_slot(&slot)?;
//!
//! assert_eq!(file.read_slot(index)?.read_i64(0), 42);
//! ```

mod error;
mod file;
mod slot;

pub use error::StorageError;
pub use file::SlotFile;
pub use slot::{Slot, SlotIndex};
