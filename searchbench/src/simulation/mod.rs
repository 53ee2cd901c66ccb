//! Deterministic simulation infrastructure for tests.
//!
//! All randomness is seeded, so a failing run can be replayed from its seed.
//!
//! # Usage
//!
//! ```ignore
//! use simulation::{FaultConfig, SimulatedNodeStorage};
//!
//! let storage = SimulatedNodeStorage::with_config(12345, FaultConfig::high_faults());
//! let mut tree = Pbst::new(storage);
//! ```

mod storage;

pub use storage::{FaultConfig, SimulatedNodeStorage};
