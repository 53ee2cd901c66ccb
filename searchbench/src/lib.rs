// Benchmark of external search methods over a flat record file.
//
// Life of a run:
// 1. Generate (or reuse) a record file with ascending, descending or random keys
// 2. Build one search structure from the file, counting transfers and comparisons:
//     - sparse sequential index
//     - binary search tree stored in its own node file
//     - in-memory B-tree
// 3. Look up one key, counting the same costs
// 4. Report both phases
//
// System components:
//  - Slot storage (flat files of fixed-size slots)
//  - Record store and generator
//  - Search structures
//  - Driver

pub mod btree;
pub mod config;
pub mod driver;
pub mod index;
pub mod pbst;
pub mod record;
#[cfg(test)]
mod simulation;
pub mod storage;
pub mod types;
