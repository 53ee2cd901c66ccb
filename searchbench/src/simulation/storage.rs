//! Simulated in-memory node storage for deterministic testing.
//!
//! This module provides an in-memory implementation of the `NodeStorage`
//! trait with support for fault injection:
//! - Node-level read errors
//! - Node-level write errors (rewrites and appends)
//! - Corruption of child offsets on read

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pbst::{NodePosition, NodeStorage, PbstNode};
use crate::storage::StorageError;

/// Configuration for fault injection.
#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    /// Probability of a read error (0.0 - 1.0).
    pub read_error_rate: f64,
    /// Probability of a write error (0.0 - 1.0).
    pub write_error_rate: f64,
    /// Probability of a corrupted child offset on read (0.0 - 1.0).
    pub corruption_rate: f64,
}

impl FaultConfig {
    /// Create a fault config with no faults.
    #[must_use]
    pub fn no_faults() -> Self {
        Self::default()
    }

    /// Create a fault config with high fault rates.
    #[must_use]
    pub const fn high_faults() -> Self {
        Self {
            read_error_rate: 0.05,
            write_error_rate: 0.05,
            corruption_rate: 0.05,
        }
    }
}

/// Statistics about simulated storage operations.
#[derive(Debug, Default, Clone)]
pub struct SimulatedStorageStats {
    /// Number of node reads.
    pub reads: u64,
    /// Number of node writes (rewrites and appends).
    pub writes: u64,
    /// Number of injected read errors.
    pub injected_read_errors: u64,
    /// Number of injected write errors.
    pub injected_write_errors: u64,
    /// Number of corrupted nodes returned.
    pub corrupted_reads: u64,
}

/// In-memory node storage.
///
/// The same seed produces the same sequence of faults.
pub struct SimulatedNodeStorage {
    nodes: Vec<PbstNode>,
    fault_config: FaultConfig,
    rng: StdRng,
    stats: SimulatedStorageStats,
}

impl SimulatedNodeStorage {
    /// Create a new simulated storage with no faults.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, FaultConfig::no_faults())
    }

    /// Create a new simulated storage with custom fault configuration.
    #[must_use]
    pub fn with_config(seed: u64, fault_config: FaultConfig) -> Self {
        Self {
            nodes: Vec::new(),
            fault_config,
            rng: StdRng::seed_from_u64(seed),
            stats: SimulatedStorageStats::default(),
        }
    }

    /// Get the current statistics.
    #[must_use]
    pub const fn stats(&self) -> &SimulatedStorageStats {
        &self.stats
    }

    /// Update the fault configuration.
    pub const fn set_fault_config(&mut self, config: FaultConfig) {
        self.fault_config = config;
    }

    fn should_inject_fault(&mut self, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        self.rng.random::<f64>() < rate
    }

    fn check_bounds(&self, position: NodePosition) -> Result<usize, StorageError> {
        usize::try_from(position.slot())
            .ok()
            .filter(|&index| index < self.nodes.len())
            .ok_or_else(|| StorageError::SlotOutOfBounds {
                slot: position.slot(),
                total_slots: self.node_count(),
            })
    }

    fn inject_write_fault(&mut self) -> Result<(), StorageError> {
        self.stats.writes += 1;
        if self.should_inject_fault(self.fault_config.write_error_rate) {
            self.stats.injected_write_errors += 1;
            return Err(StorageError::InjectedFault(
                "simulated write error".to_string(),
            ));
        }
        Ok(())
    }
}

impl NodeStorage for SimulatedNodeStorage {
    fn read_node(&mut self, position: NodePosition) -> Result<PbstNode, StorageError> {
        self.stats.reads += 1;
        let index = self.check_bounds(position)?;

        if self.should_inject_fault(self.fault_config.read_error_rate) {
            self.stats.injected_read_errors += 1;
            return Err(StorageError::InjectedFault(
                "simulated read error".to_string(),
            ));
        }

        let mut slot = self.nodes[index].to_slot();
        if self.should_inject_fault(self.fault_config.corruption_rate) {
            self.stats.corrupted_reads += 1;
            // Overwrite the left child offset with an impossible value.
            slot.write_i64(12, self.rng.random_range(i64::MIN..-1));
        }

        PbstNode::from_slot(&slot)
    }

    fn write_node(&mut self, position: NodePosition, node: &PbstNode) -> Result<(), StorageError> {
        let index = self.check_bounds(position)?;
        self.inject_write_fault()?;
        self.nodes[index] = *node;
        Ok(())
    }

    fn append_node(&mut self, node: &PbstNode) -> Result<NodePosition, StorageError> {
        self.inject_write_fault()?;
        let position = NodePosition(self.node_count());
        self.nodes.push(*node);
        Ok(position)
    }

    fn node_count(&self) -> u64 {
        self.nodes.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_faults() {
        let mut storage = SimulatedNodeStorage::new(42);

        let position = storage.append_node(&PbstNode::leaf(1, 10)).expect("append");
        let read = storage.read_node(position).expect("read");
        assert_eq!(read, PbstNode::leaf(1, 10));

        assert_eq!(storage.stats().reads, 1);
        assert_eq!(storage.stats().writes, 1);
    }

    #[test]
    fn test_deterministic_faults() {
        let run = |seed| {
            let mut storage = SimulatedNodeStorage::with_config(seed, FaultConfig::high_faults());
            let mut failures = Vec::new();
            for key in 0..200 {
                failures.push(storage.append_node(&PbstNode::leaf(key, 0)).is_err());
            }
            failures
        };

        assert_eq!(run(12345), run(12345));
    }

    #[test]
    fn test_corruption_is_detected_on_decode() {
        let mut storage = SimulatedNodeStorage::with_config(
            1,
            FaultConfig {
                corruption_rate: 1.0,
                ..FaultConfig::default()
            },
        );
        let position = storage.append_node(&PbstNode::leaf(1, 0)).expect("append");

        assert!(matches!(
            storage.read_node(position),
            Err(StorageError::Corruption(_))
        ));
        assert_eq!(storage.stats().corrupted_reads, 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut storage = SimulatedNodeStorage::new(0);
        assert!(matches!(
            storage.read_node(NodePosition(0)),
            Err(StorageError::SlotOutOfBounds { .. })
        ));
        assert!(matches!(
            storage.write_node(NodePosition(3), &PbstNode::leaf(1, 0)),
            Err(StorageError::SlotOutOfBounds { .. })
        ));
    }
}
