//! Benchmark driver.
//!
//! One run builds a single search structure over a record file, looks up a
//! single key, and reports the cost of both phases.

use std::path::Path;

use crate::btree::{BTree, BTreeError};
use crate::config::BenchConfig;
use crate::index::SequentialIndex;
use crate::pbst::{NodeFile, Pbst};
use crate::record::{Record, RecordFile};
use crate::storage::{SlotIndex, StorageError};
use crate::types::{Cost, Key, Measurement, RecordPosition};

/// The search structure to benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SearchMethod {
    SequentialIndexed = 1,
    BinaryTree = 2,
    BTree = 3,
    BStarTree = 4,
}

impl SearchMethod {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SequentialIndexed => "indexed sequential access",
            Self::BinaryTree => "binary search tree",
            Self::BTree => "B-tree",
            Self::BStarTree => "B*-tree",
        }
    }
}

impl TryFrom<u8> for SearchMethod {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::SequentialIndexed),
            2 => Ok(Self::BinaryTree),
            3 => Ok(Self::BTree),
            4 => Ok(Self::BStarTree),
            _ => Err(value),
        }
    }
}

impl std::fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub method: SearchMethod,
    /// Cost of building the structure (including reading the records).
    pub build: Measurement,
    /// Cost of the lookup (including reading the found record).
    pub search: Measurement,
    /// The record found for the key, with its slot.
    pub found: Option<(SlotIndex, Record)>,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.found {
            Some((slot, record)) => {
                writeln!(f, "Record found at slot {slot}!")?;
                writeln!(f, "{record}")?;
            }
            None => writeln!(f, "Record not found.")?,
        }
        writeln!(f)?;
        write_measurement(f, "Search metrics", &self.search)?;
        writeln!(f)?;
        write_measurement(f, &format!("Build metrics ({})", self.method), &self.build)
    }
}

fn write_measurement(
    f: &mut std::fmt::Formatter<'_>,
    title: &str,
    measurement: &Measurement,
) -> std::fmt::Result {
    writeln!(f, "{title}:")?;
    writeln!(f, " - Transfers: {}", measurement.cost.transfers)?;
    writeln!(f, " - Comparisons: {}", measurement.cost.comparisons)?;
    writeln!(
        f,
        " - Elapsed: {:.7} seconds",
        measurement.elapsed.as_secs_f64()
    )
}

/// Errors that abort a benchmark run.
#[derive(Debug)]
pub enum DriverError {
    /// Record or node file access failed.
    Storage(StorageError),
    /// The B-tree could not be built.
    BTree(BTreeError),
    /// The method has no implementation.
    Unsupported(SearchMethod),
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage error: {e}"),
            Self::BTree(e) => write!(f, "B-tree error: {e}"),
            Self::Unsupported(method) => write!(f, "search method not supported: {method}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::BTree(e) => Some(e),
            Self::Unsupported(_) => None,
        }
    }
}

impl From<StorageError> for DriverError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<BTreeError> for DriverError {
    fn from(e: BTreeError) -> Self {
        Self::BTree(e)
    }
}

/// Run one benchmark: build `method` over the records at `records_path`,
/// then look up `key`.
pub fn run(
    method: SearchMethod,
    records_path: &Path,
    key: Key,
    config: &BenchConfig,
) -> Result<RunReport, DriverError> {
    let mut records = RecordFile::open(records_path)?;
    tracing::debug!(
        "Opened record file {} ({} records)",
        records_path.display(),
        records.record_count()
    );

    let (build, search, found) = match method {
        SearchMethod::SequentialIndexed => {
            let (index, build) = Measurement::measure(|cost| {
                SequentialIndex::build(&mut records, config.index_interval, cost)
            })?;
            let (found, search) =
                Measurement::measure(|cost| index.search(&mut records, key, cost))?;
            (build, search, found)
        }
        SearchMethod::BinaryTree => {
            let node_path = records_path.with_extension("pbst");
            tracing::debug!("Binary tree node file: {}", node_path.display());

            let (mut tree, build) = Measurement::measure(|cost| {
                let nodes = NodeFile::create(&node_path)?;
                Pbst::build(nodes, &mut records, cost)
            })?;
            let (found, search) = Measurement::measure(|cost| {
                let position = tree.search(key, cost)?;
                fetch_record(&mut records, position, cost)
            })?;
            tree.release().sync()?;
            (build, search, found)
        }
        SearchMethod::BTree => {
            let (tree, build) = Measurement::measure(|cost| {
                BTree::build(config.btree_order, &mut records, cost)
            })?;
            let (found, search) = Measurement::measure(|cost| {
                let position = tree.search(key, cost);
                fetch_record(&mut records, position, cost)
            })?;
            tree.release();
            (build, search, found)
        }
        SearchMethod::BStarTree => return Err(DriverError::Unsupported(method)),
    };

    tracing::info!(
        "Built {method}: {} transfers, {} comparisons",
        build.cost.transfers,
        build.cost.comparisons
    );
    tracing::info!(
        "Searched {method} for key {key}: {} transfers, {} comparisons, found: {}",
        search.cost.transfers,
        search.cost.comparisons,
        found.is_some()
    );

    Ok(RunReport {
        method,
        build,
        search,
        found,
    })
}

fn fetch_record(
    records: &mut RecordFile,
    position: Option<RecordPosition>,
    cost: &mut Cost,
) -> Result<Option<(SlotIndex, Record)>, StorageError> {
    let Some(slot) = position else {
        return Ok(None);
    };
    Ok(records.read_record(slot, cost)?.map(|record| (slot, record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{KeyOrder, generate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn records(dir: &tempfile::TempDir, order: KeyOrder, quantity: u64) -> PathBuf {
        let path = dir.path().join(crate::record::record_file_name(order, quantity));
        generate(&path, quantity, order, &mut StdRng::seed_from_u64(99)).expect("generate");
        path
    }

    fn config() -> BenchConfig {
        BenchConfig {
            index_interval: 10,
            ..BenchConfig::default()
        }
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(SearchMethod::try_from(1), Ok(SearchMethod::SequentialIndexed));
        assert_eq!(SearchMethod::try_from(4), Ok(SearchMethod::BStarTree));
        assert_eq!(SearchMethod::try_from(5), Err(5));
        assert_eq!(SearchMethod::BTree.to_string(), "B-tree");
    }

    #[test]
    fn test_every_method_finds_present_key() {
        let dir = tempdir().expect("create temp dir");
        let path = records(&dir, KeyOrder::Ascending, 100);

        for method in [
            SearchMethod::SequentialIndexed,
            SearchMethod::BinaryTree,
            SearchMethod::BTree,
        ] {
            let report = run(method, &path, 42, &config()).expect("run");
            let (slot, record) = report.found.expect("key 42 present");
            assert_eq!(slot, 41);
            assert_eq!(record.key, 42);
            // Every build reads the whole file.
            assert!(report.build.cost.transfers >= 100, "{method}");
        }
    }

    #[test]
    fn test_missing_key() {
        let dir = tempdir().expect("create temp dir");
        let path = records(&dir, KeyOrder::Descending, 50);

        for method in [SearchMethod::BinaryTree, SearchMethod::BTree] {
            let report = run(method, &path, 1000, &config()).expect("run");
            assert!(report.found.is_none());
            assert!(report.to_string().contains("Record not found."));
        }
    }

    #[test]
    fn test_binary_tree_search_cost_on_ascending_file() {
        let dir = tempdir().expect("create temp dir");
        let path = records(&dir, KeyOrder::Ascending, 100);

        let report = run(SearchMethod::BinaryTree, &path, 100, &config()).expect("run");

        // 100 node reads down the chain plus the record read.
        assert_eq!(report.search.cost.transfers, 101);
        assert_eq!(report.search.cost.comparisons, 100);
        assert!(dir.path().join("records_asc_100.pbst").exists());
        assert!(!dir.path().join("records_asc_100.bin.pbst").exists());
    }

    #[test]
    fn test_btree_uses_configured_order() {
        let dir = tempdir().expect("create temp dir");
        let path = records(&dir, KeyOrder::Random, 500);

        let small = run(SearchMethod::BTree, &path, 1, &config()).expect("run");
        let wide = run(
            SearchMethod::BTree,
            &path,
            1,
            &BenchConfig {
                btree_order: 16,
                ..config()
            },
        )
        .expect("run");

        assert!(wide.build.cost.transfers < small.build.cost.transfers);
    }

    #[test]
    fn test_bstar_tree_is_unsupported() {
        let dir = tempdir().expect("create temp dir");
        let path = records(&dir, KeyOrder::Ascending, 10);

        let result = run(SearchMethod::BStarTree, &path, 1, &config());
        assert!(matches!(
            result,
            Err(DriverError::Unsupported(SearchMethod::BStarTree))
        ));
    }

    #[test]
    fn test_missing_record_file() {
        let dir = tempdir().expect("create temp dir");
        let result = run(
            SearchMethod::BTree,
            &dir.path().join("missing.bin"),
            1,
            &config(),
        );
        assert!(matches!(result, Err(DriverError::Storage(StorageError::Io(_)))));
    }

    #[test]
    fn test_invalid_btree_order_is_reported() {
        let dir = tempdir().expect("create temp dir");
        let path = records(&dir, KeyOrder::Ascending, 10);
        let config = BenchConfig {
            btree_order: 5,
            ..config()
        };

        let result = run(SearchMethod::BTree, &path, 1, &config);
        assert!(matches!(
            result,
            Err(DriverError::BTree(BTreeError::InvalidOrder(5)))
        ));
    }

    #[test]
    fn test_report_display() {
        let dir = tempdir().expect("create temp dir");
        let path = records(&dir, KeyOrder::Ascending, 20);

        let report = run(SearchMethod::SequentialIndexed, &path, 5, &config()).expect("run");
        let text = report.to_string();

        assert!(text.contains("Record found at slot 4!"));
        assert!(text.contains("Key: 5"));
        assert!(text.contains("Search metrics:"));
        assert!(text.contains("Build metrics (indexed sequential access):"));
        assert!(text.contains(" - Elapsed: "));
    }
}
