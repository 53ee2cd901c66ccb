//! Command-line benchmark of external search methods.
//!
//! # Usage
//!
//! ```bash
//! # B-tree over 1000 random records, looking up key 4242, listing a sample
//! searchbench 3 1000 3 4242 -P
//! ```

// Forbid unwrap() in production code to prevent panics from bad input.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use searchbench::config::BenchConfig;
use searchbench::driver::{self, DriverError, SearchMethod};
use searchbench::record::{self, KeyOrder, RecordFile};
use searchbench::storage::StorageError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Benchmark a search method over a generated record file.
#[derive(Parser, Debug)]
#[command(name = "searchbench", version)]
struct Args {
    /// Search method: 1 indexed sequential, 2 binary tree, 3 B-tree, 4 B*-tree
    #[arg(value_parser = parse_method)]
    method: SearchMethod,

    /// Number of records in the file
    #[arg(value_parser = clap::value_parser!(u64).range(1..=u64::from(i32::MAX.unsigned_abs())))]
    quantity: u64,

    /// Key order in the file: 1 ascending, 2 descending, 3 random
    #[arg(value_parser = parse_situation)]
    situation: KeyOrder,

    /// Key to look up
    #[arg(allow_negative_numbers = true)]
    key: i32,

    /// Print a sample of the keys in the file
    #[arg(short = 'P', long = "print-keys")]
    print_keys: bool,
}

fn parse_method(value: &str) -> Result<SearchMethod, String> {
    value
        .parse::<u8>()
        .ok()
        .and_then(|number| SearchMethod::try_from(number).ok())
        .ok_or_else(|| format!("'{value}' is not a search method (expected 1-4)"))
}

fn parse_situation(value: &str) -> Result<KeyOrder, String> {
    value
        .parse::<u8>()
        .ok()
        .and_then(|number| KeyOrder::try_from(number).ok())
        .ok_or_else(|| format!("'{value}' is not a key order (expected 1-3)"))
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "searchbench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration from environment variables
    let config = match BenchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: data_directory={}, btree_order={}, index_interval={}",
        config.data_directory.display(),
        config.btree_order,
        config.index_interval
    );

    if let Err(e) = run(&args, &config) {
        tracing::error!("Benchmark failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &BenchConfig) -> Result<(), DriverError> {
    std::fs::create_dir_all(&config.data_directory).map_err(StorageError::from)?;

    let path = config
        .data_directory
        .join(record::record_file_name(args.situation, args.quantity));
    let mut rng = config
        .seed
        .map_or_else(|| StdRng::from_rng(&mut rand::rng()), StdRng::seed_from_u64);
    record::generate(&path, args.quantity, args.situation, &mut rng)?;

    if args.print_keys {
        let mut file = RecordFile::open(&path)?;
        println!("Keys in {}:", path.display());
        for (slot, record) in record::sample(&mut file, args.quantity)? {
            println!("  slot {slot}: {}", record.key);
        }
        println!();
    }

    let report = driver::run(args.method, &path, args.key, config)?;
    println!("{report}");
    Ok(())
}
