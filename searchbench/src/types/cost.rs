//! Cost accounting for builds and lookups.
//!
//! The benchmark measures two costs: transfers (one read or write of a
//! record, node or entries array) and key comparisons. Every operation that
//! incurs a cost takes a `&mut Cost` and adds to it; nothing is global.

use std::time::{Duration, Instant};

/// Transfer and comparison counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cost {
    /// Storage transfers (reads and writes of one unit).
    pub transfers: u64,
    /// Key comparisons.
    pub comparisons: u64,
}

impl Cost {
    /// A zero cost.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transfers: 0,
            comparisons: 0,
        }
    }

    /// Count one transfer.
    pub const fn transfer(&mut self) {
        self.transfers += 1;
    }

    /// Count one key comparison.
    pub const fn comparison(&mut self) {
        self.comparisons += 1;
    }
}

/// The cost and wall-clock time of one benchmark phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measurement {
    pub cost: Cost,
    pub elapsed: Duration,
}

impl Measurement {
    /// Run `phase` with a fresh `Cost`, timing it.
    ///
    /// Returns the phase's result alongside the measurement.
    pub fn measure<T, E>(
        phase: impl FnOnce(&mut Cost) -> Result<T, E>,
    ) -> Result<(T, Self), E> {
        let mut cost = Cost::new();
        let started = Instant::now();
        let value = phase(&mut cost)?;
        let elapsed = started.elapsed();
        Ok((value, Self { cost, elapsed }))
    }
}
