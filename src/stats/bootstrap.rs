//! Bootstrap resampling.
//!
//! Draws a fixed number of samples with replacement from a column using a
//! seeded generator, so two runs over the same column produce the same
//! resampled column and therefore the same statistics.

use crate::utils::config::{BOOTSTRAP_SAMPLES, BOOTSTRAP_SEED};
use crate::utils::error::StatisticsError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bootstrap configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Number of samples drawn (default: 1000)
    pub samples: usize,
    /// Generator seed (default: 1)
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            samples: BOOTSTRAP_SAMPLES,
            seed: BOOTSTRAP_SEED,
        }
    }
}

/// Resample `column` with replacement
///
/// Draws come from `StdRng` seeded with `config.seed`. They repeat exactly
/// between runs of this crate, but they are not the draws numpy's MT19937
/// (scikit-learn `resample(random_state=1)`) makes for the same seed, so
/// bootstrapped figures differ from ones computed with that tool.
///
/// # Errors
/// * `StatisticsError::NotEnoughObservations` - The column is empty
pub fn resample(column: &[f64], config: &BootstrapConfig) -> Result<Vec<f64>, StatisticsError> {
    if column.is_empty() {
        return Err(StatisticsError::NotEnoughObservations { got: 0, min: 1 });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    Ok((0..config.samples)
        .map(|_| column[rng.gen_range(0..column.len())])
        .collect())
}
