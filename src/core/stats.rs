//! Descriptive statistics over a simulated output population

use serde::{Deserialize, Serialize};

/// Summary of a full output population
///
/// The standard deviation is the population value (divides by N): the samples are
/// the whole simulated population, not a draw from a larger one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    /// Lower percentile (2.5% for 95% CI)
    pub percentile_2_5: f64,
    /// Upper percentile (97.5% for 95% CI)
    pub percentile_97_5: f64,
}

impl Summary {
    /// Reduce `samples`; `None` for an empty population
    pub fn from_samples(samples: &[f64]) -> Option<Summary> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        // Moments in draw order so results are reproducible for a given seed sequence
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        Some(Summary {
            count: sorted.len(),
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
            percentile_2_5: percentile(&sorted, 0.025),
            percentile_97_5: percentile(&sorted, 0.975),
        })
    }
}

/// Percentile by index `floor(N × p)` into an ascending population
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((sorted.len() as f64) * p) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Deviation of `value` from `reference` as a percentage of `reference`
///
/// `None` when the reference is zero and the ratio has no meaning.
pub fn percent_deviation(value: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 {
        None
    } else {
        Some((value - reference) / reference * 100.0)
    }
}
