use rayon::prelude::*;
use tracing::{debug, info};

use crate::analyzers::types::AverageStatistics;
use crate::analyzers::utility::{approx_eq, mean};
use crate::error::RaterError;
use crate::stats::{Metric, MetricValues, PlayerRecord};

/// Element-wise totals of the eight metrics plus the number of rows summed.
///
/// [`PartialSums::combine`] is commutative and associative, so partial sums
/// built over any partition of the records merge to the same totals in any
/// order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialSums {
    sums: [f64; 8],
    count: usize,
}

impl PartialSums {
    /// Contribution of a single record: its metrics and a unit counter.
    pub fn of(record: &PlayerRecord) -> Self {
        Self {
            sums: record.metrics.to_array(),
            count: 1,
        }
    }

    pub fn combine(self, other: Self) -> Self {
        let mut sums = self.sums;
        for (acc, v) in sums.iter_mut().zip(other.sums) {
            *acc += v;
        }
        Self {
            sums,
            count: self.count + other.count,
        }
    }

    /// Divides each total by the counter.
    pub fn averages(&self) -> Result<AverageStatistics, RaterError> {
        if self.count == 0 {
            return Err(RaterError::EmptyDataset);
        }
        let n = self.count as f64;
        let means = MetricValues::from_fn(|m| self.sums[m.index()] / n);
        Ok(AverageStatistics::new(means, self.count))
    }
}

/// Averages through a parallel map/reduce over the records.
pub fn fold_averages(records: &[PlayerRecord]) -> Result<AverageStatistics, RaterError> {
    records
        .par_iter()
        .map(PartialSums::of)
        .reduce(PartialSums::default, PartialSums::combine)
        .averages()
}

/// Averages computed column by column with a plain mean.
pub fn column_averages(records: &[PlayerRecord]) -> Result<AverageStatistics, RaterError> {
    let mut means = MetricValues::default();

    for metric in Metric::ALL {
        let column: Vec<f64> = records.iter().map(|r| r.metrics.get(metric)).collect();
        let avg = mean(&column).ok_or(RaterError::EmptyDataset)?;
        means.set(metric, avg);
    }

    Ok(AverageStatistics::new(means, records.len()))
}

/// Fails on the first metric where the two computations disagree.
pub fn cross_check(fold: &AverageStatistics, column: &AverageStatistics) -> Result<(), RaterError> {
    for metric in Metric::ALL {
        let (a, b) = (fold.mean(metric), column.mean(metric));
        if !approx_eq(a, b) {
            return Err(RaterError::InternalConsistency {
                metric: metric.field().to_string(),
                fold: a,
                aggregate: b,
            });
        }
    }

    if fold.count() != column.count() {
        return Err(RaterError::InternalConsistency {
            metric: "count".to_string(),
            fold: fold.count() as f64,
            aggregate: column.count() as f64,
        });
    }

    Ok(())
}

/// Computes the dataset averages both ways and returns the fold result once
/// the two agree.
pub fn compute_averages(records: &[PlayerRecord]) -> Result<AverageStatistics, RaterError> {
    if records.is_empty() {
        return Err(RaterError::EmptyDataset);
    }

    let fold = fold_averages(records)?;
    let column = column_averages(records)?;
    cross_check(&fold, &column)?;

    debug!(?fold, "Fold and column averages agree");
    info!(count = fold.count(), "Average statistics computed");

    Ok(fold)
}
