//! Data types used by the aggregation and classification pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::Schema;
use crate::stats::{Metric, MetricValues, PlayerRecord};

/// Per-metric arithmetic means over a dataset, with the record count used.
///
/// Only [`crate::analyzers::aggregate::compute_averages`] builds one, and it
/// never builds one from zero records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageStatistics {
    means: MetricValues,
    count: usize,
}

impl AverageStatistics {
    pub(crate) fn new(means: MetricValues, count: usize) -> Self {
        Self { means, count }
    }

    pub fn means(&self) -> &MetricValues {
        &self.means
    }

    pub fn mean(&self, metric: Metric) -> f64 {
        self.means.get(metric)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Which comparison rule produced a set of qualifying players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualificationTier {
    /// At or above the dataset average on every metric.
    Perfect,
    /// At or above the fixed threshold table on every metric.
    Average,
}

impl QualificationTier {
    pub fn as_str(self) -> &'static str {
        match self {
            QualificationTier::Perfect => "perfect",
            QualificationTier::Average => "average",
        }
    }

    /// Base name of the persisted result for this tier.
    pub fn result_name(self) -> &'static str {
        match self {
            QualificationTier::Perfect => "Result_Goat",
            QualificationTier::Average => "Result_PotentialGoat",
        }
    }
}

impl std::fmt::Display for QualificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualifying players of one tier, in output order.
#[derive(Debug, Clone)]
pub struct TierResult<'a> {
    pub tier: QualificationTier,
    pub players: Vec<&'a PlayerRecord>,
}

/// Typed dataset after normalization and validation.
#[derive(Debug, Clone)]
pub struct PlayerTable {
    pub schema: Schema,
    pub records: Vec<PlayerRecord>,
}

impl PlayerTable {
    /// Index of the column used to name a player in reports: the first
    /// column that is not one of the eight metrics.
    pub fn identity_column(&self) -> Option<usize> {
        self.schema
            .names()
            .position(|name| Metric::from_field(name).is_none())
    }

    pub fn player_name(&self, record: &PlayerRecord) -> String {
        self.identity_column()
            .and_then(|idx| record.cell(idx))
            .map(str::to_string)
            .unwrap_or_else(|| format!("row {}", record.row))
    }
}

/// Output of one pass over a dataset.
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    pub averages: AverageStatistics,
    pub perfect: TierResult<'a>,
    pub average: TierResult<'a>,
}

impl<'a> Evaluation<'a> {
    pub fn tiers(&self) -> [&TierResult<'a>; 2] {
        [&self.perfect, &self.average]
    }
}

/// A ranked entry in the run summary.
#[derive(Debug, Serialize)]
pub struct RankedPlayer {
    pub(crate) player: String,
    pub(crate) rating: f64,
}

/// Per-tier section of the run summary.
#[derive(Debug, Serialize)]
pub struct TierSummary {
    pub(crate) tier: QualificationTier,
    pub(crate) count: usize,
    pub(crate) players: Vec<RankedPlayer>,
}

/// Run summary uploaded next to the tier files.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub(crate) schema_version: u8,
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) source: String,
    pub(crate) record_count: usize,
    pub(crate) averages: MetricValues,
    pub(crate) thresholds: MetricValues,
    pub(crate) tiers: Vec<TierSummary>,
}
