//! Two-tier player qualification.
//!
//! Both tiers are plain filters over the same records. A player can land in
//! either, both or neither.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::info;

use crate::analyzers::types::{AverageStatistics, QualificationTier, TierResult};
use crate::stats::{Metric, MetricValues, PlayerRecord};

/// Fixed per-metric minimums for the "Average" tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    minimums: MetricValues,
}

impl ThresholdTable {
    /// Built-in floors.
    pub const DEFAULT: ThresholdTable = ThresholdTable {
        minimums: MetricValues {
            maps_played: 900.0,
            kill_death_ratio: 1.1,
            damage_per_round: 80.0,
            kills_per_round: 0.77,
            saved_teammates_per_round: 0.11,
            impact: 1.2,
            rating: 1.2,
            kast: 72.0,
        },
    };

    pub fn minimums(&self) -> &MetricValues {
        &self.minimums
    }

    pub fn minimum(&self, metric: Metric) -> f64 {
        self.minimums.get(metric)
    }

    /// Loads overrides from a JSON object keyed by column name:
    ///
    /// ```json
    /// { "MapsPlayed": 500, "KAST": 70.5 }
    /// ```
    ///
    /// Metrics absent from the file keep their built-in floor. Unknown keys
    /// are an error.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read threshold file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Invalid threshold file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let overrides: HashMap<String, f64> = serde_json::from_str(content)?;
        let mut table = Self::DEFAULT;

        for (name, value) in overrides {
            let Some(metric) = Metric::from_field(&name) else {
                bail!("unknown metric '{name}'");
            };
            if !value.is_finite() {
                bail!("threshold for '{name}' must be a finite number");
            }
            table.minimums.set(metric, value);
        }

        Ok(table)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Perfect tier predicate: at or above the average on all eight metrics.
pub fn meets_average(record: &PlayerRecord, averages: &AverageStatistics) -> bool {
    record.metrics.dominates(averages.means())
}

/// Average tier predicate: at or above every fixed floor.
pub fn meets_thresholds(record: &PlayerRecord, thresholds: &ThresholdTable) -> bool {
    record.metrics.dominates(thresholds.minimums())
}

fn select<'a>(
    records: &'a [PlayerRecord],
    tier: QualificationTier,
    keep: impl Fn(&PlayerRecord) -> bool + Sync,
) -> TierResult<'a> {
    let players: Vec<&PlayerRecord> = records.par_iter().filter(|r| keep(r)).collect();
    info!(tier = %tier, qualified = players.len(), total = records.len(), "Tier classified");
    TierResult { tier, players }
}

/// Splits `records` into the Perfect and Average tiers, each in input order.
pub fn classify<'a>(
    records: &'a [PlayerRecord],
    averages: &AverageStatistics,
    thresholds: &ThresholdTable,
) -> (TierResult<'a>, TierResult<'a>) {
    let perfect = select(records, QualificationTier::Perfect, |r| {
        meets_average(r, averages)
    });
    let average = select(records, QualificationTier::Average, |r| {
        meets_thresholds(r, thresholds)
    });
    (perfect, average)
}
