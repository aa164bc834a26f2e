//! Persistence and console display of results.
//!
//! Tier files are plain CSV carrying every source column, overwritten on each
//! run. The display helpers log through `tracing` rather than printing.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use tracing::{debug, info};

use crate::analyzers::types::{AverageStatistics, QualificationTier};
use crate::parser::{RawTable, parse_table};
use crate::schema::Schema;
use crate::stats::{Metric, PlayerRecord};

/// Path of the CSV file holding `tier` under `output_dir`.
pub fn tier_path(output_dir: &Path, tier: QualificationTier) -> PathBuf {
    output_dir.join(format!("{}.csv", tier.result_name()))
}

/// Writes `players` to `path` with a header row, replacing any prior file.
pub fn write_tier(path: &Path, schema: &Schema, players: &[&PlayerRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(schema.names())?;
    for player in players {
        writer.write_record(&player.cells)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = players.len(), "Tier written");
    Ok(())
}

/// Reads a persisted tier file back for verification.
pub fn read_tier(path: &Path) -> Result<RawTable> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    parse_table(&bytes)
}

/// Logs the header and up to `limit` rows of a table.
pub fn show_table(title: &str, table: &RawTable, limit: usize) {
    info!("{title} ({} rows)", table.rows.len());
    info!("{}", table.headers.join(" | "));
    for row in table.rows.iter().take(limit) {
        info!("{}", row.join(" | "));
    }
    if table.rows.len() > limit {
        info!("only showing top {limit} rows");
    }
}

/// One `Avg_<Field>: <value>` line per metric, two decimals.
pub fn format_averages(stats: &AverageStatistics) -> Vec<String> {
    Metric::ALL
        .iter()
        .map(|&m| format!("{}: {:.2}", m.average_label(), stats.mean(m)))
        .collect()
}

pub fn print_averages(stats: &AverageStatistics) {
    info!(count = stats.count(), "Average Statistics:");
    for line in format_averages(stats) {
        info!("{line}");
    }
}
