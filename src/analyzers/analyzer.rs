use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::analyzers::aggregate::compute_averages;
use crate::analyzers::qualify::{ThresholdTable, classify};
use crate::analyzers::rank::rank_tier;
use crate::analyzers::types::{
    AverageStatistics, Evaluation, PlayerTable, RankedPlayer, RunSummary, TierSummary,
};
use crate::analyzers::writetos3::{write_file_to_s3, write_json_to_s3};
use crate::error::RaterError;
use crate::fetch::fetch_source;
use crate::output::{print_averages, read_tier, show_table, tier_path, write_tier};
use crate::parser::{RawTable, parse_table};
use crate::schema::Schema;
use crate::stats::{MetricColumns, PlayerRecord};

/// Normalizes the header, validates the required columns and types every row.
///
/// Rows shorter than the header are padded with blank cells and longer rows
/// are cut to the header width.
pub fn load_table(raw: RawTable) -> Result<PlayerTable, RaterError> {
    let schema = Schema::normalize(&raw.headers);
    let columns = MetricColumns::locate(&schema)?;

    let width = schema.len();
    let mut records = Vec::with_capacity(raw.rows.len());
    let mut ragged = 0usize;
    let mut defaulted = 0usize;

    for (row, mut cells) in raw.rows.into_iter().enumerate() {
        if cells.len() != width {
            ragged += 1;
            cells.resize(width, String::new());
        }
        let record = PlayerRecord::from_row(row, cells, &columns)?;
        if !record.defaulted.is_empty() {
            defaulted += 1;
        }
        records.push(record);
    }

    if ragged > 0 {
        warn!(rows = ragged, width, "Rows did not match header width");
    }
    if defaulted > 0 {
        warn!(rows = defaulted, "Blank metric cells counted as zero");
    }
    info!(rows = records.len(), columns = width, "Dataset validated");

    Ok(PlayerTable { schema, records })
}

/// Averages, classification and ranking over a validated table.
pub fn evaluate<'a>(
    table: &'a PlayerTable,
    thresholds: &ThresholdTable,
) -> Result<Evaluation<'a>, RaterError> {
    let averages = compute_averages(&table.records)?;
    let (perfect, average) = classify(&table.records, &averages, thresholds);

    Ok(Evaluation {
        averages,
        perfect: rank_tier(perfect),
        average: rank_tier(average),
    })
}

/// Runs `f` on a dedicated pool of `threads` workers, or on rayon's global
/// pool when `threads` is `None`.
pub fn with_pool<T: Send>(threads: Option<usize>, f: impl FnOnce() -> T + Send) -> Result<T> {
    match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("Failed to build worker pool")?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}

/// Settings for a full [`analyze`] run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub output_dir: PathBuf,
    pub thresholds: ThresholdTable,
    pub threads: Option<usize>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: String,
    pub gzip: bool,
    pub show_rows: usize,
}

/// Fetches and decodes a dataset, then validates it into a typed table.
pub async fn load_source(source: &str) -> Result<PlayerTable> {
    let bytes = fetch_source(source).await?;
    let raw = parse_table(&bytes).with_context(|| format!("Failed to decode '{source}'"))?;
    Ok(load_table(raw)?)
}

/// Computes and reports the averages of a dataset.
pub async fn averages(source: &str, threads: Option<usize>) -> Result<AverageStatistics> {
    let table = load_source(source).await?;
    let stats = with_pool(threads, || compute_averages(&table.records))??;
    print_averages(&stats);
    Ok(stats)
}

/// Full run: load, evaluate, persist both tiers, re-read them for display and
/// optionally upload results to S3.
#[tracing::instrument(skip(options), fields(output_dir = %options.output_dir.display()))]
pub async fn analyze(source: &str, options: &AnalyzeOptions) -> Result<()> {
    let table = load_source(source).await?;
    let evaluation = with_pool(options.threads, || evaluate(&table, &options.thresholds))??;

    print_averages(&evaluation.averages);

    let mut written = Vec::new();
    for tier in evaluation.tiers() {
        let path = tier_path(&options.output_dir, tier.tier);
        write_tier(&path, &table.schema, &tier.players)?;
        info!(tier = %tier.tier, rows = tier.players.len(), path = %path.display(), "Tier saved");
        written.push(path);
    }

    for path in &written {
        let saved = read_tier(path)?;
        show_table(&path.display().to_string(), &saved, options.show_rows);
    }

    if let Some(bucket) = &options.s3_bucket {
        let summary = summarize(source, &table, &evaluation, &options.thresholds);
        upload_results(bucket, &options.s3_prefix, &written, &summary, options.gzip).await?;
    }

    Ok(())
}

/// Builds the JSON run summary.
pub fn summarize(
    source: &str,
    table: &PlayerTable,
    evaluation: &Evaluation<'_>,
    thresholds: &ThresholdTable,
) -> RunSummary {
    let tiers = evaluation
        .tiers()
        .into_iter()
        .map(|tier| TierSummary {
            tier: tier.tier,
            count: tier.players.len(),
            players: tier
                .players
                .iter()
                .map(|p| RankedPlayer {
                    player: table.player_name(p),
                    rating: p.rating(),
                })
                .collect(),
        })
        .collect();

    RunSummary {
        schema_version: 1,
        generated_at: Utc::now(),
        source: source.to_string(),
        record_count: evaluation.averages.count(),
        averages: *evaluation.averages.means(),
        thresholds: *thresholds.minimums(),
        tiers,
    }
}

#[tracing::instrument(skip(files, summary), fields(file_count = files.len()))]
async fn upload_results(
    bucket: &str,
    prefix: &str,
    files: &[PathBuf],
    summary: &RunSummary,
    gzip: bool,
) -> Result<()> {
    let config = aws_config::load_from_env().await;
    let s3 = aws_sdk_s3::Client::new(&config);
    let prefix = prefix.trim_end_matches('/');

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Result path '{}' has no file name", path.display()))?;
        let key = object_key(prefix, name);
        let key = write_file_to_s3(&s3, bucket, &key, path, gzip).await?;
        info!(bucket, key = %key, "Uploaded tier file");
    }

    let key = object_key(prefix, "summary.json");
    write_json_to_s3(&s3, bucket, &key, summary).await?;
    info!(bucket, key = %key, "Uploaded run summary");

    Ok(())
}

fn object_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
