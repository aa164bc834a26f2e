//! CSV decoding for player datasets.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

/// A header-described table of untyped cells, as it arrives from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Decodes CSV bytes with a header row into a [`RawTable`].
///
/// Rows may be ragged; reconciling them with the header is left to the
/// caller. A UTF-8 byte order mark before the first header is dropped.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CSV or not UTF-8.
pub fn parse_table(bytes: &[u8]) -> Result<RawTable> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV row {idx}"))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(columns = ?headers, rows = rows.len(), "CSV decoded");
    Ok(RawTable { headers, rows })
}
