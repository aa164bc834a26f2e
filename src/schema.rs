//! Column identifier normalization.
//!
//! Upstream exports disagree on header hygiene (`" Rating.2.0"`,
//! `"Kill-Death-Ratio"`). Every lookup downstream goes through the sanitized
//! name so those quirks never reach the aggregation code.

use tracing::{debug, warn};

/// Characters replaced by `_` in a column identifier.
const ILLEGAL_CHARS: [char; 4] = ['`', '/', '-', '.'];

/// Sanitizes a single column identifier.
///
/// Trims surrounding whitespace, then replaces backticks, slashes, hyphens and
/// periods with underscores. Idempotent.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().replace(ILLEGAL_CHARS, "_")
}

/// One column of the source table: its identifier as supplied and as used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub raw: String,
    pub name: String,
}

/// Ordered raw → sanitized mapping over a table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Builds the mapping for a header row. Column order is preserved.
    pub fn normalize<I, S>(raw_headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<Column> = raw_headers
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                let name = normalize_identifier(raw);
                if name != raw {
                    debug!(raw, name = %name, "Renamed column");
                }
                Column {
                    raw: raw.to_string(),
                    name,
                }
            })
            .collect();

        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                warn!(
                    column = %col.name,
                    raw = %col.raw,
                    "Duplicate column after normalization, first occurrence wins"
                );
            }
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Sanitized names in header order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Index of the first column carrying `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
