//! Failure taxonomy for the aggregation and classification core.

use thiserror::Error;

/// Terminal errors raised by the core pipeline.
///
/// Each variant is produced at the boundary of the component that detects it
/// and travels unmodified to the caller. The computation is deterministic, so
/// none of them is worth retrying without changed input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RaterError {
    #[error("Missing columns in the dataset: {}", missing.join(", "))]
    MissingFields { missing: Vec<String> },

    #[error("Dataset contains no records, averages are undefined")]
    EmptyDataset,

    #[error(
        "Average of {metric} disagrees between fold ({fold}) and aggregate ({aggregate}) computation"
    )]
    InternalConsistency {
        metric: String,
        fold: f64,
        aggregate: f64,
    },

    /// `line` is the 1-based line of the CSV file, header included.
    #[error("Line {line}: column {column} holds non-numeric value {value:?}")]
    MalformedValue {
        line: usize,
        column: String,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_every_name() {
        let err = RaterError::MissingFields {
            missing: vec!["Impact".into(), "KAST".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing columns in the dataset: Impact, KAST"
        );
    }

    #[test]
    fn test_malformed_value_message() {
        let err = RaterError::MalformedValue {
            line: 3,
            column: "KAST".into(),
            value: "n/a".into(),
        };
        assert_eq!(
            err.to_string(),
            "Line 3: column KAST holds non-numeric value \"n/a\""
        );
    }
}
