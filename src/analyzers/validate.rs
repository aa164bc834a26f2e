use tracing::debug;

use crate::error::RaterError;
use crate::schema::Schema;

/// Checks that every name in `required` is a column of `schema`.
///
/// All absent names are reported together, in `required` order.
pub fn validate_required(schema: &Schema, required: &[&str]) -> Result<(), RaterError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !schema.contains(name))
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(RaterError::MissingFields { missing });
    }

    debug!(required = required.len(), "All required columns present");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::REQUIRED_FIELDS;
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    #[test]
    fn test_complete_schema_passes() {
        let schema = Schema::normalize(REQUIRED_FIELDS);
        assert_eq!(validate_required(&schema, &REQUIRED_FIELDS), Ok(()));
    }

    #[test]
    fn test_reports_every_missing_field_in_order() {
        let schema = Schema::normalize(["Name", "MapsPlayed", "Impact"]);
        let err = validate_required(&schema, &REQUIRED_FIELDS).unwrap_err();

        assert_eq!(
            err,
            RaterError::MissingFields {
                missing: vec![
                    "Kill_Death_Ratio".into(),
                    "DamagePerRound".into(),
                    "KillsPerRound".into(),
                    "SavedTeamatesPerRound".into(),
                    "Rating_2_0".into(),
                    "KAST".into(),
                ]
            }
        );
    }

    #[test]
    fn test_raw_names_are_checked_after_normalization() {
        let schema = Schema::normalize([
            " MapsPlayed",
            "Kill-Death-Ratio",
            "DamagePerRound",
            "KillsPerRound",
            "SavedTeamatesPerRound",
            "Impact",
            "Rating.2.0",
            "KAST ",
        ]);
        assert!(validate_required(&schema, &REQUIRED_FIELDS).is_ok());
    }

    proptest! {
        #[test]
        fn prop_missing_is_exact_set_difference(
            present in subsequence(REQUIRED_FIELDS.to_vec(), 0..REQUIRED_FIELDS.len())
        ) {
            let schema = Schema::normalize(present.iter().copied());
            let expected: Vec<String> = REQUIRED_FIELDS
                .iter()
                .filter(|f| !present.contains(*f))
                .map(|f| f.to_string())
                .collect();

            prop_assert_eq!(
                validate_required(&schema, &REQUIRED_FIELDS),
                Err(RaterError::MissingFields { missing: expected })
            );
        }
    }
}
