use player_tier_rater::RaterError;
use player_tier_rater::analyzers::analyzer::{evaluate, load_table};
use player_tier_rater::analyzers::qualify::ThresholdTable;
use player_tier_rater::analyzers::types::{PlayerTable, QualificationTier};
use player_tier_rater::output::{read_tier, tier_path, write_tier};
use player_tier_rater::parser::parse_table;
use player_tier_rater::stats::{Metric, PlayerRecord};

const SAMPLE: &[u8] = include_bytes!("fixtures/sample_players.csv");

fn names(table: &PlayerTable, players: &[&PlayerRecord]) -> Vec<String> {
    players.iter().map(|p| table.player_name(p)).collect()
}

#[test]
fn test_full_pipeline() {
    let raw = parse_table(SAMPLE).expect("Failed to parse sample");
    let table = load_table(raw).expect("Sample should validate");
    assert_eq!(table.records.len(), 7);

    let evaluation = evaluate(&table, &ThresholdTable::DEFAULT).expect("Evaluation failed");

    assert_eq!(evaluation.averages.count(), 7);
    assert!((evaluation.averages.mean(Metric::MapsPlayed) - 7900.0 / 7.0).abs() < 1e-9);
    assert!((evaluation.averages.mean(Metric::Rating) - 8.11 / 7.0).abs() < 1e-9);

    assert_eq!(
        names(&table, &evaluation.perfect.players),
        vec!["ZywOo", "s1mple", "NiKo", "device"]
    );
    assert_eq!(
        names(&table, &evaluation.average.players),
        vec!["ZywOo", "s1mple", "electroNic", "NiKo"]
    );
}

#[test]
fn test_blank_metric_counts_as_zero() {
    let table = load_table(parse_table(SAMPLE).unwrap()).unwrap();
    let rookie = table
        .records
        .iter()
        .find(|r| r.cells[0] == "rookie")
        .unwrap();

    assert_eq!(rookie.metrics.saved_teammates_per_round, 0.0);
    assert_eq!(rookie.defaulted, vec![Metric::SavedTeammatesPerRound]);
}

#[test]
fn test_missing_columns_reported_together() {
    let csv = b"Name,MapsPlayed,Impact,KAST\nx,1,1,1\n";
    let err = load_table(parse_table(csv).unwrap()).unwrap_err();

    assert_eq!(
        err,
        RaterError::MissingFields {
            missing: vec![
                "Kill_Death_Ratio".to_string(),
                "DamagePerRound".to_string(),
                "KillsPerRound".to_string(),
                "SavedTeamatesPerRound".to_string(),
                "Rating_2_0".to_string(),
            ]
        }
    );
}

#[test]
fn test_header_only_dataset_is_empty() {
    let csv = b"MapsPlayed,Kill_Death_Ratio,DamagePerRound,KillsPerRound,SavedTeamatesPerRound,Impact,Rating_2_0,KAST\n";
    let table = load_table(parse_table(csv).unwrap()).unwrap();
    let err = evaluate(&table, &ThresholdTable::DEFAULT).unwrap_err();
    assert_eq!(err, RaterError::EmptyDataset);
}

#[test]
fn test_saved_tiers_round_trip() {
    let table = load_table(parse_table(SAMPLE).unwrap()).unwrap();
    let evaluation = evaluate(&table, &ThresholdTable::DEFAULT).unwrap();
    let dir = tempfile::tempdir().unwrap();

    for tier in evaluation.tiers() {
        write_tier(&tier_path(dir.path(), tier.tier), &table.schema, &tier.players).unwrap();
    }

    let goat = read_tier(&tier_path(dir.path(), QualificationTier::Perfect)).unwrap();
    assert_eq!(goat.headers[3], "MapsPlayed");
    assert_eq!(goat.headers[9], "Rating_2_0");
    assert_eq!(goat.rows.len(), 4);
    assert_eq!(goat.rows[0][0], "ZywOo");
    assert_eq!(goat.rows[1][2], "Natus Vincere");

    let potential = read_tier(&tier_path(dir.path(), QualificationTier::Average)).unwrap();
    assert_eq!(potential.rows.len(), 4);
    assert_eq!(potential.rows[2][0], "electroNic");
}

#[test]
fn test_malformed_cell_reports_csv_line() {
    let csv = b"Name,MapsPlayed,Kill_Death_Ratio,DamagePerRound,KillsPerRound,SavedTeamatesPerRound,Impact,Rating_2_0,KAST\n\
a,900,1.1,80,0.77,0.11,1.2,1.2,72\n\
b,900,1.1,80,0.77,0.11,1.2,1.2,seventy\n";
    let err = load_table(parse_table(csv).unwrap()).unwrap_err();

    assert_eq!(
        err,
        RaterError::MalformedValue {
            line: 3,
            column: "KAST".to_string(),
            value: "seventy".to_string(),
        }
    );
    assert!(err.to_string().starts_with("Line 3:"));
}
