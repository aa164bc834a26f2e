use crate::analyzers::types::TierResult;
use crate::stats::PlayerRecord;

/// Orders players by rating, highest first. Ties keep their input order.
pub fn rank_by_rating<'a>(mut players: Vec<&'a PlayerRecord>) -> Vec<&'a PlayerRecord> {
    players.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
    players
}

/// Reorders a tier by rating.
pub fn rank_tier(tier: TierResult<'_>) -> TierResult<'_> {
    TierResult {
        tier: tier.tier,
        players: rank_by_rating(tier.players),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MetricValues;
    use proptest::prelude::*;

    fn rated(row: usize, rating: f64) -> PlayerRecord {
        PlayerRecord {
            row,
            cells: Vec::new(),
            metrics: MetricValues {
                rating,
                ..Default::default()
            },
            defaulted: Vec::new(),
        }
    }

    #[test]
    fn test_sorts_descending() {
        let records = vec![rated(0, 0.9), rated(1, 1.3), rated(2, 1.1)];
        let ranked = rank_by_rating(records.iter().collect());
        let ratings: Vec<_> = ranked.iter().map(|r| r.rating()).collect();
        assert_eq!(ratings, vec![1.3, 1.1, 0.9]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![rated(0, 1.0), rated(1, 1.2), rated(2, 1.0)];
        let ranked = rank_by_rating(records.iter().collect());
        let rows: Vec<_> = ranked.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 0, 2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_by_rating(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_ratings_are_non_increasing(ratings in prop::collection::vec(0.0..3.0f64, 0..100)) {
            let records: Vec<_> = ratings.iter().enumerate().map(|(i, &r)| rated(i, r)).collect();
            let ranked = rank_by_rating(records.iter().collect());

            prop_assert_eq!(ranked.len(), records.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].rating() >= pair[1].rating());
            }
        }
    }
}
