use super::outcome::Scoreline;

/// Points for predicting the exact score.
pub const EXACT_SCORE_POINTS: u32 = 3;
/// Points for predicting only the outcome.
pub const CORRECT_OUTCOME_POINTS: u32 = 1;
/// Applied when the member is the only one in their cohort with the right outcome.
pub const UNIQUE_CORRECT_MULTIPLIER: u32 = 2;

/// Scores one prediction against the official result of its fixture.
///
/// A fixture without a result scores nothing. A wrong outcome scores nothing
/// whatever `unique_correct` says.
pub fn score_match(predicted: Scoreline, actual: Option<Scoreline>, unique_correct: bool) -> u32 {
    let Some(actual) = actual else {
        return 0;
    };

    if predicted.outcome() != actual.outcome() {
        return 0;
    }

    let base = if predicted == actual {
        EXACT_SCORE_POINTS
    } else {
        CORRECT_OUTCOME_POINTS
    };

    if unique_correct {
        base * UNIQUE_CORRECT_MULTIPLIER
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(home: u32, away: u32) -> Scoreline {
        Scoreline::new(home, away)
    }

    #[test]
    fn test_missing_result_scores_zero() {
        assert_eq!(score_match(s(1, 0), None, true), 0);
        assert_eq!(score_match(s(1, 0), None, false), 0);
    }

    #[test]
    fn test_exact_and_outcome_points() {
        assert_eq!(score_match(s(2, 1), Some(s(2, 1)), false), 3);
        assert_eq!(score_match(s(1, 0), Some(s(2, 1)), false), 1);
        assert_eq!(score_match(s(1, 1), Some(s(3, 3)), false), 1);
    }

    #[test]
    fn test_wrong_outcome_ignores_uniqueness() {
        assert_eq!(score_match(s(0, 1), Some(s(2, 1)), true), 0);
        assert_eq!(score_match(s(1, 1), Some(s(2, 1)), false), 0);
    }

    #[test]
    fn test_uniqueness_doubles_correct_predictions() {
        for (predicted, actual) in [(s(2, 1), s(2, 1)), (s(4, 0), s(2, 1)), (s(0, 0), s(2, 2))] {
            let plain = score_match(predicted, Some(actual), false);
            let unique = score_match(predicted, Some(actual), true);
            assert!(plain > 0);
            assert_eq!(unique, 2 * plain);
        }
    }

    #[test]
    fn test_exact_never_scores_below_outcome_only() {
        let actual = s(3, 1);
        for unique in [false, true] {
            let exact = score_match(actual, Some(actual), unique);
            for home in 0..6 {
                for away in 0..6 {
                    assert!(exact >= score_match(s(home, away), Some(actual), unique));
                }
            }
        }
    }
}
