use std::collections::BTreeMap;

use super::outcome::{Outcome, Scoreline};

/// Correct predictors of one fixture, counted per cohort.
///
/// The tally is built from every prediction submitted for the fixture, each
/// member appearing at most once. A candidate is unique when they are correct
/// and the count for their cohort is exactly one, i.e. no other member of
/// that cohort is correct. Only predictions are consulted, never points.
#[derive(Debug, Clone)]
pub struct CohortTally<'a> {
    actual: Outcome,
    correct_by_cohort: BTreeMap<&'a str, usize>,
}

impl<'a> CohortTally<'a> {
    pub fn new(
        actual: Scoreline,
        predictions: impl IntoIterator<Item = (&'a str, Scoreline)>,
    ) -> Self {
        let actual = actual.outcome();
        let mut correct_by_cohort: BTreeMap<&'a str, usize> = BTreeMap::new();

        for (cohort, predicted) in predictions {
            if predicted.outcome() == actual {
                *correct_by_cohort.entry(cohort).or_default() += 1;
            }
        }

        Self {
            actual,
            correct_by_cohort,
        }
    }

    /// Whether the candidate, whose own prediction is part of the tally, is
    /// the only correct predictor in `cohort`.
    pub fn is_unique_correct(&self, cohort: &str, predicted: Scoreline) -> bool {
        if predicted.outcome() != self.actual {
            return false;
        }

        let others_correct = self
            .correct_by_cohort
            .get(cohort)
            .map_or(0, |count| count.saturating_sub(1));

        others_correct == 0
    }

    pub fn correct_in(&self, cohort: &str) -> usize {
        self.correct_by_cohort.get(cohort).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(home: u32, away: u32) -> Scoreline {
        Scoreline::new(home, away)
    }

    /// Literal reading of the rule: correct, and no other same-cohort
    /// member correct.
    fn brute_force(
        actual: Scoreline,
        entries: &[(&str, &str, Scoreline)],
        candidate: &str,
    ) -> bool {
        let Some((_, cohort, predicted)) = entries.iter().find(|(u, _, _)| *u == candidate) else {
            return false;
        };
        predicted.outcome() == actual.outcome()
            && !entries.iter().any(|(u, c, p)| {
                *u != candidate && c == cohort && p.outcome() == actual.outcome()
            })
    }

    #[test]
    fn test_lone_member_is_unique_when_correct() {
        let tally = CohortTally::new(s(2, 1), [("A", s(1, 0))]);
        assert!(tally.is_unique_correct("A", s(1, 0)));
    }

    #[test]
    fn test_two_correct_members_cancel_bonus() {
        let tally = CohortTally::new(s(2, 1), [("A", s(2, 1)), ("A", s(1, 0))]);
        assert!(!tally.is_unique_correct("A", s(2, 1)));
        assert!(!tally.is_unique_correct("A", s(1, 0)));
    }

    #[test]
    fn test_wrong_peers_do_not_cancel_bonus() {
        let tally = CohortTally::new(s(0, 0), [("A", s(1, 1)), ("A", s(0, 2)), ("A", s(3, 1))]);
        assert!(tally.is_unique_correct("A", s(1, 1)));
        assert!(!tally.is_unique_correct("A", s(0, 2)));
    }

    #[test]
    fn test_cohorts_are_independent() {
        let tally = CohortTally::new(s(1, 2), [("A", s(0, 1)), ("B", s(1, 3)), ("B", s(0, 0))]);
        assert!(tally.is_unique_correct("A", s(0, 1)));
        assert!(tally.is_unique_correct("B", s(1, 3)));
        assert_eq!(tally.correct_in("A"), 1);
        assert_eq!(tally.correct_in("C"), 0);
    }

    #[test]
    fn test_three_correct_is_not_a_singleton() {
        let tally = CohortTally::new(s(3, 0), [("A", s(1, 0)), ("A", s(2, 0)), ("A", s(3, 0))]);
        assert_eq!(tally.correct_in("A"), 3);
        assert!(!tally.is_unique_correct("A", s(3, 0)));
    }

    #[test]
    fn test_matches_per_candidate_definition() {
        let actual = s(2, 1);
        let entries = [
            ("ana", "A", s(2, 1)),
            ("bob", "A", s(0, 0)),
            ("cleo", "B", s(1, 0)),
            ("dan", "B", s(3, 2)),
            ("eve", "C", s(0, 4)),
            ("fay", "D", s(5, 0)),
        ];
        let tally = CohortTally::new(actual, entries.iter().map(|(_, c, p)| (*c, *p)));

        for (username, cohort, predicted) in &entries {
            assert_eq!(
                tally.is_unique_correct(cohort, *predicted),
                brute_force(actual, &entries, username),
                "mismatch for {username}"
            );
        }
    }
}
