//! Import of the JSON data files kept by the first version of the league.
//!
//! Layout of the data directory:
//! - `users.json`: `{ username: { "group": "A", ... } }`
//! - `predictions.json`: `{ username: { week: { "Home vs Away": { "home": 2, "away": 1 } } } }`
//! - `actual_results.json`: `{ week: { "Home vs Away": { "home": 2, "away": 1 } } }`
//! - `fixtures.json`: `[ { "match": "Home vs Away", "date": "2025-06-10", "time": "19:45", "order": 1 } ]`
//! - `current_week.json`: `1` or `"1"`
//! - `deadlines.json`: `{ week: "2025-06-09T23:59" }`
//!
//! Every file is optional. Only the current week's fixtures are listed in
//! `fixtures.json`; fixtures of other weeks are rebuilt from the matches
//! their predictions and results reference.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use storage::models::{DEFAULT_COHORT, fixture_id};
use storage::repository::fixture::NewFixture;

use crate::error::Result;

const DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const KICKOFF_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A `{"home": .., "away": ..}` entry, kept raw so that one bad score is
/// skipped on its own instead of failing the whole file.
pub type LegacyScore = serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyUser {
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyFixture {
    #[serde(rename = "match")]
    pub match_name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegacyWeek {
    Number(i32),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct LegacyData {
    pub users: BTreeMap<String, LegacyUser>,
    pub predictions: BTreeMap<String, BTreeMap<String, BTreeMap<String, LegacyScore>>>,
    pub actual_results: BTreeMap<String, BTreeMap<String, LegacyScore>>,
    pub fixtures: Vec<LegacyFixture>,
    pub current_week: Option<LegacyWeek>,
    pub deadlines: BTreeMap<String, String>,
}

impl LegacyData {
    pub async fn load_dir(dir: &Path) -> Result<Self> {
        Ok(Self {
            users: read_optional(dir, "users.json").await?,
            predictions: read_optional(dir, "predictions.json").await?,
            actual_results: read_optional(dir, "actual_results.json").await?,
            fixtures: read_optional(dir, "fixtures.json").await?,
            current_week: read_optional(dir, "current_week.json").await?,
            deadlines: read_optional(dir, "deadlines.json").await?,
        })
    }
}

async fn read_optional<T: DeserializeOwned + Default>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(name);
    if !tokio::fs::try_exists(&path).await? {
        tracing::warn!("{} not found, treating as empty", path.display());
        return Ok(T::default());
    }

    let content = tokio::fs::read_to_string(&path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Everything to write, already validated and keyed the way storage expects.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    pub current_week: i32,
    /// username -> cohort
    pub members: BTreeMap<String, String>,
    pub fixtures: BTreeMap<i32, Vec<NewFixture>>,
    /// (username, week) -> (fixture, home, away)
    pub predictions: BTreeMap<(String, i32), Vec<(String, i32, i32)>>,
    /// week -> (fixture, home, away)
    pub results: BTreeMap<i32, Vec<(String, i32, i32)>>,
    pub deadlines: BTreeMap<i32, NaiveDateTime>,
    /// Human readable reasons for every entry left out.
    pub skipped: Vec<String>,
}

impl ImportPlan {
    /// `fixtures_week` selects the week `fixtures.json` belongs to, defaulting
    /// to the legacy current week.
    pub fn from_legacy(data: LegacyData, fixtures_week: Option<i32>) -> Self {
        let mut plan = Self {
            current_week: 1,
            ..Self::default()
        };

        if let Some(raw) = &data.current_week {
            match parse_week(raw) {
                Some(week) => plan.current_week = week,
                None => plan.skipped.push(format!("current week {:?} is not a week number", raw)),
            }
        }

        plan.members = data
            .users
            .into_iter()
            .map(|(username, user)| {
                let cohort = user
                    .group
                    .filter(|g| !g.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_COHORT.to_string());
                (username, cohort)
            })
            .collect();

        for (week, deadline) in &data.deadlines {
            match (parse_week_key(week), NaiveDateTime::parse_from_str(deadline, DEADLINE_FORMAT)) {
                (Some(week), Ok(deadline)) => {
                    plan.deadlines.insert(week, deadline);
                }
                _ => plan
                    .skipped
                    .push(format!("deadline {:?} for week {:?}", deadline, week)),
            }
        }

        let mut fixtures: BTreeMap<i32, BTreeMap<String, NewFixture>> = BTreeMap::new();
        let listed_week = fixtures_week.unwrap_or(plan.current_week);
        let mut listed: BTreeMap<String, NewFixture> = BTreeMap::new();

        for (index, legacy) in data.fixtures.iter().enumerate() {
            match split_match(&legacy.match_name) {
                Some((home, away)) => {
                    listed.insert(
                        fixture_id(&home, &away),
                        NewFixture {
                            kickoff: parse_kickoff(legacy),
                            display_order: legacy.order.unwrap_or(index as i32 + 1),
                            home_team: home,
                            away_team: away,
                        },
                    );
                }
                None => plan
                    .skipped
                    .push(format!("fixture {:?} is not 'Home vs Away'", legacy.match_name)),
            }
        }
        fixtures.insert(listed_week, listed);

        for (week_key, by_match) in data.actual_results {
            let Some(week) = parse_week_key(&week_key) else {
                plan.skipped.push(format!("results of week {:?}", week_key));
                continue;
            };
            for (match_name, score) in by_match {
                match plan_line(&mut fixtures, week, &match_name, &score) {
                    Ok(line) => plan.results.entry(week).or_default().push(line),
                    Err(reason) => plan.skipped.push(format!("result {}: {}", match_name, reason)),
                }
            }
        }

        for (username, by_week) in data.predictions {
            for (week_key, by_match) in by_week {
                let Some(week) = parse_week_key(&week_key) else {
                    plan.skipped
                        .push(format!("predictions of {} for week {:?}", username, week_key));
                    continue;
                };
                for (match_name, score) in by_match {
                    match plan_line(&mut fixtures, week, &match_name, &score) {
                        Ok(line) => plan
                            .predictions
                            .entry((username.clone(), week))
                            .or_default()
                            .push(line),
                        Err(reason) => plan.skipped.push(format!(
                            "prediction of {} for {}: {}",
                            username, match_name, reason
                        )),
                    }
                }
            }
        }

        plan.fixtures = fixtures
            .into_iter()
            .filter(|(_, by_id)| !by_id.is_empty())
            .map(|(week, by_id)| {
                let mut list: Vec<NewFixture> = by_id.into_values().collect();
                list.sort_by_key(|f| f.display_order);
                (week, list)
            })
            .collect();

        plan
    }

    /// Weeks whose standings must be recomputed after the import.
    pub fn weeks_with_results(&self) -> Vec<i32> {
        self.results.keys().copied().collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} members, {} fixtures over {} weeks, {} prediction sets, {} weeks of results, {} skipped",
            self.members.len(),
            self.fixtures.values().map(Vec::len).sum::<usize>(),
            self.fixtures.len(),
            self.predictions.len(),
            self.results.len(),
            self.skipped.len()
        )
    }
}

/// Validates one score line and makes sure its fixture exists in the week.
fn plan_line(
    fixtures: &mut BTreeMap<i32, BTreeMap<String, NewFixture>>,
    week: i32,
    match_name: &str,
    score: &LegacyScore,
) -> std::result::Result<(String, i32, i32), String> {
    let (home_team, away_team) =
        split_match(match_name).ok_or_else(|| "not 'Home vs Away'".to_string())?;

    let (Some(home), Some(away)) = (score_side(score, "home"), score_side(score, "away")) else {
        return Err(format!("invalid score {}", score));
    };

    let id = fixture_id(&home_team, &away_team);
    let week_fixtures = fixtures.entry(week).or_default();
    let next_order = week_fixtures.len() as i32 + 1;
    week_fixtures.entry(id.clone()).or_insert(NewFixture {
        home_team,
        away_team,
        kickoff: None,
        display_order: next_order,
    });

    Ok((id, home, away))
}

/// Non-negative whole number, as a JSON number or a numeric string.
fn score_side(score: &LegacyScore, side: &str) -> Option<i32> {
    let raw = match score.get(side)? {
        Value::Number(n) => n.as_i64()?,
        Value::String(text) => text.trim().parse().ok()?,
        _ => return None,
    };
    i32::try_from(raw).ok().filter(|s| *s >= 0)
}

fn split_match(match_name: &str) -> Option<(String, String)> {
    let (home, away) = match_name.split_once(" vs ")?;
    let (home, away) = (home.trim(), away.trim());
    if home.is_empty() || away.is_empty() {
        return None;
    }
    Some((home.to_string(), away.to_string()))
}

fn parse_kickoff(fixture: &LegacyFixture) -> Option<NaiveDateTime> {
    let date = fixture.date.as_deref()?;
    let time = fixture.time.as_deref()?;
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), KICKOFF_FORMAT).ok()
}

fn parse_week_key(raw: &str) -> Option<i32> {
    raw.trim().parse().ok().filter(|w| *w > 0)
}

fn parse_week(raw: &LegacyWeek) -> Option<i32> {
    match raw {
        LegacyWeek::Number(week) => Some(*week).filter(|w| *w > 0),
        LegacyWeek::Text(text) => parse_week_key(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> LegacyData {
        LegacyData {
            users: serde_json::from_str(
                r#"{
                    "ana": {"password": "x", "points": 9, "group": "A", "points_by_week": {"1": 9}},
                    "bob": {"password": "y", "points": 0, "points_by_week": {}},
                    "cleo": {"group": "B"}
                }"#,
            )
            .unwrap(),
            predictions: serde_json::from_str(
                r#"{
                    "ana": {
                        "1": {"Leeds vs Everton": {"home": 2, "away": 1}},
                        "2": {"Fulham vs Brentford": {"home": 0, "away": 0}}
                    },
                    "bob": {"1": {"Leeds vs Everton": {"home": -1, "away": 1}}}
                }"#,
            )
            .unwrap(),
            actual_results: serde_json::from_str(
                r#"{"1": {"Leeds vs Everton": {"home": 2, "away": 1}}}"#,
            )
            .unwrap(),
            fixtures: serde_json::from_str(
                r#"[
                    {"match": "Fulham vs Brentford", "date": "2025-06-20", "time": "15:00", "order": 2},
                    {"match": "Arsenal vs Chelsea", "date": "2025-06-20", "time": "17:30", "order": 1},
                    {"match": "not a fixture"}
                ]"#,
            )
            .unwrap(),
            current_week: serde_json::from_str(r#""2""#).unwrap(),
            deadlines: serde_json::from_str(r#"{"1": "2025-06-09T23:59", "2": "soon"}"#).unwrap(),
        }
    }

    #[test]
    fn test_members_default_to_cohort_a() {
        let plan = ImportPlan::from_legacy(data(), None);
        assert_eq!(plan.members["ana"], "A");
        assert_eq!(plan.members["bob"], DEFAULT_COHORT);
        assert_eq!(plan.members["cleo"], "B");
    }

    #[test]
    fn test_current_week_accepts_text() {
        let plan = ImportPlan::from_legacy(data(), None);
        assert_eq!(plan.current_week, 2);
    }

    #[test]
    fn test_listed_fixtures_go_to_current_week_in_order() {
        let plan = ImportPlan::from_legacy(data(), None);
        let week_two: Vec<String> = plan.fixtures[&2]
            .iter()
            .map(|f| fixture_id(&f.home_team, &f.away_team))
            .collect();
        assert_eq!(week_two, vec!["Arsenal vs Chelsea", "Fulham vs Brentford"]);
        assert!(plan.fixtures[&2][0].kickoff.is_some());
    }

    #[test]
    fn test_referenced_matches_create_fixtures() {
        let plan = ImportPlan::from_legacy(data(), None);
        assert_eq!(plan.fixtures[&1].len(), 1);
        assert_eq!(plan.fixtures[&1][0].home_team, "Leeds");
        assert_eq!(plan.weeks_with_results(), vec![1]);
    }

    #[test]
    fn test_invalid_entries_are_skipped_not_fatal() {
        let plan = ImportPlan::from_legacy(data(), None);
        assert!(!plan.predictions.contains_key(&("bob".to_string(), 1)));
        assert_eq!(plan.predictions[&("ana".to_string(), 1)].len(), 1);
        // bad fixture name, bob's negative score, unparseable deadline
        assert_eq!(plan.skipped.len(), 3);
        assert_eq!(plan.deadlines.len(), 1);
    }

    #[test]
    fn test_fixtures_week_override() {
        let plan = ImportPlan::from_legacy(data(), Some(5));
        assert_eq!(plan.fixtures[&5].len(), 2);
        // week 2 still gets the fixture ana predicted
        assert_eq!(plan.fixtures[&2].len(), 1);
    }

    #[test]
    fn test_unreadable_scores_skip_single_entries() {
        let mut data = data();
        data.predictions = serde_json::from_str(
            r#"{
                "ana": {"1": {
                    "Leeds vs Everton": {"home": "2", "away": 1},
                    "Fulham vs Brentford": {"home": 1.5, "away": 0},
                    "Arsenal vs Chelsea": "2-1",
                    "Spurs vs Wolves": {"home": null, "away": 0}
                }},
                "bob": {"1": {"Leeds vs Everton": {"home": 0, "away": 0}}}
            }"#,
        )
        .unwrap();

        let plan = ImportPlan::from_legacy(data, None);

        assert_eq!(
            plan.predictions[&("ana".to_string(), 1)],
            vec![("Leeds vs Everton".to_string(), 2, 1)]
        );
        assert_eq!(plan.predictions[&("bob".to_string(), 1)].len(), 1);
        let score_skips = plan
            .skipped
            .iter()
            .filter(|reason| reason.contains("invalid score"))
            .count();
        assert_eq!(score_skips, 3);
    }

    #[test]
    fn test_split_match() {
        assert_eq!(
            split_match("Leeds vs Everton"),
            Some(("Leeds".to_string(), "Everton".to_string()))
        );
        assert_eq!(split_match("Leeds v Everton"), None);
        assert_eq!(split_match(" vs Everton"), None);
    }
}
