use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeekSettings {
    pub week: i32,
    pub prediction_deadline: Option<NaiveDateTime>,
}

impl WeekSettings {
    /// Predictions are accepted up to and including the deadline.
    /// A week without a deadline never closes.
    pub fn accepts_predictions_at(&self, now: NaiveDateTime) -> bool {
        match self.prediction_deadline {
            Some(deadline) => now <= deadline,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 9)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_open_week_without_deadline() {
        let week = WeekSettings {
            week: 1,
            prediction_deadline: None,
        };
        assert!(week.accepts_predictions_at(at(23, 59)));
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let week = WeekSettings {
            week: 1,
            prediction_deadline: Some(at(23, 59)),
        };
        assert!(week.accepts_predictions_at(at(12, 0)));
        assert!(week.accepts_predictions_at(at(23, 59)));
    }

    #[test]
    fn test_closed_after_deadline() {
        let week = WeekSettings {
            week: 2,
            prediction_deadline: Some(at(18, 0)),
        };
        assert!(!week.accepts_predictions_at(at(18, 1)));
    }
}
