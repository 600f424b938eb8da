//! Learning-time totals.

use chrono::NaiveDate;
use serde::Serialize;

use crate::date::trailing_window;
use crate::records::LearningSession;

/// Days shown in the focus trend.
pub const TREND_DAYS: usize = 14;

/// Focus minutes logged on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusDay {
    pub date: NaiveDate,
    pub minutes: u32,
}

/// Sum of session minutes dated `day`. Saturates instead of overflowing.
pub fn total_minutes(sessions: &[LearningSession], day: NaiveDate) -> u32 {
    sessions
        .iter()
        .filter(|session| session.date == Some(day))
        .fold(0u32, |acc, session| acc.saturating_add(session.duration_minutes))
}

/// Minutes per day over the trailing window, oldest first.
pub fn focus_trend(sessions: &[LearningSession], reference: NaiveDate, days: usize) -> Vec<FocusDay> {
    trailing_window(reference, days)
        .into_iter()
        .map(|date| FocusDay {
            date,
            minutes: total_minutes(sessions, date),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionId;

    fn session(id: &str, date: Option<NaiveDate>, minutes: u32) -> LearningSession {
        LearningSession {
            id: SessionId::new(id).unwrap(),
            date,
            duration_minutes: minutes,
            subject: "Spanish".to_string(),
            resource_type: Some("course".to_string()),
            resource_name: None,
        }
    }

    #[test]
    fn totals_only_count_matching_day() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let sessions = [
            session("a", Some(day), 25),
            session("b", Some(day), 35),
            session("c", day.pred_opt(), 50),
            session("d", None, 90),
        ];
        assert_eq!(total_minutes(&sessions, day), 60);
    }

    #[test]
    fn trend_covers_every_day_in_window() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let sessions = [session("a", Some(day), 25), session("b", day.pred_opt(), 40)];

        let trend = focus_trend(&sessions, day, TREND_DAYS);

        assert_eq!(trend.len(), TREND_DAYS);
        assert_eq!(trend[TREND_DAYS - 1], FocusDay { date: day, minutes: 25 });
        assert_eq!(trend[TREND_DAYS - 2].minutes, 40);
        assert!(trend[..TREND_DAYS - 2].iter().all(|d| d.minutes == 0));
    }

    #[test]
    fn total_saturates() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let sessions = [session("a", Some(day), u32::MAX), session("b", Some(day), 10)];
        assert_eq!(total_minutes(&sessions, day), u32::MAX);
    }
}
