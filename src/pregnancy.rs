use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PREGNANCY_DAYS;
use crate::cycle::{add_days, days_between};
use crate::models::PregnancySettings;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PregnancyProgress {
    /// Completed weeks since the last menstrual period
    pub week: i64,
    /// Days into the current week, 0..=6
    pub day: i64,
    pub trimester: u8,
    pub days_remaining: i64,
    pub due_date: NaiveDate,
}

impl PregnancySettings {
    /// Due date is fixed here and not recomputed later.
    pub fn enable(lmp_date: NaiveDate) -> Self {
        Self {
            enabled: true,
            lmp_date: Some(lmp_date),
            due_date: Some(add_days(lmp_date, PREGNANCY_DAYS)),
        }
    }

    pub fn progress(&self, today: NaiveDate) -> Option<PregnancyProgress> {
        if !self.enabled {
            return None;
        }
        let lmp = self.lmp_date?;
        let due_date = self.due_date?;
        let elapsed = days_between(lmp, today).max(0);
        let week = elapsed / 7;

        Some(PregnancyProgress {
            week,
            day: elapsed % 7,
            trimester: match week {
                0..=12 => 1,
                13..=27 => 2,
                _ => 3,
            },
            days_remaining: days_between(today, due_date).max(0),
            due_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn due_date_is_forty_weeks_out() {
        let settings = PregnancySettings::enable(date("2024-01-01"));
        assert_eq!(settings.due_date, Some(date("2024-10-07")));
    }

    #[test]
    fn progress_by_week() {
        let settings = PregnancySettings::enable(date("2024-01-01"));
        let p = settings.progress(date("2024-04-10")).unwrap();
        assert_eq!((p.week, p.day), (14, 2));
        assert_eq!(p.trimester, 2);
        assert_eq!(p.days_remaining, 180);
    }

    #[test]
    fn overdue_keeps_zero_remaining() {
        let settings = PregnancySettings::enable(date("2024-01-01"));
        let p = settings.progress(date("2024-10-20")).unwrap();
        assert_eq!(p.days_remaining, 0);
        assert_eq!(p.trimester, 3);
    }

    #[test]
    fn disabled_has_no_progress() {
        assert!(PregnancySettings::default().progress(date("2024-01-01")).is_none());
    }
}
