//! Cycle date and phase arithmetic
//!
//! Everything here is a pure function of its arguments. `today` is always
//! passed in; nothing reads the system clock.
//!
//! All queries count from `last_period_start`. Without it, or for a date
//! before it, they return `None` rather than guess.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{FERTILE_DAYS_AFTER_OVULATION, FERTILE_DAYS_BEFORE_OVULATION, LUTEAL_PHASE_DAYS};
use crate::error::Rejection;
use crate::models::{CycleSettings, Language};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Period,
    Ovulation,
    Fertile,
    Follicular,
    Luteal,
}

impl CyclePhase {
    pub fn key(self) -> &'static str {
        match self {
            CyclePhase::Period => "period",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Fertile => "fertile",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Luteal => "luteal",
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match self {
            CyclePhase::Period => language.pick("Period", "الدورة"),
            CyclePhase::Ovulation => language.pick("Ovulation", "الإباضة"),
            CyclePhase::Fertile => language.pick("Fertile window", "فترة الخصوبة"),
            CyclePhase::Follicular => language.pick("Follicular phase", "المرحلة الجريبية"),
            CyclePhase::Luteal => language.pick("Luteal phase", "المرحلة الأصفرية"),
        }
    }

    /// Ring color for the phase.
    pub fn color(self) -> &'static str {
        match self {
            CyclePhase::Period => "#E63946",
            CyclePhase::Ovulation => "#9D4EDD",
            CyclePhase::Fertile => "#C77DFF",
            CyclePhase::Follicular => "#F4A261",
            CyclePhase::Luteal => "#2A9D8F",
        }
    }
}

/// Neutral label for "no tracking data".
pub fn phase_label_or_neutral(phase: Option<CyclePhase>, language: Language) -> &'static str {
    match phase {
        Some(phase) => phase.label(language),
        None => language.pick("Not tracked yet", "لم يتم التتبع بعد"),
    }
}

/// Cycle-relative fertile window, both ends inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FertileWindow {
    pub start: i32,
    pub end: i32,
}

impl FertileWindow {
    pub fn contains(&self, day: i32) -> bool {
        day >= self.start && day <= self.end
    }
}

/// Calendar dates of the fertile window in the cycle containing `today`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FertileDates {
    pub fertile_start: NaiveDate,
    pub fertile_end: NaiveDate,
    pub ovulation_day: NaiveDate,
}

/// Everything a home screen needs about today, in one call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CycleSnapshot {
    pub cycle_day: u32,
    pub cycle_length: u32,
    pub phase: CyclePhase,
    pub next_period_date: NaiveDate,
    pub days_until_next_period: i64,
    pub fertile: FertileDates,
}

/// Calendar days from `start` to `end`; negative when `end` is earlier.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Days since the anchor, or `None` when untracked, before the anchor, or
/// the cycle length is zero.
fn days_since_start(settings: &CycleSettings, date: NaiveDate) -> Option<i64> {
    let anchor = settings.last_period_start?;
    if settings.cycle_length == 0 {
        return None;
    }
    let days = days_between(anchor, date);
    (days >= 0).then_some(days)
}

/// 1-indexed day of the cycle `date` falls on.
pub fn cycle_day_on(settings: &CycleSettings, date: NaiveDate) -> Option<u32> {
    let days = days_since_start(settings, date)?;
    let day = days.rem_euclid(i64::from(settings.cycle_length)) + 1;
    Some(day as u32)
}

pub fn current_cycle_day(settings: &CycleSettings, today: NaiveDate) -> Option<u32> {
    cycle_day_on(settings, today)
}

/// Cycle day of ovulation, assuming a fixed luteal phase.
/// Cycles shorter than the luteal phase yield zero or a negative day.
pub fn ovulation_day(cycle_length: u32) -> i32 {
    cycle_length as i32 - LUTEAL_PHASE_DAYS
}

pub fn fertile_window(cycle_length: u32) -> FertileWindow {
    let ovulation = ovulation_day(cycle_length);
    FertileWindow {
        start: ovulation - FERTILE_DAYS_BEFORE_OVULATION,
        end: ovulation + FERTILE_DAYS_AFTER_OVULATION,
    }
}

/// Classify a cycle day. First match wins: period, ovulation, fertile,
/// follicular, luteal.
pub fn phase_for_day(day: u32, cycle_length: u32, period_length: u32) -> CyclePhase {
    let ovulation = ovulation_day(cycle_length);
    let day_signed = day as i32;

    if day <= period_length {
        CyclePhase::Period
    } else if day_signed == ovulation {
        CyclePhase::Ovulation
    } else if fertile_window(cycle_length).contains(day_signed) {
        CyclePhase::Fertile
    } else if day_signed < ovulation {
        CyclePhase::Follicular
    } else {
        CyclePhase::Luteal
    }
}

pub fn phase_on(settings: &CycleSettings, date: NaiveDate) -> Option<CyclePhase> {
    let day = cycle_day_on(settings, date)?;
    Some(phase_for_day(day, settings.cycle_length, settings.period_length))
}

pub fn current_phase(settings: &CycleSettings, today: NaiveDate) -> Option<CyclePhase> {
    phase_on(settings, today)
}

/// Start of the next period, always strictly after `today`.
pub fn next_period_date(settings: &CycleSettings, today: NaiveDate) -> Option<NaiveDate> {
    let days = days_since_start(settings, today)?;
    let anchor = settings.last_period_start?;
    let length = i64::from(settings.cycle_length);
    let cycles_completed = days.div_euclid(length);
    Some(add_days(anchor, (cycles_completed + 1) * length))
}

pub fn days_until_next_period(settings: &CycleSettings, today: NaiveDate) -> Option<i64> {
    next_period_date(settings, today).map(|next| days_between(today, next))
}

/// Calendar date of `target_day` in the cycle containing `today`, found by
/// offsetting from today rather than walking from the anchor.
pub fn date_for_cycle_day(
    target_day: u32,
    settings: &CycleSettings,
    today: NaiveDate,
) -> Result<NaiveDate, Rejection> {
    if target_day == 0 || target_day > settings.cycle_length {
        tracing::warn!(
            "Cycle day {} outside 1..={}",
            target_day,
            settings.cycle_length
        );
        return Err(Rejection::CycleDayOutOfRange {
            day: target_day,
            cycle_length: settings.cycle_length,
        });
    }
    let current = current_cycle_day(settings, today).ok_or(Rejection::NoCycleData)?;
    Ok(add_days(today, i64::from(target_day) - i64::from(current)))
}

/// Fertile window and ovulation as calendar dates for the current cycle.
pub fn fertile_window_dates(settings: &CycleSettings, today: NaiveDate) -> Option<FertileDates> {
    let current = i64::from(current_cycle_day(settings, today)?);
    let cycle_start = add_days(today, 1 - current);
    let window = fertile_window(settings.cycle_length);
    let at = |day: i32| add_days(cycle_start, i64::from(day) - 1);

    Some(FertileDates {
        fertile_start: at(window.start),
        fertile_end: at(window.end),
        ovulation_day: at(ovulation_day(settings.cycle_length)),
    })
}

pub fn snapshot(settings: &CycleSettings, today: NaiveDate) -> Option<CycleSnapshot> {
    let cycle_day = current_cycle_day(settings, today)?;
    let next_period_date = next_period_date(settings, today)?;

    Some(CycleSnapshot {
        cycle_day,
        cycle_length: settings.cycle_length,
        phase: phase_for_day(cycle_day, settings.cycle_length, settings.period_length),
        next_period_date,
        days_until_next_period: days_between(today, next_period_date),
        fertile: fertile_window_dates(settings, today)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn settings(anchor: &str, cycle_length: u32, period_length: u32) -> CycleSettings {
        CycleSettings {
            cycle_length,
            period_length,
            last_period_start: Some(date(anchor)),
        }
    }

    #[test]
    fn no_anchor_means_no_answers() {
        let untracked = CycleSettings::default();
        let today = date("2024-01-10");
        assert_eq!(current_cycle_day(&untracked, today), None);
        assert_eq!(current_phase(&untracked, today), None);
        assert_eq!(next_period_date(&untracked, today), None);
        assert!(snapshot(&untracked, today).is_none());
        assert_eq!(
            date_for_cycle_day(3, &untracked, today),
            Err(Rejection::NoCycleData)
        );
    }

    #[test]
    fn dates_before_anchor_are_untracked() {
        let s = settings("2024-01-10", 28, 5);
        assert_eq!(cycle_day_on(&s, date("2024-01-09")), None);
        assert_eq!(phase_on(&s, date("2023-12-25")), None);
        assert_eq!(cycle_day_on(&s, date("2024-01-10")), Some(1));
    }

    #[test]
    fn standard_cycle_phases() {
        let s = settings("2024-01-01", 28, 5);

        assert_eq!(current_cycle_day(&s, date("2024-01-03")), Some(3));
        assert_eq!(current_phase(&s, date("2024-01-03")), Some(CyclePhase::Period));

        assert_eq!(ovulation_day(28), 14);
        assert_eq!(fertile_window(28), FertileWindow { start: 9, end: 15 });
        assert_eq!(current_cycle_day(&s, date("2024-01-15")), Some(15));
        assert_eq!(current_phase(&s, date("2024-01-15")), Some(CyclePhase::Fertile));
        assert_eq!(current_phase(&s, date("2024-01-14")), Some(CyclePhase::Ovulation));

        assert_eq!(current_phase(&s, date("2024-01-07")), Some(CyclePhase::Follicular));
        assert_eq!(current_phase(&s, date("2024-01-20")), Some(CyclePhase::Luteal));
    }

    #[test]
    fn cycle_day_wraps() {
        let s = settings("2024-01-01", 28, 5);
        assert_eq!(current_cycle_day(&s, date("2024-01-28")), Some(28));
        assert_eq!(current_cycle_day(&s, date("2024-01-29")), Some(1));
        assert_eq!(current_phase(&s, date("2024-01-30")), Some(CyclePhase::Period));
    }

    #[test]
    fn period_wins_over_overlapping_ranges() {
        // ovulation on day 7, fertile 2..=8, period 1..=8
        for day in 1..=8 {
            assert_eq!(phase_for_day(day, 21, 8), CyclePhase::Period);
        }
        assert_eq!(phase_for_day(9, 21, 8), CyclePhase::Luteal);
    }

    #[test]
    fn short_cycles_keep_unclamped_ovulation() {
        assert_eq!(ovulation_day(14), 0);
        assert_eq!(ovulation_day(10), -4);
        assert_eq!(phase_for_day(6, 10, 3), CyclePhase::Luteal);
    }

    #[test]
    fn classification_is_stable() {
        for length in 15..=40 {
            for period in 1..=8 {
                for day in 1..=length {
                    assert_eq!(
                        phase_for_day(day, length, period),
                        phase_for_day(day, length, period)
                    );
                }
            }
        }
    }

    #[test]
    fn next_period_is_strictly_future() {
        let s = settings("2024-01-01", 28, 5);
        assert_eq!(next_period_date(&s, date("2024-01-01")), Some(date("2024-01-29")));
        assert_eq!(next_period_date(&s, date("2024-01-28")), Some(date("2024-01-29")));
        assert_eq!(next_period_date(&s, date("2024-01-29")), Some(date("2024-02-26")));
        assert_eq!(days_until_next_period(&s, date("2024-01-20")), Some(9));
    }

    #[test]
    fn date_for_cycle_day_round_trips() {
        let s = settings("2023-11-17", 29, 6);
        let mut today = date("2023-11-17");
        for _ in 0..120 {
            let day = current_cycle_day(&s, today).unwrap();
            assert_eq!(date_for_cycle_day(day, &s, today), Ok(today));
            today = add_days(today, 1);
        }
    }

    #[test]
    fn date_for_cycle_day_offsets_from_today() {
        let s = settings("2024-01-01", 28, 5);
        let today = date("2024-01-10");
        assert_eq!(date_for_cycle_day(14, &s, today), Ok(date("2024-01-14")));
        assert_eq!(date_for_cycle_day(1, &s, today), Ok(date("2024-01-01")));
    }

    #[test]
    fn date_for_cycle_day_rejects_out_of_range() {
        let s = settings("2024-01-01", 28, 5);
        let today = date("2024-01-10");
        assert_eq!(
            date_for_cycle_day(0, &s, today),
            Err(Rejection::CycleDayOutOfRange { day: 0, cycle_length: 28 })
        );
        assert!(date_for_cycle_day(29, &s, today).is_err());
    }

    #[test]
    fn fertile_dates_in_second_cycle() {
        let s = settings("2024-01-01", 28, 5);
        let fertile = fertile_window_dates(&s, date("2024-02-01")).unwrap();
        assert_eq!(fertile.fertile_start, date("2024-02-06"));
        assert_eq!(fertile.ovulation_day, date("2024-02-11"));
        assert_eq!(fertile.fertile_end, date("2024-02-12"));
    }

    #[test]
    fn snapshot_bundles_today() {
        let s = settings("2024-01-01", 28, 5);
        let snap = snapshot(&s, date("2024-01-14")).unwrap();
        assert_eq!(snap.cycle_day, 14);
        assert_eq!(snap.phase, CyclePhase::Ovulation);
        assert_eq!(snap.next_period_date, date("2024-01-29"));
        assert_eq!(snap.days_until_next_period, 15);
    }

    #[test]
    fn neutral_label_for_untracked() {
        assert_eq!(phase_label_or_neutral(None, Language::En), "Not tracked yet");
        assert_eq!(
            phase_label_or_neutral(Some(CyclePhase::Luteal), Language::En),
            "Luteal phase"
        );
    }
}
