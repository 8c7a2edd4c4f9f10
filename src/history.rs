use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PERIOD_GAP_TOLERANCE_DAYS;
use crate::models::{CycleLog, CycleSettings};

/// A run of period days. `end` is `None` while the period may still be going.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEpisode {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_periods: usize,
    pub avg_cycle_length: Option<f32>,
    pub avg_period_length: Option<f32>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

/// Upsert `log` by date. The first period log ever recorded also becomes the
/// cycle anchor; returns `true` when that happened.
pub fn record_cycle_log(
    settings: &mut CycleSettings,
    logs: &mut Vec<CycleLog>,
    log: CycleLog,
) -> bool {
    let sets_anchor = log.is_period && settings.last_period_start.is_none();
    if sets_anchor {
        settings.last_period_start = Some(log.date);
    }

    match logs.iter_mut().find(|l| l.date == log.date) {
        Some(existing) => *existing = log,
        None => {
            logs.push(log);
            logs.sort_by_key(|l| l.date);
        }
    }

    sets_anchor
}

/// Remove the log for `date`; `false` when there was none.
pub fn remove_cycle_log(logs: &mut Vec<CycleLog>, date: NaiveDate) -> bool {
    let before = logs.len();
    logs.retain(|l| l.date != date);
    logs.len() != before
}

/// Group period days into episodes.
pub fn period_episodes(logs: &[CycleLog], today: NaiveDate) -> Vec<PeriodEpisode> {
    let mut period_days: Vec<NaiveDate> = logs
        .iter()
        .filter(|l| l.is_period)
        .map(|l| l.date)
        .collect();
    period_days.sort();
    period_days.dedup();

    let Some((&first, rest)) = period_days.split_first() else {
        return Vec::new();
    };

    let mut episodes = Vec::new();
    let mut start = first;
    let mut end = first;

    for &day in rest {
        if (day - end).num_days() <= PERIOD_GAP_TOLERANCE_DAYS {
            end = day;
        } else {
            episodes.push(PeriodEpisode {
                start,
                end: Some(end),
            });
            start = day;
            end = day;
        }
    }

    let still_open = (today - end).num_days() <= PERIOD_GAP_TOLERANCE_DAYS;
    episodes.push(PeriodEpisode {
        start,
        end: (!still_open).then_some(end),
    });

    episodes
}

pub fn history_stats(logs: &[CycleLog], today: NaiveDate) -> HistoryStats {
    let episodes = period_episodes(logs, today);
    let Some(last) = episodes.last() else {
        return HistoryStats::default();
    };

    let period_lengths: Vec<f32> = episodes
        .iter()
        .filter_map(|e| e.end.map(|end| (end - e.start).num_days() as f32 + 1.0))
        .collect();

    let cycle_lengths: Vec<i64> = episodes
        .windows(2)
        .map(|w| (w[1].start - w[0].start).num_days())
        .collect();

    HistoryStats {
        total_periods: episodes.len(),
        avg_cycle_length: mean(cycle_lengths.iter().map(|&l| l as f32)),
        avg_period_length: mean(period_lengths.iter().copied()),
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: Some(last.start),
        last_period_end: last.end,
    }
}

fn mean(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f32)
}
