//! Custom beauty routines and the daily AM/PM step checklist

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    BeautyRoutineLog, CustomRoutine, RoutineDraft, RoutineFrequency, RoutineSlot, RoutineTime,
};

/// Routine type used before `time` and `frequency` were split apart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LegacyRoutineType {
    Morning,
    Evening,
    Weekly,
    Monthly,
}

impl LegacyRoutineType {
    fn split(self) -> (RoutineTime, RoutineFrequency) {
        match self {
            LegacyRoutineType::Morning => (RoutineTime::Morning, RoutineFrequency::Daily),
            LegacyRoutineType::Evening => (RoutineTime::Evening, RoutineFrequency::Daily),
            LegacyRoutineType::Weekly => (RoutineTime::Any, RoutineFrequency::Weekly),
            LegacyRoutineType::Monthly => (RoutineTime::Any, RoutineFrequency::Monthly),
        }
    }
}

/// A routine as found in storage, in either the current or the legacy shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRoutine {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub time: Option<RoutineTime>,
    #[serde(default)]
    pub frequency: Option<RoutineFrequency>,
    #[serde(default, rename = "type")]
    pub legacy_type: Option<LegacyRoutineType>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_enabled: Option<bool>,
    #[serde(default)]
    pub reminder_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Bring stored routines to the current shape. The flag is `true` when any
/// record changed and the collection should be written back once.
pub fn migrate_routines(stored: Vec<StoredRoutine>) -> (Vec<CustomRoutine>, bool) {
    let mut dirty = false;

    let routines = stored
        .into_iter()
        .map(|r| {
            let (legacy_time, legacy_frequency) = r
                .legacy_type
                .map(LegacyRoutineType::split)
                .unwrap_or((RoutineTime::Any, RoutineFrequency::Daily));

            if r.legacy_type.is_some()
                || r.time.is_none()
                || r.frequency.is_none()
                || r.reminder_enabled.is_none()
            {
                dirty = true;
            }

            CustomRoutine {
                id: r.id,
                name: r.name,
                time: r.time.unwrap_or(legacy_time),
                frequency: r.frequency.unwrap_or(legacy_frequency),
                steps: r.steps,
                start_date: r.start_date,
                reminder_enabled: r.reminder_enabled.unwrap_or(false),
                reminder_time: r.reminder_time,
                created_at: r.created_at,
            }
        })
        .collect();

    if dirty {
        tracing::info!("Migrated legacy custom routines");
    }
    (routines, dirty)
}

impl CustomRoutine {
    pub fn from_draft(draft: RoutineDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            time: draft.time,
            frequency: draft.frequency,
            steps: draft.steps,
            start_date: draft.start_date,
            reminder_enabled: draft.reminder_enabled,
            reminder_time: draft.reminder_time,
            created_at: now,
        }
    }

    /// Overwrite the editable fields, keeping id and creation time.
    pub fn apply(&mut self, draft: RoutineDraft) {
        self.name = draft.name;
        self.time = draft.time;
        self.frequency = draft.frequency;
        self.steps = draft.steps;
        self.start_date = draft.start_date;
        self.reminder_enabled = draft.reminder_enabled;
        self.reminder_time = draft.reminder_time;
    }

    /// Weekly routines repeat on the weekday of their start date, monthly
    /// ones on its day of the month. Creation date stands in for a missing
    /// start date.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        let start = self
            .start_date
            .unwrap_or_else(|| self.created_at.date_naive());
        if date < start {
            return false;
        }
        match self.frequency {
            RoutineFrequency::Daily => true,
            RoutineFrequency::Weekly => date.weekday() == start.weekday(),
            RoutineFrequency::Monthly => {
                let last_day = last_day_of_month(date);
                date.day() == start.day().min(last_day)
            }
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Add `step` to the slot when absent, remove it when present. Returns
/// whether the step is now checked.
pub fn toggle_step(log: &mut BeautyRoutineLog, slot: RoutineSlot, step: &str) -> bool {
    let steps = match slot {
        RoutineSlot::Am => &mut log.am_steps,
        RoutineSlot::Pm => &mut log.pm_steps,
    };
    if steps.remove(step) {
        false
    } else {
        steps.insert(step.to_string());
        true
    }
}
