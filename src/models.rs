use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ar,
    #[default]
    En,
}

impl Language {
    /// Pick the string for this language.
    pub fn pick<'a>(self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Language::En => en,
            Language::Ar => ar,
        }
    }
}

/// User segment used to select tone and defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Single,
    Married,
    Mother,
    Partner,
    #[default]
    #[serde(other)]
    General,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowLevel {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Energetic,
    Tired,
    Sad,
    Anxious,
    Irritable,
    #[serde(other)]
    Other,
}

impl Mood {
    /// Display color; unrecognised moods get the neutral grey.
    pub fn color(self) -> &'static str {
        match self {
            Mood::Happy => "#F9C74F",
            Mood::Calm => "#90BE6D",
            Mood::Energetic => "#F8961E",
            Mood::Tired => "#A3A3C2",
            Mood::Sad => "#577590",
            Mood::Anxious => "#B56576",
            Mood::Irritable => "#E76F51",
            Mood::Other => "#B0B0B0",
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match self {
            Mood::Happy => language.pick("Happy", "سعيدة"),
            Mood::Calm => language.pick("Calm", "هادئة"),
            Mood::Energetic => language.pick("Energetic", "نشيطة"),
            Mood::Tired => language.pick("Tired", "متعبة"),
            Mood::Sad => language.pick("Sad", "حزينة"),
            Mood::Anxious => language.pick("Anxious", "قلقة"),
            Mood::Irritable => language.pick("Irritable", "منفعلة"),
            Mood::Other => language.pick("Not set", "غير محدد"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CycleSettings {
    pub cycle_length: u32,
    pub period_length: u32,
    #[serde(default)]
    pub last_period_start: Option<NaiveDate>,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            period_length: DEFAULT_PERIOD_LENGTH,
            last_period_start: None,
        }
    }
}

/// One tracked calendar day. `date` is the unique key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleLog {
    pub date: NaiveDate,
    pub is_period: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowLevel>,
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CycleLog {
    pub fn period(date: NaiveDate, flow: FlowLevel) -> Self {
        Self {
            date,
            is_period: true,
            flow: Some(flow),
            symptoms: BTreeSet::new(),
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub water_cups: u32,
    #[serde(default, rename = "beautyAM")]
    pub beauty_am: bool,
    #[serde(default, rename = "beautyPM")]
    pub beauty_pm: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f32>,
}

impl DailyLog {
    /// Zero-valued log for a day nothing was recorded on yet.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            mood: None,
            water_cups: 0,
            beauty_am: false,
            beauty_pm: false,
            sleep_hours: None,
        }
    }
}

/// Partial update merged into a [`DailyLog`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogPatch {
    pub mood: Option<Mood>,
    pub water_cups: Option<u32>,
    #[serde(rename = "beautyAM")]
    pub beauty_am: Option<bool>,
    #[serde(rename = "beautyPM")]
    pub beauty_pm: Option<bool>,
    pub sleep_hours: Option<f32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QadhaEntryKind {
    Missed,
    MadeUp,
}

impl fmt::Display for QadhaEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QadhaEntryKind::Missed => f.write_str("missed"),
            QadhaEntryKind::MadeUp => f.write_str("made_up"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QadhaLog {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: QadhaEntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QadhaSummary {
    pub base_total_missed: u32,
    pub total_missed: u32,
    pub total_made_up: u32,
    pub remaining: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoutineSlot {
    Am,
    Pm,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BeautyRoutineLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub am_steps: BTreeSet<String>,
    #[serde(default)]
    pub pm_steps: BTreeSet<String>,
}

impl BeautyRoutineLog {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            am_steps: BTreeSet::new(),
            pm_steps: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoutineTime {
    Morning,
    Evening,
    Any,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoutineFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomRoutine {
    pub id: Uuid,
    pub name: String,
    pub time: RoutineTime,
    pub frequency: RoutineFrequency,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    pub reminder_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies to create or edit a [`CustomRoutine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineDraft {
    pub name: String,
    pub time: RoutineTime,
    pub frequency: RoutineFrequency,
    pub steps: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_enabled: bool,
    #[serde(default)]
    pub reminder_time: Option<String>,
}

/// Independently tracked cycle profile nested under the primary user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Daughter {
    pub id: Uuid,
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub cycle_settings: CycleSettings,
    #[serde(default)]
    pub cycle_logs: Vec<CycleLog>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PregnancySettings {
    pub enabled: bool,
    #[serde(default)]
    pub lmp_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HijamaPreference {
    Yes,
    No,
    #[default]
    #[serde(other)]
    Unsure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BeautyPreferences {
    #[serde(default)]
    pub avoid_laser: bool,
    #[serde(default)]
    pub avoid_peels: bool,
    #[serde(default)]
    pub natural_only: bool,
    #[serde(default)]
    pub hijama: HijamaPreference,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(flatten)]
    pub cycle: CycleSettings,
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub show_fertility: bool,
    #[serde(default)]
    pub beauty: BeautyPreferences,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            cycle: CycleSettings::default(),
            persona: Persona::default(),
            language: Language::default(),
            show_fertility: true,
            beauty: BeautyPreferences::default(),
        }
    }
}
