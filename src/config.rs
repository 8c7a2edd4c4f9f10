//! Configuration constants and storage location
//!
//! Central location for default values, validation bounds, storage keys
//! and the calendar constants used by the engines.

use std::path::PathBuf;

use crate::storage::StorageError;

// ===== Cycle defaults and bounds =====

/// Default cycle length in days for a fresh profile
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
/// Default period length in days for a fresh profile
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;
/// Luteal phase length; ovulation is this many days before the next period
pub const LUTEAL_PHASE_DAYS: i32 = 14;
/// Days before ovulation that open the fertile window
pub const FERTILE_DAYS_BEFORE_OVULATION: i32 = 5;
/// Days after ovulation that close the fertile window
pub const FERTILE_DAYS_AFTER_OVULATION: i32 = 1;

/// Upper bound accepted for cycle and period lengths.
/// Lower lengths are accepted as-is; only zero is rejected.
pub const MAX_CYCLE_LENGTH: u32 = 120;

/// Two flow days at most this far apart belong to the same period
pub const PERIOD_GAP_TOLERANCE_DAYS: i64 = 2;

/// Gestation used for the due date (40 weeks)
pub const PREGNANCY_DAYS: i64 = 280;

/// Upper bound for a qadha missed total (backlog plus logged days)
pub const MAX_QADHA_DAYS: u32 = 10_000;

// ===== Wellness =====

/// Maximum sleep hours stored per day
pub const MAX_SLEEP_HOURS: f32 = 24.0;

// ===== Beauty planner =====

/// Mean synodic month in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.53059;
/// Reference new moon the lunar-day estimate counts from (year, month, day)
pub const LUNAR_EPOCH: (i32, u32, u32) = (2000, 1, 6);
/// Lunar days traditionally favoured for hijama
pub const HIJAMA_LUNAR_DAYS: &[u32] = &[17, 19, 21];
/// Last cycle day treated as "during period" by the beauty planner
pub const BEAUTY_PERIOD_LAST_DAY: u32 = 5;

// ===== Subscription =====

/// Subscription statuses that unlock premium features
pub const PREMIUM_STATUSES: &[&str] = &["plus", "trial"];

// ===== Storage keys =====

pub const KEY_SETTINGS: &str = "settings";
pub const KEY_CYCLE_LOGS: &str = "cycle_logs";
pub const KEY_DAILY_LOGS: &str = "daily_logs";
pub const KEY_QADHA_LOGS: &str = "qadha_logs";
pub const KEY_QADHA_SUMMARY: &str = "qadha_summary";
pub const KEY_BEAUTY_ROUTINE_LOGS: &str = "beauty_routine_logs";
pub const KEY_CUSTOM_ROUTINES: &str = "custom_routines";
pub const KEY_DAUGHTERS: &str = "daughters";
pub const KEY_PREGNANCY: &str = "pregnancy";

/// Every key the controller writes; a full reset removes all of them
pub const ALL_KEYS: &[&str] = &[
    KEY_SETTINGS,
    KEY_CYCLE_LOGS,
    KEY_DAILY_LOGS,
    KEY_QADHA_LOGS,
    KEY_QADHA_SUMMARY,
    KEY_BEAUTY_ROUTINE_LOGS,
    KEY_CUSTOM_ROUTINES,
    KEY_DAUGHTERS,
    KEY_PREGNANCY,
];

/// Where the file store lives on disk
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Platform local data directory, e.g. `~/.local/share/lunara`
    pub fn from_platform() -> Result<Self, StorageError> {
        let data_dir = dirs::data_local_dir()
            .ok_or(StorageError::NoDataDir)?
            .join("lunara");
        Ok(Self { data_dir })
    }

    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}
