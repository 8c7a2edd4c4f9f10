//! Integration tests for Lunara
//!
//! These exercise the controller against real file stores:
//! - hydration and persistence across reopen
//! - encrypted stores and passphrase checks
//! - legacy routine migration on load

use chrono::NaiveDate;
use lunara::beauty::BeautyPlan;
use lunara::config::{StorageConfig, KEY_CUSTOM_ROUTINES, KEY_QADHA_SUMMARY, MAX_QADHA_DAYS};
use lunara::cycle::CyclePhase;
use lunara::models::{
    CycleLog, CycleSettings, FlowLevel, QadhaEntryKind, RoutineFrequency, RoutineTime,
};
use lunara::storage::{load_or_default, StorageError};
use lunara::subscription::SubscriptionStatus;
use lunara::{AppState, FileStore, FixedClock, KeyValueStore, MemoryStore, Rejection};
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn tracking_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let config = StorageConfig::at(temp.path().join("lunara"));

    {
        let store = FileStore::open(&config).unwrap();
        let mut state = AppState::hydrate(store, FixedClock::new(date("2024-01-03")));
        state
            .update_cycle_settings(CycleSettings {
                cycle_length: 28,
                period_length: 5,
                last_period_start: None,
            })
            .unwrap();
        state.log_cycle_day(CycleLog::period(date("2024-01-01"), FlowLevel::Heavy));
        state.initialize_qadha(10).unwrap();
        state.add_missed_day(date("2024-01-02"), None).unwrap();
    }

    let store = FileStore::open(&config).unwrap();
    let state = AppState::hydrate(store, FixedClock::new(date("2024-01-14")));

    assert_eq!(state.current_cycle_day(), Some(14));
    assert_eq!(state.current_phase(), Some(CyclePhase::Ovulation));
    let summary = state.qadha().summary();
    assert_eq!(summary.total_missed, 11);
    assert_eq!(summary.remaining, 11);
}

#[test]
fn cycle_scenario_across_days() {
    let mut state = AppState::hydrate(MemoryStore::new(), FixedClock::new(date("2024-01-03")));
    state.log_cycle_day(CycleLog::period(date("2024-01-01"), FlowLevel::Medium));

    assert_eq!(state.current_cycle_day(), Some(3));
    assert_eq!(state.current_phase(), Some(CyclePhase::Period));

    state.clock_mut().set(date("2024-01-15"));
    assert_eq!(state.current_cycle_day(), Some(15));
    assert_eq!(state.current_phase(), Some(CyclePhase::Fertile));

    state.clock_mut().set(date("2024-01-14"));
    assert_eq!(state.current_phase(), Some(CyclePhase::Ovulation));
    assert_eq!(state.date_for_cycle_day(14), Ok(date("2024-01-14")));
    assert_eq!(state.date_for_cycle_day(1), Ok(date("2024-01-01")));
}

#[test]
fn qadha_scenarios() {
    let mut state = AppState::hydrate(MemoryStore::new(), FixedClock::new(date("2024-02-10")));

    let summary = state.initialize_qadha(10).unwrap();
    assert_eq!(
        (summary.base_total_missed, summary.total_missed, summary.total_made_up, summary.remaining),
        (10, 10, 0, 10)
    );

    let made_up = state.add_made_up_day(date("2024-02-10"), None).unwrap();
    assert_eq!(state.qadha().summary().total_made_up, 1);
    assert_eq!(state.qadha().summary().remaining, 9);

    state.delete_qadha_log(made_up.id).unwrap();
    assert_eq!(state.qadha().summary().total_made_up, 0);
    assert_eq!(state.qadha().summary().remaining, 10);

    state.add_missed_day(date("2024-02-01"), None).unwrap();
    assert!(matches!(
        state.add_missed_day(date("2024-02-01"), None),
        Err(Rejection::DuplicateQadhaEntry { .. })
    ));
    let missed: Vec<_> = state
        .qadha()
        .logs()
        .iter()
        .filter(|l| l.date == date("2024-02-01") && l.kind == QadhaEntryKind::Missed)
        .collect();
    assert_eq!(missed.len(), 1);

    let before = state.qadha().summary().clone();
    assert!(state.update_total_missed(0).is_err());
    assert_eq!(state.qadha().summary(), &before);
}

#[test]
fn beauty_plan_for_free_and_premium() {
    let mut state = AppState::hydrate(MemoryStore::new(), FixedClock::new(date("2024-01-03")));
    state.log_cycle_day(CycleLog::period(date("2024-01-01"), FlowLevel::Light));

    let overview = state.beauty_plan_for_today().unwrap();
    let json = serde_json::to_value(&overview.plan).unwrap();
    assert_eq!(json["type"], "free");
    assert_eq!(json["phaseKey"], "comfort");
    assert!(json.get("recommended").is_none());

    state.set_subscription_status(SubscriptionStatus::Trial);
    match state.beauty_plan_for_today().unwrap().plan {
        BeautyPlan::Premium(plan) => {
            assert!(!plan.recommended.is_empty());
            assert!(!plan.avoid.is_empty());
        }
        other => panic!("expected premium plan, got {other:?}"),
    }
}

#[test]
fn legacy_routines_migrate_once() {
    let mut store = MemoryStore::new();
    store
        .set(
            KEY_CUSTOM_ROUTINES,
            r#"[{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","name":"Mask night","type":"monthly","steps":["mask"],"createdAt":"2024-01-01T00:00:00Z"}]"#,
        )
        .unwrap();

    let state = AppState::hydrate(store, FixedClock::new(date("2024-02-01")));
    let routine = &state.routines()[0];
    assert_eq!(routine.time, RoutineTime::Any);
    assert_eq!(routine.frequency, RoutineFrequency::Monthly);
    assert!(!routine.reminder_enabled);
    assert_eq!(state.routines_due_on(date("2024-02-01")).len(), 1);

    let raw = state.store().get(KEY_CUSTOM_ROUTINES).unwrap().unwrap();
    assert!(raw.contains(r#""frequency":"monthly""#));
    assert!(!raw.contains(r#""type""#));
}

#[test]
fn current_routines_are_not_rewritten() {
    let stored = r#"[
  {
    "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
    "name": "Glow",
    "time": "evening",
    "frequency": "daily",
    "steps": ["cleanse"],
    "reminderEnabled": true,
    "createdAt": "2024-01-01T00:00:00Z"
  }
]"#;
    let mut store = MemoryStore::new();
    store.set(KEY_CUSTOM_ROUTINES, stored).unwrap();

    let state = AppState::hydrate(store, FixedClock::new(date("2024-02-01")));
    assert_eq!(state.routines().len(), 1);
    assert_eq!(state.routines()[0].time, RoutineTime::Evening);

    let raw = state.store().get(KEY_CUSTOM_ROUTINES).unwrap().unwrap();
    assert_eq!(raw, stored);
    assert_eq!(state.store().len(), 1);
}

#[test]
fn oversized_qadha_backlog_is_refused() {
    let mut state = AppState::hydrate(MemoryStore::new(), FixedClock::new(date("2024-03-01")));

    assert!(matches!(
        state.initialize_qadha(u32::MAX),
        Err(Rejection::InvalidValue { .. })
    ));
    assert!(state.store().get(KEY_QADHA_SUMMARY).unwrap().is_none());

    state.initialize_qadha(MAX_QADHA_DAYS).unwrap();
    assert!(matches!(
        state.add_missed_day(date("2024-02-20"), None),
        Err(Rejection::InvalidValue { .. })
    ));
    assert!(state.qadha().logs().is_empty());
    assert_eq!(state.qadha().summary().total_missed, MAX_QADHA_DAYS);
}

#[test]
fn encrypted_store_checks_passphrase() {
    let temp = TempDir::new().unwrap();
    let config = StorageConfig::at(temp.path().join("sealed"));
    assert!(!FileStore::is_initialized(&config));

    {
        let store = FileStore::open_encrypted(&config, "correct horse").unwrap();
        let mut state = AppState::hydrate(store, FixedClock::new(date("2024-03-01")));
        state.initialize_qadha(4).unwrap();
    }
    assert!(FileStore::is_initialized(&config));

    let raw = std::fs::read(temp.path().join("sealed/qadha_summary.sealed")).unwrap();
    assert!(!String::from_utf8_lossy(&raw).contains("baseTotalMissed"));

    assert!(matches!(
        FileStore::open_encrypted(&config, "wrong"),
        Err(StorageError::Crypto(_))
    ));

    let store = FileStore::open_encrypted(&config, "correct horse").unwrap();
    let summary: lunara::models::QadhaSummary = load_or_default(&store, "qadha_summary");
    assert_eq!(summary.remaining, 4);

    FileStore::wipe(&config).unwrap();
    assert!(!FileStore::is_initialized(&config));
}
