use std::collections::BTreeSet;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;
use tauri::State;
use uuid::Uuid;

use crate::clock::SystemClock;
use crate::config::StorageConfig;
use crate::cycle::CycleSnapshot;
use crate::history::HistoryStats;
use crate::pregnancy::PregnancyProgress;
use crate::models::*;
use crate::state::{AppState, DailyBeautyOverview};
use crate::storage::{FileStore, StorageError};
use crate::subscription::SubscriptionStatus;

type Controller = AppState<FileStore, SystemClock>;

/// Holds the unlocked controller. Dropping it zeroizes the store key.
pub struct DesktopState {
    controller: Mutex<Option<Controller>>,
}

impl DesktopState {
    pub fn new() -> Self {
        Self {
            controller: Mutex::new(None),
        }
    }

    pub fn lock(&self) {
        if let Ok(mut controller) = self.controller.lock() {
            *controller = None;
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut Controller) -> Result<T, String>) -> Result<T, String> {
        let mut guard = self.controller.lock().map_err(|e| e.to_string())?;
        let controller = guard.as_mut().ok_or("app is locked")?;
        f(controller)
    }
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QadhaView {
    pub logs: Vec<QadhaLog>,
    pub summary: QadhaSummary,
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| e.to_string())
}

fn parse_id(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|e| e.to_string())
}

fn storage_config() -> Result<StorageConfig, String> {
    StorageConfig::from_platform().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn is_setup() -> Result<bool, String> {
    Ok(FileStore::is_initialized(&storage_config()?))
}

/// Creates the store on first use; afterwards `false` means a wrong passphrase.
#[tauri::command]
pub fn unlock(passphrase: String, state: State<'_, DesktopState>) -> Result<bool, String> {
    match FileStore::open_encrypted(&storage_config()?, &passphrase) {
        Ok(store) => {
            let controller = AppState::hydrate(store, SystemClock);
            *state.controller.lock().map_err(|e| e.to_string())? = Some(controller);
            Ok(true)
        }
        Err(StorageError::Crypto(e)) => {
            tracing::warn!("Unlock failed: {}", e);
            Ok(false)
        }
        Err(e) => Err(e.to_string()),
    }
}

#[tauri::command]
pub fn lock(state: State<'_, DesktopState>) -> Result<(), String> {
    state.lock();
    Ok(())
}

#[tauri::command]
pub fn get_settings(state: State<'_, DesktopState>) -> Result<UserSettings, String> {
    state.with(|c| Ok(c.settings().clone()))
}

#[tauri::command]
pub fn update_cycle_settings(
    cycle_length: u32,
    period_length: u32,
    last_period_start: Option<String>,
    state: State<'_, DesktopState>,
) -> Result<UserSettings, String> {
    let last_period_start = last_period_start.as_deref().map(parse_date).transpose()?;
    state.with(|c| {
        c.update_cycle_settings(CycleSettings {
            cycle_length,
            period_length,
            last_period_start,
        })
        .cloned()
        .map_err(|e| e.to_string())
    })
}

#[tauri::command]
pub fn update_profile(
    persona: Persona,
    language: Language,
    show_fertility: bool,
    beauty: BeautyPreferences,
    state: State<'_, DesktopState>,
) -> Result<(), String> {
    state.with(|c| {
        c.set_persona(persona);
        c.set_language(language);
        c.set_show_fertility(show_fertility);
        c.set_beauty_preferences(beauty);
        Ok(())
    })
}

#[tauri::command]
pub fn log_cycle_day(
    date: String,
    is_period: bool,
    flow: Option<FlowLevel>,
    symptoms: Vec<String>,
    notes: Option<String>,
    state: State<'_, DesktopState>,
) -> Result<bool, String> {
    let log = CycleLog {
        date: parse_date(&date)?,
        is_period,
        flow,
        symptoms: symptoms.into_iter().collect::<BTreeSet<_>>(),
        notes,
    };
    state.with(|c| Ok(c.log_cycle_day(log)))
}

#[tauri::command]
pub fn delete_cycle_log(date: String, state: State<'_, DesktopState>) -> Result<(), String> {
    let date = parse_date(&date)?;
    state.with(|c| c.delete_cycle_log(date).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn get_cycle_snapshot(
    state: State<'_, DesktopState>,
) -> Result<Option<CycleSnapshot>, String> {
    state.with(|c| Ok(c.cycle_snapshot()))
}

#[tauri::command]
pub fn date_for_cycle_day(day: u32, state: State<'_, DesktopState>) -> Result<String, String> {
    state.with(|c| {
        c.date_for_cycle_day(day)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .map_err(|e| e.to_string())
    })
}

#[tauri::command]
pub fn get_history_stats(state: State<'_, DesktopState>) -> Result<HistoryStats, String> {
    state.with(|c| Ok(c.history_stats()))
}

#[tauri::command]
pub fn get_today_log(state: State<'_, DesktopState>) -> Result<DailyLog, String> {
    state.with(|c| Ok(c.today_log()))
}

#[tauri::command]
pub fn update_daily_log(
    date: String,
    patch: DailyLogPatch,
    state: State<'_, DesktopState>,
) -> Result<DailyLog, String> {
    let date = parse_date(&date)?;
    state.with(|c| c.update_daily_log(date, patch).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn add_water_cup(date: String, state: State<'_, DesktopState>) -> Result<DailyLog, String> {
    let date = parse_date(&date)?;
    state.with(|c| c.add_water_cup(date).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn get_qadha(state: State<'_, DesktopState>) -> Result<QadhaView, String> {
    state.with(|c| {
        Ok(QadhaView {
            logs: c.qadha().history().into_iter().cloned().collect(),
            summary: c.qadha().summary().clone(),
        })
    })
}

#[tauri::command]
pub fn initialize_qadha(
    total_missed: u32,
    state: State<'_, DesktopState>,
) -> Result<QadhaSummary, String> {
    state.with(|c| c.initialize_qadha(total_missed).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn add_qadha_day(
    date: String,
    kind: QadhaEntryKind,
    notes: Option<String>,
    state: State<'_, DesktopState>,
) -> Result<QadhaLog, String> {
    let date = parse_date(&date)?;
    state.with(|c| {
        match kind {
            QadhaEntryKind::Missed => c.add_missed_day(date, notes),
            QadhaEntryKind::MadeUp => c.add_made_up_day(date, notes),
        }
        .map_err(|e| e.to_string())
    })
}

#[tauri::command]
pub fn delete_qadha_log(id: String, state: State<'_, DesktopState>) -> Result<QadhaLog, String> {
    let id = parse_id(&id)?;
    state.with(|c| c.delete_qadha_log(id).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn update_total_missed(
    new_total: u32,
    state: State<'_, DesktopState>,
) -> Result<QadhaSummary, String> {
    state.with(|c| c.update_total_missed(new_total).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn recalculate_qadha(state: State<'_, DesktopState>) -> Result<QadhaSummary, String> {
    state.with(|c| c.recalculate_qadha().map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn toggle_beauty_step(
    date: String,
    slot: RoutineSlot,
    step: String,
    state: State<'_, DesktopState>,
) -> Result<bool, String> {
    let date = parse_date(&date)?;
    state.with(|c| Ok(c.toggle_beauty_step(date, slot, &step)))
}

#[tauri::command]
pub fn get_routines(state: State<'_, DesktopState>) -> Result<Vec<CustomRoutine>, String> {
    state.with(|c| Ok(c.routines().to_vec()))
}

#[tauri::command]
pub fn get_routines_due(
    date: String,
    state: State<'_, DesktopState>,
) -> Result<Vec<CustomRoutine>, String> {
    let date = parse_date(&date)?;
    state.with(|c| Ok(c.routines_due_on(date).into_iter().cloned().collect()))
}

#[tauri::command]
pub fn add_routine(
    draft: RoutineDraft,
    state: State<'_, DesktopState>,
) -> Result<CustomRoutine, String> {
    state.with(|c| c.add_routine(draft).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn update_routine(
    id: String,
    draft: RoutineDraft,
    state: State<'_, DesktopState>,
) -> Result<CustomRoutine, String> {
    let id = parse_id(&id)?;
    state.with(|c| c.update_routine(id, draft).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn delete_routine(id: String, state: State<'_, DesktopState>) -> Result<(), String> {
    let id = parse_id(&id)?;
    state.with(|c| c.delete_routine(id).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn get_daughters(state: State<'_, DesktopState>) -> Result<Vec<Daughter>, String> {
    state.with(|c| Ok(c.daughters().to_vec()))
}

#[tauri::command]
pub fn add_daughter(
    name: String,
    age: u8,
    cycle_settings: CycleSettings,
    state: State<'_, DesktopState>,
) -> Result<Daughter, String> {
    state.with(|c| c.add_daughter(&name, age, cycle_settings).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn update_daughter_settings(
    id: String,
    cycle_settings: CycleSettings,
    state: State<'_, DesktopState>,
) -> Result<(), String> {
    let id = parse_id(&id)?;
    state.with(|c| c.update_daughter_settings(id, cycle_settings).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn remove_daughter(id: String, state: State<'_, DesktopState>) -> Result<(), String> {
    let id = parse_id(&id)?;
    state.with(|c| c.remove_daughter(id).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn log_daughter_cycle_day(
    id: String,
    date: String,
    is_period: bool,
    flow: Option<FlowLevel>,
    state: State<'_, DesktopState>,
) -> Result<bool, String> {
    let id = parse_id(&id)?;
    let log = CycleLog {
        date: parse_date(&date)?,
        is_period,
        flow,
        symptoms: BTreeSet::new(),
        notes: None,
    };
    state.with(|c| c.log_daughter_cycle_day(id, log).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn get_daughter_snapshot(
    id: String,
    state: State<'_, DesktopState>,
) -> Result<Option<CycleSnapshot>, String> {
    let id = parse_id(&id)?;
    state.with(|c| c.daughter_snapshot(id).map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn get_pregnancy(state: State<'_, DesktopState>) -> Result<PregnancySettings, String> {
    state.with(|c| Ok(*c.pregnancy()))
}

#[tauri::command]
pub fn enable_pregnancy(
    lmp_date: String,
    state: State<'_, DesktopState>,
) -> Result<PregnancySettings, String> {
    let lmp_date = parse_date(&lmp_date)?;
    state.with(|c| Ok(c.enable_pregnancy(lmp_date)))
}

#[tauri::command]
pub fn disable_pregnancy(state: State<'_, DesktopState>) -> Result<(), String> {
    state.with(|c| {
        c.disable_pregnancy();
        Ok(())
    })
}

#[tauri::command]
pub fn get_pregnancy_progress(
    state: State<'_, DesktopState>,
) -> Result<Option<PregnancyProgress>, String> {
    state.with(|c| Ok(c.pregnancy_progress()))
}

#[tauri::command]
pub fn get_beauty_plan(
    state: State<'_, DesktopState>,
) -> Result<Option<DailyBeautyOverview>, String> {
    state.with(|c| Ok(c.beauty_plan_for_today()))
}

#[tauri::command]
pub fn set_subscription_status(
    status: SubscriptionStatus,
    state: State<'_, DesktopState>,
) -> Result<(), String> {
    state.with(|c| {
        c.set_subscription_status(status);
        Ok(())
    })
}

#[tauri::command]
pub fn export_data(state: State<'_, DesktopState>) -> Result<String, String> {
    state.with(|c| c.export_json().map_err(|e| e.to_string()))
}

#[tauri::command]
pub fn wipe_all_data(state: State<'_, DesktopState>) -> Result<(), String> {
    state.lock();
    FileStore::wipe(&storage_config()?).map_err(|e| e.to_string())
}

/// Build and run the desktop shell.
pub fn run() {
    tauri::Builder::default()
        .manage(DesktopState::new())
        .invoke_handler(tauri::generate_handler![
            is_setup,
            unlock,
            lock,
            get_settings,
            update_cycle_settings,
            update_profile,
            log_cycle_day,
            delete_cycle_log,
            get_cycle_snapshot,
            date_for_cycle_day,
            get_history_stats,
            get_today_log,
            update_daily_log,
            add_water_cup,
            get_qadha,
            initialize_qadha,
            add_qadha_day,
            delete_qadha_log,
            update_total_missed,
            recalculate_qadha,
            toggle_beauty_step,
            get_routines,
            get_routines_due,
            add_routine,
            update_routine,
            delete_routine,
            get_daughters,
            add_daughter,
            update_daughter_settings,
            remove_daughter,
            log_daughter_cycle_day,
            get_daughter_snapshot,
            get_pregnancy,
            enable_pregnancy,
            disable_pregnancy,
            get_pregnancy_progress,
            get_beauty_plan,
            set_subscription_status,
            export_data,
            wipe_all_data,
        ])
        .run(tauri::generate_context!())
        .expect("error while running lunara");
}
