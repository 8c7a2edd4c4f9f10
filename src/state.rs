//! App-state controller
//!
//! Holds every collection in memory, hydrated once from a [`KeyValueStore`].
//! Mutators change memory first and then persist the slice they touched. A
//! failed write is logged and the in-memory change stands; the next
//! successful save of that slice brings storage back in line.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::beauty::{self, BeautyPlan, BeautyPlanInput, HijriDate};
use crate::clock::Clock;
use crate::config::{
    ALL_KEYS, KEY_BEAUTY_ROUTINE_LOGS, KEY_CUSTOM_ROUTINES, KEY_CYCLE_LOGS, KEY_DAILY_LOGS,
    KEY_DAUGHTERS, KEY_PREGNANCY, KEY_QADHA_LOGS, KEY_QADHA_SUMMARY, KEY_SETTINGS,
    MAX_CYCLE_LENGTH, MAX_SLEEP_HOURS,
};
use crate::cycle::{self, CyclePhase, CycleSnapshot};
use crate::error::Rejection;
use crate::history::{self, HistoryStats};
use crate::models::*;
use crate::pregnancy::PregnancyProgress;
use crate::qadha::QadhaLedger;
use crate::routines::{self, StoredRoutine};
use crate::storage::{self, KeyValueStore};
use crate::subscription::SubscriptionStatus;

/// Everything the home screen's beauty card shows for today.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyBeautyOverview {
    pub cycle_day: u32,
    pub lunar_day: u32,
    pub hijri: HijriDate,
    pub plan: BeautyPlan,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportBundle<'a> {
    settings: &'a UserSettings,
    cycle_logs: &'a [CycleLog],
    daily_logs: &'a [DailyLog],
    qadha_logs: &'a [QadhaLog],
    qadha_summary: &'a QadhaSummary,
    beauty_routine_logs: &'a [BeautyRoutineLog],
    custom_routines: &'a [CustomRoutine],
    daughters: &'a [Daughter],
    pregnancy: &'a PregnancySettings,
}

pub struct AppState<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    settings: UserSettings,
    cycle_logs: Vec<CycleLog>,
    daily_logs: Vec<DailyLog>,
    qadha: QadhaLedger,
    beauty_logs: Vec<BeautyRoutineLog>,
    routines: Vec<CustomRoutine>,
    daughters: Vec<Daughter>,
    pregnancy: PregnancySettings,
    subscription: SubscriptionStatus,
}

fn validate_cycle_settings(settings: &CycleSettings) -> Result<(), Rejection> {
    if !(1..=MAX_CYCLE_LENGTH).contains(&settings.cycle_length) {
        tracing::warn!("Rejected cycle length {}", settings.cycle_length);
        return Err(Rejection::invalid("cycle length", settings.cycle_length));
    }
    if !(1..=MAX_CYCLE_LENGTH).contains(&settings.period_length) {
        tracing::warn!("Rejected period length {}", settings.period_length);
        return Err(Rejection::invalid("period length", settings.period_length));
    }
    Ok(())
}

impl<S: KeyValueStore, C: Clock> AppState<S, C> {
    /// Read every collection once. Unreadable keys fall back to defaults;
    /// legacy routines are migrated and written back only if they changed.
    pub fn hydrate(store: S, clock: C) -> Self {
        let stored_routines: Vec<StoredRoutine> =
            storage::load_or_default(&store, KEY_CUSTOM_ROUTINES);
        let (routines, routines_dirty) = routines::migrate_routines(stored_routines);

        let mut state = Self {
            settings: storage::load_or_default(&store, KEY_SETTINGS),
            cycle_logs: storage::load_or_default(&store, KEY_CYCLE_LOGS),
            daily_logs: storage::load_or_default(&store, KEY_DAILY_LOGS),
            qadha: QadhaLedger::new(
                storage::load_or_default(&store, KEY_QADHA_LOGS),
                storage::load_or_default(&store, KEY_QADHA_SUMMARY),
            ),
            beauty_logs: storage::load_or_default(&store, KEY_BEAUTY_ROUTINE_LOGS),
            routines,
            daughters: storage::load_or_default(&store, KEY_DAUGHTERS),
            pregnancy: storage::load_or_default(&store, KEY_PREGNANCY),
            subscription: SubscriptionStatus::default(),
            store,
            clock,
        };

        if routines_dirty {
            storage::save_logged(&mut state.store, KEY_CUSTOM_ROUTINES, &state.routines);
        }

        tracing::info!(
            "App state hydrated: {} cycle logs, {} qadha logs, {} routines",
            state.cycle_logs.len(),
            state.qadha.logs().len(),
            state.routines.len()
        );
        state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ===== Settings =====

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    fn save_settings(&mut self) {
        storage::save_logged(&mut self.store, KEY_SETTINGS, &self.settings);
    }

    pub fn update_cycle_settings(
        &mut self,
        cycle: CycleSettings,
    ) -> Result<&UserSettings, Rejection> {
        validate_cycle_settings(&cycle)?;
        self.settings.cycle = cycle;
        self.save_settings();
        tracing::debug!(
            "Cycle settings updated: {}/{} days",
            cycle.cycle_length,
            cycle.period_length
        );
        Ok(&self.settings)
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.settings.persona = persona;
        self.save_settings();
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.save_settings();
    }

    pub fn set_show_fertility(&mut self, enabled: bool) {
        self.settings.show_fertility = enabled;
        self.save_settings();
    }

    pub fn set_beauty_preferences(&mut self, preferences: BeautyPreferences) {
        self.settings.beauty = preferences;
        self.save_settings();
    }

    // ===== Cycle tracking =====

    pub fn cycle_logs(&self) -> &[CycleLog] {
        &self.cycle_logs
    }

    /// Upsert the log for its date. Returns `true` when this was the first
    /// period ever logged and it became the cycle anchor.
    pub fn log_cycle_day(&mut self, log: CycleLog) -> bool {
        let date = log.date;
        let anchored =
            history::record_cycle_log(&mut self.settings.cycle, &mut self.cycle_logs, log);
        storage::save_logged(&mut self.store, KEY_CYCLE_LOGS, &self.cycle_logs);
        if anchored {
            tracing::info!("First period logged, cycle anchored at {}", date);
            self.save_settings();
        }
        anchored
    }

    pub fn delete_cycle_log(&mut self, date: NaiveDate) -> Result<(), Rejection> {
        if !history::remove_cycle_log(&mut self.cycle_logs, date) {
            tracing::warn!("No cycle log for {}", date);
            return Err(Rejection::not_found("cycle log", date));
        }
        storage::save_logged(&mut self.store, KEY_CYCLE_LOGS, &self.cycle_logs);
        Ok(())
    }

    pub fn cycle_snapshot(&self) -> Option<CycleSnapshot> {
        cycle::snapshot(&self.settings.cycle, self.today())
    }

    pub fn current_cycle_day(&self) -> Option<u32> {
        cycle::current_cycle_day(&self.settings.cycle, self.today())
    }

    pub fn current_phase(&self) -> Option<CyclePhase> {
        cycle::current_phase(&self.settings.cycle, self.today())
    }

    pub fn date_for_cycle_day(&self, target_day: u32) -> Result<NaiveDate, Rejection> {
        cycle::date_for_cycle_day(target_day, &self.settings.cycle, self.today())
    }

    pub fn history_stats(&self) -> HistoryStats {
        history::history_stats(&self.cycle_logs, self.today())
    }

    // ===== Daily wellness =====

    pub fn daily_logs(&self) -> &[DailyLog] {
        &self.daily_logs
    }

    pub fn daily_log(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.daily_logs.iter().find(|l| l.date == date)
    }

    /// Today's log, or a zero-valued one if nothing was recorded yet.
    pub fn today_log(&self) -> DailyLog {
        let today = self.today();
        self.daily_log(today)
            .cloned()
            .unwrap_or_else(|| DailyLog::empty(today))
    }

    pub fn update_daily_log(
        &mut self,
        date: NaiveDate,
        patch: DailyLogPatch,
    ) -> Result<DailyLog, Rejection> {
        if let Some(hours) = patch.sleep_hours {
            if !(0.0..=MAX_SLEEP_HOURS).contains(&hours) {
                tracing::warn!("Rejected sleep hours {}", hours);
                return Err(Rejection::invalid("sleep hours", hours));
            }
        }

        let index = match self.daily_logs.iter().position(|l| l.date == date) {
            Some(index) => index,
            None => {
                self.daily_logs.push(DailyLog::empty(date));
                self.daily_logs.len() - 1
            }
        };
        let log = &mut self.daily_logs[index];
        if let Some(mood) = patch.mood {
            log.mood = Some(mood);
        }
        if let Some(cups) = patch.water_cups {
            log.water_cups = cups;
        }
        if let Some(am) = patch.beauty_am {
            log.beauty_am = am;
        }
        if let Some(pm) = patch.beauty_pm {
            log.beauty_pm = pm;
        }
        if let Some(hours) = patch.sleep_hours {
            log.sleep_hours = Some(hours);
        }
        let updated = log.clone();

        self.daily_logs.sort_by_key(|l| l.date);
        storage::save_logged(&mut self.store, KEY_DAILY_LOGS, &self.daily_logs);
        Ok(updated)
    }

    pub fn add_water_cup(&mut self, date: NaiveDate) -> Result<DailyLog, Rejection> {
        let cups = self
            .daily_log(date)
            .map_or(0, |l| l.water_cups)
            .saturating_add(1);
        self.update_daily_log(
            date,
            DailyLogPatch {
                water_cups: Some(cups),
                ..Default::default()
            },
        )
    }

    // ===== Qadha =====

    pub fn qadha(&self) -> &QadhaLedger {
        &self.qadha
    }

    /// Logs and summary are two independent writes.
    fn save_qadha(&mut self) {
        storage::save_logged(&mut self.store, KEY_QADHA_LOGS, self.qadha.logs());
        storage::save_logged(&mut self.store, KEY_QADHA_SUMMARY, self.qadha.summary());
    }

    pub fn initialize_qadha(&mut self, total_missed: u32) -> Result<QadhaSummary, Rejection> {
        let summary = self
            .qadha
            .initialize(total_missed, self.clock.now())?
            .clone();
        storage::save_logged(&mut self.store, KEY_QADHA_SUMMARY, &summary);
        Ok(summary)
    }

    pub fn add_missed_day(
        &mut self,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Result<QadhaLog, Rejection> {
        let log = self.qadha.add_missed_day(date, notes, self.clock.now())?;
        self.save_qadha();
        Ok(log)
    }

    pub fn add_made_up_day(
        &mut self,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Result<QadhaLog, Rejection> {
        let log = self.qadha.add_made_up_day(date, notes, self.clock.now())?;
        self.save_qadha();
        Ok(log)
    }

    pub fn delete_qadha_log(&mut self, id: Uuid) -> Result<QadhaLog, Rejection> {
        let removed = self.qadha.delete_log(id, self.clock.now())?;
        self.save_qadha();
        Ok(removed)
    }

    pub fn update_total_missed(&mut self, new_total: u32) -> Result<QadhaSummary, Rejection> {
        let summary = self
            .qadha
            .update_total_missed(new_total, self.clock.now())?
            .clone();
        storage::save_logged(&mut self.store, KEY_QADHA_SUMMARY, &summary);
        Ok(summary)
    }

    pub fn recalculate_qadha(&mut self) -> Result<QadhaSummary, Rejection> {
        let summary = self.qadha.recalculate(self.clock.now())?.clone();
        storage::save_logged(&mut self.store, KEY_QADHA_SUMMARY, &summary);
        Ok(summary)
    }

    // ===== Beauty routine checklist =====

    pub fn beauty_routine_log(&self, date: NaiveDate) -> Option<&BeautyRoutineLog> {
        self.beauty_logs.iter().find(|l| l.date == date)
    }

    /// Returns whether the step is checked after the toggle.
    pub fn toggle_beauty_step(&mut self, date: NaiveDate, slot: RoutineSlot, step: &str) -> bool {
        let index = match self.beauty_logs.iter().position(|l| l.date == date) {
            Some(index) => index,
            None => {
                self.beauty_logs.push(BeautyRoutineLog::empty(date));
                self.beauty_logs.len() - 1
            }
        };
        let checked = routines::toggle_step(&mut self.beauty_logs[index], slot, step);
        self.beauty_logs.sort_by_key(|l| l.date);
        storage::save_logged(&mut self.store, KEY_BEAUTY_ROUTINE_LOGS, &self.beauty_logs);
        checked
    }

    // ===== Custom routines =====

    pub fn routines(&self) -> &[CustomRoutine] {
        &self.routines
    }

    pub fn add_routine(&mut self, draft: RoutineDraft) -> Result<CustomRoutine, Rejection> {
        if draft.name.trim().is_empty() {
            tracing::warn!("Rejected routine with empty name");
            return Err(Rejection::invalid("routine name", "(empty)"));
        }
        let routine = CustomRoutine::from_draft(draft, self.clock.now());
        self.routines.push(routine.clone());
        storage::save_logged(&mut self.store, KEY_CUSTOM_ROUTINES, &self.routines);
        tracing::debug!("Routine created: {}", routine.id);
        Ok(routine)
    }

    pub fn update_routine(
        &mut self,
        id: Uuid,
        draft: RoutineDraft,
    ) -> Result<CustomRoutine, Rejection> {
        if draft.name.trim().is_empty() {
            tracing::warn!("Rejected update of routine {} with empty name", id);
            return Err(Rejection::invalid("routine name", "(empty)"));
        }
        let Some(routine) = self.routines.iter_mut().find(|r| r.id == id) else {
            tracing::warn!("Routine {} not found", id);
            return Err(Rejection::not_found("routine", id));
        };
        routine.apply(draft);
        let updated = routine.clone();
        storage::save_logged(&mut self.store, KEY_CUSTOM_ROUTINES, &self.routines);
        Ok(updated)
    }

    pub fn delete_routine(&mut self, id: Uuid) -> Result<(), Rejection> {
        let before = self.routines.len();
        self.routines.retain(|r| r.id != id);
        if self.routines.len() == before {
            tracing::warn!("Routine {} not found", id);
            return Err(Rejection::not_found("routine", id));
        }
        storage::save_logged(&mut self.store, KEY_CUSTOM_ROUTINES, &self.routines);
        Ok(())
    }

    pub fn routines_due_on(&self, date: NaiveDate) -> Vec<&CustomRoutine> {
        self.routines.iter().filter(|r| r.is_due_on(date)).collect()
    }

    // ===== Daughters =====

    pub fn daughters(&self) -> &[Daughter] {
        &self.daughters
    }

    fn save_daughters(&mut self) {
        storage::save_logged(&mut self.store, KEY_DAUGHTERS, &self.daughters);
    }

    fn daughter_mut(&mut self, id: Uuid) -> Result<&mut Daughter, Rejection> {
        self.daughters
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Rejection::not_found("daughter", id))
    }

    pub fn add_daughter(
        &mut self,
        name: &str,
        age: u8,
        cycle_settings: CycleSettings,
    ) -> Result<Daughter, Rejection> {
        if name.trim().is_empty() {
            tracing::warn!("Rejected daughter with empty name");
            return Err(Rejection::invalid("daughter name", "(empty)"));
        }
        validate_cycle_settings(&cycle_settings)?;
        let daughter = Daughter {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            age,
            cycle_settings,
            cycle_logs: Vec::new(),
        };
        self.daughters.push(daughter.clone());
        self.save_daughters();
        Ok(daughter)
    }

    pub fn update_daughter_settings(
        &mut self,
        id: Uuid,
        cycle_settings: CycleSettings,
    ) -> Result<(), Rejection> {
        validate_cycle_settings(&cycle_settings)?;
        self.daughter_mut(id)?.cycle_settings = cycle_settings;
        self.save_daughters();
        Ok(())
    }

    pub fn remove_daughter(&mut self, id: Uuid) -> Result<(), Rejection> {
        let before = self.daughters.len();
        self.daughters.retain(|d| d.id != id);
        if self.daughters.len() == before {
            tracing::warn!("Daughter {} not found", id);
            return Err(Rejection::not_found("daughter", id));
        }
        self.save_daughters();
        Ok(())
    }

    /// Same upsert and first-period rule as the primary profile.
    pub fn log_daughter_cycle_day(&mut self, id: Uuid, log: CycleLog) -> Result<bool, Rejection> {
        let daughter = self.daughter_mut(id)?;
        let anchored =
            history::record_cycle_log(&mut daughter.cycle_settings, &mut daughter.cycle_logs, log);
        self.save_daughters();
        Ok(anchored)
    }

    pub fn daughter_snapshot(&self, id: Uuid) -> Result<Option<CycleSnapshot>, Rejection> {
        let daughter = self
            .daughters
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| Rejection::not_found("daughter", id))?;
        Ok(cycle::snapshot(&daughter.cycle_settings, self.today()))
    }

    // ===== Pregnancy =====

    pub fn pregnancy(&self) -> &PregnancySettings {
        &self.pregnancy
    }

    pub fn enable_pregnancy(&mut self, lmp_date: NaiveDate) -> PregnancySettings {
        self.pregnancy = PregnancySettings::enable(lmp_date);
        storage::save_logged(&mut self.store, KEY_PREGNANCY, &self.pregnancy);
        self.pregnancy
    }

    pub fn disable_pregnancy(&mut self) {
        self.pregnancy.enabled = false;
        storage::save_logged(&mut self.store, KEY_PREGNANCY, &self.pregnancy);
    }

    pub fn pregnancy_progress(&self) -> Option<PregnancyProgress> {
        self.pregnancy.progress(self.today())
    }

    // ===== Subscription and beauty plan =====

    pub fn subscription(&self) -> SubscriptionStatus {
        self.subscription
    }

    /// Cached from the account service; never persisted here.
    pub fn set_subscription_status(&mut self, status: SubscriptionStatus) {
        self.subscription = status;
    }

    pub fn is_premium(&self) -> bool {
        self.subscription.is_premium()
    }

    /// `None` until a period start has been recorded.
    pub fn beauty_plan_for_today(&self) -> Option<DailyBeautyOverview> {
        let today = self.today();
        let cycle_day = self.current_cycle_day()?;
        let lunar_day = beauty::lunar_day(today);

        let plan = beauty::beauty_plan(&BeautyPlanInput {
            cycle_day,
            lunar_day,
            persona: self.settings.persona,
            preferences: self.settings.beauty,
            is_premium: self.is_premium(),
            language: self.settings.language,
        });

        Some(DailyBeautyOverview {
            cycle_day,
            lunar_day,
            hijri: beauty::hijri_date(today),
            plan,
        })
    }

    // ===== Export and reset =====

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ExportBundle {
            settings: &self.settings,
            cycle_logs: &self.cycle_logs,
            daily_logs: &self.daily_logs,
            qadha_logs: self.qadha.logs(),
            qadha_summary: self.qadha.summary(),
            beauty_routine_logs: &self.beauty_logs,
            custom_routines: &self.routines,
            daughters: &self.daughters,
            pregnancy: &self.pregnancy,
        })
    }

    /// Remove every stored key and return to defaults.
    pub fn reset_all(&mut self) {
        for key in ALL_KEYS {
            if let Err(e) = self.store.remove(key) {
                tracing::error!("Failed to remove '{}': {}", key, e);
            }
        }
        self.settings = UserSettings::default();
        self.cycle_logs.clear();
        self.daily_logs.clear();
        self.qadha = QadhaLedger::default();
        self.beauty_logs.clear();
        self.routines.clear();
        self.daughters.clear();
        self.pregnancy = PregnancySettings::default();
        tracing::info!("All data reset");
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
