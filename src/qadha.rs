//! Missed-fast (qadha) ledger
//!
//! The log is append-only ground truth. The summary is derived from it plus a
//! declared backlog (`base_total_missed`) for days that predate tracking:
//!
//! - `total_missed = base_total_missed + count(missed)`
//! - `total_made_up = count(made_up)`
//! - `remaining = max(total_missed - total_made_up, 0)`
//!
//! Made-up days have no backlog: each one is a log entry.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::config::MAX_QADHA_DAYS;
use crate::error::Rejection;
use crate::models::{QadhaEntryKind, QadhaLog, QadhaSummary};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QadhaLedger {
    logs: Vec<QadhaLog>,
    summary: QadhaSummary,
}

impl QadhaLedger {
    pub fn new(logs: Vec<QadhaLog>, summary: QadhaSummary) -> Self {
        Self { logs, summary }
    }

    pub fn logs(&self) -> &[QadhaLog] {
        &self.logs
    }

    pub fn summary(&self) -> &QadhaSummary {
        &self.summary
    }

    /// Logs newest first; same-day entries by creation time.
    pub fn history(&self) -> Vec<&QadhaLog> {
        let mut logs: Vec<&QadhaLog> = self.logs.iter().collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        logs
    }

    pub fn count(&self, kind: QadhaEntryKind) -> u32 {
        self.logs.iter().filter(|l| l.kind == kind).count() as u32
    }

    fn has_entry(&self, date: NaiveDate, kind: QadhaEntryKind) -> bool {
        self.logs.iter().any(|l| l.date == date && l.kind == kind)
    }

    fn refresh_remaining(&mut self, now: DateTime<Utc>) {
        self.summary.remaining = self
            .summary
            .total_missed
            .saturating_sub(self.summary.total_made_up);
        self.summary.updated_at = Some(now);
    }

    /// `base + missed`, refused past [`MAX_QADHA_DAYS`].
    fn missed_total(base: u32, missed: u32) -> Result<u32, Rejection> {
        match base.checked_add(missed) {
            Some(total) if total <= MAX_QADHA_DAYS => Ok(total),
            _ => {
                tracing::warn!("Rejected qadha total: {} backlog + {} logged", base, missed);
                Err(Rejection::invalid("qadha total", format!("{} + {}", base, missed)))
            }
        }
    }

    /// Declare the starting backlog. Logged missed days count on top of it.
    pub fn initialize(
        &mut self,
        total_missed: u32,
        now: DateTime<Utc>,
    ) -> Result<&QadhaSummary, Rejection> {
        Self::missed_total(total_missed, self.count(QadhaEntryKind::Missed))?;
        self.summary.base_total_missed = total_missed;
        tracing::info!("Qadha backlog initialised at {}", total_missed);
        self.recalculate(now)
    }

    fn append(
        &mut self,
        date: NaiveDate,
        kind: QadhaEntryKind,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<QadhaLog, Rejection> {
        if self.has_entry(date, kind) {
            tracing::warn!("Qadha {} entry for {} already exists", kind, date);
            return Err(Rejection::DuplicateQadhaEntry { date, kind });
        }
        let log = QadhaLog {
            id: Uuid::new_v4(),
            date,
            kind,
            notes,
            created_at: now,
        };
        self.logs.push(log.clone());
        Ok(log)
    }

    pub fn add_missed_day(
        &mut self,
        date: NaiveDate,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<QadhaLog, Rejection> {
        let total_missed = Self::missed_total(self.summary.total_missed, 1)?;
        let log = self.append(date, QadhaEntryKind::Missed, notes, now)?;
        self.summary.total_missed = total_missed;
        self.refresh_remaining(now);
        tracing::debug!("Qadha missed day {} logged", date);
        Ok(log)
    }

    pub fn add_made_up_day(
        &mut self,
        date: NaiveDate,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<QadhaLog, Rejection> {
        let log = self.append(date, QadhaEntryKind::MadeUp, notes, now)?;
        self.summary.total_made_up = self.count(QadhaEntryKind::MadeUp);
        self.refresh_remaining(now);
        tracing::debug!("Qadha made-up day {} logged", date);
        Ok(log)
    }

    /// Remove one entry. The backlog portion of the missed total is kept.
    pub fn delete_log(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<QadhaLog, Rejection> {
        let Some(index) = self.logs.iter().position(|l| l.id == id) else {
            tracing::warn!("Qadha log {} not found", id);
            return Err(Rejection::not_found("qadha log", id));
        };

        let prior_missed = self.count(QadhaEntryKind::Missed);
        let base = self.summary.total_missed.saturating_sub(prior_missed);
        let missed_after = match self.logs[index].kind {
            QadhaEntryKind::Missed => prior_missed - 1,
            QadhaEntryKind::MadeUp => prior_missed,
        };
        let total_missed = Self::missed_total(base, missed_after)?;

        let removed = self.logs.remove(index);
        self.summary.base_total_missed = base;
        self.summary.total_missed = total_missed;
        self.summary.total_made_up = self.count(QadhaEntryKind::MadeUp);
        self.refresh_remaining(now);

        tracing::debug!("Qadha {} entry for {} deleted", removed.kind, removed.date);
        Ok(removed)
    }

    /// Set the total explicitly. Never below the number of logged missed days.
    pub fn update_total_missed(
        &mut self,
        new_total: u32,
        now: DateTime<Utc>,
    ) -> Result<&QadhaSummary, Rejection> {
        let logged = self.count(QadhaEntryKind::Missed);
        if new_total < logged {
            tracing::warn!(
                "Rejected qadha total {}: {} missed days are logged",
                new_total,
                logged
            );
            return Err(Rejection::TotalBelowLogged {
                requested: new_total,
                logged,
            });
        }
        if new_total > MAX_QADHA_DAYS {
            tracing::warn!("Rejected qadha total {}", new_total);
            return Err(Rejection::invalid("qadha total", new_total));
        }
        self.summary.base_total_missed = new_total - logged;
        self.recalculate(now)
    }

    /// Rebuild the summary from the backlog and the log. A stored backlog
    /// that no longer fits leaves the summary untouched.
    pub fn recalculate(&mut self, now: DateTime<Utc>) -> Result<&QadhaSummary, Rejection> {
        self.summary.total_missed = Self::missed_total(
            self.summary.base_total_missed,
            self.count(QadhaEntryKind::Missed),
        )?;
        self.summary.total_made_up = self.count(QadhaEntryKind::MadeUp);
        self.refresh_remaining(now);
        Ok(&self.summary)
    }

    pub fn into_parts(self) -> (Vec<QadhaLog>, QadhaSummary) {
        (self.logs, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn now() -> DateTime<Utc> {
        date("2024-03-01").and_hms_opt(9, 0, 0).unwrap().and_utc()
    }

    fn assert_conserved(ledger: &QadhaLedger) {
        let s = ledger.summary();
        assert_eq!(s.remaining, s.total_missed.saturating_sub(s.total_made_up));
    }

    #[test]
    fn made_up_day_round_trip_restores_summary() {
        let mut ledger = QadhaLedger::default();
        let start = ledger.initialize(10, now()).unwrap().clone();
        assert_eq!(start.base_total_missed, 10);
        assert_eq!(start.total_missed, 10);
        assert_eq!(start.total_made_up, 0);
        assert_eq!(start.remaining, 10);

        let log = ledger.add_made_up_day(date("2024-03-01"), None, now()).unwrap();
        assert_eq!(ledger.summary().total_made_up, 1);
        assert_eq!(ledger.summary().remaining, 9);

        ledger.delete_log(log.id, now()).unwrap();
        let s = ledger.summary();
        assert_eq!(
            (s.base_total_missed, s.total_missed, s.total_made_up, s.remaining),
            (10, 10, 0, 10)
        );
    }

    #[test]
    fn duplicate_missed_day_is_rejected() {
        let mut ledger = QadhaLedger::default();
        ledger.add_missed_day(date("2024-02-01"), None, now()).unwrap();
        let second = ledger.add_missed_day(date("2024-02-01"), None, now());

        assert_eq!(
            second,
            Err(Rejection::DuplicateQadhaEntry {
                date: date("2024-02-01"),
                kind: QadhaEntryKind::Missed
            })
        );
        assert_eq!(ledger.count(QadhaEntryKind::Missed), 1);
        assert_eq!(ledger.summary().total_missed, 1);
    }

    #[test]
    fn same_date_may_hold_both_kinds() {
        let mut ledger = QadhaLedger::default();
        ledger.add_missed_day(date("2024-02-01"), None, now()).unwrap();
        ledger
            .add_made_up_day(date("2024-02-01"), Some("Monday fast".into()), now())
            .unwrap();
        assert_eq!(ledger.logs().len(), 2);
        assert_eq!(ledger.summary().remaining, 0);
    }

    #[test]
    fn deleting_missed_entry_keeps_backlog() {
        let mut ledger = QadhaLedger::default();
        ledger.initialize(5, now()).unwrap();
        let log = ledger.add_missed_day(date("2024-03-10"), None, now()).unwrap();
        ledger.add_missed_day(date("2024-03-11"), None, now()).unwrap();
        assert_eq!(ledger.summary().total_missed, 7);

        ledger.delete_log(log.id, now()).unwrap();
        let s = ledger.summary();
        assert_eq!(s.base_total_missed, 5);
        assert_eq!(s.total_missed, 6);
        assert_conserved(&ledger);
    }

    #[test]
    fn delete_unknown_id_changes_nothing() {
        let mut ledger = QadhaLedger::default();
        ledger.initialize(3, now()).unwrap();
        let before = ledger.clone();
        assert!(matches!(
            ledger.delete_log(Uuid::new_v4(), now()),
            Err(Rejection::NotFound { .. })
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn total_below_logged_floor_is_rejected() {
        let mut ledger = QadhaLedger::default();
        ledger.add_missed_day(date("2024-03-10"), None, now()).unwrap();
        ledger.add_missed_day(date("2024-03-11"), None, now()).unwrap();
        let before = ledger.summary().clone();

        assert_eq!(
            ledger.update_total_missed(1, now()),
            Err(Rejection::TotalBelowLogged { requested: 1, logged: 2 })
        );
        assert_eq!(ledger.summary(), &before);

        let s = ledger.update_total_missed(12, now()).unwrap();
        assert_eq!(s.base_total_missed, 10);
        assert_eq!(s.total_missed, 12);
        assert_eq!(s.remaining, 12);
    }

    #[test]
    fn remaining_never_negative() {
        let mut ledger = QadhaLedger::default();
        ledger.add_made_up_day(date("2024-03-10"), None, now()).unwrap();
        ledger.add_made_up_day(date("2024-03-11"), None, now()).unwrap();
        assert_eq!(ledger.summary().total_made_up, 2);
        assert_eq!(ledger.summary().remaining, 0);
    }

    #[test]
    fn conservation_holds_across_mixed_operations() {
        let mut ledger = QadhaLedger::default();
        ledger.initialize(4, now()).unwrap();
        let mut ids = Vec::new();
        for day in 1..=6 {
            let d = NaiveDate::from_ymd_opt(2024, 4, day).unwrap();
            if day % 2 == 0 {
                ids.push(ledger.add_made_up_day(d, None, now()).unwrap().id);
            } else {
                ids.push(ledger.add_missed_day(d, None, now()).unwrap().id);
            }
            assert_conserved(&ledger);
        }
        for id in ids {
            ledger.delete_log(id, now()).unwrap();
            assert_conserved(&ledger);
        }
        assert_eq!(ledger.summary().total_missed, 4);
        assert_eq!(ledger.summary().total_made_up, 0);
    }

    #[test]
    fn backlog_past_limit_is_rejected() {
        let mut ledger = QadhaLedger::default();
        assert!(matches!(
            ledger.initialize(u32::MAX, now()),
            Err(Rejection::InvalidValue { .. })
        ));
        assert!(matches!(
            ledger.update_total_missed(MAX_QADHA_DAYS + 1, now()),
            Err(Rejection::InvalidValue { .. })
        ));
        assert_eq!(ledger.summary(), &QadhaSummary::default());
    }

    #[test]
    fn missed_day_at_limit_is_rejected_without_change() {
        let mut ledger = QadhaLedger::default();
        ledger.initialize(MAX_QADHA_DAYS, now()).unwrap();
        let before = ledger.clone();

        assert!(matches!(
            ledger.add_missed_day(date("2024-03-10"), None, now()),
            Err(Rejection::InvalidValue { .. })
        ));
        assert_eq!(ledger, before);

        ledger.add_made_up_day(date("2024-03-10"), None, now()).unwrap();
        assert_eq!(ledger.summary().remaining, MAX_QADHA_DAYS - 1);
    }

    #[test]
    fn corrupt_stored_backlog_does_not_wrap() {
        let summary = QadhaSummary {
            base_total_missed: u32::MAX,
            total_missed: u32::MAX,
            ..Default::default()
        };
        let log = QadhaLog {
            id: Uuid::new_v4(),
            date: date("2024-03-10"),
            kind: QadhaEntryKind::Missed,
            notes: None,
            created_at: now(),
        };
        let mut ledger = QadhaLedger::new(vec![log], summary.clone());

        assert!(ledger.recalculate(now()).is_err());
        assert_eq!(ledger.summary(), &summary);
    }

    #[test]
    fn recalculate_is_idempotent() {
        let mut ledger = QadhaLedger::default();
        ledger.initialize(2, now()).unwrap();
        ledger.add_missed_day(date("2024-03-10"), None, now()).unwrap();
        let first = ledger.recalculate(now()).unwrap().clone();
        let second = ledger.recalculate(now()).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.total_missed, 3);
    }

    #[test]
    fn history_is_newest_first() {
        let mut ledger = QadhaLedger::default();
        ledger.add_missed_day(date("2024-03-10"), None, now()).unwrap();
        ledger.add_missed_day(date("2024-03-12"), None, now()).unwrap();
        ledger.add_missed_day(date("2024-03-11"), None, now()).unwrap();
        let dates: Vec<NaiveDate> = ledger.history().iter().map(|l| l.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-03-12"), date("2024-03-11"), date("2024-03-10")]
        );
    }
}
