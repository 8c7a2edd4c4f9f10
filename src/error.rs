//! Rejections returned by validating mutators
//!
//! None of these abort anything: the state is left exactly as it was and the
//! caller decides what to show. Each one is also logged at `warn` level
//! where it is raised.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::QadhaEntryKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("a {kind} entry already exists for {date}")]
    DuplicateQadhaEntry { date: NaiveDate, kind: QadhaEntryKind },

    #[error("total missed {requested} is below the {logged} logged missed days")]
    TotalBelowLogged { requested: u32, logged: u32 },

    #[error("cycle day {day} is outside 1..={cycle_length}")]
    CycleDayOutOfRange { day: u32, cycle_length: u32 },

    #[error("no period start has been recorded")]
    NoCycleData,

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
}

impl Rejection {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}
