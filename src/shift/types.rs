use crate::model::{EnterpriseId, WorkModeId};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Sens de parcours du cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Borne d'une séquence : un nombre signé de postes ou un instant cible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(i64),
    Until(DateTime<Utc>),
}

impl Limit {
    /// Vrai quand la séquence se réduit au poste courant.
    pub fn is_single(&self) -> bool {
        matches!(self, Limit::Count(n) if (-1..=1).contains(n))
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit::Count(0)
    }
}

impl From<i64> for Limit {
    fn from(n: i64) -> Self {
        Limit::Count(n)
    }
}

impl<T: TimeZone> From<DateTime<T>> for Limit {
    fn from(dt: DateTime<T>) -> Self {
        Limit::Until(dt.with_timezone(&Utc))
    }
}

#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("the time must be specified with a time zone: {0}")]
    NaiveInstant(String),
    #[error("invalid instant: {0}")]
    InvalidInstant(String),
    #[error("invalid time zone: {0}")]
    InvalidTimezone(String),
    #[error("local time {0} does not exist in this time zone")]
    NonexistentLocalTime(NaiveDateTime),
    #[error("unknown enterprise: {}", .0.as_str())]
    UnknownEnterprise(EnterpriseId),
    #[error("unknown work mode: {}", .0.as_str())]
    UnknownWorkMode(WorkModeId),
    #[error("work mode {} has no shift", .0.as_str())]
    EmptyWorkMode(WorkModeId),
    #[error("no shift of work mode {} covers {}s after midnight", .work_mode.as_str(), .seconds)]
    NoMatchingShift { work_mode: WorkModeId, seconds: u32 },
    #[error("shift #{number} has no window containing {anchor}")]
    AnchorOutsideWindow { number: u16, anchor: String },
    #[error("shift #{0} is not part of this walk")]
    UnknownShift(u16),
    #[error("no shift window contains {0}")]
    LimitInGap(DateTime<Utc>),
}
