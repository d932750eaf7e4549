use super::{borders, ShiftError, Window};
use crate::model::ShiftTemplate;
use crate::time;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
#[cfg(feature = "serde")]
use serde::Serialize;

/// Occurrence concrète d'un modèle de poste. Valeur immuable, recréée à chaque pas.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ResolvedShift {
    pub template: ShiftTemplate,
    /// Instant ayant servi à placer la fenêtre.
    pub anchor: DateTime<Tz>,
    /// "Maintenant", sert uniquement à `is_current`.
    pub now: DateTime<Utc>,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Jour calendaire auquel l'occurrence est rattachée.
    pub shift_day: NaiveDate,
    pub shift_day_start: DateTime<Tz>,
    pub is_current: bool,
}

impl ResolvedShift {
    /// Occurrence dont la fenêtre contient `anchor`, sinon `AnchorOutsideWindow`.
    pub(crate) fn containing(
        template: &ShiftTemplate,
        anchor: DateTime<Tz>,
        now: DateTime<Utc>,
    ) -> Result<Self, ShiftError> {
        let window = borders::containing_borders(template, &anchor)?;
        Self::from_window(template, anchor, window, now)
    }

    /// Occurrence placée par [`borders::borders`], même hors de la fenêtre.
    pub(crate) fn placed(
        template: &ShiftTemplate,
        anchor: DateTime<Tz>,
        now: DateTime<Utc>,
    ) -> Result<Self, ShiftError> {
        let window = borders::borders(template, &anchor)?;
        Self::from_window(template, anchor, window, now)
    }

    fn from_window(
        template: &ShiftTemplate,
        anchor: DateTime<Tz>,
        window: Window,
        now: DateTime<Utc>,
    ) -> Result<Self, ShiftError> {
        let tz = anchor.timezone();

        let anchor_day = anchor.date_naive();
        let spans_midnight = window.start.date_naive() < window.end.date_naive();
        // Une nuit commencée le jour J est comptée sur J+1.
        let shift_day = if template.is_first()
            && spans_midnight
            && window.start.date_naive() == anchor_day
        {
            anchor_day.succ_opt().ok_or_else(|| {
                ShiftError::InvalidInstant(anchor.to_rfc3339())
            })?
        } else {
            anchor_day
        };

        Ok(Self {
            template: template.clone(),
            anchor,
            now,
            start: window.start,
            end: window.end,
            shift_day,
            shift_day_start: time::midnight(&tz, shift_day)?,
            is_current: window.start <= now && now < window.end,
        })
    }

    pub fn number(&self) -> u16 {
        self.template.number
    }

    pub fn contains<T: chrono::TimeZone>(&self, instant: &DateTime<T>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}
