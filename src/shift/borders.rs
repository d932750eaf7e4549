use super::ShiftError;
use crate::model::{ShiftTemplate, Span};
use crate::time::{self, ONE_DAY};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use chrono_tz::Tz;

/// Fenêtre concrète `[start, end)` d'une occurrence de poste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Window {
    pub fn contains<T: chrono::TimeZone>(&self, instant: &DateTime<T>) -> bool {
        self.start <= *instant && *instant < self.end
    }

    fn localize(tz: &Tz, (start, end): (NaiveDateTime, NaiveDateTime)) -> Result<Self, ShiftError> {
        Ok(Self {
            start: time::localize(tz, start)?,
            end: time::localize(tz, end)?,
        })
    }
}

/// Fenêtre en heure murale pour le jour `date`, sans correction.
fn naive_window(template: &ShiftTemplate, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let base = date.and_time(NaiveTime::MIN);
    let start = base + TimeDelta::seconds(i64::from(template.start));
    let end = base + TimeDelta::seconds(i64::from(template.end));
    match template.span() {
        Span::NonWrapping => (start, end),
        // le premier poste ramène la nuit depuis la veille
        Span::Wrapping if template.is_first() => (start - ONE_DAY, end),
        Span::Wrapping => (start, end + ONE_DAY),
    }
}

fn shift_days(
    (start, end): (NaiveDateTime, NaiveDateTime),
    delta: TimeDelta,
) -> (NaiveDateTime, NaiveDateTime) {
    (start + delta, end + delta)
}

/// Bornes de `template` pour le jour où tombe `anchor` (dans le fuseau de `anchor`).
///
/// Si l'ancre n'est pas dans la fenêtre calculée, on essaie `+1 jour` puis `-1 jour`.
/// Si aucune ne la contient, la fenêtre initiale est rendue telle quelle.
pub fn borders(template: &ShiftTemplate, anchor: &DateTime<Tz>) -> Result<Window, ShiftError> {
    let tz = anchor.timezone();
    let naive = naive_window(template, anchor.date_naive());
    let window = Window::localize(&tz, naive)?;
    if window.contains(anchor) {
        return Ok(window);
    }
    for delta in [ONE_DAY, -ONE_DAY] {
        let candidate = Window::localize(&tz, shift_days(naive, delta))?;
        if candidate.contains(anchor) {
            return Ok(candidate);
        }
    }
    Ok(window)
}

/// Comme [`borders`], mais exige que la fenêtre contienne l'ancre.
pub fn containing_borders(
    template: &ShiftTemplate,
    anchor: &DateTime<Tz>,
) -> Result<Window, ShiftError> {
    let window = borders(template, anchor)?;
    if !window.contains(anchor) {
        return Err(ShiftError::AnchorOutsideWindow {
            number: template.number,
            anchor: anchor.to_rfc3339(),
        });
    }
    Ok(window)
}
