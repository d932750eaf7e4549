//! Utilitaires de temps : minuit local, pas fixes, parsing d'instants et de fuseaux.
//!
//! Les décalages des postes sont des heures murales : on calcule en heure locale
//! naïve puis on localise dans le fuseau de l'entreprise.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone,
    Timelike,
};
use chrono_tz::Tz;

use crate::shift::ShiftError;

pub const SECONDS_IN_DAY: u32 = 86_400;

/// Pas utilisé pour sortir d'une fenêtre lors d'un parcours.
pub const ONE_SECOND: TimeDelta = TimeDelta::seconds(1);

/// Décalage d'une journée (appliqué en heure murale).
pub const ONE_DAY: TimeDelta = TimeDelta::days(1);

/// Minuit local du jour calendaire de `instant` dans `tz`.
pub fn day_start<T: TimeZone>(instant: &DateTime<T>, tz: &Tz) -> Result<DateTime<Tz>, ShiftError> {
    midnight(tz, instant.with_timezone(tz).date_naive())
}

/// Minuit local d'une date donnée.
pub fn midnight(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>, ShiftError> {
    localize(tz, date.and_time(NaiveTime::MIN))
}

/// Secondes écoulées depuis minuit, lues sur l'horloge locale de `instant`.
pub fn seconds_since_midnight<T: TimeZone>(instant: &DateTime<T>) -> u32 {
    instant.num_seconds_from_midnight()
}

/// Place une heure murale dans `tz`.
///
/// Heure ambiguë (retour à l'heure d'hiver) : le premier instant.
/// Heure inexistante (passage à l'heure d'été) : avancée de la durée réelle du saut,
/// en lisant l'heure murale avec le décalage d'avant la transition.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>, ShiftError> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Ok(dt);
    }
    let before = tz.offset_from_utc_datetime(&(naive - ONE_DAY)).fix();
    let moved = tz.from_utc_datetime(&(naive - before));
    if moved.naive_local() <= naive {
        return Err(ShiftError::NonexistentLocalTime(naive));
    }
    Ok(moved)
}

/// Parse un instant RFC3339. Une date-heure sans décalage est refusée.
pub fn parse_instant(raw: &str) -> Result<DateTime<FixedOffset>, ShiftError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    let naive = raw.parse::<NaiveDateTime>().is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").is_ok()
        || raw.parse::<NaiveDate>().is_ok();
    if naive {
        return Err(ShiftError::NaiveInstant(raw.to_string()));
    }
    Err(ShiftError::InvalidInstant(raw.to_string()))
}

/// Parse un nom de fuseau IANA.
pub fn parse_timezone(s: &str) -> Result<Tz, ShiftError> {
    s.parse::<Tz>()
        .map_err(|_| ShiftError::InvalidTimezone(s.to_string()))
}

/// Parse une heure de journée : `HH:MM`, `HH:MM:SS` ou un nombre de secondes.
pub fn parse_offset(raw: &str) -> anyhow::Result<u32> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<u32>() {
        if secs >= SECONDS_IN_DAY {
            anyhow::bail!("offset {secs} is not below {SECONDS_IN_DAY}");
        }
        return Ok(secs);
    }
    let time = NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| anyhow::anyhow!("invalid time of day: {raw}"))?;
    Ok(time.num_seconds_from_midnight())
}
