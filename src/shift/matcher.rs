use super::{ResolvedShift, ShiftError};
use crate::model::{ShiftTemplate, WorkModeId};
use crate::time;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// Choisit le modèle qui couvre `seconds` (depuis minuit local).
/// Plusieurs candidats : le plus petit numéro l'emporte.
pub(super) fn select_template<'a>(
    work_mode: &WorkModeId,
    templates: &'a [ShiftTemplate],
    seconds: u32,
) -> Result<&'a ShiftTemplate, ShiftError> {
    if templates.is_empty() {
        return Err(ShiftError::EmptyWorkMode(work_mode.clone()));
    }

    let mut matching = templates.iter().filter(|t| t.covers(seconds));
    let Some(first) = matching.next() else {
        return Err(ShiftError::NoMatchingShift {
            work_mode: work_mode.clone(),
            seconds,
        });
    };

    let mut chosen = first;
    for other in matching {
        warn!(
            work_mode = work_mode.as_str(),
            a = chosen.number,
            b = other.number,
            seconds,
            "overlapping shifts"
        );
        if other.number < chosen.number {
            chosen = other;
        }
    }
    Ok(chosen)
}

/// Résout le poste couvrant `instant` parmi `templates`, dans le fuseau `tz`.
pub(super) fn resolve<T: TimeZone>(
    work_mode: &WorkModeId,
    templates: &[ShiftTemplate],
    tz: &Tz,
    instant: &DateTime<T>,
    now: DateTime<Utc>,
) -> Result<ResolvedShift, ShiftError> {
    let local = instant.with_timezone(tz);
    let seconds = time::seconds_since_midnight(&local);
    let template = select_template(work_mode, templates, seconds)?;
    debug!(
        work_mode = work_mode.as_str(),
        number = template.number,
        seconds,
        "shift matched"
    );
    match ResolvedShift::containing(template, local, now) {
        Err(ShiftError::AnchorOutsideWindow { .. }) => {
            containing_any(work_mode, templates, local, now, template.number)
        }
        other => other,
    }
}

/// Près d'un changement d'heure, l'heure murale peut désigner un poste dont la fenêtre
/// réelle ne contient pas l'instant : on prend alors le plus petit numéro qui le contient.
fn containing_any(
    work_mode: &WorkModeId,
    templates: &[ShiftTemplate],
    local: DateTime<Tz>,
    now: DateTime<Utc>,
    picked: u16,
) -> Result<ResolvedShift, ShiftError> {
    let mut ordered: Vec<&ShiftTemplate> = templates.iter().collect();
    ordered.sort_by_key(|t| t.number);
    for template in ordered {
        if let Ok(shift) = ResolvedShift::containing(template, local, now) {
            debug!(
                work_mode = work_mode.as_str(),
                picked,
                number = template.number,
                "wall-clock pick outside its window, using neighbour"
            );
            return Ok(shift);
        }
    }
    Err(ShiftError::AnchorOutsideWindow {
        number: picked,
        anchor: local.to_rfc3339(),
    })
}
