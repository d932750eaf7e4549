use super::{matcher, Direction, Limit, ResolvedShift, ShiftError};
use crate::model::{ShiftTemplate, WorkModeId};
use crate::time::ONE_SECOND;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Contexte d'un parcours : instantané ordonné des postes d'un régime.
///
/// Chargé une fois, il sert à tous les pas dérivés du même parcours.
#[derive(Debug, Clone)]
pub struct Walk {
    work_mode: WorkModeId,
    tz: Tz,
    templates: Vec<ShiftTemplate>,
    now: DateTime<Utc>,
}

impl Walk {
    pub fn new(
        work_mode: WorkModeId,
        tz: Tz,
        mut templates: Vec<ShiftTemplate>,
        now: DateTime<Utc>,
    ) -> Result<Self, ShiftError> {
        if templates.is_empty() {
            return Err(ShiftError::EmptyWorkMode(work_mode));
        }
        templates.sort_by_key(|t| t.number);
        Ok(Self {
            work_mode,
            tz,
            templates,
            now,
        })
    }

    pub fn work_mode(&self) -> &WorkModeId {
        &self.work_mode
    }
    pub fn timezone(&self) -> Tz {
        self.tz
    }
    pub fn templates(&self) -> &[ShiftTemplate] {
        &self.templates
    }

    /// Poste couvrant `instant`.
    pub fn resolve<T: TimeZone>(&self, instant: &DateTime<T>) -> Result<ResolvedShift, ShiftError> {
        matcher::resolve(&self.work_mode, &self.templates, &self.tz, instant, self.now)
    }

    /// Place un modèle donné autour de `anchor`, sans rechercher le poste couvrant.
    pub fn instance<T: TimeZone>(
        &self,
        template: &ShiftTemplate,
        anchor: &DateTime<T>,
    ) -> Result<ResolvedShift, ShiftError> {
        ResolvedShift::placed(template, anchor.with_timezone(&self.tz), self.now)
    }

    fn position(&self, number: u16) -> Result<usize, ShiftError> {
        self.templates
            .binary_search_by_key(&number, |t| t.number)
            .map_err(|_| ShiftError::UnknownShift(number))
    }

    /// Poste suivant ou précédent dans l'ordre cyclique.
    pub fn step(
        &self,
        current: &ResolvedShift,
        direction: Direction,
    ) -> Result<ResolvedShift, ShiftError> {
        let count = self.templates.len();
        let pos = self.position(current.number())?;
        let (idx, anchor) = match direction {
            Direction::Next => ((pos + 1) % count, current.end + ONE_SECOND),
            Direction::Prev => ((pos + count - 1) % count, current.start - ONE_SECOND),
        };
        let template = &self.templates[idx];
        ResolvedShift::containing(template, anchor.with_timezone(&self.tz), self.now)
    }

    pub fn next(&self, current: &ResolvedShift) -> Result<ResolvedShift, ShiftError> {
        self.step(current, Direction::Next)
    }

    pub fn prev(&self, current: &ResolvedShift) -> Result<ResolvedShift, ShiftError> {
        self.step(current, Direction::Prev)
    }

    /// Séquence à partir du poste couvrant `instant`, bornée par `limit`.
    ///
    /// Les éléments sont rendus dans l'ordre de parcours, le premier inclus.
    pub fn sequence<T: TimeZone>(
        &self,
        instant: &DateTime<T>,
        limit: Limit,
    ) -> Result<Vec<ResolvedShift>, ShiftError> {
        let first = self.resolve(instant)?;
        match limit {
            Limit::Count(_) if limit.is_single() => Ok(vec![first]),
            Limit::Count(n) => {
                let direction = if n < 0 {
                    Direction::Prev
                } else {
                    Direction::Next
                };
                let total = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
                let mut shifts = Vec::with_capacity(total.min(1024));
                shifts.push(first);
                while shifts.len() < total {
                    let last = &shifts[shifts.len() - 1];
                    let stepped = self.step(last, direction)?;
                    shifts.push(stepped);
                }
                Ok(shifts)
            }
            Limit::Until(target) => {
                let direction = if target >= *instant {
                    Direction::Next
                } else {
                    Direction::Prev
                };
                let mut shifts = vec![first];
                loop {
                    let last = &shifts[shifts.len() - 1];
                    if last.contains(&target) {
                        break;
                    }
                    let passed = match direction {
                        Direction::Next => last.start > target,
                        Direction::Prev => last.end <= target,
                    };
                    if passed {
                        return Err(ShiftError::LimitInGap(target));
                    }
                    let stepped = self.step(last, direction)?;
                    shifts.push(stepped);
                }
                debug!(
                    work_mode = self.work_mode.as_str(),
                    steps = shifts.len(),
                    "sequence reached target"
                );
                Ok(shifts)
            }
        }
    }
}
