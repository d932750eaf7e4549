mod borders;
mod instance;
mod matcher;
mod types;
mod walker;

pub use borders::{borders, containing_borders, Window};
pub use instance::ResolvedShift;
pub use types::{Direction, Limit, ShiftError};
pub use walker::Walk;

use crate::model::{EnterpriseId, ShiftTemplate, WorkModeId};
use crate::storage::ShiftStore;
use crate::time;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// ShiftResolver : résout et parcourt les postes à partir d'un magasin de modèles.
///
/// Ne garde aucun état modifiable : chaque appel relit le magasin, seul un [`Walk`]
/// conserve l'instantané des modèles le temps d'un parcours.
pub struct ShiftResolver<'s, S: ShiftStore + ?Sized> {
    store: &'s S,
    now: Option<DateTime<Utc>>,
}

impl<S: ShiftStore + ?Sized> Clone for ShiftResolver<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ShiftStore + ?Sized> Copy for ShiftResolver<'_, S> {}

impl<'s, S: ShiftStore + ?Sized> ShiftResolver<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store, now: None }
    }

    /// Fixe l'instant d'évaluation de `is_current` (horloge système sinon).
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Charge l'instantané ordonné des modèles d'un régime.
    pub fn walk(&self, work_mode: &WorkModeId) -> Result<Walk, ShiftError> {
        let enterprise = self.store.enterprise_of(work_mode)?;
        let tz = self.store.timezone_of(&enterprise)?;
        let templates = self.store.templates_for(work_mode)?;
        Walk::new(work_mode.clone(), tz, templates, self.now())
    }

    pub fn resolve<T: TimeZone>(
        &self,
        work_mode: &WorkModeId,
        instant: &DateTime<T>,
    ) -> Result<ResolvedShift, ShiftError> {
        self.walk(work_mode)?.resolve(instant)
    }

    /// Un poste par régime de l'entreprise.
    pub fn resolve_for_enterprise<T: TimeZone>(
        &self,
        enterprise: &EnterpriseId,
        instant: &DateTime<T>,
    ) -> Result<Vec<ResolvedShift>, ShiftError> {
        self.store
            .work_modes_of(enterprise)?
            .iter()
            .map(|wm| self.resolve(wm, instant))
            .collect()
    }

    pub fn sequence<T: TimeZone>(
        &self,
        work_mode: &WorkModeId,
        instant: &DateTime<T>,
        limit: impl Into<Limit>,
    ) -> Result<Vec<ResolvedShift>, ShiftError> {
        self.walk(work_mode)?.sequence(instant, limit.into())
    }

    /// Séquences de tous les régimes, mises bout à bout régime par régime.
    /// Avec une borne unitaire, c'est un poste par régime.
    pub fn sequence_for_enterprise<T: TimeZone>(
        &self,
        enterprise: &EnterpriseId,
        instant: &DateTime<T>,
        limit: impl Into<Limit>,
    ) -> Result<Vec<ResolvedShift>, ShiftError> {
        let limit = limit.into();
        if limit.is_single() {
            return self.resolve_for_enterprise(enterprise, instant);
        }
        let mut out = Vec::new();
        for wm in self.store.work_modes_of(enterprise)? {
            out.extend(self.sequence(&wm, instant, limit)?);
        }
        Ok(out)
    }

    /// Pas isolé : relit les modèles du régime de `current`.
    pub fn step(
        &self,
        current: &ResolvedShift,
        direction: Direction,
    ) -> Result<ResolvedShift, ShiftError> {
        self.walk(&current.template.work_mode)?.step(current, direction)
    }

    pub fn next(&self, current: &ResolvedShift) -> Result<ResolvedShift, ShiftError> {
        self.step(current, Direction::Next)
    }

    pub fn prev(&self, current: &ResolvedShift) -> Result<ResolvedShift, ShiftError> {
        self.step(current, Direction::Prev)
    }

    /// Bornes de `template` autour de `instant`, dans le fuseau de son entreprise.
    pub fn borders<T: TimeZone>(
        &self,
        template: &ShiftTemplate,
        instant: &DateTime<T>,
    ) -> Result<Window, ShiftError> {
        let enterprise = self.store.enterprise_of(&template.work_mode)?;
        let tz = self.store.timezone_of(&enterprise)?;
        borders(template, &instant.with_timezone(&tz))
    }

    /// Occurrence d'un modèle donné autour de `anchor`.
    pub fn instance<T: TimeZone>(
        &self,
        template: &ShiftTemplate,
        anchor: &DateTime<T>,
    ) -> Result<ResolvedShift, ShiftError> {
        self.walk(&template.work_mode)?.instance(template, anchor)
    }

    /// Occurrence d'un modèle ancrée à minuit local de `date`.
    pub fn instance_on(
        &self,
        template: &ShiftTemplate,
        date: NaiveDate,
    ) -> Result<ResolvedShift, ShiftError> {
        let walk = self.walk(&template.work_mode)?;
        let anchor = time::midnight(&walk.timezone(), date)?;
        walk.instance(template, &anchor)
    }
}
