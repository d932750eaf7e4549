use anyhow::{bail, Context};
use chrono_tz::Tz;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{self, SECONDS_IN_DAY};

/// Numéro du premier poste d'un régime : c'est lui qui porte le passage de minuit
/// depuis la veille quand il déborde.
pub const FIRST_SHIFT_NUMBER: u16 = 1;

/// Identifiant fort pour Enterprise
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnterpriseId(String);

impl EnterpriseId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour WorkMode
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkModeId(String);

impl WorkModeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Entreprise : ne fournit au cœur que son fuseau horaire.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Enterprise {
    pub id: EnterpriseId,
    pub name: String,
    /// Nom IANA (`Europe/Paris`, `UTC`, ...).
    #[cfg_attr(feature = "serde", serde(default = "default_time_zone"))]
    pub time_zone: String,
}

#[cfg(feature = "serde")]
fn default_time_zone() -> String {
    "UTC".to_string()
}

impl Enterprise {
    pub fn new<N: Into<String>, Z: Into<String>>(name: N, time_zone: Z) -> Self {
        Self {
            id: EnterpriseId::random(),
            name: name.into(),
            time_zone: time_zone.into(),
        }
    }

    pub fn tz(&self) -> Result<Tz, crate::ShiftError> {
        time::parse_timezone(&self.time_zone)
    }
}

/// Régime de travail : ensemble ordonné et cyclique de postes d'une entreprise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkMode {
    pub id: WorkModeId,
    pub enterprise: EnterpriseId,
    pub name: String,
}

impl WorkMode {
    pub fn new<N: Into<String>>(enterprise: EnterpriseId, name: N) -> Self {
        Self {
            id: WorkModeId::random(),
            enterprise,
            name: name.into(),
        }
    }
}

/// Forme d'un poste dans la journée locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// `start < end` : le poste tient dans la journée.
    NonWrapping,
    /// `start > end` : le poste passe minuit (poste de nuit).
    Wrapping,
}

/// Modèle de poste. Les bornes sont des secondes depuis minuit local.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShiftTemplate {
    pub work_mode: WorkModeId,
    pub name: String,
    pub number: u16,
    pub start: u32,
    pub end: u32,
}

impl ShiftTemplate {
    /// Crée un modèle en validant numéro et bornes.
    pub fn new<N: Into<String>>(
        work_mode: WorkModeId,
        name: N,
        number: u16,
        start: u32,
        end: u32,
    ) -> Result<Self, String> {
        if number == 0 {
            return Err("shift number must be positive".to_string());
        }
        if start >= SECONDS_IN_DAY || end >= SECONDS_IN_DAY {
            return Err(format!("offsets must be below {SECONDS_IN_DAY} seconds"));
        }
        if start == end {
            return Err("shift start and end cannot be equal".to_string());
        }
        Ok(Self {
            work_mode,
            name: name.into(),
            number,
            start,
            end,
        })
    }

    /// Dérivée une seule fois de `start` vs `end` ; `start == end` est refusé en amont.
    pub fn span(&self) -> Span {
        if self.start < self.end {
            Span::NonWrapping
        } else {
            Span::Wrapping
        }
    }

    pub fn is_first(&self) -> bool {
        self.number == FIRST_SHIFT_NUMBER
    }

    /// Vrai si `seconds` (depuis minuit local) tombe dans ce poste.
    pub fn covers(&self, seconds: u32) -> bool {
        if self.start == self.end {
            return false;
        }
        match self.span() {
            Span::NonWrapping => self.start <= seconds && seconds < self.end,
            // partie du soir ou partie du matin
            Span::Wrapping => self.start <= seconds || seconds < self.end,
        }
    }
}

/// Registre complet : entreprises, régimes et modèles de postes.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Registry {
    #[cfg_attr(feature = "serde", serde(default))]
    pub enterprises: Vec<Enterprise>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub work_modes: Vec<WorkMode>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shifts: Vec<ShiftTemplate>,
}

impl Registry {
    pub fn find_enterprise<'a>(&'a self, id: &EnterpriseId) -> Option<&'a Enterprise> {
        self.enterprises.iter().find(|e| &e.id == id)
    }
    pub fn find_enterprise_by_name<'a>(&'a self, name: &str) -> Option<&'a Enterprise> {
        self.enterprises.iter().find(|e| e.name == name)
    }
    pub fn find_work_mode<'a>(&'a self, id: &WorkModeId) -> Option<&'a WorkMode> {
        self.work_modes.iter().find(|w| &w.id == id)
    }
    pub fn find_work_mode_by_name<'a>(
        &'a self,
        enterprise: &EnterpriseId,
        name: &str,
    ) -> Option<&'a WorkMode> {
        self.work_modes
            .iter()
            .find(|w| &w.enterprise == enterprise && w.name == name)
    }

    /// Modèles d'un régime, triés par numéro.
    pub fn shifts_of(&self, work_mode: &WorkModeId) -> Vec<&ShiftTemplate> {
        let mut out: Vec<&ShiftTemplate> = self
            .shifts
            .iter()
            .filter(|s| &s.work_mode == work_mode)
            .collect();
        out.sort_by_key(|s| s.number);
        out
    }

    pub fn add_enterprise(&mut self, enterprise: Enterprise) -> anyhow::Result<EnterpriseId> {
        if self.find_enterprise_by_name(&enterprise.name).is_some() {
            bail!("enterprise {} already exists", enterprise.name);
        }
        enterprise
            .tz()
            .with_context(|| format!("enterprise {}", enterprise.name))?;
        let id = enterprise.id.clone();
        self.enterprises.push(enterprise);
        Ok(id)
    }

    pub fn add_work_mode(&mut self, work_mode: WorkMode) -> anyhow::Result<WorkModeId> {
        if self.find_enterprise(&work_mode.enterprise).is_none() {
            bail!("unknown enterprise: {}", work_mode.enterprise.as_str());
        }
        if self
            .find_work_mode_by_name(&work_mode.enterprise, &work_mode.name)
            .is_some()
        {
            bail!("work mode {} already exists", work_mode.name);
        }
        let id = work_mode.id.clone();
        self.work_modes.push(work_mode);
        Ok(id)
    }

    pub fn add_shift(&mut self, shift: ShiftTemplate) -> anyhow::Result<()> {
        if self.find_work_mode(&shift.work_mode).is_none() {
            bail!("unknown work mode: {}", shift.work_mode.as_str());
        }
        let siblings = self.shifts_of(&shift.work_mode);
        if siblings.iter().any(|s| s.name == shift.name) {
            bail!("shift name {} already used in this work mode", shift.name);
        }
        if siblings.iter().any(|s| s.number == shift.number) {
            bail!("shift number {} already used in this work mode", shift.number);
        }
        self.shifts.push(shift);
        Ok(())
    }

    /// Liste les incohérences du registre (vide si tout est correct).
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();

        for (idx, e) in self.enterprises.iter().enumerate() {
            if let Err(err) = e.tz() {
                out.push(format!("enterprise {}: {err}", e.name));
            }
            if self.enterprises[idx + 1..].iter().any(|o| o.name == e.name) {
                out.push(format!("duplicate enterprise name {}", e.name));
            }
        }

        for (idx, w) in self.work_modes.iter().enumerate() {
            if self.find_enterprise(&w.enterprise).is_none() {
                out.push(format!("work mode {}: unknown enterprise", w.name));
            }
            if self.work_modes[idx + 1..]
                .iter()
                .any(|o| o.enterprise == w.enterprise && o.name == w.name)
            {
                out.push(format!("duplicate work mode name {}", w.name));
            }
            if self.shifts_of(&w.id).is_empty() {
                out.push(format!("work mode {} has no shift", w.name));
            }
        }

        for (idx, s) in self.shifts.iter().enumerate() {
            if self.find_work_mode(&s.work_mode).is_none() {
                out.push(format!("shift {}: unknown work mode", s.name));
            }
            if let Err(err) =
                ShiftTemplate::new(s.work_mode.clone(), s.name.clone(), s.number, s.start, s.end)
            {
                out.push(format!("shift {}: {err}", s.name));
            }
            for o in self.shifts[idx + 1..].iter().filter(|o| o.work_mode == s.work_mode) {
                if o.name == s.name {
                    out.push(format!("duplicate shift name {}", s.name));
                }
                if o.number == s.number {
                    out.push(format!("duplicate shift number {}", s.number));
                }
            }
        }

        out
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let problems = self.problems();
        if !problems.is_empty() {
            bail!("invalid registry: {}", problems.join("; "));
        }
        Ok(())
    }
}
