use crate::model::{EnterpriseId, Registry, ShiftTemplate, WorkModeId};
use crate::shift::ShiftError;
use chrono_tz::Tz;
#[cfg(feature = "serde")]
use {
    anyhow::Context,
    std::fs,
    std::io::Write,
    std::path::{Path, PathBuf},
    tempfile::NamedTempFile,
};

/// Accès en lecture aux modèles de postes, fourni par l'extérieur.
pub trait ShiftStore {
    /// Modèles d'un régime, triés par numéro croissant.
    fn templates_for(&self, work_mode: &WorkModeId) -> Result<Vec<ShiftTemplate>, ShiftError>;
    /// Entreprise propriétaire d'un régime.
    fn enterprise_of(&self, work_mode: &WorkModeId) -> Result<EnterpriseId, ShiftError>;
    fn timezone_of(&self, enterprise: &EnterpriseId) -> Result<Tz, ShiftError>;
    fn work_modes_of(&self, enterprise: &EnterpriseId) -> Result<Vec<WorkModeId>, ShiftError>;
}

impl ShiftStore for Registry {
    fn templates_for(&self, work_mode: &WorkModeId) -> Result<Vec<ShiftTemplate>, ShiftError> {
        if self.find_work_mode(work_mode).is_none() {
            return Err(ShiftError::UnknownWorkMode(work_mode.clone()));
        }
        Ok(self.shifts_of(work_mode).into_iter().cloned().collect())
    }

    fn enterprise_of(&self, work_mode: &WorkModeId) -> Result<EnterpriseId, ShiftError> {
        self.find_work_mode(work_mode)
            .map(|w| w.enterprise.clone())
            .ok_or_else(|| ShiftError::UnknownWorkMode(work_mode.clone()))
    }

    fn timezone_of(&self, enterprise: &EnterpriseId) -> Result<Tz, ShiftError> {
        self.find_enterprise(enterprise)
            .ok_or_else(|| ShiftError::UnknownEnterprise(enterprise.clone()))?
            .tz()
    }

    fn work_modes_of(&self, enterprise: &EnterpriseId) -> Result<Vec<WorkModeId>, ShiftError> {
        if self.find_enterprise(enterprise).is_none() {
            return Err(ShiftError::UnknownEnterprise(enterprise.clone()));
        }
        Ok(self
            .work_modes
            .iter()
            .filter(|w| &w.enterprise == enterprise)
            .map(|w| w.id.clone())
            .collect())
    }
}

#[cfg(feature = "serde")]
pub trait Storage {
    /// Charge un registre depuis un support.
    fn load(&self) -> anyhow::Result<Registry>;
    /// Sauvegarde de manière atomique.
    fn save(&self, registry: &Registry) -> anyhow::Result<()>;
}

#[cfg(feature = "serde")]
pub struct JsonStorage {
    path: PathBuf,
}

#[cfg(feature = "serde")]
impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(feature = "serde")]
impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Registry> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let registry: Registry =
            serde_json::from_slice(&data).with_context(|| "parsing registry.json")?;
        Ok(registry)
    }

    fn save(&self, registry: &Registry) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(registry)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
