#![forbid(unsafe_code)]
//! Roulement : résolution des postes d'un régime de travail cyclique (sans BD).
//!
//! - Quel poste couvre un instant donné, et ses bornes concrètes ce jour-là.
//! - Postes de nuit qui passent minuit.
//! - Parcours suivant/précédent, séquences bornées par un nombre ou un instant.
//! - Fuseaux IANA ; les décalages des postes sont des heures murales locales.

#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod shift;
pub mod storage;
pub mod time;

pub use model::{
    Enterprise, EnterpriseId, Registry, ShiftTemplate, Span, WorkMode, WorkModeId,
};
pub use shift::{
    borders, containing_borders, Direction, Limit, ResolvedShift, ShiftError, ShiftResolver,
    Walk, Window,
};
#[cfg(feature = "serde")]
pub use storage::{JsonStorage, Storage};
pub use storage::ShiftStore;
pub use time::{day_start, parse_instant, ONE_DAY, ONE_SECOND};
