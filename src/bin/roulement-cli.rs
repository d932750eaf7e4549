#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use roulement::{
    io,
    model::{Enterprise, EnterpriseId, Registry, ShiftTemplate, WorkMode, WorkModeId},
    shift::{Limit, ResolvedShift, ShiftResolver},
    storage::{JsonStorage, Storage},
    time,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de résolution des postes d'un régime de travail (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du registre
    #[arg(long, global = true, default_value = "registry.json")]
    registry: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Déclarer une entreprise
    AddEnterprise {
        #[arg(long)]
        name: String,
        /// Fuseau IANA
        #[arg(long, default_value = "UTC")]
        time_zone: String,
    },

    /// Déclarer un régime de travail
    AddWorkMode {
        #[arg(long)]
        enterprise: String,
        #[arg(long)]
        name: String,
    },

    /// Déclarer un poste
    AddShift {
        #[arg(long)]
        enterprise: String,
        #[arg(long)]
        work_mode: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        number: u16,
        /// HH:MM[:SS] ou secondes depuis minuit
        #[arg(long)]
        start: String,
        /// HH:MM[:SS] ou secondes depuis minuit
        #[arg(long)]
        end: String,
    },

    /// Importer des postes depuis un CSV `name,number,start,end`
    ImportShifts {
        #[arg(long)]
        enterprise: String,
        #[arg(long)]
        work_mode: String,
        #[arg(long)]
        csv: String,
    },

    /// Vérifier la cohérence du registre
    Check,

    /// Poste en cours à un instant (un par régime)
    Resolve {
        #[arg(long)]
        enterprise: String,
        #[arg(long)]
        work_mode: Option<String>,
        /// RFC3339 avec décalage (maintenant par défaut)
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Suite de postes à partir d'un instant
    Sequence {
        #[arg(long)]
        enterprise: String,
        #[arg(long)]
        work_mode: Option<String>,
        /// RFC3339 avec décalage (maintenant par défaut)
        #[arg(long)]
        at: Option<String>,
        /// Nombre signé de postes, ou instant RFC3339 à atteindre
        #[arg(long, allow_hyphen_values = true)]
        limit: String,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.registry)?;
    let mut registry = if storage.exists() {
        storage.load()?
    } else {
        Registry::default()
    };

    let code = match cli.cmd {
        Commands::AddEnterprise { name, time_zone } => {
            let id = registry.add_enterprise(Enterprise::new(name, time_zone))?;
            storage.save(&registry)?;
            println!("{}", id.as_str());
            0
        }
        Commands::AddWorkMode { enterprise, name } => {
            let ent = enterprise_id(&registry, &enterprise)?;
            let id = registry.add_work_mode(WorkMode::new(ent, name))?;
            storage.save(&registry)?;
            println!("{}", id.as_str());
            0
        }
        Commands::AddShift {
            enterprise,
            work_mode,
            name,
            number,
            start,
            end,
        } => {
            let wm = work_mode_id(&registry, &enterprise, &work_mode)?;
            let start = time::parse_offset(&start).context("--start")?;
            let end = time::parse_offset(&end).context("--end")?;
            let shift =
                ShiftTemplate::new(wm, name, number, start, end).map_err(anyhow::Error::msg)?;
            registry.add_shift(shift)?;
            storage.save(&registry)?;
            0
        }
        Commands::ImportShifts {
            enterprise,
            work_mode,
            csv,
        } => {
            let wm = work_mode_id(&registry, &enterprise, &work_mode)?;
            let shifts = io::import_templates_csv(csv, &wm)?;
            let count = shifts.len();
            for shift in shifts {
                registry.add_shift(shift)?;
            }
            storage.save(&registry)?;
            println!("{count} shift(s) imported");
            0
        }
        Commands::Check => {
            let problems = registry.problems();
            if problems.is_empty() {
                println!("OK: registry is consistent");
                0
            } else {
                eprintln!("Found {} problem(s)", problems.len());
                for p in &problems {
                    eprintln!("- {p}");
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Resolve {
            enterprise,
            work_mode,
            at,
            json,
        } => {
            let at = instant_or_now(at.as_deref())?;
            let resolver = ShiftResolver::new(&registry);
            let shifts = match work_mode {
                Some(wm) => {
                    let wm = work_mode_id(&registry, &enterprise, &wm)?;
                    vec![resolver.resolve(&wm, &at)?]
                }
                None => {
                    let ent = enterprise_id(&registry, &enterprise)?;
                    resolver.resolve_for_enterprise(&ent, &at)?
                }
            };
            print_shifts(&registry, &shifts, json)?;
            0
        }
        Commands::Sequence {
            enterprise,
            work_mode,
            at,
            limit,
            out_csv,
            json,
        } => {
            let at = instant_or_now(at.as_deref())?;
            let limit = parse_limit(&limit)?;
            let resolver = ShiftResolver::new(&registry);
            let shifts = match work_mode {
                Some(wm) => {
                    let wm = work_mode_id(&registry, &enterprise, &wm)?;
                    resolver.sequence(&wm, &at, limit)?
                }
                None => {
                    let ent = enterprise_id(&registry, &enterprise)?;
                    resolver.sequence_for_enterprise(&ent, &at, limit)?
                }
            };
            if let Some(path) = out_csv {
                io::export_shifts_csv(path, &shifts)?;
            }
            print_shifts(&registry, &shifts, json)?;
            0
        }
    };

    std::process::exit(code);
}

fn enterprise_id(registry: &Registry, name: &str) -> Result<EnterpriseId> {
    registry
        .find_enterprise_by_name(name)
        .map(|e| e.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown enterprise: {}", name))
}

fn work_mode_id(registry: &Registry, enterprise: &str, name: &str) -> Result<WorkModeId> {
    let ent = enterprise_id(registry, enterprise)?;
    registry
        .find_work_mode_by_name(&ent, name)
        .map(|w| w.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown work mode: {}/{}", enterprise, name))
}

fn instant_or_now(raw: Option<&str>) -> Result<DateTime<FixedOffset>> {
    match raw {
        Some(raw) => Ok(time::parse_instant(raw)?),
        None => Ok(Utc::now().fixed_offset()),
    }
}

fn parse_limit(raw: &str) -> Result<Limit> {
    if let Ok(n) = raw.trim().parse::<i64>() {
        return Ok(Limit::Count(n));
    }
    let until = time::parse_instant(raw).context("--limit expects a count or an instant")?;
    Ok(Limit::from(until))
}

fn print_shifts(registry: &Registry, shifts: &[ResolvedShift], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(shifts)?);
        return Ok(());
    }
    for s in shifts {
        let work_mode = registry
            .find_work_mode(&s.template.work_mode)
            .map(|w| w.name.as_str())
            .unwrap_or("-");
        println!(
            "{} | #{} {} | {} | {} → {}{}",
            work_mode,
            s.template.number,
            s.template.name,
            s.shift_day,
            s.start.to_rfc3339(),
            s.end.to_rfc3339(),
            if s.is_current { " *" } else { "" }
        );
    }
    Ok(())
}
