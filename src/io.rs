use crate::model::{ShiftTemplate, WorkModeId};
use crate::shift::ResolvedShift;
use crate::time;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;

/// Import de modèles de postes: header `name,number,start,end`
/// (heures `HH:MM[:SS]` ou secondes depuis minuit).
pub fn import_templates_csv<P: AsRef<Path>>(
    path: P,
    work_mode: &WorkModeId,
) -> anyhow::Result<Vec<ShiftTemplate>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("reading {}", path.as_ref().display()))?;
    read_templates_csv(file, work_mode)
}

pub fn read_templates_csv<R: std::io::Read>(
    reader: R,
    work_mode: &WorkModeId,
) -> anyhow::Result<Vec<ShiftTemplate>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid shift row (empty name)");
        }
        let number: u16 = rec
            .get(1)
            .context("missing number")?
            .trim()
            .parse()
            .with_context(|| format!("invalid number for shift {name}"))?;
        let start = time::parse_offset(rec.get(2).context("missing start")?)
            .with_context(|| format!("invalid start for shift {name}"))?;
        let end = time::parse_offset(rec.get(3).context("missing end")?)
            .with_context(|| format!("invalid end for shift {name}"))?;
        let shift = ShiftTemplate::new(work_mode.clone(), name, number, start, end)
            .map_err(anyhow::Error::msg)?;
        out.push(shift);
    }
    Ok(out)
}

/// Export CSV des postes résolus:
/// header `work_mode,number,name,shift_day,start,end,current`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, shifts: &[ResolvedShift]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    write_shifts(&mut w, shifts)
}

pub fn write_shifts_csv<W: std::io::Write>(writer: W, shifts: &[ResolvedShift]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    write_shifts(&mut w, shifts)
}

fn write_shifts<W: std::io::Write>(w: &mut Writer<W>, shifts: &[ResolvedShift]) -> anyhow::Result<()> {
    w.write_record([
        "work_mode",
        "number",
        "name",
        "shift_day",
        "start",
        "end",
        "current",
    ])?;
    let mut num = itoa::Buffer::new();
    for s in shifts {
        let day = s.shift_day.to_string();
        let start = s.start.to_rfc3339();
        let end = s.end.to_rfc3339();
        w.write_record([
            s.template.work_mode.as_str(),
            num.format(s.template.number),
            s.template.name.as_str(),
            day.as_str(),
            start.as_str(),
            end.as_str(),
            if s.is_current { "yes" } else { "no" },
        ])?;
    }
    w.flush()?;
    Ok(())
}
