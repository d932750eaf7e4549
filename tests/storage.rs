#![forbid(unsafe_code)]
use chrono::{TimeZone, Utc};
use roulement::{
    io, Enterprise, EnterpriseId, JsonStorage, Registry, ShiftResolver, ShiftTemplate, Storage,
    WorkMode, WorkModeId,
};
use tempfile::tempdir;

fn sample_registry() -> (Registry, WorkModeId) {
    let mut reg = Registry::default();
    let ent = reg
        .add_enterprise(Enterprise {
            id: EnterpriseId::new("usine"),
            name: "Usine".into(),
            time_zone: "Europe/Paris".into(),
        })
        .unwrap();
    let wm = reg
        .add_work_mode(WorkMode {
            id: WorkModeId::new("2x12"),
            enterprise: ent,
            name: "2x12".into(),
        })
        .unwrap();
    reg.add_shift(ShiftTemplate::new(wm.clone(), "Nuit", 1, 72_000, 28_800).unwrap())
        .unwrap();
    reg.add_shift(ShiftTemplate::new(wm.clone(), "Jour", 2, 28_800, 72_000).unwrap())
        .unwrap();
    (reg, wm)
}

#[test]
fn save_and_load_registry_roundtrip() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("registry.json")).unwrap();
    assert!(!storage.exists());

    let (reg, wm) = sample_registry();
    storage.save(&reg).unwrap();
    assert!(storage.exists());

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.enterprises, reg.enterprises);
    assert_eq!(loaded.work_modes, reg.work_modes);
    assert_eq!(loaded.shifts, reg.shifts);

    let at = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
    let before = ShiftResolver::new(&reg).at(at).resolve(&wm, &at).unwrap();
    let after = ShiftResolver::new(&loaded).at(at).resolve(&wm, &at).unwrap();
    assert_eq!(before, after);
}

#[test]
fn registry_rejects_duplicates_and_bad_zones() {
    let (mut reg, wm) = sample_registry();
    assert!(reg
        .add_shift(ShiftTemplate::new(wm.clone(), "Nuit", 3, 0, 3600).unwrap())
        .is_err());
    assert!(reg
        .add_shift(ShiftTemplate::new(wm.clone(), "Relève", 2, 0, 3600).unwrap())
        .is_err());
    assert!(reg
        .add_shift(ShiftTemplate::new(WorkModeId::new("absent"), "Relève", 1, 0, 3600).unwrap())
        .is_err());
    assert!(reg.add_enterprise(Enterprise::new("Usine", "UTC")).is_err());
    assert!(reg.add_enterprise(Enterprise::new("Atelier", "Mars/Olympus")).is_err());
    reg.validate().unwrap();
}

#[test]
fn templates_are_validated_on_construction() {
    let wm = WorkModeId::new("wm");
    assert!(ShiftTemplate::new(wm.clone(), "zéro", 0, 0, 3600).is_err());
    assert!(ShiftTemplate::new(wm.clone(), "vide", 1, 3600, 3600).is_err());
    assert!(ShiftTemplate::new(wm.clone(), "trop", 1, 0, 86_400).is_err());
    let night = ShiftTemplate::new(wm, "nuit", 1, 72_000, 28_800).unwrap();
    assert!(night.covers(72_000));
    assert!(night.covers(0));
    assert!(!night.covers(28_800));
}

#[test]
fn problems_lists_inconsistencies() {
    let (mut reg, wm) = sample_registry();
    let ent = reg.enterprises[0].id.clone();
    reg.work_modes.push(WorkMode::new(ent, "vide"));
    reg.shifts.push(ShiftTemplate {
        work_mode: wm,
        name: "Doublon".into(),
        number: 1,
        start: 0,
        end: 0,
    });

    let problems = reg.problems();
    assert!(problems.iter().any(|p| p.contains("has no shift")));
    assert!(problems.iter().any(|p| p.contains("duplicate shift number 1")));
    assert!(problems.iter().any(|p| p.contains("cannot be equal")));
    assert!(reg.validate().is_err());
}

#[test]
fn import_templates_from_csv() {
    let wm = WorkModeId::new("2x12");
    let data = "name,number,start,end\nNuit,1,20:00,08:00\nJour,2,28800,72000\n";
    let shifts = io::read_templates_csv(data.as_bytes(), &wm).unwrap();
    assert_eq!(shifts.len(), 2);
    assert_eq!((shifts[0].start, shifts[0].end), (72_000, 28_800));
    assert_eq!((shifts[1].start, shifts[1].end), (28_800, 72_000));
    assert!(shifts.iter().all(|s| s.work_mode == wm));

    let bad = "name,number,start,end\nJour,0,08:00,20:00\n";
    assert!(io::read_templates_csv(bad.as_bytes(), &wm).is_err());
    let bad = "name,number,start,end\nJour,1,8h,20:00\n";
    assert!(io::read_templates_csv(bad.as_bytes(), &wm).is_err());
}

#[test]
fn export_resolved_shifts_to_csv() {
    let (reg, wm) = sample_registry();
    let now = Utc.with_ymd_and_hms(2026, 10, 14, 5, 0, 0).unwrap();
    let shifts = ShiftResolver::new(&reg)
        .at(now)
        .sequence(&wm, &now, 3_i64)
        .unwrap();

    let mut out = Vec::new();
    io::write_shifts_csv(&mut out, &shifts).unwrap();
    let csv = String::from_utf8(out).unwrap();
    insta::assert_snapshot!(csv, @r"
    work_mode,number,name,shift_day,start,end,current
    2x12,1,Nuit,2026-10-14,2026-10-13T20:00:00+02:00,2026-10-14T08:00:00+02:00,yes
    2x12,2,Jour,2026-10-14,2026-10-14T08:00:00+02:00,2026-10-14T20:00:00+02:00,no
    2x12,1,Nuit,2026-10-15,2026-10-14T20:00:00+02:00,2026-10-15T08:00:00+02:00,no
    ");
}
