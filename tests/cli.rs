#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(registry: &Path) -> Command {
    let mut cmd = Command::cargo_bin("roulement-cli").unwrap();
    cmd.arg("--registry").arg(registry);
    cmd
}

fn setup(dir: &Path) -> std::path::PathBuf {
    let registry = dir.join("registry.json");
    let csv = dir.join("shifts.csv");
    std::fs::write(&csv, "name,number,start,end\nNuit,1,20:00,08:00\nJour,2,08:00,20:00\n").unwrap();

    cli(&registry)
        .args(["add-enterprise", "--name", "Usine", "--time-zone", "UTC"])
        .assert()
        .success();
    cli(&registry)
        .args(["add-work-mode", "--enterprise", "Usine", "--name", "2x12"])
        .assert()
        .success();
    cli(&registry)
        .args(["import-shifts", "--enterprise", "Usine", "--work-mode", "2x12", "--csv"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 shift(s) imported"));
    registry
}

#[test]
fn build_registry_and_resolve() {
    let dir = tempdir().unwrap();
    let registry = setup(dir.path());

    cli(&registry)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: registry is consistent"));

    cli(&registry)
        .args(["resolve", "--enterprise", "Usine", "--at", "2026-10-14T07:59:59Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2x12 | #1 Nuit | 2026-10-14 | 2026-10-13T20:00:00+00:00 → 2026-10-14T08:00:00+00:00",
        ));
}

#[test]
fn sequence_with_counts_and_csv_export() {
    let dir = tempdir().unwrap();
    let registry = setup(dir.path());
    let out = dir.path().join("out.csv");

    cli(&registry)
        .args([
            "sequence",
            "--enterprise",
            "Usine",
            "--work-mode",
            "2x12",
            "--at",
            "2026-10-14T12:00:00+00:00",
            "--limit",
            "3",
            "--out-csv",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("#2 Jour | 2026-10-14"))
        .stdout(predicate::str::contains("#1 Nuit | 2026-10-15"));
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 4);

    cli(&registry)
        .args([
            "sequence",
            "--enterprise",
            "Usine",
            "--at",
            "2026-10-14T12:00:00Z",
            "--limit",
            "-2",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"shift_day\": \"2026-10-14\""));

    cli(&registry)
        .args([
            "sequence",
            "--enterprise",
            "Usine",
            "--at",
            "2026-10-14T12:00:00Z",
            "--limit",
            "2026-10-15T21:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-10-15T20:00:00+00:00 → 2026-10-16T08:00:00+00:00"));
}

#[test]
fn naive_instants_are_refused() {
    let dir = tempdir().unwrap();
    let registry = setup(dir.path());

    cli(&registry)
        .args(["resolve", "--enterprise", "Usine", "--at", "2026-10-14T07:59:59"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("time zone"));
}

#[test]
fn check_reports_problems() {
    let dir = tempdir().unwrap();
    let registry = setup(dir.path());
    cli(&registry)
        .args(["add-work-mode", "--enterprise", "Usine", "--name", "vide"])
        .assert()
        .success();

    cli(&registry)
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("work mode vide has no shift"));
}

#[test]
fn duplicate_shift_numbers_are_refused() {
    let dir = tempdir().unwrap();
    let registry = setup(dir.path());
    cli(&registry)
        .args([
            "add-shift",
            "--enterprise",
            "Usine",
            "--work-mode",
            "2x12",
            "--name",
            "Relève",
            "--number",
            "2",
            "--start",
            "06:00",
            "--end",
            "07:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shift number 2 already used"));
}
