use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn ratchet() -> Command {
    Command::cargo_bin("ratchet").unwrap()
}

#[test]
fn test_header_command() {
    ratchet()
        .arg("header")
        .assert()
        .success()
        .stdout("t N s lambda mu k m1 distribution\n");
}

#[test]
fn test_run_rescaled_record_count() {
    let output = ratchet()
        .args(["run", "-N", "20", "-t", "3", "--seed", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    // initial state plus one record per time unit
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("0 20 0.1 0.4 0.0001 0 0 20;"));
    assert!(lines[3].starts_with("3 20 "));
}

#[test]
fn test_run_unscaled_record_count() {
    let output = ratchet()
        .args(["run", "-N", "20", "-t", "5", "-d", "-a", "direct", "--seed", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 6);
}

#[test]
fn test_run_with_header() {
    ratchet()
        .args(["run", "-N", "10", "-t", "1", "--header", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "t N s lambda mu k m1 distribution\n0 10 ",
        ));
}

#[test]
fn test_run_human_format() {
    ratchet()
        .args(["run", "-N", "10", "-t", "1", "-i", "2", "--format", "human", "--seed", "4"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "t:0N N:10 s:0.1 m:0.4 b:0.0001 K*:2 M1:0 0:0 1:0 2:10 ",
        ));
}

#[test]
fn test_run_json_format() {
    let output = ratchet()
        .args(["run", "-N", "10", "-t", "2", "--format", "json", "--seed", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["generation"], 0);
    assert_eq!(first["distribution"], serde_json::json!([10]));
}

#[test]
fn test_run_same_seed_same_output() {
    let args = ["run", "-N", "30", "-t", "4", "-d", "--seed", "42"];
    let a = ratchet().args(args).output().unwrap();
    let b = ratchet().args(args).output().unwrap();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn test_run_invalid_selection_fails() {
    ratchet()
        .args(["run", "-s", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("selection coefficient must be in [0, 1]"));
}

#[test]
fn test_run_invalid_backmutation_fails() {
    ratchet()
        .args(["run", "-b", "-0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("back-mutation rate"));
}

#[test]
fn test_run_unknown_algorithm_fails() {
    ratchet()
        .args(["run", "-a", "fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown algorithm"));
}

#[test]
fn test_run_writes_output_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("records.txt");

    ratchet()
        .args(["run", "-N", "10", "-t", "2", "--seed", "6", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn test_init_then_run_from_config() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("ratchet.json");

    ratchet()
        .args(["init", "-N", "15", "-t", "2", "-a", "direct", "--seed", "7", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation initialized successfully!"));

    assert!(path.exists());

    let output = ratchet()
        .args(["run", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.starts_with("0 15 "));
}

#[test]
fn test_config_conflicts_with_model_flags() {
    ratchet()
        .args(["run", "--config", "ratchet.json", "-N", "10"])
        .assert()
        .failure();
}

#[test]
fn test_missing_config_fails() {
    let temp = tempdir().unwrap();
    ratchet()
        .args(["run", "--config"])
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
