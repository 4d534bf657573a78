//! Integration tests for the fitcoach binary.
//!
//! These tests verify end-to-end behavior including:
//! - Visit tracking on every launch
//! - Plan import, display and reset
//! - Guided sessions driven through stdin
//! - Weight logging and export

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("fitcoach"))
}

/// A CLI invocation with its config home inside `dir`
fn cli_in(dir: &Path) -> Command {
    let mut cmd = cli();
    cmd.env("XDG_CONFIG_HOME", dir.join("config"));
    cmd
}

/// A CLI invocation pinned to a data dir and a fixed instant
fn cli_at(data_dir: &Path, now: &str) -> Command {
    let mut cmd = cli_in(data_dir);
    cmd.arg("--data-dir").arg(data_dir).arg("--now").arg(now);
    cmd
}

fn write_config(dir: &Path, contents: &str) {
    let config_dir = dir.join("config").join("fitcoach");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), contents).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("read json")).expect("parse json")
}

fn exercise(name: &str) -> Value {
    json!({"name": name, "sets": "3", "reps": "10", "notes": "Controlled tempo"})
}

fn meal(name: &str, calories: u32) -> Value {
    json!({
        "name": name,
        "description": "",
        "calories": calories,
        "protein": 20,
        "carbs": 30,
        "fats": 10
    })
}

/// Write a generated plan with `days` days and a profile; returns their paths
fn write_plan_files(dir: &Path, days: usize) -> (std::path::PathBuf, std::path::PathBuf) {
    let workout: Vec<Value> = (0..days)
        .map(|i| {
            json!({
                "dayName": format!("Day {}", i + 1),
                "focus": if i == 6 { "Recovery" } else { "Strength" },
                "exercises": [exercise("Goblet Squat"), exercise("Push-up"), exercise("Plank")],
                "restDay": i == 6
            })
        })
        .collect();
    let diet: Vec<Value> = (0..days)
        .map(|i| {
            json!({
                "dayName": format!("Day {}", i + 1),
                "meals": {
                    "breakfast": meal("Oats", 400),
                    "lunch": meal("Chicken bowl", 650),
                    "dinner": meal("Salmon", 700),
                    "snack": meal("Yogurt", 150)
                },
                "totalCalories": 1900
            })
        })
        .collect();
    let plan = json!({
        "summary": "Build strength three ways",
        "workoutPlan": workout,
        "dietPlan": diet,
        "tips": ["Drink water"]
    });
    let profile = json!({
        "age": 30,
        "height": 180,
        "weight": 85,
        "gender": "Male",
        "goal": "Build Muscle",
        "activityLevel": "Moderately Active",
        "equipment": "Dumbbells",
        "dietPreference": "None",
        "allergies": ""
    });

    let fixtures = dir.join("fixtures");
    fs::create_dir_all(&fixtures).unwrap();
    let plan_path = fixtures.join("generated_plan.json");
    let profile_path = fixtures.join("profile.json");
    fs::write(&plan_path, plan.to_string()).unwrap();
    fs::write(&profile_path, profile.to_string()).unwrap();
    (plan_path, profile_path)
}

fn import_plan(data_dir: &Path, days: usize) {
    let (plan_path, profile_path) = write_plan_files(data_dir, days);
    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .arg("plan")
        .arg("import")
        .arg(&plan_path)
        .arg("--profile")
        .arg(&profile_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan adopted"));
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal fitness coach"));
}

#[test]
fn test_first_launch_records_visit() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day streak:   1"))
        .stdout(predicate::str::contains("Total visits: 1"));

    let visits = read_json(&data_dir.join("visits.json"));
    assert_eq!(visits["lastVisitDate"], "2024-01-10");
    assert_eq!(visits["streak"], 1);
    assert_eq!(visits["totalVisits"], 1);
}

#[test]
fn test_streak_across_launches() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli_at(data_dir, "2024-01-10T08:00:00Z").assert().success();
    cli_at(data_dir, "2024-01-10T20:00:00Z").assert().success();
    cli_at(data_dir, "2024-01-11T07:30:00Z")
        .arg("checkin")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day streak:   2"))
        .stdout(predicate::str::contains("Total visits: 2"));

    // Gap of more than a day collapses the streak to one
    cli_at(data_dir, "2024-01-14T07:30:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day streak:   1"))
        .stdout(predicate::str::contains("Total visits: 3"));

    let visits = read_json(&data_dir.join("visits.json"));
    assert_eq!(visits["lastVisitTimestamp"], "2024-01-14T07:30:00Z");
}

#[test]
fn test_weight_same_day_overwrites() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["weight", "add", "82.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 82.5 kg for 2024-01-10"));
    cli_at(data_dir, "2024-01-10T19:00:00Z")
        .args(["weight", "add", "81"])
        .assert()
        .success();

    let history = read_json(&data_dir.join("weight_history.json"));
    assert_eq!(history, json!([{"date": "2024-01-10", "weight": 81.0}]));
}

#[test]
fn test_weight_history_sorted_and_windowed() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for (date, kg) in [("2024-01-12", "80.0"), ("2024-01-03", "83.0"), ("2024-01-08", "81.5")] {
        cli_at(data_dir, "2024-01-12T08:00:00Z")
            .args(["weight", "add", kg, "--date", date])
            .assert()
            .success();
    }

    let history = read_json(&data_dir.join("weight_history.json"));
    let dates: Vec<_> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["date"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2024-01-03", "2024-01-08", "2024-01-12"]);

    cli_at(data_dir, "2024-01-12T08:00:00Z")
        .args(["weight", "show", "--last", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-08"))
        .stdout(predicate::str::contains("2024-01-03").not())
        .stdout(predicate::str::contains("Current weight: 80.0 kg"))
        .stdout(predicate::str::contains("3.0 kg lost"));
}

#[test]
fn test_weight_rejects_non_positive() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["weight", "add", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput("));

    assert!(!data_dir.join("weight_history.json").exists());
}

#[test]
fn test_weight_export_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["weight", "add", "82.5"])
        .assert()
        .success();

    let csv_path = data_dir.join("export.csv");
    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["weight", "export"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 entries"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv, "date,weight\n2024-01-10,82.5\n");
}

#[test]
fn test_plan_import_and_show() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);

    assert!(data_dir.join("plan.json").exists());
    assert!(data_dir.join("profile.json").exists());

    // 2024-01-10 is a Wednesday, index 2
    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["plan", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 3 (Wed)"))
        .stdout(predicate::str::contains("Goblet Squat: 3 sets × 10 reps"))
        .stdout(predicate::str::contains("Total: 1900 kcal"));
}

#[test]
fn test_short_plan_wraps_days() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 3);

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["plan", "show", "--day", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 2 (Fri)"));
}

#[test]
fn test_failed_import_keeps_previous_plan() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);
    let before = fs::read_to_string(data_dir.join("plan.json")).unwrap();

    let broken = data_dir.join("fixtures").join("broken_plan.json");
    fs::write(&broken, "{ \"summary\": ").unwrap();
    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["plan", "import"])
        .arg(&broken)
        .arg("--profile")
        .arg(data_dir.join("fixtures").join("profile.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Generation("));

    let after = fs::read_to_string(data_dir.join("plan.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_guided_session_completes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);

    // Three exercises: six empty lines advance to Completed
    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["session", "--day", "0"])
        .write_stdin("\n\nt\np\np\n\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise 1 of 3"))
        .stdout(predicate::str::contains("Up next: Push-up"))
        .stdout(predicate::str::contains("Paused"))
        .stdout(predicate::str::contains("Last rest"))
        .stdout(predicate::str::contains("Workout Complete!"))
        .stdout(predicate::str::contains("Exercises: 3"))
        .stdout(predicate::str::contains("Total active time: 00:0"))
        .stdout(predicate::str::contains("Progress was not saved").not());
}

#[test]
fn test_guided_session_abort() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["session", "--day", "1"])
        .write_stdin("\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress was not saved"))
        .stdout(predicate::str::contains("Workout Complete!").not());
}

#[test]
fn test_guided_session_ends_on_eof() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["session", "--day", "0"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress was not saved"));
}

#[test]
fn test_rest_day_has_no_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["session", "--day", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is a rest day"));
}

#[test]
fn test_session_without_plan() {
    let temp_dir = setup_test_dir();
    cli_at(temp_dir.path(), "2024-01-10T08:00:00Z")
        .arg("session")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan yet"));
}

#[test]
fn test_reset_keeps_progress() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);
    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["weight", "add", "80"])
        .assert()
        .success();

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan and profile cleared"));

    assert!(!data_dir.join("plan.json").exists());
    assert!(!data_dir.join("profile.json").exists());
    assert!(data_dir.join("weight_history.json").exists());
    assert!(data_dir.join("visits.json").exists());
}

#[test]
fn test_session_stops_one_advance_short_of_completion() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    import_plan(data_dir, 7);

    // Five advances leave the session on its final rest
    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .args(["session", "--day", "0"])
        .write_stdin("\n\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Last rest"))
        .stdout(predicate::str::contains("Progress was not saved"))
        .stdout(predicate::str::contains("Workout Complete!").not());
}

#[test]
fn test_config_is_read_from_config_home() {
    let temp_dir = setup_test_dir();
    let home = temp_dir.path();
    let configured = home.join("configured-data");
    write_config(
        home,
        &format!("[data]\ndata_dir = {:?}\n", configured.to_string_lossy()),
    );

    cli_in(home)
        .args(["--now", "2024-01-10T08:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total visits: 1"));

    assert!(configured.join("visits.json").exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    write_config(data_dir, "[session]\ntick_interval_ms = 0\n");

    cli_at(data_dir, "2024-01-10T08:00:00Z")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config("));

    assert!(!data_dir.join("visits.json").exists());
}
