//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn examsim(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("examsim").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("EXAMSIM_STORAGE_PATH")
        .env_remove("EXAMSIM_PASS_THRESHOLD");
    cmd
}

const NUMBERED_DOC: &str = "1. Which keyword declares an immutable binding?\n\
A) mut\n\
B) let\n\
C) var\n\
Respuesta: B\n\
\n\
2. Which macro prints a line?\n\
A) println!\n\
B) print\n\
C) echo\n";

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    examsim(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz and timed exam simulator"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    examsim(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("examsim"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    examsim(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created examsim.toml"))
        .stdout(predicate::str::contains("Created questions.json"));

    assert!(dir.path().join("examsim.toml").exists());
    assert!(dir.path().join("questions.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    examsim(&dir).arg("init").assert().success();

    // Second init should skip
    examsim(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_sample_questions() {
    let dir = TempDir::new().unwrap();
    examsim(&dir).arg("init").assert().success();

    examsim(&dir)
        .args(["validate", "--questions", "questions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12 questions"))
        .stdout(predicate::str::contains("All questions valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("q.json"),
        r#"[{"id": 1, "text": "Pick one", "options": [{"id": "A", "text": "a"}, {"id": "B", "text": "b"}], "correctOptionId": "Z"}]"#,
    )
    .unwrap();

    examsim(&dir)
        .args(["validate", "--questions", "q.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    examsim(&dir)
        .args(["validate", "--questions", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_rejects_non_array_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("q.json"), r#"{"questions": []}"#).unwrap();

    examsim(&dir)
        .args(["validate", "--questions", "q.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an array"));
}

#[test]
fn extract_prints_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), NUMBERED_DOC).unwrap();

    examsim(&dir)
        .args(["extract", "--input", "notes.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"correctOptionId\": \"B\""))
        .stdout(predicate::str::contains("Which macro prints a line?"))
        .stderr(predicate::str::contains("question(s) 2"));
}

#[test]
fn extract_to_file_then_validate() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), NUMBERED_DOC).unwrap();

    examsim(&dir)
        .args(["extract", "--input", "notes.txt", "--output", "out/questions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 2 question(s)"));

    examsim(&dir)
        .args(["validate", "--questions", "out/questions.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"));
}

#[test]
fn extract_without_questions_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "Just some prose, no quiz here.\n").unwrap();

    examsim(&dir)
        .args(["extract", "--input", "notes.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions"));
}

#[test]
fn stats_without_answers() {
    let dir = TempDir::new().unwrap();
    examsim(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved answers yet"))
        .stdout(predicate::str::contains("Unanswered"));
}

#[test]
fn reset_without_answers() {
    let dir = TempDir::new().unwrap();
    examsim(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved answers"));
}

#[test]
fn exam_rejects_out_of_range_config() {
    let dir = TempDir::new().unwrap();
    examsim(&dir)
        .args(["exam", "--count", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 10 and 270"));

    examsim(&dir)
        .args(["exam", "--count", "10", "--minutes", "301"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 5 and 300"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    examsim(&dir)
        .args(["--config", "nope.toml", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
