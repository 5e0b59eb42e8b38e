use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

const CORPUS: &str = "UserName,Condition,text\n\
    ana,A,python list data\n\
    ben,B,python list data structures\n\
    cai,A,python data list\n\
    dee,B,list data in python\n\
    eli,A,pasta tomato sauce\n\
    fay,B,tomato pasta sauce recipe\n\
    gus,A,sauce for pasta with tomato\n\
    hal,B,pasta sauce tomato\n\
    ivy,A,weather sunny today\n";

fn topicena(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("topicena").expect("binary exists");
    cmd.current_dir(dir)
        .env("TOPICENA_LANGUAGE", "english")
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("topicena").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn help_ignores_invalid_environment() {
    let dir = tempdir().unwrap();
    topicena(dir.path())
        .env("TOPICENA_LANGUAGE", "klingon")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn cluster_rejects_table_without_text_column() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(&input, "UserName,Condition,reflection\nu1,A,hello\n").unwrap();

    let output = topicena(dir.path())
        .args(["cluster", "input.csv", "topic_matrix.csv"])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(r#"["UserName", "Condition", "text"]"#), "{stderr}");
    assert!(stderr.contains("reflection"), "{stderr}");
    assert!(!dir.path().join("topic_matrix.csv").exists());
}

#[test]
fn cluster_reports_missing_input() {
    let dir = tempdir().unwrap();
    let output = topicena(dir.path())
        .args(["cluster", "absent.csv", "topic_matrix.csv"])
        .assert()
        .failure()
        .get_output()
        .clone();
    assert!(String::from_utf8_lossy(&output.stderr).contains("input file not found"));
}

#[cfg(not(feature = "embeddings"))]
#[test]
fn cluster_writes_matrix_and_sidecars() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("input.csv"), CORPUS).unwrap();

    topicena(dir.path())
        .args(["cluster", "input.csv", "processed/topic_matrix.csv"])
        .assert()
        .success();

    let matrix = fs::read_to_string(dir.path().join("processed/topic_matrix.csv")).unwrap();
    let header = matrix.lines().next().unwrap();
    assert!(header.starts_with("UserName,Condition,Topic_0_"), "{header}");
    assert!(!header.contains("minus"), "{header}");
    assert!(dir.path().join("processed/topic_descriptions.csv").is_file());
    assert!(dir.path().join("processed/topic_assignments.csv").is_file());
}

#[test]
fn run_without_input_exits_non_zero() {
    let dir = tempdir().unwrap();
    let output = topicena(dir.path())
        .assert()
        .failure()
        .get_output()
        .clone();
    assert!(String::from_utf8_lossy(&output.stderr).contains("topicena_input_filtered.csv"));
}

#[cfg(unix)]
#[test]
fn clustering_failure_skips_analysis() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data/raw")).unwrap();
    fs::write(dir.path().join("data/raw/topicena_input_filtered.csv"), CORPUS).unwrap();
    let failing = dir.path().join("cluster.sh");
    fs::write(&failing, "echo 'model load failed' >&2\nexit 1\n").unwrap();
    let analysis = dir.path().join("analysis.sh");
    fs::write(&analysis, "touch analysis_ran\n").unwrap();

    let output = topicena(dir.path())
        .env("TOPICENA_CLUSTER_CMD", format!("sh {}", failing.display()))
        .env("TOPICENA_ANALYSIS_PROGRAM", "sh")
        .env("TOPICENA_ANALYSIS_SCRIPT", &analysis)
        .assert()
        .failure()
        .get_output()
        .clone();

    assert!(String::from_utf8_lossy(&output.stderr).contains("model load failed"));
    assert!(!dir.path().join("analysis_ran").exists());
}

#[cfg(all(unix, not(feature = "embeddings")))]
#[test]
fn full_pipeline_hands_matrix_to_analysis() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data/raw")).unwrap();
    fs::write(dir.path().join("data/raw/topicena_input_filtered.csv"), CORPUS).unwrap();
    let analysis = dir.path().join("analysis.sh");
    fs::write(&analysis, "printf 'ENA header: '\nhead -n 1 \"$1\"\n").unwrap();

    let output = topicena(dir.path())
        .env("TOPICENA_ANALYSIS_PROGRAM", "sh")
        .env("TOPICENA_ANALYSIS_SCRIPT", &analysis)
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ENA header: UserName,Condition,Topic_0_"), "{stdout}");
    assert!(dir.path().join("data/processed/topic_matrix.csv").is_file());
    assert!(dir.path().join("outputs").is_dir());
}
