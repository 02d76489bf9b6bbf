use clap::Parser;
use flappy_td::cli::commands::{
    export::{self, ExportArgs},
    inspect::{self, InspectArgs},
    train::{self, TrainArgs},
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "flappy-td-train",
        "--episodes",
        "3",
        "--max-ticks",
        "500",
        "--seed",
        "7",
        "--quiet",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    train::execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 3);
    assert_eq!(parsed["learning"]["discount"], 0.4);
    assert_eq!(parsed["seed"], 7);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = parse_args([
        "flappy-td-train",
        "--episodes",
        "2",
        "--cadence",
        "5",
        "--max-ticks",
        "300",
        "--quiet",
        "--summary",
        &summary_arg,
    ]);

    train::execute(args).expect("training with directory summary should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["training"]["episodes"], 2);
    assert_eq!(parsed["learning"]["decision_cadence"], 5);
}

#[test]
fn config_file_is_overridden_by_flags() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("run.json");
    std::fs::write(
        &config_path,
        r#"{"seed": 3, "learning": {"discount": 0.9}, "training": {"episodes": 4, "max_ticks_per_episode": 400}}"#,
    )
    .unwrap();
    let summary_path = tmp.path().join("summary.json");

    let args = parse_args([
        "flappy-td-train",
        "--config",
        config_path.to_str().unwrap(),
        "--episodes",
        "2",
        "--quiet",
        "--summary",
        summary_path.to_str().unwrap(),
    ]);
    train::execute(args).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(parsed["training"]["episodes"], 2);
    assert_eq!(parsed["learning"]["discount"], 0.9);
    assert_eq!(parsed["max_ticks_per_episode"], 400);
    assert_eq!(parsed["seed"], 3);
}

#[test]
fn saved_table_can_be_resumed_exported_and_inspected() {
    let tmp = tempdir().unwrap();
    let table = tmp.path().join("agent.msgpack");
    let observations = tmp.path().join("episodes.jsonl");
    let csv_path = tmp.path().join("table.csv");

    train::execute(parse_args([
        "flappy-td-train",
        "--episodes",
        "3",
        "--max-ticks",
        "500",
        "--seed",
        "1",
        "--quiet",
        "--save",
        table.to_str().unwrap(),
        "--observations",
        observations.to_str().unwrap(),
    ]))
    .unwrap();
    assert!(table.exists());
    let lines = std::fs::read_to_string(&observations).unwrap();
    assert_eq!(lines.lines().count(), 3);

    train::execute(parse_args([
        "flappy-td-train",
        "--episodes",
        "1",
        "--max-ticks",
        "500",
        "--quiet",
        "--load",
        table.to_str().unwrap(),
        "--save",
        table.to_str().unwrap(),
    ]))
    .unwrap();

    export::execute(ExportArgs::parse_from([
        "export",
        table.to_str().unwrap(),
        "--output",
        csv_path.to_str().unwrap(),
    ]))
    .unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("bird_y,gap_center,pipe_distance,action,utility_value,visit_count"));
    assert!(csv.lines().count() > 1);

    inspect::execute(InspectArgs::parse_from([
        "inspect",
        table.to_str().unwrap(),
        "--state",
        "240,200,517",
    ]))
    .unwrap();
}

#[test]
fn loading_a_missing_table_fails() {
    let tmp = tempdir().unwrap();
    let args = parse_args([
        "flappy-td-train",
        "--episodes",
        "1",
        "--quiet",
        "--load",
        tmp.path().join("missing.msgpack").to_str().unwrap(),
    ]);
    let err = train::execute(args).unwrap_err();
    assert!(err.to_string().contains("Failed to load utility table"));
}
