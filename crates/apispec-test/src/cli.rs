//! CLI regression tests for the `apispec-tools` binary.
//!
//! These tests invoke the binary as a subprocess to catch regressions in flag
//! names, prompts, exit codes and exact output, which the library tests can't.
//!
//! Run with: `cargo test -p apispec-test`
//! Requires the `apispec-tools` binary to be built first (`cargo build -p apispec-tools`).

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;

const DOCS_FILENAME: &str = "CLI_Test_1.2.3.json";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns an assert_cmd Command wrapping the `apispec-tools` binary.
fn apispec_tools() -> Command {
    // cargo_bin is deprecated for custom build-dir setups; fine for standard workspace use.
    #[allow(deprecated)]
    Command::cargo_bin("apispec-tools")
        .expect("apispec-tools binary not found; run `cargo build -p apispec-tools` first")
}

/// Absolute path to the shared test fixtures directory.
fn fixtures() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/apispec-test
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates/")
        .parent()
        .expect("workspace root")
        .join("tests/fixtures")
}

/// A scratch working directory; the fixture config writes to `docs/` in it.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn docs_file(&self) -> PathBuf {
        self.dir.path().join("docs").join(DOCS_FILENAME)
    }

    /// Seed the docs file with the fixture's placeholder contents.
    fn with_existing_docs(self) -> Self {
        std::fs::create_dir_all(self.dir.path().join("docs")).expect("docs dir");
        std::fs::copy(
            fixtures().join("docs/Some_Title_1.2.3.json"),
            self.docs_file(),
        )
        .expect("copy fixture docs");
        self
    }

    /// Write a config derived from the fixture with `docs_type` replaced.
    fn config_with_docs_type(&self, docs_type: &str) -> PathBuf {
        let fixture =
            std::fs::read_to_string(fixtures().join("apispec.yaml")).expect("fixture config");
        let path = self.dir.path().join("apispec.yaml");
        std::fs::write(
            &path,
            fixture.replace("docs_type: json", &format!("docs_type: {docs_type}")),
        )
        .expect("write config");
        path
    }

    fn generate(&self, config: &Path, args: &[&str], answers: &[&str]) -> Command {
        let mut cmd = apispec_tools();
        cmd.current_dir(self.dir.path())
            .env_remove("APISPEC_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(config)
            .arg("generate-api-docs")
            .args(args)
            .write_stdin(answers.join("\n"));
        cmd
    }

    fn read_docs(&self) -> Value {
        let contents = std::fs::read_to_string(self.docs_file()).expect("docs file");
        serde_json::from_str(&contents).expect("docs file is JSON")
    }
}

/// The exact output of a prompt session answered with `answers`.
fn expected_prompt_output(answers: &[&str]) -> (String, bool) {
    let mut expected = format!("ERROR: {DOCS_FILENAME} already exists.\n");
    let mut answers = answers.iter();

    let mut answer = None;
    while !matches!(answer, Some("y") | Some("n")) {
        expected += &format!("Do you want to overwrite {DOCS_FILENAME}? (y/n) ");
        answer = answers.next().copied();
    }
    if answer == Some("y") {
        answer = None;
        while !matches!(answer, Some("y") | Some("n")) {
            expected += &format!("Are you sure you want to overwrite {DOCS_FILENAME}? (y/n) ");
            answer = answers.next().copied();
        }
    }

    let confirmed = answer == Some("y");
    if confirmed {
        expected += &format!("{DOCS_FILENAME} created.\n");
    } else {
        expected += "aborted\n";
    }
    (expected, confirmed)
}

fn assert_generated(docs: &Value, all: bool) {
    assert_eq!(
        docs["info"],
        json!({"description": "Some description.", "title": "CLI Test", "version": "1.2.3"})
    );
    assert_eq!(docs["openapi"], "3.0.3");

    let paths = docs["paths"].as_object().expect("paths object");
    assert!(paths.contains_key("/version"));
    assert!(paths.contains_key("/test_endpoint"));
    assert_eq!(paths.contains_key("/docs"), all);
    assert_eq!(paths.contains_key("/docs/json"), all);
    assert_eq!(paths.contains_key("/internal/status"), all);
}

// ---------------------------------------------------------------------------
// apispec-tools generate-api-docs: fresh file
// ---------------------------------------------------------------------------

#[test]
fn no_args_no_existing_file() {
    let ws = Workspace::new();
    ws.generate(&fixtures().join("apispec.yaml"), &[], &[])
        .assert()
        .success()
        .stdout(format!("{DOCS_FILENAME} created.\n"));

    assert_generated(&ws.read_docs(), false);
}

#[test]
fn short_all_flag_includes_excluded_endpoints() {
    let ws = Workspace::new();
    ws.generate(&fixtures().join("apispec.yaml"), &["-a"], &[])
        .assert()
        .success()
        .stdout(format!("{DOCS_FILENAME} created.\n"));

    assert_generated(&ws.read_docs(), true);
}

#[test]
fn long_all_flag_includes_excluded_endpoints() {
    let ws = Workspace::new();
    ws.generate(&fixtures().join("apispec.yaml"), &["--all"], &[])
        .assert()
        .success();

    assert_generated(&ws.read_docs(), true);
}

// ---------------------------------------------------------------------------
// apispec-tools generate-api-docs: existing file
// ---------------------------------------------------------------------------

fn run_existing(answers: &[&str]) {
    let ws = Workspace::new().with_existing_docs();
    let (expected, confirmed) = expected_prompt_output(answers);

    ws.generate(&fixtures().join("apispec.yaml"), &[], answers)
        .assert()
        .success()
        .stdout(expected);

    let docs = ws.read_docs();
    if confirmed {
        assert_generated(&docs, false);
    } else {
        assert_eq!(docs, json!({"these": "are", "some": "docs"}));
    }
}

#[test]
fn existing_file_y_y() {
    run_existing(&["y", "y"]);
}

#[test]
fn existing_file_y_n() {
    run_existing(&["y", "n"]);
}

#[test]
fn existing_file_n() {
    run_existing(&["n"]);
}

#[test]
fn existing_file_x_b_y_n() {
    run_existing(&["x", "b", "y", "n"]);
}

#[test]
fn existing_file_x_b_y_y() {
    run_existing(&["x", "b", "y", "y"]);
}

#[test]
fn existing_file_y_x_b_n() {
    run_existing(&["y", "x", "b", "n"]);
}

#[test]
fn existing_file_y_x_b_y() {
    run_existing(&["y", "x", "b", "y"]);
}

#[test]
fn existing_file_closed_stdin_aborts() {
    let ws = Workspace::new().with_existing_docs();
    ws.generate(&fixtures().join("apispec.yaml"), &[], &[])
        .assert()
        .success()
        .stdout(format!(
            "ERROR: {DOCS_FILENAME} already exists.\n\
             Do you want to overwrite {DOCS_FILENAME}? (y/n) aborted\n"
        ));

    assert_eq!(ws.read_docs(), json!({"these": "are", "some": "docs"}));
}

#[test]
fn docs_written_event_goes_to_stderr() {
    let ws = Workspace::new();
    ws.generate(&fixtures().join("apispec.yaml"), &[], &[])
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stdout(format!("{DOCS_FILENAME} created.\n"))
        .stderr(contains(r#""event":"docs_written""#));
}

#[test]
fn overwrite_aborted_event_goes_to_stderr() {
    let ws = Workspace::new().with_existing_docs();
    ws.generate(&fixtures().join("apispec.yaml"), &[], &["n"])
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(contains(r#""event":"overwrite_aborted""#));
}

#[test]
fn generate_is_quiet_on_stderr_by_default() {
    let ws = Workspace::new();
    ws.generate(&fixtures().join("apispec.yaml"), &[], &[])
        .assert()
        .success()
        .stderr("");
}

// ---------------------------------------------------------------------------
// apispec-tools generate-api-docs: help and config errors
// ---------------------------------------------------------------------------

#[test]
fn help_lists_all_flag_and_writes_nothing() {
    let ws = Workspace::new();
    ws.generate(&fixtures().join("apispec.yaml"), &["--help"], &[])
        .assert()
        .success()
        .stdout(
            contains("generate-api-docs")
                .and(contains("-a, --all"))
                .and(contains("Include endpoints marked 'Exclude From Spec'.")),
        );

    assert!(!ws.docs_file().exists());
}

#[test]
fn invalid_docs_type_exits_one() {
    let ws = Workspace::new();
    let config = ws.config_with_docs_type("foobar");
    ws.generate(&config, &[], &[])
        .assert()
        .failure()
        .code(1)
        .stdout("Invalid config. docs_type must be either 'json' or 'yaml'\n");

    assert!(!ws.docs_file().exists());
}

#[test]
fn invalid_docs_type_reported_before_existence_check() {
    let ws = Workspace::new().with_existing_docs();
    let config = ws.config_with_docs_type("foobar");
    ws.generate(&config, &[], &["y", "y"])
        .assert()
        .failure()
        .code(1)
        .stdout("Invalid config. docs_type must be either 'json' or 'yaml'\n");

    assert_eq!(ws.read_docs(), json!({"these": "are", "some": "docs"}));
}

#[test]
fn yaml_docs_type_writes_yaml_file() {
    let ws = Workspace::new();
    let config = ws.config_with_docs_type("yaml");
    ws.generate(&config, &[], &[])
        .assert()
        .success()
        .stdout("CLI_Test_1.2.3.yaml created.\n");

    let written = std::fs::read_to_string(ws.dir.path().join("docs/CLI_Test_1.2.3.yaml"))
        .expect("yaml docs file");
    assert!(written.contains("openapi:"));
    assert!(written.contains("title: CLI Test"));
}

#[test]
fn missing_config_file_exits_one() {
    let ws = Workspace::new();
    ws.generate(Path::new("this-file-does-not-exist.yaml"), &[], &[])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("this-file-does-not-exist.yaml"));
}

#[test]
fn config_path_from_env() {
    let ws = Workspace::new();
    apispec_tools()
        .current_dir(ws.dir.path())
        .env("APISPEC_CONFIG", fixtures().join("apispec.yaml"))
        .arg("generate-api-docs")
        .write_stdin("")
        .assert()
        .success()
        .stdout(format!("{DOCS_FILENAME} created.\n"));
}

// ---------------------------------------------------------------------------
// apispec-tools serve
// ---------------------------------------------------------------------------

#[test]
fn serve_rejects_bad_log_format() {
    apispec_tools()
        .arg("--config")
        .arg(fixtures().join("apispec.yaml"))
        .args(["serve", "--log-format", "xml"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("invalid log format"));
}
