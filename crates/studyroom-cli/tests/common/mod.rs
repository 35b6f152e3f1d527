//! Common utilities for CLI E2E tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Isolated home directory plus input files for one test.
pub struct Fixture {
    pub home: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Write `content` to a file under the fixture and return its path.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.home.path().join(name);
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Invoke a CLI command and return (stdout, stderr, exit code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_studyroom-cli"))
            .args(args)
            .env("HOME", self.home())
            .env_remove("STUDYROOM_ENV")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
        stdout
    }

    /// Invoke a CLI command and expect failure.
    pub fn run_failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert!(code != 0, "CLI command unexpectedly succeeded: {:?}", args);
        stderr
    }
}

/// Parse JSON output from CLI.
pub fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

pub const TIMETABLE: &str = r#"[
  {"subject": "Algorithms", "day": 0, "startAt": "09:00", "endAt": "13:00", "professor": "Kim", "place": "E201"},
  {"subject": "Databases", "day": 0, "startAt": "17:00", "endAt": "21:00"},
  {"subject": "Broken", "day": 1, "startAt": "9:5", "endAt": "10:00"}
]"#;

pub const SUBJECTS: &str = r#"[
  {"name": "Poetry", "priority": "low"},
  {"name": "Algorithms", "weight": 9, "major": true}
]"#;
