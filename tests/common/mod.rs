#![allow(dead_code)]

pub mod mock_data;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper struct to run helpdesk commands in an isolated temp directory
pub struct HelpdeskTest {
    pub temp_dir: TempDir,
}

impl HelpdeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        HelpdeskTest { temp_dir }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_helpdesk"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("HELPDESK_CONFIG")
            .env_remove("HELPDESK_API_URL")
            .env_remove("HELPDESK_API_TOKEN")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute helpdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run a command and parse its stdout as JSON
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).expect("stdout should be valid JSON")
    }

    pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Write a ticket export and return its path as a string
    pub fn write_export(&self, payload: &serde_json::Value) -> String {
        let path = self.write_file(
            "tickets.json",
            &serde_json::to_string_pretty(payload).expect("payload should serialize"),
        );
        path.to_string_lossy().to_string()
    }

    pub fn write_config(&self, content: &str) {
        self.write_file(".helpdesk/config.yaml", content);
    }
}
