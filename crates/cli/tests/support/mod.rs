#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub(crate) const SNAPSHOT: &str = r#"{
    "projectId": "PRJ-CLI",
    "nodes": [
        { "id": "R1", "type": "REQUIREMENT", "code": "REQ-001", "title": "Checkout" },
        { "id": "R2", "type": "REQUIREMENT", "code": "REQ-002", "title": "Refunds" },
        { "id": "R3", "type": "REQUIREMENT", "code": "REQ-003", "title": "Invoices" },
        { "id": "S1", "type": "USER_STORY", "title": "Pay by card" },
        { "id": "S2", "type": "USER_STORY", "title": "Request refund" },
        { "id": "S9", "type": "USER_STORY", "title": "Loose story" },
        { "id": "T1", "type": "TASK", "title": "Card form" },
        { "id": "T2", "type": "TASK", "title": "Payment API" },
        { "id": "SP1", "type": "SPRINT", "title": "Sprint 1" }
    ],
    "edges": [
        { "source": "R1", "target": "S1", "relationship": "DERIVES" },
        { "source": "S1", "target": "T1", "relationship": "BREAKS_DOWN_TO" },
        { "source": "R1", "target": "T2", "relationship": "IMPLEMENTED_BY" },
        { "source": "R2", "target": "S2", "relationship": "DERIVES" },
        { "source": "R2", "target": "S404", "relationship": "DERIVES" }
    ]
}"#;

/// Scratch directory for one test's input files, removed on drop.
pub(crate) struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    pub(crate) fn new(test_name: &str) -> Self {
        let dir = temp_dir(test_name);
        std::fs::create_dir_all(&dir).expect("create temp dir");
        Self { dir }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn write(&self, name: &str, body: &str) -> String {
        let path = self.dir.join(name);
        std::fs::write(&path, body).expect("write fixture");
        path.to_string_lossy().into_owned()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    base.join(format!("lineage_cli_{test_name}_{pid}_{nonce}"))
}

fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lineage"));
    cmd.args(args)
        .env_remove("LINEAGE_SNAPSHOT")
        .env_remove("LINEAGE_VOCABULARY")
        .env_remove("LINEAGE_DEPTH")
        .env_remove("LINEAGE_LOG");
    cmd
}

pub(crate) fn run(args: &[&str]) -> Output {
    command(args).output().expect("run lineage")
}

pub(crate) fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = command(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn lineage");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait lineage")
}

pub(crate) fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "lineage failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}
