#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("nyaya");
        fs::create_dir_all(&root).expect("create isolated root");
        Self { _tmp: tmp, root }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("nyaya");
        cmd.env_remove("NYAYA_CONFIG")
            .env_remove("NYAYA_LOG")
            .arg("--root")
            .arg(&self.root);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_stdin(&self, args: &[&str], stdin: &str) -> Value {
        let out = self
            .cmd()
            .args(args)
            .write_stdin(stdin)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// Run a command expected to fail; returns (exit code, parsed stdout).
    pub fn run_fail(&self, args: &[&str]) -> (i32, Value) {
        let output = self.cmd().args(args).assert().failure().get_output().clone();
        let code = output.status.code().expect("exit code");
        let body = serde_json::from_slice(&output.stdout).expect("valid json error output");
        (code, body)
    }

    pub fn round_dir(&self, round: &str) -> PathBuf {
        self.root.join("Datasets/rounds").join(round)
    }

    pub fn pretty_path(&self, round: &str) -> PathBuf {
        self.round_dir(round)
            .join(format!("nyaya_corpus_{}_pretty.json", round))
    }

    pub fn clean_path(&self, round: &str) -> PathBuf {
        self.round_dir(round)
            .join(format!("nyaya_corpus_{}_clean.jsonl", round))
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.root.join("nyaya_corpus_clean.jsonl")
    }

    pub fn staging_path(&self) -> PathBuf {
        self.root.join("nyaya_corpus_staging.jsonl")
    }

    pub fn write_input(&self, name: &str, records: &[Value]) -> PathBuf {
        let p = self._tmp.path().join(name);
        fs::write(&p, serde_json::to_string_pretty(records).unwrap()).expect("write input");
        p
    }
}

pub fn read_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read jsonl")
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("valid json line"))
        .collect()
}

pub fn read_array(path: &Path) -> Vec<Value> {
    serde_json::from_str(&fs::read_to_string(path).expect("read array")).expect("valid array")
}

/// A record that passes both round checks: non-western and specific.
pub fn strong_record(id: &str) -> Value {
    json!({
        "id": id,
        "domain": "Sanskrit Grammar",
        "pratijna": "The word  rāmaḥ is in the nominative",
        "hetu": "Because it takes the su ending",
        "udaharana": "As with devaḥ",
        "upanaya": "So too this word carries the same ending",
        "nigamana": "Therefore it is nominative",
        "grounding_authority": "Pāṇinian Grammar / Aṣṭādhyāyī, https://ashtadhyayi.com/",
        "cultural_tradition": "Non-Western"
    })
}

/// The single-record submission with no tradition and a bare citation.
pub fn scenario_record() -> Value {
    json!({
        "domain": "Sanskrit Grammar",
        "pratijna": "X",
        "hetu": "Y",
        "udaharana": "Z",
        "upanaya": "W is twenty-plus characters long",
        "nigamana": "done",
        "grounding_authority": "Source, https://x.org"
    })
}
