use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use assert_cmd::prelude::*;
use tempfile::TempDir;

fn run_tinyrag(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tinyrag"))
        .args(args)
        .current_dir(workdir)
        .env("RUST_LOG", "off")
        .env("RUST_ENV", "test")
        .output()
        .expect("failed to run tinyrag binary")
}

fn seed_corpus(root: &Path) {
    let docs = root.join("docs");
    fs::create_dir_all(docs.join("farming")).unwrap();
    fs::write(docs.join("farming").join("ict.txt"), "Smart farms use ICT technology to control the environment.").unwrap();
    fs::write(docs.join("sensors.txt"), "Sensors measure temperature and humidity in real time.").unwrap();
    fs::write(docs.join("ai.txt"), "AI technology predicts crop disease.").unwrap();
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "command failed: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn search_ranks_matching_document_first() {
    let tmp = TempDir::new().unwrap();
    seed_corpus(tmp.path());

    let output = run_tinyrag(tmp.path(), &["search", "humidity sensors", "--dir", "docs", "--top-k", "2"]);
    let hits = stdout_json(&output);
    let hits = hits.as_array().expect("array of hits");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["chunk"]["doc_id"], "sensors");
    assert_eq!(hits[0]["rank"], 1);
}

#[test]
fn search_reads_top_k_from_config_file() {
    let tmp = TempDir::new().unwrap();
    seed_corpus(tmp.path());
    fs::write(tmp.path().join("config.toml"), "[data]\ndocs_dir = \"docs\"\n\n[search]\ntop_k = 1\n").unwrap();

    let output = run_tinyrag(tmp.path(), &["search", "crop disease", "--tfidf"]);
    let hits = stdout_json(&output);
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["chunk"]["doc_id"], "ai");
}

#[test]
fn chunk_prints_fixed_windows() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("note.txt"), "abcdefghij").unwrap();

    let output = run_tinyrag(tmp.path(), &["chunk", "note.txt", "--strategy", "fixed", "--size", "4", "--overlap", "1"]);
    let chunks = stdout_json(&output);
    let starts: Vec<u64> = chunks.as_array().unwrap().iter().map(|c| c["start"].as_u64().unwrap()).collect();
    assert_eq!(starts, vec![0, 3, 6, 9]);
    assert_eq!(chunks[3]["text"], "j");
}

#[test]
fn vocab_reports_sorted_terms() {
    let tmp = TempDir::new().unwrap();
    seed_corpus(tmp.path());

    let output = run_tinyrag(tmp.path(), &["vocab", "--dir", "docs"]);
    let report = stdout_json(&output);
    let terms: Vec<&str> = report["terms"].as_array().unwrap().iter().map(|t| t.as_str().unwrap()).collect();
    let mut sorted = terms.clone();
    sorted.sort();
    assert_eq!(terms, sorted);
    assert!(terms.contains(&"humidity"));
    assert_eq!(report["size"].as_u64(), Some(terms.len() as u64));
    assert_eq!(report["fingerprint"].as_str().map(str::len), Some(16));
}

#[test]
fn invalid_arguments_fail() {
    let tmp = TempDir::new().unwrap();
    seed_corpus(tmp.path());

    run_tinyrag(tmp.path(), &["search", "sensors", "--dir", "docs", "--top-k", "0"]).assert().failure();
    run_tinyrag(tmp.path(), &["chunk", "missing.txt"]).assert().failure();
    run_tinyrag(tmp.path(), &["search", "sensors", "--dir", "empty"]).assert().failure();
    run_tinyrag(tmp.path(), &["chunk", "docs/ai.txt", "--strategy", "fixed", "--size", "5", "--overlap", "5"])
        .assert()
        .failure();
}

#[test]
fn overlap_is_rejected_for_rule_based_strategies() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("note.txt"), "One. Two.").unwrap();

    for strategy in ["sentence", "paragraph"] {
        let output = run_tinyrag(tmp.path(), &["chunk", "note.txt", "--strategy", strategy, "--overlap", "2"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("--overlap"));
    }

    let output = run_tinyrag(tmp.path(), &["chunk", "note.txt", "--strategy", "sentence", "--size", "4"]);
    let chunks = stdout_json(&output);
    let texts: Vec<&str> = chunks.as_array().unwrap().iter().map(|c| c["text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["One.", "Two."]);
}

#[test]
fn max_files_limits_the_corpus() {
    let tmp = TempDir::new().unwrap();
    seed_corpus(tmp.path());
    fs::write(tmp.path().join("config.toml"), "[data]\ndocs_dir = \"docs\"\nmax_files = 1\n").unwrap();

    let output = run_tinyrag(tmp.path(), &["search", "technology", "--top-k", "5"]);
    let hits = stdout_json(&output);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["chunk"]["doc_id"], "ai");
    assert_eq!(hits[0]["chunk"]["meta"]["language"], "ko");
}
