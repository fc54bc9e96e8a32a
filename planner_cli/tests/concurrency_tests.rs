//! Concurrency tests for the planner binary.
//!
//! These tests verify that multiple processes can safely:
//! - Add tasks simultaneously (file locking)
//! - Read the store while it is being written

use assert_cmd::Command;
use std::thread;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("planner"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn stored_task_count(data_dir: &std::path::Path) -> usize {
    let content =
        std::fs::read_to_string(data_dir.join("tasks.json")).expect("Failed to read store");
    let store: serde_json::Value = serde_json::from_str(&content).expect("store is valid JSON");
    store["tasks"].as_array().map_or(0, |tasks| tasks.len())
}

#[test]
fn test_concurrent_adds_are_all_kept() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                let title = format!("Task {}", i);
                cli()
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .args(["add", "--title", title.as_str(), "--repeat", "d 1"])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    assert_eq!(stored_task_count(&data_dir), 6);
}

#[test]
fn test_concurrent_reads_and_writes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["add", "--title", "Seed"])
        .assert()
        .success();

    let writer = {
        let data_dir = data_dir.clone();
        thread::spawn(move || {
            for i in 0..3 {
                let title = format!("Writer {}", i);
                cli()
                    .arg("--data-dir")
                    .arg(&data_dir)
                    .args(["add", "--title", title.as_str()])
                    .assert()
                    .success();
            }
        })
    };

    // Readers never see a half-written store
    for _ in 0..3 {
        cli()
            .arg("--data-dir")
            .arg(&data_dir)
            .args(["list", "--json"])
            .assert()
            .success();
    }

    writer.join().expect("writer panicked");
    assert_eq!(stored_task_count(&data_dir), 4);
}
