//! Integration tests for the Pagecraft CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Write a file into the temp dir for testing
fn create_test_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("categories"))
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("render-pdf"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pagecraft"));
}

#[test]
fn test_resolve_text_record() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(
        &temp_dir,
        "book.json",
        r#"{"title": "Notes", "content": "Once upon a time."}"#,
    );

    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args(["resolve", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("text:"))
        .stdout(predicate::str::contains("Once upon a time."));
}

#[test]
fn test_resolve_prefers_pdf_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(
        &temp_dir,
        "book.json",
        r#"{"content": "Some text", "pdfFile": "https://example.com/book.pdf"}"#,
    );

    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    let output = cmd
        .args(["resolve", input.to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        resolved,
        serde_json::json!({"kind": "pdf", "uri": "https://example.com/book.pdf"})
    );
}

#[test]
fn test_resolve_empty_record() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "empty.json", "{}");

    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args(["resolve", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No content available"));
}

#[test]
fn test_resolve_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "broken.json", "{not json");

    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args(["resolve", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_resolve_nonexistent_file() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args(["resolve", "/nonexistent/book.json"])
        .assert()
        .failure();
}

#[test]
fn test_categories() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Non-Fiction"))
        .stdout(predicate::str::contains("Quran Stories"))
        .stdout(predicate::str::contains("/images/fiction.png"));
}

#[test]
fn test_categories_json() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    let output = cmd.args(["categories", "--json"]).output().unwrap();

    assert!(output.status.success());
    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 6);
    assert_eq!(list[1]["title"], "Travel & Exploration");
}

#[test]
fn test_browse_category() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args(["browse", "Urdu Novel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pir e Kamil"))
        .stdout(predicate::str::contains("Aab e Hayat"));
}

#[test]
fn test_browse_json_is_sorted_by_views() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    let output = cmd.args(["browse", "non-fiction", "--json"]).output().unwrap();

    assert!(output.status.success());
    let books: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let views: Vec<u64> = books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["views"].as_u64().unwrap())
        .collect();
    assert_eq!(views, vec![12345, 9876, 5000, 3000]);
}

#[test]
fn test_browse_unknown_category() {
    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args(["browse", "Poetry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books"));
}

#[test]
fn test_render_pdf_missing_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "story.txt", "Once upon a time.");

    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args(["render-pdf", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_render_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(
        &temp_dir,
        "story.txt",
        "Once upon a time.\n\nThe end.",
    );
    let output = temp_dir.path().join("story.pdf");

    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args([
        "render-pdf",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--title",
        "A Story",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Rendered 'A Story'"));

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_render_pdf_title_defaults_to_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_test_file(&temp_dir, "night-train.txt", "All aboard.");
    let output = temp_dir.path().join("out.pdf");

    let mut cmd = Command::cargo_bin("pagecraft").unwrap();
    cmd.args([
        "render-pdf",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("'night-train'"));
}
