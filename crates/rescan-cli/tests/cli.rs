use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    fs::write(path, writer.finish().unwrap().into_inner()).unwrap();
}

/// `rescan` with its config directory isolated in `home`.
fn rescan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rescan").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    rescan(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_process_docx_json() {
    let home = TempDir::new().unwrap();
    let resume = home.path().join("jane.docx");
    write_docx(
        &resume,
        &[
            "Jane Smith",
            "Email: Jane.Smith@Example.com",
            "Mobile: 98765 43210",
            "LinkedIn: https://www.linkedin.com/in/jane-smith",
        ],
    );

    rescan(&home)
        .args(["process", "--no-ocr"])
        .arg(&resume)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""email": "jane.smith@example.com""#))
        .stdout(predicate::str::contains(r#""phone": "+919876543210""#))
        .stdout(predicate::str::contains(r#""name": "Jane Smith""#))
        .stdout(predicate::str::contains("https://www.linkedin.com/in/jane-smith"));
}

#[test]
fn test_process_text_with_confidence() {
    let home = TempDir::new().unwrap();
    let resume = home.path().join("jane.docx");
    write_docx(&resume, &["Jane Smith", "Email: jane@example.com"]);

    rescan(&home)
        .args(["process", "--format", "text", "--show-confidence"])
        .arg(&resume)
        .assert()
        .success()
        .stdout(predicate::str::contains("Email:    jane@example.com"))
        .stdout(predicate::str::contains("Extraction confidence: 60.0%"));
}

#[test]
fn test_process_unsupported_type_fails_with_result() {
    let home = TempDir::new().unwrap();
    let notes = home.path().join("notes.txt");
    fs::write(&notes, "John Doe\njohn@example.com").unwrap();

    rescan(&home)
        .arg("process")
        .arg(&notes)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unsupported file type: notes.txt"))
        .stderr(predicate::str::contains("Failed to parse notes.txt"));
}

#[test]
fn test_process_missing_file() {
    let home = TempDir::new().unwrap();

    rescan(&home)
        .args(["process", "/nonexistent/resume.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_continues_past_broken_files() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("in");
    let output = home.path().join("out");
    fs::create_dir_all(&input).unwrap();

    write_docx(&input.join("good.docx"), &["Jane Smith", "jane@example.com"]);
    fs::write(input.join("broken.pdf"), b"not really a pdf").unwrap();
    fs::write(input.join("ignored.txt"), b"skipped by the glob filter").unwrap();

    let summary = home.path().join("summary.csv");
    let pattern = format!("{}/*", input.display());

    rescan(&home)
        .args(["batch", "--no-ocr", "-j", "2"])
        .arg(&pattern)
        .arg("--output-dir")
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 files"))
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    let csv = fs::read_to_string(&summary).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Name,Source File,Phone Number,Email ID"));
    assert!(csv.contains("Jane Smith,good.docx"));
    assert!(csv.contains("Parse error:"));

    assert!(output.join("good.json").exists());
    assert!(output.join("broken.json").exists());
}

#[test]
fn test_batch_without_matches() {
    let home = TempDir::new().unwrap();
    let pattern = format!("{}/*.pdf", home.path().display());

    rescan(&home)
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_config_show_defaults() {
    let home = TempDir::new().unwrap();

    rescan(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""default_country_code": "91""#))
        .stdout(predicate::str::contains(r#""min_text_length": 50"#));
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();

    rescan(&home)
        .args(["config", "set", "extraction.phone.default_country_code", "44"])
        .assert()
        .success();

    rescan(&home)
        .args(["config", "get", "extraction.phone.default_country_code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"44\""));

    rescan(&home)
        .args(["config", "get", "extraction.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("rescan.json");

    rescan(&home)
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    rescan(&home)
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
