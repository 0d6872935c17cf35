//! Command line tests for img2sheet, replaying captured TSV so no OCR engine
//! is needed.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{GrayImage, Luma};

const FORM_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
5\t1\t1\t1\t1\t1\t10\t10\t80\t18\t95\tTOTAL
5\t1\t2\t1\t1\t1\t10\t40\t60\t18\t90\tName:
5\t1\t2\t1\t1\t2\t80\t40\t60\t18\t90\tJohn
5\t1\t3\t1\t1\t1\t10\t70\t60\t18\t90\tItem
5\t1\t3\t1\t1\t2\t400\t70\t60\t18\t90\tQty
5\t1\t4\t1\t1\t1\t10\t100\t60\t18\t10\tnoise
";

fn img2sheet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_img2sheet"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// A blank page image and the TSV to replay for it.
fn fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let page = dir.join("form.png");
    GrayImage::from_pixel(64, 48, Luma([255])).save(&page).unwrap();
    let tsv = dir.join("form.tsv");
    std::fs::write(&tsv, FORM_TSV).unwrap();
    (page, tsv)
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_tokens_replay_writes_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let (page, tsv) = fixture(dir.path());
    let out_dir = dir.path().join("out");

    let output = img2sheet(&[arg(&page), "--tokens", arg(&tsv), "-o", arg(&out_dir)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let workbook = out_dir.join("form.xlsx");
    assert!(workbook.exists());
    let bytes = std::fs::read(&workbook).unwrap();
    assert_eq!(&bytes[..2], b"PK");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("form.xlsx (3 rows)"), "{stdout}");
}

#[test]
fn test_tokens_replay_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let (page, tsv) = fixture(dir.path());

    let output = img2sheet(&[arg(&page), "--tokens", arg(&tsv), "-t", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = std::fs::read_to_string(dir.path().join("form.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let rows = value["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["role"], "heading");
    assert_eq!(rows[1]["role"], "key_value");
    assert_eq!(rows[1]["cells"][1]["text"], "John");
    assert_eq!(rows[2]["role"], "multi_column");
}

#[test]
fn test_text_output_goes_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let (page, tsv) = fixture(dir.path());

    let output = img2sheet(&[arg(&page), "--tokens", arg(&tsv), "-t", "text"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("heading: *TOTAL*"), "{stdout}");
    assert!(stdout.contains("key_value: *Name* | John"), "{stdout}");
    assert!(stdout.contains("multi_column: Item | Qty"), "{stdout}");
    assert!(!stdout.contains("noise"));
}

#[test]
fn test_bad_image_fails_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (_, tsv) = fixture(dir.path());
    let bad = dir.path().join("broken.jpg");
    std::fs::write(&bad, b"this is not a jpeg").unwrap();

    let output = img2sheet(&[arg(&bad), "--tokens", arg(&tsv)]);
    assert!(!output.status.success());
    assert!(!dir.path().join("broken.xlsx").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.jpg"), "{stderr}");
}

#[test]
fn test_tokens_need_exactly_one_input() {
    let dir = tempfile::tempdir().unwrap();
    let (page, tsv) = fixture(dir.path());
    let output = img2sheet(&[arg(&page), arg(&page), "--tokens", arg(&tsv)]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_zero_line_bucket_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (page, tsv) = fixture(dir.path());
    let output = img2sheet(&[arg(&page), "--tokens", arg(&tsv), "--line-bucket", "0"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid layout parameters"));
}
