use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

#[test]
fn cli_lays_out_the_basic_fixture() {
    let root = repo_root();
    let fixture = root.join("fixtures").join("assets").join("basic.json");
    assert!(fixture.exists(), "fixture missing: {}", fixture.display());

    let exe = assert_cmd::cargo_bin!("bubbly-cli");
    let assert = Command::new(exe)
        .current_dir(&root)
        .args(["layout", fixture.to_string_lossy().as_ref()])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("json output");

    let bubbles = value["bubbles"].as_array().expect("bubbles array");
    // 9 fixture entries, minus the duplicate ADA.
    assert_eq!(bubbles.len(), 8);

    let width = value["viewport"]["width"].as_f64().unwrap();
    let height = value["viewport"]["height"].as_f64().unwrap();
    for b in bubbles {
        let (x, y, r) = (
            b["x"].as_f64().unwrap(),
            b["y"].as_f64().unwrap(),
            b["radius"].as_f64().unwrap(),
        );
        assert!(x >= r && x <= width - r, "{}: x out of bounds", b["id"]);
        assert!(y >= r && y <= height - r, "{}: y out of bounds", b["id"]);
    }
}

#[test]
fn cli_renders_an_svg_file() {
    let root = repo_root();
    let fixture = root.join("fixtures").join("assets").join("basic.json");

    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("chart.svg");

    let exe = assert_cmd::cargo_bin!("bubbly-cli");
    Command::new(exe)
        .current_dir(&root)
        .args([
            "render",
            "--top",
            "5",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = std::fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<circle").count(), 5);
}

#[test]
fn cli_rejects_unknown_flags_with_usage() {
    let exe = assert_cmd::cargo_bin!("bubbly-cli");
    Command::new(exe)
        .args(["--definitely-not-a-flag"])
        .assert()
        .code(2);
}
