//! CLI Smoke Tests
//!
//! Run the built `glyphtools` binary against a small UFO written to a
//! temporary directory, and once against the binary test font:
//! - `info`, `metrics`, `kern`, `bin`: read-only queries
//! - `category`: assignment written to a new UFO
//! - `batch`: JSONL jobs in, JSONL results out, in input order
//!
//! Failure cases cover missing fonts, bad metrics and glyphs without ink.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use norad::{Contour, ContourPoint, PointType};

fn glyphtools() -> Command {
    Command::new(env!("CARGO_BIN_EXE_glyphtools"))
}

fn temp_output(ext: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!("glyphtools_cli_test_{}.{}", id, ext));
    path
}

fn rect_glyph(name: &str, width: f64, x0: f64, x1: f64) -> norad::Glyph {
    let pt = |x, y| ContourPoint::new(x, y, PointType::Line, false, None, None);
    let mut glyph = norad::Glyph::new(name);
    glyph.width = width;
    glyph.contours.push(Contour::new(
        vec![pt(x0, 0.0), pt(x1, 0.0), pt(x1, 700.0), pt(x0, 700.0)],
        None,
    ));
    glyph
}

/// H (600 wide), I and J (300 wide) and an empty space
fn test_ufo() -> PathBuf {
    let mut font = norad::Font::new();
    let layer = font.default_layer_mut();
    layer.insert_glyph(rect_glyph("H", 600.0, 50.0, 550.0));
    layer.insert_glyph(rect_glyph("I", 300.0, 50.0, 250.0));
    layer.insert_glyph(rect_glyph("J", 310.0, 40.0, 260.0));
    let mut space = norad::Glyph::new("space");
    space.width = 250.0;
    layer.insert_glyph(space);

    let path = temp_output("ufo");
    font.save(&path).unwrap();
    path
}

fn test_font(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // root
    path.push("test-fonts");
    path.push(name);
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ============================================================================
// Read-only commands
// ============================================================================

#[test]
fn test_info_without_font() {
    let output = glyphtools().arg("info").output().unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("glyphtools v"));
    assert!(text.contains("xMin"));
}

#[test]
fn test_info_with_font() {
    let output = glyphtools().arg("info").arg(test_ufo()).output().unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Format: UFO"));
    assert!(text.contains("Glyphs: 4"));
}

#[test]
fn test_metrics_json() {
    let output = glyphtools()
        .arg("metrics")
        .arg(test_ufo())
        .args(["H", "space", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reports[0]["glyph"], "H");
    assert_eq!(reports[0]["xMax"], 550.0);
    assert_eq!(reports[1]["rsb"], 250.0);
}

#[test]
fn test_kern() {
    let output = glyphtools()
        .arg("kern")
        .arg(test_ufo())
        .args(["H", "I", "--distance", "80"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "-20");
}

#[test]
fn test_kern_binary_font() {
    let output = glyphtools()
        .arg("kern")
        .arg(test_font("GlyphtoolsTest-Regular.ttf"))
        .args(["H", "I", "--distance", "80"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output).trim(), "-20");
}

#[test]
fn test_kern_respects_the_tuck_limit() {
    // Ask for heavy overlap: the kern may not pass 10% of H's width
    let output = glyphtools()
        .arg("kern")
        .arg(test_ufo())
        .args(["H", "I", "--distance", "-500", "--max-tuck", "0.1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "-60");
}

#[test]
fn test_bin_by_width() {
    let output = glyphtools()
        .arg("bin")
        .arg(test_ufo())
        .args(["I", "H", "J", "space", "--metric", "width", "--bins", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["286: I J space", "600: H"]);
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_category_set_and_read_back() {
    let saved = temp_output("ufo");
    let output = glyphtools()
        .arg("category")
        .arg(test_ufo())
        .args(["H", "--set", "base", "--output"])
        .arg(&saved)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = glyphtools()
        .arg("category")
        .arg(&saved)
        .arg("H")
        .output()
        .unwrap();
    assert_eq!(stdout(&output).trim(), "H: base");
}

// ============================================================================
// Batch
// ============================================================================

#[test]
fn test_batch_keeps_input_order() {
    let mut child = glyphtools()
        .arg("batch")
        .arg(test_ufo())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let stdin = child.stdin.as_mut().unwrap();
        writeln!(stdin, r#"{{"id":"a","left":"H","right":"I","distance":80}}"#).unwrap();
        writeln!(stdin, "not json").unwrap();
        writeln!(stdin, r#"{{"id":"c","left":"H","right":"space","distance":80}}"#).unwrap();
        writeln!(stdin, r#"{{"left":"I","right":"H","distance":100}}"#).unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let results: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["id"], "a");
    assert_eq!(results[0]["kern"], -20);
    assert_eq!(results[1]["id"], "2");
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[2]["status"], "error");
    assert_eq!(results[3]["id"], "4");
    assert_eq!(results[3]["kern"], 0);
}

// ============================================================================
// Failure cases
// ============================================================================

#[test]
fn test_missing_font_fails() {
    let output = glyphtools()
        .args(["kern", "/no/such/font.ttf", "A", "V", "--distance", "50"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open font"));
}

#[test]
fn test_unknown_metric_fails() {
    let output = glyphtools()
        .arg("bin")
        .arg(test_ufo())
        .args(["--metric", "height"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown metric"));
}
