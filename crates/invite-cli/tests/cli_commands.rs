//! Integration tests for the invite CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn invite() -> Command {
    Command::cargo_bin("invite").unwrap()
}

/// Write every manifest file for 13 pages under `dir`, empty.
fn populate(dir: &Path) {
    let data = dir.join("data");
    fs::create_dir_all(&data).unwrap();
    let mut names: Vec<String> = [
        "left_door",
        "right_door",
        "left_bottom_text",
        "right_bottom_text",
        "2",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    names.extend((3..=15).map(|n| n.to_string()));
    for name in names {
        fs::write(data.join(format!("{name}.jpeg")), b"").unwrap();
    }
    for cue in ["door-open", "page-flip"] {
        fs::write(data.join(format!("{cue}.wav")), b"").unwrap();
    }
}

// ---------------------------------------------------------------------------
// manifest / check
// ---------------------------------------------------------------------------

#[test]
fn manifest_lists_doors_and_pages() {
    invite()
        .arg("manifest")
        .assert()
        .success()
        .stdout(predicate::str::contains("data/left_door.jpeg"))
        .stdout(predicate::str::contains("data/15.jpeg"))
        .stdout(predicate::str::contains("data/page-flip.wav"))
        .stdout(predicate::str::contains("18 images, 2 sounds"));
}

#[test]
fn manifest_rejects_zero_pages() {
    invite()
        .args(["manifest", "--pages", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one page"));
}

#[test]
fn check_reports_missing_images() {
    let dir = TempDir::new().unwrap();
    invite()
        .args(["check", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("MISSING"))
        .stderr(predicate::str::contains("20 of 20 assets missing"));
}

#[test]
fn check_passes_with_every_image() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());
    invite()
        .args(["check", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All 20 assets present"));
}

#[test]
fn check_names_the_one_missing_page() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());
    fs::remove_file(dir.path().join("data/9.jpeg")).unwrap();
    invite()
        .args(["check", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("data/9.jpeg (page 7)"));
}

#[test]
fn check_reports_missing_sound_cue() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());
    fs::remove_file(dir.path().join("data/door-open.wav")).unwrap();
    invite()
        .args(["check", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("data/door-open.wav (door-open sound)"))
        .stderr(predicate::str::contains("1 of 20 assets missing"));
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

#[test]
fn split_writes_four_pieces() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("door.png");
    image::RgbImage::from_pixel(200, 100, image::Rgb([120, 80, 40]))
        .save(&input)
        .unwrap();
    let out = dir.path().join("data");

    invite()
        .arg("split")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Horizontal: 100px"))
        .stdout(predicate::str::contains("70px (door), 30px (text)"));

    let left_door = image::open(out.join("left_door.jpeg")).unwrap();
    assert_eq!((left_door.width(), left_door.height()), (100, 70));
    let right_text = image::open(out.join("right_bottom_text.jpeg")).unwrap();
    assert_eq!((right_text.width(), right_text.height()), (100, 30));
    assert!(out.join("right_door.jpeg").is_file());
    assert!(out.join("left_bottom_text.jpeg").is_file());
}

#[test]
fn split_rejects_ratio_out_of_range() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("door.png");
    image::RgbImage::new(20, 20).save(&input).unwrap();
    invite()
        .arg("split")
        .arg(&input)
        .args(["--text-ratio", "0.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("text ratio"));
}

#[test]
fn split_rejects_image_without_text_band_before_writing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("strip.png");
    image::RgbImage::new(10, 3).save(&input).unwrap();
    let out = dir.path().join("data");
    invite()
        .arg("split")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));
    assert!(!out.exists());
}

#[test]
fn split_fails_on_missing_input() {
    let dir = TempDir::new().unwrap();
    invite()
        .arg("split")
        .arg(dir.path().join("nope.jpeg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open"));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn phone_reaches_invitation_after_door() {
    invite()
        .args(["simulate", "--until", "5000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: invitation"))
        .stdout(predicate::str::contains("door -> invitation"));
}

#[test]
fn phone_still_on_door_before_sequence_ends() {
    invite()
        .args(["simulate", "--until", "4299"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: door"));
}

#[test]
fn laptop_skips_door() {
    invite()
        .args(["simulate", "--width", "1280", "--height", "800", "--until", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: invitation"));
}

#[test]
fn scripted_reading_session() {
    invite()
        .args([
            "simulate",
            "--script",
            "@4500:tap,@5000:next,@5100:key:ArrowRight,@5200:swipe:80:0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: flipbook"))
        .stdout(predicate::str::contains("Page:   2 / 13"))
        .stdout(predicate::str::contains("Manual viewer built"));
}

#[test]
fn library_backend_reported() {
    invite()
        .args(["simulate", "--library", "--script", "@4500:tap,@4600:next"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Viewer: Library"))
        .stdout(predicate::str::contains("page 2 / 13"));
}

#[test]
fn scripted_page_jump() {
    invite()
        .args(["simulate", "--script", "@4500:tap,@4600:page:9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page:   9 / 13"));
}

#[test]
fn page_jump_out_of_range_fails() {
    invite()
        .args(["simulate", "--script", "@4500:tap,@4600:page:14"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page 14 out of range 1..=13"));
}

#[test]
fn json_summary() {
    let output = invite()
        .args(["simulate", "--json", "--script", "@4500:tap,@4600:next,@4700:next"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["screen"], "flipbook");
    assert_eq!(summary["page"], 3);
    assert_eq!(summary["total_pages"], 13);
    assert!(summary["events"].as_array().is_some_and(|e| !e.is_empty()));
}

#[test]
fn config_file_shortens_door_delay() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("invite.toml");
    fs::write(&config, "door_delay_ms = 100\n").unwrap();
    invite()
        .args(["simulate", "--until", "2400", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: invitation"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("invite.toml");
    fs::write(&config, "total_pages = 0\n").unwrap();
    invite()
        .args(["simulate", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("total_pages"));
}

#[test]
fn bad_script_is_rejected() {
    invite()
        .args(["simulate", "--script", "@10:dance"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown action 'dance'"));
}
