extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn renders_a_small_ppm() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("tiny.ppm");

    Command::cargo_bin("linebrot")
        .unwrap()
        .args(&["-o", out.to_str().unwrap()])
        .args(&["-s", "16x12", "-n", "1", "-c", "5", "-w", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("seconds"));

    let bytes = fs::read(&out).unwrap();
    let header = b"P6\n#Mandelbrot set\n16 12\n255\n";
    assert_eq!(&bytes[..header.len()], &header[..]);
    assert_eq!(bytes.len(), header.len() + 16 * 12 * 3);
}

#[test]
fn zero_geometry_fails_without_writing_a_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.ppm");

    Command::cargo_bin("linebrot")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "0x0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure"));

    assert!(!out.exists());
}

#[test]
fn output_argument_is_required() {
    Command::cargo_bin("linebrot")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn out_of_range_samples_are_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.ppm");

    Command::cargo_bin("linebrot")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-n", "65"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 64"));

    assert!(!out.exists());
}
