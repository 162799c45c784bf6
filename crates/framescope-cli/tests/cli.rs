use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("framescope"))
}

fn arp_request(sender_ip: [u8; 4], target_ip: [u8; 4]) -> Vec<u8> {
    let sender_mac = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xff; 6]);
    frame.extend_from_slice(&sender_mac);
    frame.extend_from_slice(&[0x08, 0x06]);
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01]);
    frame.extend_from_slice(&sender_mac);
    frame.extend_from_slice(&sender_ip);
    frame.extend_from_slice(&[0x00; 6]);
    frame.extend_from_slice(&target_ip);
    frame
}

/// Little-endian legacy pcap with an Ethernet link type.
fn write_pcap(dir: &Path, frames: &[Vec<u8>]) -> PathBuf {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&65535u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    for (i, frame) in frames.iter().enumerate() {
        bytes.extend_from_slice(&(1_700_000_000u32 + i as u32).to_le_bytes());
        bytes.extend_from_slice(&250_000u32.to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(frame);
    }
    let path = dir.join("capture.pcap");
    std::fs::write(&path, bytes).expect("write pcap");
    path
}

fn arp_capture(dir: &Path) -> PathBuf {
    write_pcap(
        dir,
        &[
            arp_request([192, 168, 1, 10], [192, 168, 1, 1]),
            arp_request([192, 168, 1, 11], [192, 168, 1, 1]),
        ],
    )
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}

#[test]
fn help_succeeds() {
    cmd().arg("--help").assert().success();
}

#[test]
fn missing_source_is_a_usage_error() {
    cmd().assert().failure().stderr(contains("error:"));
}

#[test]
fn unknown_protocol_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    cmd()
        .arg("--read")
        .arg(input)
        .arg("--protocols")
        .arg("sctp")
        .assert()
        .failure()
        .stderr(contains("error: unknown protocol: sctp").and(contains("hint:")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.pcap");

    cmd()
        .arg("--read")
        .arg(missing)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("capture.txt");
    std::fs::write(&input, b"not a capture").expect("write file");

    cmd()
        .arg("--read")
        .arg(input)
        .assert()
        .failure()
        .stderr(contains("unsupported input format"));
}

#[test]
fn replay_prints_breakdown() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    cmd()
        .arg("--read")
        .arg(input)
        .assert()
        .success()
        .stdout(
            contains("Frame 1 (42 bytes)")
                .and(contains("Address Resolution Protocol"))
                .and(contains("Who has the address 192.168.1.1?")),
        )
        .stderr(contains("2 frames captured"));
}

#[test]
fn json_emits_one_record_per_frame() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    let assert = cmd().arg("--read").arg(input).arg("--json").assert().success();
    let stdout = stdout_of(&assert);
    let records: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["index"], 1);
    assert_eq!(records[0]["summary"]["protocol"], "ARP");
    assert_eq!(records[1]["summary"]["source"], "192.168.1.11");
}

#[test]
fn json_and_mode_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    cmd()
        .arg("--read")
        .arg(input)
        .arg("--json")
        .arg("--mode")
        .arg("terminal")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn terminal_mode_prints_table() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    let assert = cmd()
        .arg("--read")
        .arg(input)
        .arg("--mode")
        .arg("terminal")
        .assert()
        .success();
    let stdout = stdout_of(&assert);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Destination"));
    assert!(lines[1].contains("192.168.1.10"));
    assert!(lines[1].contains("ARP"));
}

#[test]
fn count_limits_output() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    let assert = cmd()
        .arg("--read")
        .arg(input)
        .arg("--json")
        .arg("--count")
        .arg("1")
        .assert()
        .success();
    assert_eq!(stdout_of(&assert).lines().count(), 1);
}

#[test]
fn protocol_filter_drops_unmatched_frames() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    cmd()
        .arg("--read")
        .arg(input)
        .arg("--protocols")
        .arg("icmp")
        .assert()
        .success()
        .stdout(predicates::str::is_empty())
        .stderr(contains("2 filtered out"));
}

#[test]
fn quiet_suppresses_summary() {
    let temp = TempDir::new().expect("tempdir");
    let input = arp_capture(temp.path());

    cmd()
        .arg("--read")
        .arg(input)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("frames captured").not());
}
