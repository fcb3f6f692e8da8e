#![cfg(all(unix, feature = "cli"))]

use std::io::Read;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/irbcli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn irbridge(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_irbridge"));
    cmd.args(["--log-level", "error"])
        .args(args)
        .env_remove("IRBRIDGE_SOURCES")
        .env_remove("IRBRIDGE_COMMANDS")
        .env_remove("IRBRIDGE_SOCKET")
        .stdin(Stdio::null());
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("irbridge should run")
}

fn write_commands(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("commands.json");
    std::fs::write(&path, json).expect("command map should be writable");
    path
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
        .collect()
}

fn s(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn map_lists_entries_as_json() {
    let dir = unique_temp_dir("map-json");
    let commands = write_commands(
        &dir,
        r#"{"00010203040506": "cycle pause", "CODE1": "seek 10"}"#,
    );

    let out = run(&mut irbridge(&["--format", "json", "map", "-c", s(&commands)]));
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let lines = json_lines(&out.stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["count"], 2);
    assert_eq!(lines[0]["entries"][0]["code"], "00010203040506");
    assert_eq!(lines[0]["entries"][0]["command"], "cycle pause");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn map_looks_up_single_code() {
    let dir = unique_temp_dir("map-code");
    let commands = write_commands(&dir, r#"{"CODE1": "seek 10"}"#);

    let out = run(&mut irbridge(&["map", "-c", s(&commands), "--code", "CODE1"]));
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "seek 10\n");

    let out = run(&mut irbridge(&["map", "-c", s(&commands), "--code", "nope"]));
    assert_eq!(out.status.code(), Some(1));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn invalid_command_map_exits_data_invalid() {
    let dir = unique_temp_dir("map-invalid");
    let commands = write_commands(&dir, r#"{"CODE1": 5}"#);

    let out = run(&mut irbridge(&["map", "-c", s(&commands)]));
    assert_eq!(out.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid command map"));

    let out = run(&mut irbridge(&["run", "-c", s(&commands)]));
    assert_eq!(out.status.code(), Some(60));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn capture_replays_fixed_frame_recording() {
    let dir = unique_temp_dir("capture-fixed");
    let frames = dir.join("frames.bin");
    let mut bytes = vec![0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
    bytes.extend_from_slice(&[0xff; 7]);
    std::fs::write(&frames, bytes).expect("recording should be writable");

    let out = run(&mut irbridge(&[
        "--format",
        "json",
        "capture",
        "--source",
        "fixed-frame",
        "--frame-device",
        s(&frames),
    ]));
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let lines = json_lines(&out.stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["source"], "fixed-frame");
    assert_eq!(lines[0]["code"], "00010203040506");
    assert_eq!(lines[1]["code"], "ffffffffffffff");
    assert!(lines[0]["command"].is_null());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn capture_replays_line_protocol_recording_with_map() {
    let dir = unique_temp_dir("capture-line");
    let recording = dir.join("at90.txt");
    std::fs::write(&recording, "CODE1\r\nOK\r\nCODE2\nCODE3\nOK\n")
        .expect("recording should be writable");
    let commands = write_commands(&dir, r#"{"CODE3": "quit"}"#);

    let out = run(&mut irbridge(&[
        "--format",
        "json",
        "capture",
        "--source",
        "line-protocol",
        "--line-device",
        s(&recording),
        "-c",
        s(&commands),
    ]));
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let lines = json_lines(&out.stdout);
    let codes: Vec<&str> = lines.iter().map(|l| l["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["CODE1", "CODE3"]);
    assert_eq!(lines[0]["source"], "line-protocol");
    assert!(lines[0]["command"].is_null());
    assert_eq!(lines[1]["command"], "quit");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn capture_count_stops_early() {
    let dir = unique_temp_dir("capture-count");
    let frames = dir.join("frames.bin");
    std::fs::write(&frames, [0x11u8; 21]).expect("recording should be writable");

    let out = run(&mut irbridge(&[
        "--format",
        "raw",
        "capture",
        "--source",
        "fixed-frame",
        "--frame-device",
        s(&frames),
        "--count",
        "1",
    ]));
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "11111111111111\n");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn capture_count_zero_is_rejected() {
    let dir = unique_temp_dir("capture-count-zero");
    let frames = dir.join("frames.bin");
    std::fs::write(&frames, [0x11u8; 14]).expect("recording should be writable");

    let out = run(&mut irbridge(&[
        "--format",
        "raw",
        "capture",
        "--source",
        "fixed-frame",
        "--frame-device",
        s(&frames),
        "--count",
        "0",
    ]));
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn blank_sentinel_is_rejected() {
    let dir = unique_temp_dir("blank-sentinel");
    let recording = dir.join("at90.txt");
    std::fs::write(&recording, "A\nOK\n").expect("recording should be writable");

    let out = run(&mut irbridge(&[
        "capture",
        "--source",
        "line-protocol",
        "--line-device",
        s(&recording),
        "--sentinel",
        "",
    ]));
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn directory_as_device_fails_startup() {
    let dir = unique_temp_dir("dir-device");
    let commands = write_commands(&dir, "{}");

    let out = run(&mut irbridge(&[
        "run",
        "-c",
        s(&commands),
        "--source",
        "line-protocol",
        "--line-device",
        s(&dir),
    ]));
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to open device"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_device_fails_startup() {
    let dir = unique_temp_dir("missing-device");
    let commands = write_commands(&dir, "{}");

    let out = run(&mut irbridge(&[
        "run",
        "-c",
        s(&commands),
        "--source",
        "fixed-frame",
        "--frame-device",
        s(&dir.join("nope")),
    ]));
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to open device"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn run_delivers_mapped_command_to_socket() {
    let dir = unique_temp_dir("run-deliver");
    let sock_path = dir.join("mpv.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");

    let frames = dir.join("frames.bin");
    let mut bytes = vec![0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
    bytes.extend_from_slice(&[0xee; 7]);
    std::fs::write(&frames, bytes).expect("recording should be writable");
    let commands = write_commands(&dir, r#"{"00010203040506": "cycle pause"}"#);

    // Connecting only needs the listen backlog, so the bridge can finish
    // before anything is accepted here.
    let out = run(&mut irbridge(&[
        "run",
        "-c",
        s(&commands),
        "--source",
        "fixed-frame",
        "--frame-device",
        s(&frames),
        "--socket",
        s(&sock_path),
    ]));
    assert_eq!(out.status.code(), Some(1), "all sources end after replay");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("sent 1, dropped 0, unknown 1"), "stderr: {stderr}");

    let (mut conn, _) = listener.accept().expect("bridge should have connected");
    let mut received = String::new();
    conn.read_to_string(&mut received)
        .expect("payload should be readable");
    assert_eq!(received, "cycle pause\n");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_writes_one_command_line() {
    let dir = unique_temp_dir("send");
    let sock_path = dir.join("mpv.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");

    let out = run(&mut irbridge(&["send", "--socket", s(&sock_path), "show-progress"]));
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let (mut conn, _) = listener.accept().expect("send should have connected");
    let mut received = String::new();
    conn.read_to_string(&mut received)
        .expect("payload should be readable");
    assert_eq!(received, "show-progress\n");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_to_missing_socket_fails() {
    let dir = unique_temp_dir("send-missing");
    let out = run(&mut irbridge(&[
        "send",
        "--socket",
        s(&dir.join("absent.sock")),
        "quit",
    ]));
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stderr).contains("command not delivered"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_prints_name() {
    let out = run(&mut irbridge(&["version"]));
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("irbridge "));
}
