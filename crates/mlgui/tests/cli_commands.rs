#![cfg(all(unix, feature = "cli"))]

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::Command;
use std::thread;

use mlgui_wire::{ByteCursor, Frame, FrameReader, FrameWriter};

fn unique_temp_file(tag: &str) -> PathBuf {
    PathBuf::from(format!(
        "/tmp/mlgui-{tag}-{}-{}.bin",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

fn core_protocol(version: u32) -> Frame {
    let mut payload = ByteCursor::new();
    payload.put_u32(version);
    payload.put_u32(59);
    payload.put_u32(68);
    Frame::new(0, payload.into_bytes())
}

fn console(text: &str) -> Frame {
    let mut payload = ByteCursor::new();
    payload.put_string(text).expect("short string");
    Frame::new(19, payload.into_bytes())
}

fn capture(frames: &[Frame]) -> Vec<u8> {
    let mut writer = FrameWriter::new(Vec::new());
    for frame in frames {
        writer.write_frame(frame).expect("in-memory write");
    }
    writer.into_inner()
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect()
}

#[test]
fn decode_prints_one_json_line_per_message() {
    let path = unique_temp_file("decode");
    let bytes = capture(&[
        core_protocol(41),
        Frame::new(0xBEEF, vec![1, 2, 3]),
        console("welcome"),
    ]);
    std::fs::write(&path, bytes).expect("capture should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_mlgui"))
        .args(["--log-level", "error", "--format", "json", "decode"])
        .arg(&path)
        .output()
        .expect("decode should run");

    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["kind"], "CoreProtocol");
    assert_eq!(lines[0]["body"]["version"], 41);
    assert_eq!(lines[1]["unrecognized"], 0xBEEF);
    assert_eq!(lines[1]["payload_len"], 3);
    assert_eq!(lines[2]["body"]["message"], "welcome");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn decode_truncated_capture_returns_60() {
    let path = unique_temp_file("truncated");
    let mut bytes = capture(&[console("cut short")]);
    bytes.truncate(bytes.len() - 3);
    std::fs::write(&path, bytes).expect("capture should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_mlgui"))
        .args(["--log-level", "error", "--format", "json", "decode"])
        .arg(&path)
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn decode_missing_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_mlgui"))
        .args(["decode", "/tmp/mlgui-does-not-exist.bin"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn watch_logs_in_and_prints_core_messages() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");

    let core = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept should succeed");
        let mut reader = FrameReader::new(stream.try_clone().expect("clone"));
        let opcodes: Vec<u16> = (0..2)
            .map(|_| {
                reader
                    .read_frame()
                    .expect("login frame")
                    .into_frame()
                    .expect("frame")
                    .opcode
            })
            .collect();

        let mut writer = FrameWriter::new(stream);
        writer.write_frame(&core_protocol(41)).expect("write");
        writer.write_frame(&console("hello gui")).expect("write");
        opcodes
    });

    let output = Command::new(env!("CARGO_BIN_EXE_mlgui"))
        .args(["--log-level", "error", "--format", "json", "watch"])
        .arg(addr.to_string())
        .args(["--password", "secret", "--count", "2"])
        .output()
        .expect("watch should run");

    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["name"], "CoreProtocol");
    assert_eq!(lines[1]["opcode"], 19);
    assert_eq!(lines[1]["body"]["message"], "hello gui");

    assert_eq!(core.join().expect("core thread"), vec![0, 52]);
}

#[test]
fn watch_bad_password_returns_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");

    let core = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept should succeed");
        let mut writer = FrameWriter::new(stream);
        writer
            .write_frame(&Frame::new(47, Vec::new()))
            .expect("write");
        // Hold the socket open until the client hangs up.
        let mut reader = FrameReader::new(writer.into_inner());
        while reader.read_frame().is_ok() {}
    });

    let output = Command::new(env!("CARGO_BIN_EXE_mlgui"))
        .args(["--log-level", "error", "watch"])
        .arg(addr.to_string())
        .output()
        .expect("watch should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("core rejected password"));

    let _ = core.join();
}

#[test]
fn watch_refused_connection_returns_3() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        listener.local_addr().expect("local addr")
    };

    let output = Command::new(env!("CARGO_BIN_EXE_mlgui"))
        .args(["--log-level", "error", "watch"])
        .arg(addr.to_string())
        .args(["--timeout", "2s"])
        .output()
        .expect("watch should run");

    assert_eq!(output.status.code(), Some(3));
}
