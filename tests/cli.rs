use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn fbase91_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fbase91"))
}

fn run_with_stdin(mut cmd: Command, input: &[u8]) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_default_scheme_is_base91() {
    let output = run_with_stdin(fbase91_cmd(), b"Hello");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"Zp9C!ttB\n");
}

#[test]
fn test_scheme_flags() {
    let mut cmd = fbase91_cmd();
    cmd.arg("-6");
    assert_eq!(run_with_stdin(cmd, b"Man").stdout, b"TWFu\n");

    let mut cmd = fbase91_cmd();
    cmd.args(["--base85", "-w", "0"]);
    assert_eq!(run_with_stdin(cmd, &[0; 8]).stdout, b"zz");

    let mut cmd = fbase91_cmd();
    cmd.args(["-B", "-w0"]);
    assert_eq!(run_with_stdin(cmd, b"A").stdout, b"0%");
}

#[test]
fn test_conflicting_scheme_flags_rejected() {
    let mut cmd = fbase91_cmd();
    cmd.args(["-6", "-8"]);
    let output = run_with_stdin(cmd, b"");
    assert!(!output.status.success());
}

#[test]
fn test_decode_round_trip_with_wrap() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let mut cmd = fbase91_cmd();
    cmd.args(["-6", "-w", "10"]);
    let encoded = run_with_stdin(cmd, &data);
    assert!(encoded.status.success());

    let mut cmd = fbase91_cmd();
    cmd.args(["-6", "-d"]);
    let decoded = run_with_stdin(cmd, &encoded.stdout);
    assert!(decoded.status.success());
    assert_eq!(decoded.stdout, data);
}

#[test]
fn test_invalid_character_exit_status() {
    let mut cmd = fbase91_cmd();
    cmd.args(["-6", "-d"]);
    let output = run_with_stdin(cmd, b"TWFu!");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"Man");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid character: '!'"),
        "stderr should name the character, got: {}",
        stderr
    );
}

#[test]
fn test_ignore_garbage_flag() {
    let mut cmd = fbase91_cmd();
    cmd.args(["-6", "-d", "-i"]);
    let output = run_with_stdin(cmd, b"T*WFu");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"Man");
}

#[test]
fn test_multiple_files_and_stdin_dash() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    fs::write(&a, b"a").unwrap();

    let mut cmd = fbase91_cmd();
    cmd.args(["-6", "-w", "0", a.to_str().unwrap(), "-"]);
    let output = run_with_stdin(cmd, b"b");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"YQ==Yg==");
}

#[test]
fn test_missing_file_stops_processing() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a");
    fs::write(&a, b"Man").unwrap();
    let missing = dir.path().join("nope");

    let mut cmd = fbase91_cmd();
    cmd.args([
        "-6",
        "-w",
        "0",
        a.to_str().unwrap(),
        missing.to_str().unwrap(),
        a.to_str().unwrap(),
    ]);
    let output = run_with_stdin(cmd, b"");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"TWFu");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No such file or directory"),
        "got: {}",
        stderr
    );
}

#[cfg(unix)]
fn linked_as(dir: &Path, name: &str) -> Command {
    let link = dir.join(name);
    std::os::unix::fs::symlink(env!("CARGO_BIN_EXE_fbase91"), &link).unwrap();
    Command::new(link)
}

#[cfg(unix)]
#[test]
fn test_program_name_selects_scheme() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_with_stdin(linked_as(dir.path(), "base64"), b"Man");
    assert_eq!(output.stdout, b"TWFu\n");

    let output = run_with_stdin(linked_as(dir.path(), "base122"), b"A");
    assert_eq!(output.stdout, b"0%\n");

    let mut cmd = linked_as(dir.path(), "base85");
    cmd.arg("-d");
    let output = run_with_stdin(cmd, b"zz");
    assert_eq!(output.stdout, vec![0; 8]);
}

#[cfg(unix)]
#[test]
fn test_flag_overrides_program_name() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = linked_as(dir.path(), "base64");
    cmd.arg("--base91");
    let output = run_with_stdin(cmd, b"a");
    assert_eq!(output.stdout, b"iK\n");
}
