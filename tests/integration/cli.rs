//! Command-line behavior

use std::fs;
use std::process::Command;

const SUBJECT: &str = "function f(x, y) { if (x > 0) { return y; } return -y; }\n\
                       f.specialize = true;\n\
                       f.staticVars = ['x'];\n";

fn genext() -> Command {
    Command::new(env!("CARGO_BIN_EXE_genext"))
}

#[test]
fn test_stdout_output() {
    let dir = tempfile::tempdir().unwrap();
    let subject = dir.path().join("subject.js");
    fs::write(&subject, SUBJECT).unwrap();

    let output = genext()
        .arg(&subject)
        .arg("--stdout")
        .current_dir(dir.path())
        .output()
        .expect("Failed to run genext");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("function f_gen (x) {\n"));
    assert!(stdout.contains("    if (x > 0) {\n"));
    assert!(!dir.path().join("test.js").exists());
}

#[test]
fn test_default_output_file_and_bind() {
    let dir = tempfile::tempdir().unwrap();
    let subject = dir.path().join("subject.js");
    fs::write(&subject, SUBJECT).unwrap();

    let output = genext()
        .arg(&subject)
        .args(["--bind", "x=1"])
        .current_dir(dir.path())
        .output()
        .expect("Failed to run genext");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "function f_special (y) {\n    return y ;\n    return -y ;\n}\n"
    );
    let written = fs::read_to_string(dir.path().join("test.js")).unwrap();
    assert!(written.starts_with("function f_gen (x) {\n"));
}

#[test]
fn test_no_candidates_fails() {
    let dir = tempfile::tempdir().unwrap();
    let subject = dir.path().join("plain.js");
    fs::write(&subject, "function f(x) { return x; }\n").unwrap();

    let output = genext()
        .arg(&subject)
        .arg("--stdout")
        .output()
        .expect("Failed to run genext");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No function"));
}

#[test]
fn test_bad_binding_fails() {
    let dir = tempfile::tempdir().unwrap();
    let subject = dir.path().join("subject.js");
    fs::write(&subject, SUBJECT).unwrap();

    let output = genext()
        .arg(&subject)
        .args(["--stdout", "--bind", "x"])
        .output()
        .expect("Failed to run genext");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
