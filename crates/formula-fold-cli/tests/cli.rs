use std::process::{Command as StdCommand, Stdio};

use assert_cmd::Command;
use pretty_assertions::assert_eq;

fn formula_fold() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("formula-fold"))
}

fn stdout_of(args: &[&str], stdin: &str) -> String {
    let output = formula_fold()
        .args(args)
        .write_stdin(stdin)
        .output()
        .expect("run formula-fold");
    assert!(
        output.status.success(),
        "formula-fold {args:?} failed\nstderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 stdout")
}

#[test]
fn folds_from_stdin() {
    assert_eq!(
        stdout_of(&["fold", "--mode", "p"], "=SUM(A1,B1)\n"),
        "SUM(\n    A1,\n    B1\n)\n"
    );
}

#[test]
fn unfold_reverses_fold() {
    let folded = stdout_of(&["fold", "--mode", "j"], r#"=IF(A1<>B1,"Different","Same")"#);
    assert!(folded.starts_with("// Excel Formula (JavaScript syntax"), "{folded}");
    assert_eq!(
        stdout_of(&["unfold", "--mode", "javascript"], &folded),
        "=IF(A1<>B1, \"Different\", \"Same\")\n"
    );
}

#[test]
fn auto_picks_direction_from_line_count() {
    let folded = stdout_of(&["auto", "--mode", "c"], "=MAX(A1,B1)");
    assert_eq!(folded, "MAX(\n  A1,\n  B1\n)\n");
    assert_eq!(stdout_of(&["auto", "--mode", "c"], &folded), "=MAX(A1, B1)\n");
}

#[test]
fn switch_and_detect() {
    let folded = stdout_of(&["fold", "--mode", "p"], "=SUM(A1,B1)");
    let python = stdout_of(&["switch", "--from", "p", "--to", "py"], &folded);
    assert!(python.contains("sum("), "{python}");
    assert_eq!(stdout_of(&["detect"], &python), "py\n");
}

#[test]
fn reads_input_and_config_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("formula.txt");
    let config = dir.path().join("options.json");
    std::fs::write(&input, "=SUM(A1:A10)").expect("write input");
    std::fs::write(&config, r#"{ "inlineWidth": 5 }"#).expect("write config");

    let folded = stdout_of(
        &[
            "fold",
            "--mode",
            "p",
            "--input",
            input.to_str().expect("utf-8 path"),
            "--config",
            config.to_str().expect("utf-8 path"),
        ],
        "",
    );
    assert_eq!(folded, "SUM(\n    A1:A10\n)\n");
}

#[test]
fn lists_every_mode() {
    let listing = stdout_of(&["modes"], "");
    let ids: Vec<&str> = listing
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(ids, ["j", "a", "p", "c", "py", "css"]);
}

#[test]
fn invalid_mode_fails_with_message() {
    let output = formula_fold()
        .args(["fold", "--mode", "x"])
        .write_stdin("=SUM(A1)")
        .output()
        .expect("run formula-fold");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid mode"), "{stderr}");
}

#[test]
fn undetectable_input_fails() {
    let output = formula_fold()
        .arg("detect")
        .write_stdin("A1\nB1\n")
        .output()
        .expect("run formula-fold");
    assert!(!output.status.success());
}

#[test]
fn cli_does_not_panic_on_broken_pipe() {
    let input = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");

    let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin!("formula-fold"))
        .args(["fold", "--mode", "css", "--input", input])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn formula-fold");

    // Closing the read end forces stdout writes to return EPIPE / BrokenPipe.
    drop(child.stdout.take());

    let output = child
        .wait_with_output()
        .expect("wait for formula-fold to finish");

    assert!(
        output.status.success(),
        "expected success even when stdout is closed\nstderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
}
