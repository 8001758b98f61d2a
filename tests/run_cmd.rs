use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    Command::cargo_bin("brackets").unwrap()
}

fn source_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn run_positional_code_prints_final_stack() {
    cargo_bin()
        .arg("run")
        .arg("(())")
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn run_seeds_the_active_stack_from_input() {
    cargo_bin()
        .arg("run")
        .arg("--input")
        .arg("10,20")
        .arg("([])")
        .assert()
        .success()
        .stdout("10 20 2\n");
}

#[test]
fn run_can_drain_the_stack_to_empty() {
    cargo_bin()
        .arg("run")
        .arg("-i")
        .arg("3,2,1")
        .arg("{{}}")
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn run_accepts_negative_input_values() {
    // {} pops -4 into the accumulator; the active stack keeps its bottom.
    cargo_bin()
        .arg("run")
        .arg("-i")
        .arg("7,-4")
        .arg("{}")
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn run_reads_program_from_file() {
    let tf = source_to_tempfile("(()())");
    cargo_bin()
        .arg("run")
        .arg("--file")
        .arg(tf.path())
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn run_warns_about_ignored_characters() {
    cargo_bin()
        .arg("run")
        .arg("push one: (())")
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("ignored"));
}

#[test]
fn run_without_code_is_a_usage_error() {
    cargo_bin().arg("run").assert().failure().code(2);
}

#[test]
fn run_rejects_positional_code_with_file() {
    let tf = source_to_tempfile("()");
    cargo_bin()
        .arg("run")
        .arg("--file")
        .arg(tf.path())
        .arg("()")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--file"));
}
