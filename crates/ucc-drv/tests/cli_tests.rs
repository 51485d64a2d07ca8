//! End-to-end tests driving the `ucc` binary itself (§8's testable
//! properties, exercised through the CLI surface rather than the library).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn ucc() -> Command {
    Command::cargo_bin("ucc").unwrap()
}

fn write_source(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn help_exits_successfully() {
    ucc().arg("--help").assert().success().stdout(predicate::str::contains("Usage"));
}

#[test]
fn dry_run_without_compile_flag_writes_no_output() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "hello.uc", "int main() { return 0; }");

    ucc().arg(&input).assert().success();
    assert!(!dir.path().join("hello.cpp").exists());
}

#[test]
fn compile_flag_writes_a_cpp_file_with_the_runtime_preamble() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "hello.uc", "int main() { return 0; }");

    ucc().arg(&input).arg("-C").assert().success();

    let output = fs::read_to_string(dir.path().join("hello.cpp")).unwrap();
    assert!(output.starts_with("#include \"defs.h\"\n"));
    assert!(output.contains("namespace uc {"));
}

#[test]
fn backend_phase_one_produces_a_differently_named_file_with_no_bodies() {
    let dir = tempdir().unwrap();
    let input = write_source(
        dir.path(),
        "greeter.uc",
        "class Greeter { string name; string greet() { return name; } } int main() { return 0; }",
    );

    ucc().arg(&input).arg("-C").arg("--backend-phase=1").assert().success();

    let output = fs::read_to_string(dir.path().join("greeter_phase1.cpp")).unwrap();
    assert!(!output.contains("UC_VAR(greet)"), "phase 1 should not emit method signatures:\n{output}");
}

#[test]
fn invalid_backend_phase_exits_with_code_two() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "hello.uc", "int main() { return 0; }");

    ucc().arg(&input).arg("-C").arg("--backend-phase=9").assert().failure().code(2);
}

#[test]
fn unreadable_input_exits_with_code_two() {
    ucc().arg("/nonexistent/does-not-exist.uc").assert().failure().code(2);
}

#[test]
fn a_type_error_exits_with_code_one_and_reports_a_diagnostic() {
    let dir = tempdir().unwrap();
    let input = write_source(dir.path(), "bad.uc", "int main() { return \"not an int\"; }");

    ucc()
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bad.uc:").and(predicate::str::contains("type:")));
}

#[test]
fn emission_is_idempotent_across_separate_invocations() {
    let dir = tempdir().unwrap();
    let input = write_source(
        dir.path(),
        "animal.uc",
        "class Animal { string name; string speak() { return name; } } \
         class Dog : Animal { } \
         int main() { Dog d; d = new Dog(\"Rex\"); return 0; }",
    );

    ucc().arg(&input).arg("-C").assert().success();
    let first = fs::read_to_string(dir.path().join("animal.cpp")).unwrap();

    ucc().arg(&input).arg("-C").assert().success();
    let second = fs::read_to_string(dir.path().join("animal.cpp")).unwrap();

    assert_eq!(first, second);
}
