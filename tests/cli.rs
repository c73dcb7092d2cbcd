use std::io::Write;
use std::process::{Command, Stdio};

use pretty_assertions::{assert_eq, assert_str_eq};

struct Run {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn run_classy(args: &[&str], stdin: Option<&str>) -> Run {
    let mut child = Command::new(env!("CARGO_BIN_EXE_classy"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("CLASSY_LOG", "off")
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        // the child may exit without reading its input
        let mut child_stdin = child.stdin.take().unwrap();
        let _ = child_stdin.write_all(stdin.unwrap_or_default().as_bytes());
    }

    let output = child.wait_with_output().unwrap();

    Run {
        code: output.status.code(),
        stdout: String::from_utf8(output.stdout).unwrap(),
        stderr: String::from_utf8(output.stderr).unwrap(),
    }
}

fn assert_stderr_contains(run: &Run, needle: &str) {
    assert!(
        run.stderr.contains(needle),
        "stderr does not mention {:?}:\n{}",
        needle,
        run.stderr,
    );
}

#[test]
fn test_valid_program() {
    let run = run_classy(&["tests/cli/hello.cls"], None);

    assert_eq!(run.code, Some(0));
    assert_str_eq!(run.stderr, "");
}

#[test]
fn test_missing_file() {
    let run = run_classy(&["tests/cli/hello.cls", "tests/cli/does_not_exist.cls"], None);

    assert_eq!(run.code, Some(1));
    assert_stderr_contains(&run, "ERROR could not load file tests/cli/does_not_exist.cls");
    assert!(!run.stderr.contains("panicked"), "{}", run.stderr);
}

#[test]
fn test_definition_error() {
    let run = run_classy(&["tests/cli/duplicate_field.cls"], None);

    assert_eq!(run.code, Some(1));
    assert_stderr_contains(
        &run,
        "ERROR tests/cli/duplicate_field.cls:3:3 name error: duplicate field x",
    );
    assert_stderr_contains(&run, "    (field string x))\n    ^");
}

#[test]
fn test_parse_stage_stops_before_definitions() {
    let run = run_classy(
        &["tests/cli/duplicate_field.cls", "-s", "parse", "-f", "summary"],
        None,
    );

    assert_eq!(run.code, Some(0));
    assert_str_eq!(run.stdout, "(class main (field int x) (field string x))\n");
}

#[test]
fn test_define_stage_skips_main_check() {
    let run = run_classy(&["tests/cli/no_main.cls", "-s", "define"], None);
    assert_eq!(run.code, Some(0));

    let run = run_classy(&["tests/cli/no_main.cls"], None);
    assert_eq!(run.code, Some(1));
    assert_stderr_contains(&run, "ERROR type error: no main class found");
}

#[test]
fn test_no_main_flag() {
    let run = run_classy(&["tests/cli/no_main.cls", "--no-main", "-f", "summary"], None);

    assert_eq!(run.code, Some(0));
    assert_str_eq!(run.stdout, "class helper\n  method int twice((int x))\n");
}

#[test]
fn test_instantiation() {
    let run = run_classy(
        &["tests/cli/templates.cls", "-f", "summary", "-i", "box@int", "-i", "box@int"],
        None,
    );

    assert_eq!(run.code, Some(0));
    assert_str_eq!(
        run.stdout,
        "\
tclass box (T)
class main
  method nothing main()
class box@int
  field int value = 0
"
    );
}

#[test]
fn test_instantiation_of_plain_type_warns() {
    let run = run_classy(&["tests/cli/templates.cls", "-i", "main"], None);

    assert_eq!(run.code, Some(0));
    assert_stderr_contains(&run, "WARN  main is not an instantiation of a template class");
}

#[test]
fn test_invalid_instantiation() {
    let run = run_classy(&["tests/cli/templates.cls", "-i", "box@int@bool"], None);

    assert_eq!(run.code, Some(1));
    assert_stderr_contains(
        &run,
        "ERROR type error: invalid class or templated class type box@int@bool",
    );
}

#[test]
fn test_instantiation_needs_check_stage() {
    let run = run_classy(&["tests/cli/templates.cls", "-s", "define", "-i", "box@int"], None);

    assert_eq!(run.code, Some(2));
}

#[test]
fn test_reads_stdin() {
    let run = run_classy(
        &["-", "-f", "summary"],
        Some("(class main (method void main () (print 1)))"),
    );

    assert_eq!(run.code, Some(0));
    assert_str_eq!(run.stdout, "class main\n  method nothing main()\n");
}

#[test]
fn test_syntax_error_from_stdin() {
    let run = run_classy(&["-"], Some("(class main\n  (field int x)"));

    assert_eq!(run.code, Some(1));
    assert_stderr_contains(&run, "ERROR -:1:1 syntax error: the list opened here is never closed");
}
