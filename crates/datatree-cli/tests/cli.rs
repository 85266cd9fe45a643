use assert_cmd::Command;
use predicates::prelude::*;

const DOC: &str = r#"{"a": {"b": 1, "c": [1, 2]}}"#;

fn datatree() -> Command {
    Command::cargo_bin("datatree").unwrap()
}

#[test]
fn tree_from_stdin() {
    datatree()
        .arg("tree")
        .write_stdin(DOC)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":"a.c.1""#))
        .stdout(predicate::str::contains(r#""type":"integer""#));
}

#[test]
fn query_path_from_stdin() {
    datatree()
        .args(["query", "path", "--id", "a.c.1"])
        .write_stdin(DOC)
        .assert()
        .success()
        .stdout(predicate::str::diff("[\"a\",\"a.c\",\"a.c.1\"]\n"));
}

#[test]
fn query_find_missing_node_fails() {
    datatree()
        .args(["query", "find", "--id", "a.z"])
        .write_stdin(DOC)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Node not found: a.z"));
}

#[test]
fn expand_search() {
    datatree()
        .args(["expand", "--search", "a.c.1"])
        .write_stdin(DOC)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""expanded":["a","a.c","a.c.1"]"#,
        ));
}

#[test]
fn expand_all_conflicts_with_collapse() {
    datatree()
        .args(["expand", "--all", "--collapse"])
        .write_stdin(DOC)
        .assert()
        .failure();
}

#[test]
fn classify_numeric_string() {
    datatree()
        .args(["classify", r#""123""#])
        .assert()
        .success()
        .stdout("number\n");
}

#[test]
fn invalid_json_reports_context() {
    datatree()
        .arg("stats")
        .write_stdin("{oops")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON from stdin"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    datatree()
        .arg("stats")
        .env("RUST_LOG", "debug")
        .env("NO_COLOR", "1")
        .write_stdin(DOC)
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded document"))
        .stdout(predicate::str::contains("loaded document").not());
}

#[test]
fn tree_omits_container_raw_values() {
    datatree()
        .arg("tree")
        .write_stdin(r#"{"a": [1]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"array","key":"a","id":"a","value":{"raw":null"#));
}
