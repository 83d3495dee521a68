use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const DOCUMENT: &str = r#"{
  "foo": "foo",
  "bar": [
    { "baz": "baz", "zoo": { "cat": "cat" } },
    { "baz": "baz", "zoo": { "cat": "cat" } }
  ]
}"#;

#[test]
fn watch_json_reports_monitor() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.json"), DOCUMENT)?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("deepwatch")?
        .current_dir(dir.path())
        .args(["watch", "doc.json", "--read", "bar[0].baz", "--read", "bar.1.zoo.cat", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let monitor: Value = serde_json::from_str(&stdout)?;

    assert_eq!(monitor["foo"], false);
    assert_eq!(monitor["bar"][0]["baz"], true);
    assert_eq!(monitor["bar"][0]["zoo"]["cat"], false);
    assert_eq!(monitor["bar"][1]["baz"], false);
    assert_eq!(monitor["bar"][1]["zoo"]["cat"], true);

    Ok(())
}

#[test]
fn watch_untouched_lists_unread_leaves() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("doc.yaml"),
        "foo: foo\nbar:\n  baz: baz\n  zoo: zoo\n",
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("deepwatch")?
        .current_dir(dir.path())
        .args(["watch", "doc.yaml", "-r", "bar.zoo", "--untouched"])
        .assert()
        .success()
        .stdout("bar.baz\nfoo\n");

    Ok(())
}

#[test]
fn watch_uses_count_strategy_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.json"), DOCUMENT)?;
    fs::write(dir.path().join("deepwatch.yml"), "strategy: count\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("deepwatch")?
        .current_dir(dir.path())
        .args(["watch", "doc.json", "-r", "foo", "-r", "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("foo = 2"))
        .stdout(predicate::str::contains("bar[1].baz = 0"));

    Ok(())
}

#[test]
fn watch_rejects_unknown_strategy() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.json"), DOCUMENT)?;
    fs::write(dir.path().join("deepwatch.yml"), "strategy: sometimes\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("deepwatch")?
        .current_dir(dir.path())
        .args(["watch", "doc.json", "-r", "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));

    Ok(())
}

#[test]
fn view_prints_nested_value() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.json"), DOCUMENT)?;

    #[allow(deprecated)]
    let assert = Command::cargo_bin("deepwatch")?
        .current_dir(dir.path())
        .args(["view", "doc.json", "bar[1].zoo"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value, serde_json::json!({ "cat": "cat" }));

    Ok(())
}

#[test]
fn view_rejects_malformed_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("doc.json"), DOCUMENT)?;

    #[allow(deprecated)]
    Command::cargo_bin("deepwatch")?
        .current_dir(dir.path())
        .args(["view", "doc.json", "bar..zoo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid path"));

    Ok(())
}
