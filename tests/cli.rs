mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestWorkspace;
use predicates::str::contains;

#[test]
fn predict_prints_label() {
    let workspace = TestWorkspace::with_reference_data();
    let input = workspace.write("contacts.csv", &common::contacts_csv());
    cargo_bin_cmd!("csv-semantics")
        .args([
            "predict",
            "-i",
            input.to_str().unwrap(),
            "-c",
            "phone",
            "--data-dir",
            workspace.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("PhoneNumber\n");
}

#[test]
fn predict_json_includes_scores() {
    let workspace = TestWorkspace::with_reference_data();
    let input = workspace.write("contacts.csv", &common::contacts_csv());
    let assert = cargo_bin_cmd!("csv-semantics")
        .args([
            "predict",
            "-i",
            input.to_str().unwrap(),
            "-c",
            "country",
            "--data-dir",
            workspace.path().to_str().unwrap(),
            "--json",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json");
    assert_eq!(parsed["label"], "Country");
    assert_eq!(parsed["scores"]["Country"], 1.0);
    assert_eq!(parsed["scores"]["Other"], 0.0);
}

#[test]
fn predict_unknown_column_fails() {
    let workspace = TestWorkspace::with_reference_data();
    let input = workspace.write("contacts.csv", &common::contacts_csv());
    cargo_bin_cmd!("csv-semantics")
        .args([
            "predict",
            "-i",
            input.to_str().unwrap(),
            "-c",
            "fax",
            "--data-dir",
            workspace.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Column 'fax' not found"));
}

#[test]
fn predict_missing_input_fails() {
    let workspace = TestWorkspace::new();
    cargo_bin_cmd!("csv-semantics")
        .args([
            "predict",
            "-i",
            workspace.path().join("nope.csv").to_str().unwrap(),
            "-c",
            "phone",
        ])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn parse_writes_output_and_prints_path() {
    let workspace = TestWorkspace::with_reference_data();
    let input = workspace.write("contacts.csv", &common::contacts_csv());
    let output = workspace.path().join("parsed.csv");
    cargo_bin_cmd!("csv-semantics")
        .args([
            "parse",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--data-dir",
            workspace.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("parsed.csv"));

    let contents = std::fs::read_to_string(&output).expect("read output");
    let header = contents.lines().next().expect("header");
    assert_eq!(header, "id,company,phone,country,signed_on,notes,Country,Number,Name,Legal");
    assert!(contents.contains("enno roggemann,gmbh co kg"));
}

#[test]
fn parse_accepts_custom_delimiter() {
    let workspace = TestWorkspace::with_reference_data();
    let input = workspace.write("firms.txt", "firm;tel\nAcme Ltd;+14155551234\n");
    let output = workspace.path().join("firms-out.txt");
    cargo_bin_cmd!("csv-semantics")
        .args([
            "parse",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--data-dir",
            workspace.path().to_str().unwrap(),
            "--delimiter",
            "semicolon",
        ])
        .assert()
        .success();
    let contents = std::fs::read_to_string(&output).expect("read output");
    assert_eq!(contents.lines().next(), Some("firm;tel;Country;Number;Name;Legal"));
    assert!(contents.contains("Acme Ltd;+14155551234;US;4155551234;acme;ltd"));
}
