//! Integration tests for the `bmt` command

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a CLI command running inside `dir`
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bmt"));
    cmd.current_dir(dir);
    cmd
}

const METS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:mods="http://www.loc.gov/mods/v3">
  <mets:dmdSec ID="dmd1"><mets:mdWrap MDTYPE="MODS"><mets:xmlData>
    <mods:mods>
      <mods:originInfo><mods:dateIssued keyDate="yes">1914-04-01</mods:dateIssued></mods:originInfo>
      <mods:part type="issue">
        <mods:detail type="volume"><mods:number>5</mods:number></mods:detail>
        <mods:detail type="number"><mods:number>1</mods:number></mods:detail>
      </mods:part>
      <mods:relatedItem ID="c001" type="constituent">
        <mods:titleInfo><mods:title>Sturmangriff</mods:title></mods:titleInfo>
        <mods:typeOfResource>text</mods:typeOfResource>
        <mods:name><mods:displayForm>A. St.</mods:displayForm>
          <mods:role><mods:roleTerm>cre</mods:roleTerm></mods:role></mods:name>
        <mods:name><mods:displayForm>Herwarth Walden</mods:displayForm>
          <mods:role><mods:roleTerm>cre</mods:roleTerm></mods:role></mods:name>
      </mods:relatedItem>
    </mods:mods>
  </mets:xmlData></mets:mdWrap></mets:dmdSec>
  <mets:structMap LABEL="Logical Structure"><mets:div TYPE="Magazine">
    <mets:div TYPE="TextContent" DMDID="c001">
      <mets:div TYPE="Head"><mets:fptr><mets:area FILEID="ALTO00001" BEGIN="P1_TB00001"/></mets:fptr></mets:div>
      <mets:div TYPE="Copy"><mets:fptr><mets:area FILEID="ALTO00001" BEGIN="P1_TB00002"/></mets:fptr></mets:div>
    </mets:div>
  </mets:div></mets:structMap>
</mets:mets>"#;

const ALTO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<alto><Layout><Page><PrintSpace>
  <TextBlock ID="P1_TB00001"><TextLine><String CONTENT="Sturmangriff"/></TextLine></TextBlock>
  <TextBlock ID="P1_TB00002"><TextLine>
    <String CONTENT="Aus"/><String CONTENT="al-" SUBS_TYPE="HypPart1" SUBS_CONTENT="allen"/>
  </TextLine><TextLine>
    <String CONTENT="len" SUBS_TYPE="HypPart2" SUBS_CONTENT="allen"/><String CONTENT="Winkeln"/>
  </TextLine></TextBlock>
</PrintSpace></Page></Layout></alto>"#;

/// Working directory with `data/<issue>/{mets, alto/}`
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let issue = dir.path().join("data").join("bmtnabe_1914-04_01");
    fs::create_dir_all(issue.join("alto")).unwrap();
    fs::write(issue.join("bmtnabe_1914-04_01.mets.xml"), METS).unwrap();
    fs::write(issue.join("alto").join("bmtnabe_1914-04_01_0001.alto.xml"), ALTO).unwrap();
    dir
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("disambiguate"))
        .stdout(predicate::str::contains("collaborators"))
        .stdout(predicate::str::contains("issue"));
}

#[test]
fn test_parse_writes_data_csv() {
    let dir = workspace();
    cli(dir.path())
        .args(["parse", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 1 of 1 issues (1 sections)"));

    let csv = fs::read_to_string(dir.path().join("output").join("data.csv")).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("issue_id\tdate\tvolume"));
    let row: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(row[0], "1");
    assert_eq!(row[4], "c001");
    assert_eq!(row[6], "A. St.||Herwarth Walden");
    assert_eq!(row[7], "flat");
    assert_eq!(row[9], "Sturmangriff");
    assert_eq!(row[12], "Aus allen Winkeln");
}

#[test]
fn test_name_and_output_dir_options() {
    let dir = workspace();
    cli(dir.path())
        .args(["parse", "data", "--name", "sturm", "--output-dir", "out"])
        .assert()
        .success();

    assert!(dir.path().join("out").join("sturm_data.csv").exists());
}

#[test]
fn test_config_file_sets_separator() {
    let dir = workspace();
    fs::write(dir.path().join("bmt.toml"), "csv_separator = \",\"\n").unwrap();

    cli(dir.path()).args(["parse", "data"]).assert().success();

    let csv = fs::read_to_string(dir.path().join("output").join("data.csv")).unwrap();
    assert!(csv.starts_with("issue_id,date,volume"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = workspace();
    fs::write(dir.path().join("custom.toml"), "inconsistency_policy = \"ignore\"\n").unwrap();

    cli(dir.path())
        .args(["--config", "custom.toml", "parse", "data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_issue_prints_json() {
    let dir = workspace();
    let issue = dir.path().join("data").join("bmtnabe_1914-04_01");

    let output = cli(dir.path())
        .arg("issue")
        .arg(issue.join("bmtnabe_1914-04_01.mets.xml"))
        .arg(issue.join("alto"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let records: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(records[0]["section_id"], "c001");
    assert_eq!(records[0]["Head"], "Sturmangriff");
    assert_eq!(records[0]["Copy"], "Aus allen Winkeln");
}

#[test]
fn test_issue_with_missing_alto_fails() {
    let dir = workspace();
    let issue = dir.path().join("data").join("bmtnabe_1914-04_01");

    cli(dir.path())
        .arg("issue")
        .arg(issue.join("bmtnabe_1914-04_01.mets.xml"))
        .arg(dir.path().join("empty"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse issue"));
}

#[test]
fn test_disambiguate_then_collaborators() {
    let dir = workspace();
    fs::write(
        dir.path().join("names.tsv"),
        "Unique Names\tNameCopy\nA. St.\tAugust Stramm\n",
    )
    .unwrap();

    cli(dir.path()).args(["parse", "data"]).assert().success();
    cli(dir.path())
        .args(["disambiguate", "names.tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Disambiguated 1 records with 2 names"));

    let disambiguated =
        fs::read_to_string(dir.path().join("output").join("disambiguated.csv")).unwrap();
    assert!(disambiguated.contains("August Stramm||Herwarth Walden"));
    assert!(dir.path().join("output").join("names.csv").exists());

    cli(dir.path())
        .arg("collaborators")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 author pairs"));

    let pairs = fs::read_to_string(dir.path().join("output").join("collaborators.csv")).unwrap();
    assert_eq!(pairs, "author1\tauthor2\tcount\nAugust Stramm\tHerwarth Walden\t1\n");
}

#[test]
fn test_log_file_receives_diagnostics() {
    let dir = workspace();
    cli(dir.path())
        .args(["--log-file", "parse.log", "parse", "data"])
        .assert()
        .success();

    let log = fs::read_to_string(dir.path().join("parse.log")).unwrap();
    // Subhead and Byline of c001 are never mentioned
    assert!(log.contains("no Subhead found"));
}
