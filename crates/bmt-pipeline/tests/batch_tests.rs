//! End-to-end tests of the batch driver over issue directories on disk

use bmt_core::{DiagnosticKind, RECORD_COLUMNS};
use bmt_pipeline::{
    read_records, run_batch, write_records, Config, InconsistencyPolicy, IssueError,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn mets(volume: &str, number: &str, date: &str, items: &str, struct_map: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/" xmlns:mods="http://www.loc.gov/mods/v3">
  <mets:dmdSec ID="dmd1"><mets:mdWrap MDTYPE="MODS"><mets:xmlData>
    <mods:mods>
      <mods:originInfo><mods:dateIssued keyDate="yes">{date}</mods:dateIssued></mods:originInfo>
      <mods:part type="issue">
        <mods:detail type="volume"><mods:number>{volume}</mods:number></mods:detail>
        <mods:detail type="number"><mods:number>{number}</mods:number></mods:detail>
      </mods:part>
      {items}
    </mods:mods>
  </mets:xmlData></mets:mdWrap></mets:dmdSec>
  <mets:structMap LABEL="Logical Structure"><mets:div TYPE="Magazine">{struct_map}</mets:div></mets:structMap>
</mets:mets>"#
    )
}

fn text_item(id: &str, title: &str, author: Option<&str>) -> String {
    let name = author
        .map(|a| {
            format!(
                r#"<mods:name><mods:displayForm>{a}</mods:displayForm><mods:role><mods:roleTerm>cre</mods:roleTerm></mods:role></mods:name>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<mods:relatedItem ID="{id}" type="constituent">
  <mods:titleInfo><mods:title>{title}</mods:title></mods:titleInfo>
  <mods:typeOfResource>text</mods:typeOfResource>{name}
</mods:relatedItem>"#
    )
}

fn image_item(id: &str, title: &str) -> String {
    format!(
        r#"<mods:relatedItem ID="{id}" type="constituent">
  <mods:titleInfo><mods:title>{title}</mods:title></mods:titleInfo>
  <mods:typeOfResource>still image</mods:typeOfResource>
</mods:relatedItem>"#
    )
}

fn ad_item(id: &str, title: &str) -> String {
    format!(
        r#"<mods:relatedItem ID="{id}" type="constituent">
  <mods:titleInfo><mods:title>{title}</mods:title></mods:titleInfo>
  <mods:genre>Advertisement</mods:genre>
  <mods:typeOfResource>text</mods:typeOfResource>
</mods:relatedItem>"#
    )
}

fn text_div(id: &str, roles: &[(&str, &[(&str, &str)])]) -> String {
    content_div("TextContent", id, roles)
}

fn content_div(kind: &str, id: &str, roles: &[(&str, &[(&str, &str)])]) -> String {
    let roles: String = roles
        .iter()
        .map(|(kind, areas)| {
            let areas: String = areas
                .iter()
                .map(|(file, begin)| {
                    format!(r#"<mets:fptr><mets:area FILEID="{file}" BEGIN="{begin}" BETYPE="IDREF"/></mets:fptr>"#)
                })
                .collect();
            format!(r#"<mets:div TYPE="{kind}">{areas}</mets:div>"#)
        })
        .collect();
    format!(r#"<mets:div TYPE="{kind}" DMDID="{id}">{roles}</mets:div>"#)
}

fn alto(blocks: &[(&str, &[&str])]) -> String {
    let blocks: String = blocks
        .iter()
        .map(|(id, words)| {
            let strings: String = words
                .iter()
                .map(|w| format!(r#"<String CONTENT="{w}"/>"#))
                .collect();
            format!(r#"<TextBlock ID="{id}"><TextLine>{strings}</TextLine></TextBlock>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<alto xmlns="http://www.loc.gov/standards/alto/ns-v2#"><Layout><Page><PrintSpace>{blocks}</PrintSpace></Page></Layout></alto>"#
    )
}

fn write_issue(root: &Path, name: &str, mets_xml: &str, altos: &[(&str, String)]) {
    let issue = root.join(name);
    let alto_dir = issue.join("alto");
    fs::create_dir_all(&alto_dir).unwrap();
    fs::write(issue.join(format!("{name}.mets.xml")), mets_xml).unwrap();
    for (file, content) in altos {
        fs::write(alto_dir.join(file), content).unwrap();
    }
}

/// Two good issues around a broken one.
fn data_root() -> TempDir {
    let root = TempDir::new().unwrap();

    write_issue(
        root.path(),
        "bmtnabe_1914-04_01",
        &mets(
            "5",
            "1",
            "1914-04-01",
            &(text_item("c001", "Sturmangriff", Some("August Stramm"))
                + &image_item("c002", "Holzschnitt")),
            &text_div(
                "c001",
                &[
                    ("Head", &[("ALTO00001", "P1_TB00001")]),
                    ("Copy", &[("ALTO00002", "P2_TB00001"), ("ALTO00001", "P1_TB00002")]),
                ],
            ),
        ),
        &[
            (
                "bmtnabe_1914-04_01_0001.alto.xml",
                alto(&[("P1_TB00001", &["Sturmangriff"]), ("P1_TB00002", &["Aus", "allen"])]),
            ),
            (
                "bmtnabe_1914-04_01_0002.alto.xml",
                alto(&[("P2_TB00001", &["Winkeln"])]),
            ),
        ],
    );

    write_issue(
        root.path(),
        "bmtnabe_1914-05_01",
        &mets(
            "5",
            "2",
            "1914-05-01",
            &text_item("c001", "Kaputt", None),
            &text_div("c001", &[("Head", &[("ALTO00001", "P1_TB00099")])]),
        ),
        &[(
            "bmtnabe_1914-05_01_0001.alto.xml",
            alto(&[("P1_TB00001", &["Kaputt"])]),
        )],
    );

    write_issue(
        root.path(),
        "bmtnabe_1914-06_01",
        &mets(
            "5",
            "3",
            "1914-06-01",
            &text_item("c001", "Der Krieg", Some("Herwarth Walden")),
            &text_div("c001", &[("Head", &[("ALTO00001", "P1_TB00001")]), ("Byline", &[])]),
        ),
        &[(
            "bmtnabe_1914-06_01_0001.alto.xml",
            alto(&[("P1_TB00001", &["Der", "Krieg"])]),
        )],
    );

    root
}

fn sequential() -> Config {
    Config {
        parallel: false,
        ..Config::default()
    }
}

#[test]
fn test_batch_skips_failing_issue() {
    let root = data_root();
    let report = run_batch(root.path(), &sequential()).unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failures.len(), 1);

    let failure = &report.failures[0];
    assert_eq!(failure.issue_id, 2);
    assert!(matches!(failure.error, IssueError::Inconsistent { ref section_id, .. } if section_id == "c001"));

    let ids: Vec<(u32, &str)> = report
        .records
        .iter()
        .map(|r| (r.issue_id, r.section_id.as_str()))
        .collect();
    assert_eq!(ids, vec![(1, "c001"), (1, "c002"), (3, "c001")]);
}

#[test]
fn test_batch_record_contents() {
    let root = data_root();
    let report = run_batch(root.path(), &sequential()).unwrap();

    let first = &report.records[0];
    assert_eq!(first.date, "1914-04-01");
    assert_eq!(first.volume, "5");
    assert_eq!(first.number, "1");
    assert_eq!(first.title, "Sturmangriff");
    assert_eq!(first.authors, "August Stramm");
    assert_eq!(first.section_type, "flat");
    assert_eq!(first.head, "Sturmangriff");
    // P1_TB00002 sorts before P2_TB00001
    assert_eq!(first.copy, "Aus allen Winkeln");

    let image = &report.records[1];
    assert_eq!(image.section_type, "image");
    assert_eq!(image.type_of_resource, "still image");
    assert_eq!((image.head.as_str(), image.copy.as_str()), ("", ""));

    let last = &report.records[2];
    assert_eq!(last.byline, "");
    assert_eq!(last.head, "Der Krieg");
}

#[test]
fn test_drop_section_policy_keeps_issue() {
    let root = data_root();
    let config = Config {
        inconsistency_policy: InconsistencyPolicy::DropSection,
        ..sequential()
    };
    let report = run_batch(root.path(), &config).unwrap();

    assert_eq!(report.succeeded, 3);
    assert!(report.failures.is_empty());
    assert!(report.records.iter().all(|r| r.issue_id != 2));
    assert_eq!(
        report
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Inconsistency)
            .count(),
        1
    );
}

#[test]
fn test_parallel_matches_sequential_and_is_idempotent() {
    let root = data_root();

    let sequential_report = run_batch(root.path(), &sequential()).unwrap();
    let parallel_report = run_batch(root.path(), &Config::default()).unwrap();
    assert_eq!(sequential_report.records, parallel_report.records);

    let mut first = Vec::new();
    write_records(&mut first, &sequential_report.records, b'\t').unwrap();
    let mut second = Vec::new();
    write_records(&mut second, &run_batch(root.path(), &sequential()).unwrap().records, b'\t')
        .unwrap();
    assert_eq!(first, second);

    let header = String::from_utf8(first.clone()).unwrap();
    assert!(header.starts_with(&RECORD_COLUMNS.join("\t")));
    assert_eq!(read_records(first.as_slice(), b'\t').unwrap(), sequential_report.records);
}

#[test]
fn test_double_nesting_fails_issue() {
    let root = TempDir::new().unwrap();
    let nested = r#"<mods:relatedItem ID="c001" type="constituent">
  <mods:typeOfResource>text</mods:typeOfResource>
  <mods:relatedItem ID="c002" type="constituent">
    <mods:typeOfResource>text</mods:typeOfResource>
    <mods:relatedItem ID="c003" type="constituent">
      <mods:typeOfResource>text</mods:typeOfResource>
    </mods:relatedItem>
  </mods:relatedItem>
</mods:relatedItem>"#;
    write_issue(
        root.path(),
        "bmtnabe_1914-07_01",
        &mets(
            "5",
            "4",
            "1914-07-01",
            nested,
            &(text_div("c001", &[]) + &text_div("c002", &[])),
        ),
        &[],
    );

    let report = run_batch(root.path(), &sequential()).unwrap();
    assert_eq!(report.succeeded, 0);
    assert!(report.records.is_empty());
    assert!(matches!(
        report.failures[0].error,
        IssueError::Structure(bmt_mets::StructureError::DoubleNesting { .. })
    ));
}

#[test]
fn test_advertisement_text_from_sponsored_ad() {
    let root = TempDir::new().unwrap();
    write_issue(
        root.path(),
        "bmtnabe_1914-08_01",
        &mets(
            "5",
            "5",
            "1914-08-01",
            &(ad_item("c001", "Verlag Der Sturm") + &ad_item("c002", "Kunstausstellung")),
            &content_div("SponsoredAd", "c001", &[("Copy", &[("ALTO00001", "P1_TB00001")])]),
        ),
        &[(
            "bmtnabe_1914-08_01_0001.alto.xml",
            alto(&[("P1_TB00001", &["Kauft", "Bücher"])]),
        )],
    );

    let report = run_batch(root.path(), &sequential()).unwrap();
    assert_eq!(report.succeeded, 1);

    let with_text = &report.records[0];
    assert_eq!(with_text.section_type, "advertisement");
    assert_eq!(with_text.copy, "Kauft Bücher");
    assert_eq!(with_text.head, "");

    // no SponsoredAd div: the record is kept with empty text
    let without_text = &report.records[1];
    assert_eq!(without_text.section_id, "c002");
    assert_eq!(without_text.copy, "");
    assert!(report
        .diagnostics
        .iter()
        .all(|d| d.kind != DiagnosticKind::UnresolvedRole));
}

#[test]
fn test_repeated_area_is_kept() {
    let root = TempDir::new().unwrap();
    write_issue(
        root.path(),
        "bmtnabe_1914-09_01",
        &mets(
            "5",
            "6",
            "1914-09-01",
            &text_item("c001", "Hallo", None),
            &text_div(
                "c001",
                &[
                    ("Copy", &[("ALTO00001", "P1_TB00001")]),
                    ("Copy", &[("ALTO00001", "P1_TB00001")]),
                ],
            ),
        ),
        &[(
            "bmtnabe_1914-09_01_0001.alto.xml",
            alto(&[("P1_TB00001", &["Hallo"])]),
        )],
    );

    let report = run_batch(root.path(), &sequential()).unwrap();
    assert_eq!(report.records[0].copy, "Hallo Hallo");
    assert_eq!(
        report
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::DuplicateRole)
            .count(),
        1
    );
}
