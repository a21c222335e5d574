//! Emission tests against a scratch output layout.

use std::fs;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::Reader;
use quick_xml::events::Event;
use tempfile::TempDir;

use awdrip_catalog::TranslationCatalog;
use awdrip_emit::{
    Admission, DocumentEmitter, EmitError, EmitOutcome, ErrorScope, OutputLayout, ResolveError,
    SourceContext,
};
use awdrip_model::{
    Destination, FieldStrategy, FieldTemplate, InputRecord, OutputTemplate, WorkStatus,
};

fn fixed_clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 7)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn catalog() -> TranslationCatalog {
    TranslationCatalog::build(
        [
            ("100".to_string(), Destination::parse("UNITX")),
            ("200".to_string(), Destination::parse("UNITY")),
            ("300".to_string(), Destination::parse("Exclude")),
        ],
        [(
            "100".to_string(),
            WorkStatus {
                work_type: "CLAIM".to_string(),
                status: "OPEN".to_string(),
            },
        )],
    )
    .0
}

fn record(system_id: &str, policy: &str, name: &str) -> InputRecord {
    let headers: Arc<[String]> = ["SystemID", "PolicyNumber", "InsuredName"]
        .iter()
        .map(|h| (*h).to_string())
        .collect();
    InputRecord::new(
        headers,
        vec![system_id.to_string(), policy.to_string(), name.to_string()],
    )
}

fn unit_soon_template() -> OutputTemplate {
    OutputTemplate::new(vec![
        FieldTemplate::new(
            "UNIT",
            FieldStrategy::Unit {
                fallback_column: None,
            },
        ),
        FieldTemplate::new(
            "SOON",
            FieldStrategy::Literal {
                value: "Y".to_string(),
            },
        ),
    ])
}

fn full_template() -> OutputTemplate {
    OutputTemplate::new(vec![
        FieldTemplate::new(
            "POLN",
            FieldStrategy::Copy {
                column: "PolicyNumber".to_string(),
            },
        ),
        FieldTemplate::new(
            "NAME",
            FieldStrategy::Copy {
                column: "InsuredName".to_string(),
            },
        ),
        FieldTemplate::new("STAT", FieldStrategy::Status),
    ])
}

struct Fixture {
    _root: TempDir,
    layout: OutputLayout,
}

fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let layout = OutputLayout::dated(&root.path().join("staging"), &root.path().join("out"), date);
    layout.ensure().unwrap();
    Fixture { _root: root, layout }
}

fn source() -> SourceContext {
    SourceContext {
        dir_name: "Claims".to_string(),
        file_name: "batch.csv".to_string(),
    }
}

fn read_fields(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut fields = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Empty(node) if node.name().as_ref() == b"field" => {
                let mut name = String::new();
                let mut value = String::new();
                for attr in node.attributes() {
                    let attr = attr.unwrap();
                    let raw = std::str::from_utf8(&attr.value).unwrap();
                    let text = quick_xml::escape::unescape(raw).unwrap().into_owned();
                    match attr.key.as_ref() {
                        b"name" => name = text,
                        b"value" => value = text,
                        _ => {}
                    }
                }
                fields.push((name, value));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    fields
}

fn written(outcome: EmitOutcome) -> awdrip_emit::EmittedDocument {
    match outcome {
        EmitOutcome::Written(doc) => doc,
        EmitOutcome::Ignored(reason) => panic!("expected a document, row was ignored: {reason:?}"),
    }
}

#[test]
fn policy_not_available_is_ignored() {
    let fx = fixture();
    let catalog = catalog();
    let template = unit_soon_template();
    let mut emitter = DocumentEmitter::new(&template, &catalog, &fx.layout, source());

    let outcome = emitter.emit(&record("100", " NA ", "Smith")).unwrap();
    assert_eq!(outcome, EmitOutcome::Ignored(Admission::PolicyNotAvailable));
    assert_eq!(emitter.sequence(), 0);
    assert_eq!(fs::read_dir(&fx.layout.output_dir).unwrap().count(), 0);
}

#[test]
fn excluded_system_is_ignored() {
    let fx = fixture();
    let catalog = catalog();
    let template = unit_soon_template();
    let mut emitter = DocumentEmitter::new(&template, &catalog, &fx.layout, source());

    let outcome = emitter.emit(&record("300", "P1", "Smith")).unwrap();
    assert_eq!(outcome, EmitOutcome::Ignored(Admission::Excluded));
}

#[test]
fn unknown_system_is_ignored_regardless_of_policy() {
    let fx = fixture();
    let catalog = catalog();
    let template = unit_soon_template();
    let mut emitter = DocumentEmitter::new(&template, &catalog, &fx.layout, source());

    for policy in ["P1", "NA", ""] {
        let outcome = emitter.emit(&record("999", policy, "Smith")).unwrap();
        assert_eq!(outcome, EmitOutcome::Ignored(Admission::UnknownSystemId));
    }
    assert_eq!(fs::read_dir(&fx.layout.staging_dir).unwrap().count(), 0);
}

#[test]
fn accepted_row_is_staged_and_published() {
    let fx = fixture();
    let catalog = catalog();
    let template = unit_soon_template();
    let mut emitter =
        DocumentEmitter::new(&template, &catalog, &fx.layout, source()).with_clock(fixed_clock);

    let doc = written(emitter.emit(&record(" 100 ", "P1", "Smith")).unwrap());
    assert_eq!(doc.sequence, 1);
    let expected_name = "AWDRIP_Claims_batch.csv_2024-03-07-09-30-00_1.xml";
    assert_eq!(doc.output_path, fx.layout.output_dir.join(expected_name));
    assert_eq!(doc.staging_path, fx.layout.staging_dir.join(expected_name));
    assert!(fx.layout.staging_dir.ends_with("03-07-2024"));

    let published = fs::read_to_string(&doc.output_path).unwrap();
    let staged = fs::read_to_string(&doc.staging_path).unwrap();
    assert_eq!(published, staged);
    assert!(published.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert_eq!(
        read_fields(&published),
        vec![
            ("UNIT".to_string(), "UNITX".to_string()),
            ("SOON".to_string(), "Y".to_string()),
        ]
    );
}

#[test]
fn values_are_trimmed_and_blanks_omitted() {
    let fx = fixture();
    let catalog = catalog();
    let template = full_template();
    let mut emitter = DocumentEmitter::new(&template, &catalog, &fx.layout, source());

    let doc = written(emitter.emit(&record("100", "P1", "   ")).unwrap());
    let fields = read_fields(&fs::read_to_string(&doc.output_path).unwrap());
    assert_eq!(
        fields,
        vec![
            ("POLN".to_string(), "P1".to_string()),
            ("STAT".to_string(), "OPEN".to_string()),
        ]
    );

    let doc = written(emitter.emit(&record("100", "P2", "  O'Brien & Co  ")).unwrap());
    let fields = read_fields(&fs::read_to_string(&doc.output_path).unwrap());
    assert!(fields.contains(&("NAME".to_string(), "O'Brien & Co".to_string())));
}

#[test]
fn failed_resolution_still_consumes_a_sequence_number() {
    let fx = fixture();
    let catalog = catalog();
    let template = full_template();
    let mut emitter =
        DocumentEmitter::new(&template, &catalog, &fx.layout, source()).with_clock(fixed_clock);

    let first = written(emitter.emit(&record("100", "P1", "A")).unwrap());

    let err = emitter.emit(&record("200", "P2", "B")).unwrap_err();
    assert_eq!(err.scope(), ErrorScope::Row);
    assert!(matches!(
        err,
        EmitError::Resolve(ResolveError::MissingStatus { .. })
    ));
    assert_eq!(emitter.sequence(), 2);

    let third = written(emitter.emit(&record("100", "P3", "C")).unwrap());
    assert_eq!(first.sequence, 1);
    assert_eq!(third.sequence, 3);
    assert!(third.output_path.to_string_lossy().ends_with("_3.xml"));

    // the failed row left nothing behind
    assert_eq!(fs::read_dir(&fx.layout.staging_dir).unwrap().count(), 2);
    assert_eq!(fs::read_dir(&fx.layout.output_dir).unwrap().count(), 2);
}

#[test]
fn resolution_is_idempotent() {
    let fx = fixture();
    let catalog = catalog();
    let template = full_template();
    let emitter = DocumentEmitter::new(&template, &catalog, &fx.layout, source());
    let rec = record("100", "P1", "Smith");

    let first = emitter.build_document(&rec, "100").unwrap();
    let second = emitter.build_document(&rec, "100").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.get("NAME"), Some("Smith"));
}

#[test]
fn missing_output_dir_is_a_file_level_failure() {
    let fx = fixture();
    let catalog = catalog();
    let template = unit_soon_template();
    let layout = OutputLayout {
        staging_dir: fx.layout.staging_dir.clone(),
        output_dir: fx.layout.output_dir.join("missing"),
    };
    let mut emitter = DocumentEmitter::new(&template, &catalog, &layout, source());

    let err = emitter.emit(&record("100", "P1", "Smith")).unwrap_err();
    assert_eq!(err.scope(), ErrorScope::File);
    assert!(matches!(err, EmitError::Publish { .. }));
}

#[test]
fn existing_documents_are_never_overwritten() {
    let fx = fixture();
    let catalog = catalog();
    let template = full_template();
    let mut first =
        DocumentEmitter::new(&template, &catalog, &fx.layout, source()).with_clock(fixed_clock);
    let doc = written(first.emit(&record("100", "PA", "First")).unwrap());

    // same dir name, file name, second and sequence
    let mut clash =
        DocumentEmitter::new(&template, &catalog, &fx.layout, source()).with_clock(fixed_clock);
    let err = clash.emit(&record("100", "PB", "Second")).unwrap_err();
    assert_eq!(err.scope(), ErrorScope::File);
    assert!(matches!(err, EmitError::Stage { .. }));

    // a fresh staging folder still must not replace the published copy
    let other_staging = OutputLayout {
        staging_dir: fx.layout.staging_dir.join("other"),
        output_dir: fx.layout.output_dir.clone(),
    };
    other_staging.ensure().unwrap();
    let mut clash = DocumentEmitter::new(&template, &catalog, &other_staging, source())
        .with_clock(fixed_clock);
    let err = clash.emit(&record("100", "PB", "Second")).unwrap_err();
    assert_eq!(err.scope(), ErrorScope::File);
    assert!(matches!(err, EmitError::Publish { .. }));

    for path in [&doc.staging_path, &doc.output_path] {
        let fields = read_fields(&fs::read_to_string(path).unwrap());
        assert!(fields.contains(&("POLN".to_string(), "PA".to_string())));
    }
}
