use std::fs;
use std::path::{Path, PathBuf};

use awdrip_catalog::{CatalogError, ReferenceDocument};
use awdrip_model::{Destination, WorkStatus};

const REFERENCE: &str = r#"
[destinations]
"100" = "UNITX"
"200" = " UNITY "
"300" = "Exclude"

[[status]]
system_id = "100"
work_type = "CLAIM"
status = "OPEN"

[[status]]
system_id = "100"
work_type = "CLAIM"
status = "CLOSED"

[[status]]
system_id = " 200 "
work_type = "POLICY"
status = "NEW"

[[source]]
id = "claims"
path = "inbound/claims"

[[source]]
id = "policies"
path = "/data/policies"
"#;

#[test]
fn loads_tables_and_sources() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("SystemIdTranslation.toml");
    fs::write(&path, REFERENCE).expect("write reference");

    let reference = ReferenceDocument::load(&path).expect("load reference");
    let catalog = &reference.catalog;
    assert_eq!(
        catalog.destination("100"),
        Some(&Destination::Unit("UNITX".to_string()))
    );
    assert_eq!(
        catalog.destination("200"),
        Some(&Destination::Unit("UNITY".to_string()))
    );
    assert_eq!(catalog.destination("300"), Some(&Destination::Excluded));
    assert_eq!(catalog.destination("400"), None);
    assert_eq!(
        catalog.status("100"),
        Some(&WorkStatus {
            work_type: "CLAIM".to_string(),
            status: "OPEN".to_string(),
        })
    );
    assert_eq!(catalog.status("200").map(|s| s.status.as_str()), Some("NEW"));

    let ids: Vec<_> = reference.sources.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["claims", "policies"]);
    assert_eq!(reference.sources[0].path, dir.path().join("inbound/claims"));
    assert_eq!(reference.sources[1].path, PathBuf::from("/data/policies"));
}

#[test]
fn duplicate_source_ids_are_rejected() {
    let text = r#"
[[source]]
id = "claims"
path = "/a"

[[source]]
id = " claims "
path = "/b"
"#;
    let err = ReferenceDocument::parse(text, Path::new("ref.toml")).expect_err("duplicate");
    assert!(matches!(err, CatalogError::DuplicateSource { ref id, .. } if id == "claims"));
}

#[test]
fn destination_ids_colliding_after_trim_are_rejected() {
    let text = "[destinations]\n\"100\" = \"A\"\n\" 100\" = \"B\"\n";
    let err = ReferenceDocument::parse(text, Path::new("ref.toml")).expect_err("duplicate");
    assert!(matches!(err, CatalogError::InvalidReference { .. }));
}

#[test]
fn empty_document_is_an_empty_catalog() {
    let reference = ReferenceDocument::parse("", Path::new("ref.toml")).expect("parse");
    assert_eq!(reference.catalog.destination_count(), 0);
    assert_eq!(reference.catalog.status_count(), 0);
    assert!(reference.sources.is_empty());
}

#[test]
fn status_rows_require_all_columns() {
    let text = "[[status]]\nsystem_id = \"100\"\nwork_type = \"CLAIM\"\n";
    let err = ReferenceDocument::parse(text, Path::new("ref.toml")).expect_err("missing status");
    assert!(matches!(err, CatalogError::Toml { .. }));
}
