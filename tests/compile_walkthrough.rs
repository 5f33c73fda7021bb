//! End-to-end: parse, compile and package the lighthouse fixture through the
//! public API.
//!
//! Run with: cargo test --test compile_walkthrough

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkthrough::config::{CONFIG_FILE_NAME, load_config_for};
use walkthrough::generate::{self, CheckboxPlace, dom_id};
use walkthrough::package::{self, PackageError};
use walkthrough::{ChecklistViews, ParseError, parse};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/walkthrough")
}

/// Copy the fixture into a temp dir so tests can add or remove files.
fn fixture_copy() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::copy(
        fixture_dir().join("lighthouse.wt"),
        tmp.path().join("lighthouse.wt"),
    )
    .unwrap();
    fs::create_dir(tmp.path().join("images")).unwrap();
    for image in ["boat.png", "valves.png"] {
        fs::copy(
            fixture_dir().join("images").join(image),
            tmp.path().join("images").join(image),
        )
        .unwrap();
    }
    tmp
}

#[test]
fn fixture_parses_into_three_sections() {
    let text = fs::read_to_string(fixture_dir().join("lighthouse.wt")).unwrap();
    let parsed = parse(&text).unwrap();
    let doc = &parsed.document;

    assert!(parsed.diagnostics.is_empty());
    assert_eq!(doc.game_short_name, "lighthouse");
    assert_eq!(doc.version, "2");
    let names: Vec<&str> = doc.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Beach", "Tower", "Epilogue"]);
    assert_eq!(
        doc.referenced_images,
        vec![
            PathBuf::from("images/boat.png"),
            PathBuf::from("images/valves.png")
        ]
    );

    let views = ChecklistViews::from_document(doc);
    assert_eq!(views.total_items(), 7);
    let types: Vec<&str> = views
        .by_type
        .iter()
        .map(|r| r.declared_type.as_str())
        .collect();
    assert_eq!(types, vec!["note", "shell", "lamp"]);
}

#[test]
fn compile_then_build() {
    let tmp = fixture_copy();
    let input = tmp.path().join("lighthouse.wt");
    fs::write(
        tmp.path().join(CONFIG_FILE_NAME),
        "[labels]\nby_type_heading = \"Everything\"\n",
    )
    .unwrap();
    let config = load_config_for(&input).unwrap();

    let html_path = tmp.path().join("lighthouse.html");
    let parsed = generate::compile(&input, &html_path, &config).unwrap();
    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<h2>Everything</h2>"));
    for (_, _, item) in parsed.document.checklist_references() {
        let id = dom_id(&item.item_id, CheckboxPlace::Inline);
        assert!(html.contains(&format!(r#"id="{id}""#)), "missing {id}");
    }

    let zip_path = tmp.path().join("lighthouse.zip");
    package::build(&input, &zip_path, &config).unwrap();
    let archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["images/boat.png", "images/valves.png", "lighthouse.html"]
    );
}

#[test]
fn build_refuses_missing_images() {
    let tmp = fixture_copy();
    fs::remove_file(tmp.path().join("images/boat.png")).unwrap();
    let result = package::build(
        &tmp.path().join("lighthouse.wt"),
        &tmp.path().join("lighthouse.zip"),
        &Default::default(),
    );
    assert!(matches!(result, Err(PackageError::MissingImage(_))));
}

#[test]
fn unterminated_spoiler_is_fatal() {
    let err = parse("\\section{Cave}\n\\begin{spoiler}\nhidden\n").unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedBlock { line: 2, .. }));
    assert_eq!(err.to_string(), "unterminated spoiler block opened on line 2");
}
