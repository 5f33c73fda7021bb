//! Shared test utilities.
//!
//! Fixture loading plus small extractors over the parsed document, so tests
//! can assert on identifiers and section names without walking the tree by
//! hand.
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let doc = parse(&fixture_text()).unwrap().document;
//! assert_eq!(section_names(&doc), vec!["Beach", "Tower", "Epilogue"]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::document::{ChecklistItem, ParagraphChild, WalkthroughDocument};

// =========================================================================
// Fixture setup
// =========================================================================

/// Directory holding `lighthouse.wt` and its images.
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/walkthrough")
}

pub fn fixture_text() -> String {
    std::fs::read_to_string(fixture_dir().join("lighthouse.wt")).unwrap()
}

/// Copy the fixture directory to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate (delete images, add a
/// `config.toml`) without affecting other tests.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir_recursive(&fixture_dir(), tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Extractors
// =========================================================================

/// All item ids in document order.
pub fn item_ids(doc: &WalkthroughDocument) -> Vec<String> {
    doc.checklist_references()
        .map(|(_, _, item)| item.item_id.clone())
        .collect()
}

pub fn section_names(doc: &WalkthroughDocument) -> Vec<&str> {
    doc.sections.iter().map(|s| s.name.as_str()).collect()
}

/// Unwrap a `ChecklistReference` child, panicking on anything else.
pub fn reference_of(child: &ParagraphChild) -> (&str, &ChecklistItem) {
    match child {
        ParagraphChild::ChecklistReference {
            declared_type,
            item,
        } => (declared_type.as_str(), item),
        other => panic!("expected checklist reference, got {other:?}"),
    }
}
