//! Checklist rollups derived from a parsed document.
//!
//! The renderer shows collectibles three times: inline where they are
//! mentioned, in a checklist after each section, and in end-of-page rollups.
//! This module computes the two cross-cutting views behind the last two:
//!
//! - **by section**: for each section with at least one reference, its items
//!   grouped by declared type (types in first-encountered order);
//! - **by type**: for each declared type, every item in the document paired
//!   with the name of the section it came from.
//!
//! Both are pure functions of the [`WalkthroughDocument`].

use crate::document::{ChecklistItem, ChecklistSection, WalkthroughDocument};
use serde::Serialize;

/// Items of one declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistGroup {
    pub declared_type: String,
    pub items: Vec<ChecklistItem>,
}

/// Checklist for a single section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionChecklist {
    pub section: String,
    pub groups: Vec<ChecklistGroup>,
}

impl SectionChecklist {
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupEntry {
    pub section: String,
    pub item: ChecklistItem,
}

/// Every item of one declared type across the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRollup {
    pub declared_type: String,
    pub entries: Vec<RollupEntry>,
}

/// Insert-ordered grouping helper: returns the group for `key`, creating it
/// at the end when missing.
fn group_for<'a, T>(
    groups: &'a mut Vec<T>,
    key: &str,
    key_of: impl Fn(&T) -> &str,
    create: impl FnOnce() -> T,
) -> &'a mut T {
    let index = match groups.iter().position(|g| key_of(g) == key) {
        Some(index) => index,
        None => {
            groups.push(create());
            groups.len() - 1
        }
    };
    &mut groups[index]
}

/// Items of one section grouped by type, types in first-encountered order.
pub fn section_groups(section: &ChecklistSection) -> Vec<ChecklistGroup> {
    let mut groups: Vec<ChecklistGroup> = Vec::new();
    for (declared_type, item) in section.checklist_references() {
        group_for(
            &mut groups,
            declared_type,
            |g| g.declared_type.as_str(),
            || ChecklistGroup {
                declared_type: declared_type.to_string(),
                items: Vec::new(),
            },
        )
        .items
        .push(item.clone());
    }
    groups
}

/// Items grouped by type, per section. Sections without references are skipped.
pub fn by_section(doc: &WalkthroughDocument) -> Vec<SectionChecklist> {
    doc.sections
        .iter()
        .filter_map(|section| {
            let groups = section_groups(section);
            (!groups.is_empty()).then(|| SectionChecklist {
                section: section.name.clone(),
                groups,
            })
        })
        .collect()
}

/// Items grouped by type across the whole document, in document order.
pub fn by_type(doc: &WalkthroughDocument) -> Vec<TypeRollup> {
    let mut rollups: Vec<TypeRollup> = Vec::new();
    for (section, declared_type, item) in doc.checklist_references() {
        group_for(
            &mut rollups,
            declared_type,
            |r| r.declared_type.as_str(),
            || TypeRollup {
                declared_type: declared_type.to_string(),
                entries: Vec::new(),
            },
        )
        .entries
        .push(RollupEntry {
            section: section.to_string(),
            item: item.clone(),
        });
    }
    rollups
}

/// Both views, computed together for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistViews {
    pub by_section: Vec<SectionChecklist>,
    pub by_type: Vec<TypeRollup>,
}

impl ChecklistViews {
    pub fn from_document(doc: &WalkthroughDocument) -> Self {
        Self {
            by_section: by_section(doc),
            by_type: by_type(doc),
        }
    }

    pub fn total_items(&self) -> usize {
        self.by_type.iter().map(|r| r.entries.len()).sum()
    }
}
