//! The parsed walkthrough document.
//!
//! These types are what the parser produces and what the aggregator and
//! renderer consume. They are serialized as-is by `walkthrough dump`, so
//! the JSON shape follows the field names here.

use crate::declarations::DeclarationRegistry;
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_VERSION: &str = "1";
pub const DEFAULT_GAME_SHORT_NAME: &str = "untitled";
pub const DEFAULT_TITLE: &str = "Walkthrough";
pub const DEFAULT_SPOILER_TITLE: &str = "Click to show solution";
/// Name given to a section closed by `\checklist` with no `\section` before it.
pub const UNNAMED_SECTION: &str = "Unnamed section";

/// A collectible registered by an inline `[type|content|rollup]` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    /// Inline label, including a sentence-final `.` glued to the reference.
    pub content: String,
    /// Label used in checklists and rollups.
    pub rollup_label: String,
    /// Document-unique `{type}{n}` key.
    pub item_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphChild {
    Text(String),
    Image(PathBuf),
    Link(String),
    ChecklistReference {
        declared_type: String,
        item: ChecklistItem,
    },
    InlineList(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentItem {
    SectionHeading {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        short_name: Option<String>,
    },
    Paragraph(Vec<ParagraphChild>),
    UnorderedList(Vec<String>),
    OrderedList(Vec<String>),
    /// Collapsible block. Children are only `Text`, `Image` or `InlineList`.
    Spoiler {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<ParagraphChild>,
    },
}

/// A run of content closed by a `\checklist` directive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChecklistSection {
    pub name: String,
    pub items: Vec<DocumentItem>,
}

impl ChecklistSection {
    pub fn new(name: impl Into<String>, items: Vec<DocumentItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Checklist references in this section, in document order.
    pub fn checklist_references(&self) -> impl Iterator<Item = (&str, &ChecklistItem)> {
        self.items
            .iter()
            .filter_map(|item| match item {
                DocumentItem::Paragraph(children) => Some(children),
                _ => None,
            })
            .flatten()
            .filter_map(|child| match child {
                ParagraphChild::ChecklistReference {
                    declared_type,
                    item,
                } => Some((declared_type.as_str(), item)),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkthroughDocument {
    /// Storage version; saved checkbox state is discarded when it changes.
    pub version: String,
    pub title: String,
    /// Namespaces the browser storage keys.
    pub game_short_name: String,
    pub default_spoiler_title: String,
    pub declarations: DeclarationRegistry,
    pub sections: Vec<ChecklistSection>,
    /// Images referenced by the document, relative to the source file.
    pub referenced_images: Vec<PathBuf>,
}

impl Default for WalkthroughDocument {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            title: DEFAULT_TITLE.to_string(),
            game_short_name: DEFAULT_GAME_SHORT_NAME.to_string(),
            default_spoiler_title: DEFAULT_SPOILER_TITLE.to_string(),
            declarations: DeclarationRegistry::new(),
            sections: Vec::new(),
            referenced_images: Vec::new(),
        }
    }
}

impl WalkthroughDocument {
    /// All checklist references with the name of their section.
    pub fn checklist_references(&self) -> impl Iterator<Item = (&str, &str, &ChecklistItem)> {
        self.sections.iter().flat_map(|section| {
            section
                .checklist_references()
                .map(move |(declared_type, item)| (section.name.as_str(), declared_type, item))
        })
    }

    pub fn checklist_item_count(&self) -> usize {
        self.checklist_references().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(content: &str, id: &str) -> ChecklistItem {
        ChecklistItem {
            content: content.to_string(),
            rollup_label: content.to_string(),
            item_id: id.to_string(),
        }
    }

    fn reference(declared_type: &str, content: &str, id: &str) -> ParagraphChild {
        ParagraphChild::ChecklistReference {
            declared_type: declared_type.to_string(),
            item: item(content, id),
        }
    }

    #[test]
    fn default_document_has_storage_keys() {
        let doc = WalkthroughDocument::default();
        assert_eq!(doc.version, "1");
        assert_eq!(doc.game_short_name, "untitled");
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn references_skip_spoilers_and_lists() {
        let section = ChecklistSection::new(
            "Cave",
            vec![
                DocumentItem::UnorderedList(vec!["[gem|x]".into()]),
                DocumentItem::Paragraph(vec![
                    ParagraphChild::Text("Find".into()),
                    reference("gem", "Shiny Gem", "gem1"),
                ]),
                DocumentItem::Spoiler {
                    title: None,
                    children: vec![ParagraphChild::Text("[gem|y]".into())],
                },
            ],
        );

        let refs: Vec<_> = section.checklist_references().collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0, "gem");
        assert_eq!(refs[0].1.item_id, "gem1");
    }

    #[test]
    fn document_references_carry_section_names() {
        let first = ChecklistSection::new(
            "Cave",
            vec![DocumentItem::Paragraph(vec![reference("gem", "A", "gem1")])],
        );
        let second = ChecklistSection::new(
            "Lake",
            vec![DocumentItem::Paragraph(vec![
                reference("gem", "B", "gem2"),
                reference("tape", "C", "tape1"),
            ])],
        );
        let doc = WalkthroughDocument {
            sections: vec![first, second],
            ..Default::default()
        };

        let sections: Vec<&str> = doc.checklist_references().map(|(s, _, _)| s).collect();
        assert_eq!(sections, vec!["Cave", "Lake", "Lake"]);
        assert_eq!(doc.checklist_item_count(), 3);
    }

    #[test]
    fn serializes_tagged_children() {
        let child = reference("gem", "Shiny Gem", "gem1");
        let json = serde_json::to_value(&child).unwrap();
        assert_eq!(json["checklist_reference"]["declared_type"], "gem");
        assert_eq!(json["checklist_reference"]["item"]["item_id"], "gem1");
    }
}
