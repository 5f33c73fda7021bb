//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output describes the walkthrough, not the files. Sections lead with their
//! positional index and name, followed by indented per-type counts. Paths
//! only appear where the user asked for a file to be written.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! The Lighthouse Keeper: 100% Walkthrough (lighthouse, version 2)
//! 001 Beach (3 items)
//!     Keeper's Notes: 1
//!     Painted Shells: 2
//! 002 Tower (3 items)
//!     Lamp Parts: 1
//!     Keeper's Notes: 1
//!     Painted Shells: 1
//!
//! Declarations
//!     note: Keeper's Note / Keeper's Notes
//!
//! Images
//!     images/boat.png
//!
//! Diagnostics
//!     line 12: warning: line inside ul block does not start with \item
//!
//! 2 sections, 6 items, 0 errors, 1 warning
//! ```
//!
//! ## Compile / Build
//!
//! ```text
//! lighthouse.wt → lighthouse.html (7 items, 0 errors, 1 warning)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::aggregate::section_groups;
use crate::diagnostic::{Diagnostic, Severity};
use crate::document::{ChecklistSection, WalkthroughDocument};
use crate::parser::Parsed;
use std::path::Path;

/// Shown for the trailing section, which has no name.
const TRAILING_SECTION: &str = "(after last checklist)";

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// `3 items, 0 errors, 1 warning`
fn format_counts(items: usize, diagnostics: &[Diagnostic]) -> String {
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity() == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;
    format!(
        "{}, {}, {}",
        plural(items, "item", "items"),
        plural(errors, "error", "errors"),
        plural(warnings, "warning", "warnings")
    )
}

/// Section header plus one line per declared type, using the plural label.
///
/// ```text
/// 001 Beach (3 items)
///     Painted Shells: 2
/// ```
fn section_lines(index: usize, section: &ChecklistSection, doc: &WalkthroughDocument) -> Vec<String> {
    let groups = section_groups(section);
    let total: usize = groups.iter().map(|g| g.items.len()).sum();
    let name = if section.name.is_empty() {
        TRAILING_SECTION
    } else {
        section.name.as_str()
    };

    let mut lines = vec![format!(
        "{} {} ({})",
        format_index(index),
        name,
        plural(total, "item", "items")
    )];
    for group in &groups {
        let label = doc
            .declarations
            .lookup(&group.declared_type)
            .map_or(group.declared_type.as_str(), |d| d.plural.as_str());
        lines.push(format!("{}{}: {}", indent(1), label, group.items.len()));
    }
    lines
}

/// One line per diagnostic, in source order.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.to_string()).collect()
}

/// Format `check` output: document outline, declarations, images, diagnostics.
pub fn format_check_output(parsed: &Parsed) -> Vec<String> {
    let doc = &parsed.document;
    let mut lines = vec![format!(
        "{} ({}, version {})",
        doc.title, doc.game_short_name, doc.version
    )];

    for (i, section) in doc.sections.iter().enumerate() {
        lines.extend(section_lines(i + 1, section, doc));
    }

    if !doc.declarations.is_empty() {
        lines.push(String::new());
        lines.push("Declarations".to_string());
        for declaration in doc.declarations.iter() {
            lines.push(format!(
                "{}{}: {} / {}",
                indent(1),
                declaration.name,
                declaration.display_name,
                declaration.plural
            ));
        }
    }

    if !doc.referenced_images.is_empty() {
        lines.push(String::new());
        lines.push("Images".to_string());
        for image in &doc.referenced_images {
            lines.push(format!("{}{}", indent(1), image.display()));
        }
    }

    if !parsed.diagnostics.is_empty() {
        lines.push(String::new());
        lines.push("Diagnostics".to_string());
        for line in format_diagnostics(&parsed.diagnostics) {
            lines.push(format!("{}{}", indent(1), line));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        plural(doc.sections.len(), "section", "sections"),
        format_counts(doc.checklist_item_count(), &parsed.diagnostics)
    ));
    lines
}

pub fn print_check_output(parsed: &Parsed) {
    for line in format_check_output(parsed) {
        println!("{}", line);
    }
}

/// Format the one-line summary printed by `compile`, `build` and `dump`.
pub fn format_written_output(input: &Path, output: &Path, parsed: &Parsed) -> Vec<String> {
    vec![format!(
        "{} → {} ({})",
        input.display(),
        output.display(),
        format_counts(parsed.document.checklist_item_count(), &parsed.diagnostics)
    )]
}

pub fn print_written_output(input: &Path, output: &Path, parsed: &Parsed) {
    for line in format_written_output(input, output, parsed) {
        println!("{}", line);
    }
}
