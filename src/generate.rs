//! HTML page generation.
//!
//! Turns a parsed [`WalkthroughDocument`] into one self-contained HTML page:
//! styles and script are inlined, images are referenced by their relative
//! paths so the page works next to its image directory (or inside the zip
//! produced by [`crate::package`]).
//!
//! ## Page Layout
//!
//! - **Header**: walkthrough title and the dark mode switch
//! - **Sections**: prose, lists, spoilers (`<details>`) and inline checkboxes
//!   for every checklist reference
//! - **Section checklists**: after every section, its items grouped by type
//! - **Rollups**: at the end of the page, every item grouped by section and
//!   then by type
//!
//! ## Checkbox Identity
//!
//! Every checklist item appears up to four times. All copies share
//! `data-item="{item_id}"` and get distinct DOM ids derived from it:
//!
//! | Place             | DOM id                   |
//! |-------------------|--------------------------|
//! | inline in prose   | `cb-{id}`                |
//! | section checklist | `cb-{id}-checklist`      |
//! | by-section rollup | `cb-{id}-by-section`     |
//! | by-type rollup    | `cb-{id}-by-type`        |
//!
//! `static/walkthrough.js` keeps the copies in sync and persists state in
//! `localStorage` keyed by `game_short_name`. When the stored `version`
//! differs from the page's, saved state for that game is discarded.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::aggregate::{ChecklistGroup, ChecklistViews, section_groups};
use crate::config::{self, LabelsConfig, WalkthroughConfig};
use crate::declarations::DeclarationRegistry;
use crate::diagnostic::ParseError;
use crate::document::{ChecklistItem, DocumentItem, ParagraphChild, WalkthroughDocument};
use crate::parser::{Parsed, parse};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/walkthrough.js");

/// Where a checkbox is rendered. Decides its DOM id suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxPlace {
    Inline,
    Checklist,
    BySection,
    ByType,
}

impl CheckboxPlace {
    fn suffix(self) -> &'static str {
        match self {
            CheckboxPlace::Inline => "",
            CheckboxPlace::Checklist => "-checklist",
            CheckboxPlace::BySection => "-by-section",
            CheckboxPlace::ByType => "-by-type",
        }
    }
}

/// DOM id of the checkbox for `item_id` at `place`.
pub fn dom_id(item_id: &str, place: CheckboxPlace) -> String {
    format!("cb-{item_id}{}", place.suffix())
}

/// Parse `input`, render it, and write the page to `output`.
///
/// Returns the parse result so callers can report diagnostics.
pub fn compile(
    input: &Path,
    output: &Path,
    config: &WalkthroughConfig,
) -> Result<Parsed, GenerateError> {
    let text = fs::read_to_string(input)?;
    let parsed = parse(&text)?;
    let page = render(&parsed.document, config);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, page.into_string())?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        items = parsed.document.checklist_item_count(),
        "compiled walkthrough"
    );
    Ok(parsed)
}

/// Render the full page for `doc`.
pub fn render(doc: &WalkthroughDocument, config: &WalkthroughConfig) -> Markup {
    let color_css = config::generate_color_css(&config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);
    let views = ChecklistViews::from_document(doc);
    let labels = &config.labels;

    let content = html! {
        (page_header(&doc.title, labels))
        main.walkthrough {
            @for section in &doc.sections {
                section.walkthrough-section {
                    @for item in &section.items {
                        (render_item(item, doc))
                    }
                    (section_checklist(&section_groups(section), &doc.declarations, labels))
                }
            }
        }
        @if !views.by_type.is_empty() {
            (rollups(&views, &doc.declarations, labels))
        }
        script { (PreEscaped(JS)) }
    };

    base_document(doc, &css, content)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(doc: &WalkthroughDocument, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (doc.title) }
                style { (PreEscaped(css)) }
            }
            body data-game=(doc.game_short_name) data-version=(doc.version) {
                (content)
            }
        }
    }
}

fn page_header(title: &str, labels: &LabelsConfig) -> Markup {
    html! {
        header.page-header {
            h1 { (title) }
            label.dark-toggle {
                input type="checkbox" id="dark-mode";
                " " (labels.dark_mode_toggle)
            }
        }
    }
}

fn render_item(item: &DocumentItem, doc: &WalkthroughDocument) -> Markup {
    match item {
        DocumentItem::SectionHeading { title, short_name } => html! {
            h2.section-heading id=[short_name.as_deref()] { (title) }
        },
        DocumentItem::Paragraph(children) => html! {
            p {
                @for (idx, child) in children.iter().enumerate() {
                    @if idx > 0 { " " }
                    (inline_child(child))
                }
            }
        },
        DocumentItem::UnorderedList(entries) => html! {
            ul { @for entry in entries { li { (entry) } } }
        },
        DocumentItem::OrderedList(entries) => html! {
            ol { @for entry in entries { li { (entry) } } }
        },
        DocumentItem::Spoiler { title, children } => {
            let summary = title.as_deref().unwrap_or(&doc.default_spoiler_title);
            html! {
                details.spoiler {
                    summary { (summary) }
                    @for child in children {
                        (spoiler_child(child))
                    }
                }
            }
        }
    }
}

fn image(path: &Path) -> Markup {
    let src = path.to_string_lossy().replace('\\', "/");
    html! {
        img src=(src) alt="" loading="lazy";
    }
}

fn inline_child(child: &ParagraphChild) -> Markup {
    match child {
        ParagraphChild::Text(text) => html! { (text) },
        ParagraphChild::Image(path) => image(path),
        ParagraphChild::Link(url) if is_linkable(url) => html! {
            a href=(url) target="_blank" rel="noopener" { (url) }
        },
        ParagraphChild::Link(url) => html! { (url) },
        ParagraphChild::ChecklistReference { item, .. } => {
            checkbox(item, CheckboxPlace::Inline, &item.content)
        }
        ParagraphChild::InlineList(entries) => html! {
            span.inline-list { (entries.join(", ")) }
        },
    }
}

/// Only http(s) and scheme-less relative URLs become live links.
fn is_linkable(url: &str) -> bool {
    let scheme_end = url.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(at) if url[at..].starts_with(':') => {
            let scheme = &url[..at];
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        }
        _ => true,
    }
}

/// Spoiler children are block level: one paragraph per text line.
fn spoiler_child(child: &ParagraphChild) -> Markup {
    match child {
        ParagraphChild::Text(text) => html! { p { (text) } },
        ParagraphChild::Image(path) => html! { figure { (image(path)) } },
        ParagraphChild::InlineList(entries) => html! {
            ul { @for entry in entries { li { (entry) } } }
        },
        other => inline_child(other),
    }
}

/// A labelled checkbox bound to `item` through `data-item`.
fn checkbox(item: &ChecklistItem, place: CheckboxPlace, label: &str) -> Markup {
    let id = dom_id(&item.item_id, place);
    html! {
        span.checklist-item {
            input type="checkbox" id=(id) data-item=(item.item_id);
            label for=(id) { (label) }
        }
    }
}

/// Group heading: the declaration's plural, falling back to the raw type.
fn group_heading(declared_type: &str, count: usize, declarations: &DeclarationRegistry) -> Markup {
    let plural = declarations
        .lookup(declared_type)
        .map_or(declared_type, |d| d.plural.as_str());
    html! {
        h4 {
            (plural) " "
            span.counter { "(0/" (count) ")" }
        }
    }
}

fn checklist_group(
    group: &ChecklistGroup,
    place: CheckboxPlace,
    declarations: &DeclarationRegistry,
) -> Markup {
    html! {
        div.checklist-group data-type=(group.declared_type) {
            (group_heading(&group.declared_type, group.items.len(), declarations))
            ul {
                @for item in &group.items {
                    li { (checkbox(item, place, &item.rollup_label)) }
                }
            }
        }
    }
}

fn section_checklist(
    groups: &[ChecklistGroup],
    declarations: &DeclarationRegistry,
    labels: &LabelsConfig,
) -> Markup {
    html! {
        @if !groups.is_empty() {
            aside.section-checklist {
                h3 { (labels.checklist_heading) }
                @for group in groups {
                    (checklist_group(group, CheckboxPlace::Checklist, declarations))
                }
            }
        }
    }
}

fn rollups(
    views: &ChecklistViews,
    declarations: &DeclarationRegistry,
    labels: &LabelsConfig,
) -> Markup {
    html! {
        section.rollup id="rollup-by-section" {
            h2 { (labels.by_section_heading) }
            @for section in &views.by_section {
                div.rollup-section {
                    h3 { (section.section) }
                    @for group in &section.groups {
                        (checklist_group(group, CheckboxPlace::BySection, declarations))
                    }
                }
            }
        }
        section.rollup id="rollup-by-type" {
            h2 { (labels.by_type_heading) }
            @for rollup in &views.by_type {
                div.checklist-group data-type=(rollup.declared_type) {
                    (group_heading(&rollup.declared_type, rollup.entries.len(), declarations))
                    ul {
                        @for entry in &rollup.entries {
                            li {
                                span.rollup-section-name { (entry.section) ": " }
                                (checkbox(&entry.item, CheckboxPlace::ByType, &entry.item.rollup_label))
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
