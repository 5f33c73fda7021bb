//! Line-oriented walkthrough parser.
//!
//! The parser is a small state machine driven one line at a time:
//!
//! ```text
//!               \begin{ul} / \begin{ol}
//!   TopLevel ─────────────────────────────▶ UnorderedList / OrderedList
//!      │  ▲                                        │
//!      │  └──────────── \end{ul} / \end{ol} ◀──────┘
//!      │ \begin{spoiler}
//!      ▼
//!   Spoiler ──\begin{ul}──▶ Spoiler + nested list ──\end{ul}──▶ Spoiler
//!      │
//!      └── \end{spoiler} ──▶ TopLevel
//! ```
//!
//! At top level each line is matched against the ordered directive table in
//! [`directives`]; anything that is not a directive is a content line handed
//! to the [`inline`] tokenizer and becomes one paragraph.
//!
//! All mutable state (declarations, identifier counters, the section being
//! built) lives in a [`ParserContext`] created per call to [`parse`], so
//! independent parses never observe each other.

mod directives;
mod inline;

use crate::declarations::DeclarationRegistry;
use crate::diagnostic::{BlockKind, Diagnostic, DiagnosticKind, ParseError, Severity};
use crate::document::{
    ChecklistItem, ChecklistSection, DocumentItem, ParagraphChild, UNNAMED_SECTION,
    WalkthroughDocument,
};
use crate::ids::IdAllocator;
use crate::normalize::normalize;
use inline::Token;
use std::path::PathBuf;

/// Result of a successful parse: the document plus everything that was
/// recovered from along the way.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: WalkthroughDocument,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    /// Diagnostics that caused a whole line to be dropped.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Normalize and parse walkthrough markup.
pub fn parse(text: &str) -> Result<Parsed, ParseError> {
    let text = normalize(text);
    let mut context = ParserContext::new();
    for (index, line) in text.lines().enumerate() {
        context.feed(line, index + 1)?;
    }
    context.finish()
}

/// Items collected by an open `\begin{ul}` or `\begin{ol}`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListBlock {
    opened: usize,
    items: Vec<String>,
}

impl ListBlock {
    fn new(opened: usize) -> Self {
        Self {
            opened,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpoilerBlock {
    opened: usize,
    title: Option<String>,
    children: Vec<ParagraphChild>,
    nested: Option<ListBlock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum ParserState {
    #[default]
    TopLevel,
    UnorderedList(ListBlock),
    OrderedList(ListBlock),
    Spoiler(SpoilerBlock),
}

/// What a line inside a block turned out to be.
enum BlockLine<'a> {
    Blank,
    Begin(&'a str),
    End(&'a str),
    Item(&'a str),
    Other(&'a str),
}

fn marker_name(rest: &str) -> &str {
    rest.split('}').next().unwrap_or_default().trim()
}

fn classify(line: &str) -> BlockLine<'_> {
    if line.is_empty() {
        BlockLine::Blank
    } else if let Some(rest) = line.strip_prefix("\\begin{") {
        BlockLine::Begin(marker_name(rest))
    } else if let Some(rest) = line.strip_prefix("\\end{") {
        BlockLine::End(marker_name(rest))
    } else if let Some(rest) = line
        .strip_prefix("\\item")
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        BlockLine::Item(rest.trim())
    } else {
        BlockLine::Other(line)
    }
}

/// Per-parse state: registry, identifier counters, and the document so far.
#[derive(Debug, Default)]
pub(crate) struct ParserContext {
    document: WalkthroughDocument,
    declarations: DeclarationRegistry,
    ids: IdAllocator,
    diagnostics: Vec<Diagnostic>,
    state: ParserState,
    /// Items of the section that the next `\checklist` will close.
    current_items: Vec<DocumentItem>,
    /// Short name (or title) of the last `\section` since the last `\checklist`.
    section_name: Option<String>,
    saw_checklist: bool,
}

impl ParserContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Consume one line (1-based `line_no`).
    pub(crate) fn feed(&mut self, raw: &str, line_no: usize) -> Result<(), ParseError> {
        let line = raw.trim();
        self.state = match std::mem::take(&mut self.state) {
            ParserState::TopLevel => self.top_level_line(line, line_no)?,
            ParserState::UnorderedList(list) => {
                self.list_line(BlockKind::UnorderedList, list, line, line_no)?
            }
            ParserState::OrderedList(list) => {
                self.list_line(BlockKind::OrderedList, list, line, line_no)?
            }
            ParserState::Spoiler(spoiler) => self.spoiler_line(spoiler, line, line_no)?,
        };
        Ok(())
    }

    /// Check that no block is left open and assemble the document.
    pub(crate) fn finish(mut self) -> Result<Parsed, ParseError> {
        let unterminated = match &self.state {
            ParserState::TopLevel => None,
            ParserState::UnorderedList(list) => Some((BlockKind::UnorderedList, list.opened)),
            ParserState::OrderedList(list) => Some((BlockKind::OrderedList, list.opened)),
            ParserState::Spoiler(SpoilerBlock {
                nested: Some(list), ..
            }) => Some((BlockKind::UnorderedList, list.opened)),
            ParserState::Spoiler(spoiler) => Some((BlockKind::Spoiler, spoiler.opened)),
        };
        if let Some((kind, line)) = unterminated {
            let err = ParseError::UnterminatedBlock { kind, line };
            tracing::error!(line, "{err}");
            return Err(err);
        }

        if !self.current_items.is_empty() || !self.saw_checklist {
            let items = std::mem::take(&mut self.current_items);
            self.document
                .sections
                .push(ChecklistSection::new(String::new(), items));
        }

        self.document.declarations = self.declarations;
        tracing::debug!(
            sections = self.document.sections.len(),
            diagnostics = self.diagnostics.len(),
            "parse complete"
        );
        Ok(Parsed {
            document: self.document,
            diagnostics: self.diagnostics,
        })
    }

    fn report(&mut self, line: usize, kind: DiagnosticKind) {
        match kind.severity() {
            Severity::Warning => tracing::warn!(line, "{kind}"),
            Severity::Error => tracing::error!(line, "{kind}"),
        }
        self.diagnostics.push(Diagnostic { line, kind });
    }

    fn push_item(&mut self, item: DocumentItem) {
        self.current_items.push(item);
    }

    fn reference_image(&mut self, path: PathBuf) {
        self.document.referenced_images.push(path);
    }

    /// Close the section being built, naming it after the last `\section`.
    fn close_section(&mut self) {
        let name = self
            .section_name
            .take()
            .unwrap_or_else(|| UNNAMED_SECTION.to_string());
        tracing::debug!(section = %name, items = self.current_items.len(), "section closed");
        let items = std::mem::take(&mut self.current_items);
        self.document.sections.push(ChecklistSection::new(name, items));
        self.saw_checklist = true;
    }

    // ------------------------------------------------------------------
    // TopLevel
    // ------------------------------------------------------------------

    fn top_level_line(&mut self, line: &str, line_no: usize) -> Result<ParserState, ParseError> {
        if line.is_empty() {
            return Ok(ParserState::TopLevel);
        }
        if let Some((directive, rest)) = directives::match_directive(line) {
            return (directive.handler)(self, rest, line_no);
        }
        self.content_line(line, line_no);
        Ok(ParserState::TopLevel)
    }

    fn content_line(&mut self, line: &str, line_no: usize) {
        let mut warnings = Vec::new();
        let result = inline::tokenize(line, &self.declarations, &mut warnings);
        for warning in warnings {
            self.report(line_no, warning);
        }
        let tokens = match result {
            Ok(tokens) => tokens,
            Err(kind) => {
                self.report(line_no, kind);
                return;
            }
        };

        let children: Vec<ParagraphChild> = tokens
            .into_iter()
            .map(|token| match token {
                Token::Text(text) => ParagraphChild::Text(text.to_string()),
                Token::Link(url) => ParagraphChild::Link(url.to_string()),
                Token::Reference {
                    declared_type,
                    content,
                    rollup_label,
                } => ParagraphChild::ChecklistReference {
                    declared_type: declared_type.to_string(),
                    item: ChecklistItem {
                        content,
                        rollup_label,
                        item_id: self.ids.next_id(declared_type),
                    },
                },
            })
            .collect();

        if !children.is_empty() {
            self.push_item(DocumentItem::Paragraph(children));
        }
    }

    // ------------------------------------------------------------------
    // UnorderedList / OrderedList
    // ------------------------------------------------------------------

    fn list_line(
        &mut self,
        kind: BlockKind,
        mut list: ListBlock,
        line: &str,
        line_no: usize,
    ) -> Result<ParserState, ParseError> {
        match classify(line) {
            BlockLine::Blank => {}
            BlockLine::Item(text) => list.items.push(text.to_string()),
            BlockLine::End(found) if found == kind.marker() => {
                self.push_item(match kind {
                    BlockKind::OrderedList => DocumentItem::OrderedList(list.items),
                    _ => DocumentItem::UnorderedList(list.items),
                });
                return Ok(ParserState::TopLevel);
            }
            BlockLine::End(found) => {
                return Err(mismatched_end(kind, found, line_no));
            }
            BlockLine::Begin(found) => {
                return Err(unexpected_begin(kind, found, line_no));
            }
            BlockLine::Other(_) => self.report(line_no, DiagnosticKind::StrayListLine { block: kind }),
        }
        Ok(match kind {
            BlockKind::OrderedList => ParserState::OrderedList(list),
            _ => ParserState::UnorderedList(list),
        })
    }

    // ------------------------------------------------------------------
    // Spoiler
    // ------------------------------------------------------------------

    fn spoiler_line(
        &mut self,
        mut spoiler: SpoilerBlock,
        line: &str,
        line_no: usize,
    ) -> Result<ParserState, ParseError> {
        if let Some(mut list) = spoiler.nested.take() {
            match classify(line) {
                BlockLine::Blank => {}
                BlockLine::Item(text) => list.items.push(text.to_string()),
                BlockLine::End(found) if found == BlockKind::UnorderedList.marker() => {
                    spoiler.children.push(ParagraphChild::InlineList(list.items));
                    return Ok(ParserState::Spoiler(spoiler));
                }
                BlockLine::End(found) => {
                    return Err(mismatched_end(BlockKind::UnorderedList, found, line_no));
                }
                BlockLine::Begin(found) => {
                    return Err(unexpected_begin(BlockKind::UnorderedList, found, line_no));
                }
                BlockLine::Other(_) => self.report(
                    line_no,
                    DiagnosticKind::StrayListLine {
                        block: BlockKind::UnorderedList,
                    },
                ),
            }
            spoiler.nested = Some(list);
            return Ok(ParserState::Spoiler(spoiler));
        }

        match classify(line) {
            BlockLine::Blank => {}
            BlockLine::End(found) if found == BlockKind::Spoiler.marker() => {
                self.push_item(DocumentItem::Spoiler {
                    title: spoiler.title,
                    children: spoiler.children,
                });
                return Ok(ParserState::TopLevel);
            }
            BlockLine::End(found) => {
                return Err(mismatched_end(BlockKind::Spoiler, found, line_no));
            }
            BlockLine::Begin(found) if found == BlockKind::UnorderedList.marker() => {
                spoiler.nested = Some(ListBlock::new(line_no));
            }
            BlockLine::Begin(found) => {
                return Err(unexpected_begin(BlockKind::Spoiler, found, line_no));
            }
            BlockLine::Item(_) | BlockLine::Other(_) => match directives::image_path(line) {
                Some(Ok(path)) => {
                    spoiler.children.push(ParagraphChild::Image(path.clone()));
                    self.reference_image(path);
                }
                Some(Err(kind)) => self.report(line_no, kind),
                None => spoiler.children.push(ParagraphChild::Text(line.to_string())),
            },
        }
        Ok(ParserState::Spoiler(spoiler))
    }
}

fn mismatched_end(open: BlockKind, found: &str, line: usize) -> ParseError {
    let err = ParseError::MismatchedEnd {
        open,
        found: found.to_string(),
        line,
    };
    tracing::error!(line, "{err}");
    err
}

fn unexpected_begin(inside: BlockKind, found: &str, line: usize) -> ParseError {
    let err = ParseError::UnexpectedBegin {
        found: found.to_string(),
        inside,
        line,
    };
    tracing::error!(line, "{err}");
    err
}
