//! Parse errors and recoverable diagnostics.
//!
//! Two severities exist. Structural problems with blocks (an unterminated
//! spoiler, an `\end{ol}` closing a `\begin{ul}`) abort the parse with a
//! [`ParseError`]. Everything else is recorded as a [`Diagnostic`], logged
//! through `tracing`, and the offending construct is dropped while parsing
//! continues.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Kind of a block opened by `\begin{…}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    UnorderedList,
    OrderedList,
    Spoiler,
}

impl BlockKind {
    /// Name used inside `\begin{…}` / `\end{…}`.
    pub fn marker(self) -> &'static str {
        match self {
            BlockKind::UnorderedList => "ul",
            BlockKind::OrderedList => "ol",
            BlockKind::Spoiler => "spoiler",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// A structural error that aborts the parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated {kind} block opened on line {line}")]
    UnterminatedBlock { kind: BlockKind, line: usize },
    #[error("line {line}: \\end{{{found}}} does not close the open {open} block")]
    MismatchedEnd {
        open: BlockKind,
        found: String,
        line: usize,
    },
    #[error("line {line}: \\end{{{found}}} without a matching \\begin")]
    UnmatchedEnd { found: String, line: usize },
    #[error("line {line}: \\begin{{{found}}} cannot be nested inside a {inside} block")]
    UnexpectedBegin {
        found: String,
        inside: BlockKind,
        line: usize,
    },
    #[error("line {line}: unknown block \\begin{{{found}}}")]
    UnknownBlock { found: String, line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnterminatedBlock { line, .. }
            | ParseError::MismatchedEnd { line, .. }
            | ParseError::UnmatchedEnd { line, .. }
            | ParseError::UnexpectedBegin { line, .. }
            | ParseError::UnknownBlock { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The construct was dropped; the rest of the line was kept.
    Warning,
    /// The whole line was dropped.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[error("malformed declaration: {reason}")]
    MalformedDeclaration { reason: String },
    #[error("declaration of `{name}` replaces an earlier one")]
    DuplicateDeclaration { name: String },
    #[error("malformed \\{directive} directive")]
    MalformedDirective { directive: String },
    #[error("checklist reference `[{text}]` has no `|` separator")]
    MissingSeparator { text: String },
    #[error("checklist reference `[{text}]` has an empty type or label")]
    EmptyReference { text: String },
    #[error("unknown checklist type `{declared_type}`; line dropped")]
    UnknownChecklistType { declared_type: String },
    #[error("checklist reference has no closing `]`; line dropped")]
    UnclosedReference,
    #[error("\\link has no closing `}}`; rest of line ignored")]
    MalformedLink,
    #[error("malformed \\img directive")]
    MalformedImage,
    #[error("line inside {block} block does not start with \\item")]
    StrayListLine { block: BlockKind },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnknownChecklistType { .. } | DiagnosticKind::UnclosedReference => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }
}

/// A recoverable problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity(), self.kind)
    }
}
