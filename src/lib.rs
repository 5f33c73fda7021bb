//! # Walkthrough
//!
//! A compiler for game walkthroughs with built-in collectible checklists.
//! A walkthrough is written in a small line-oriented markup; every inline
//! `[type|label]` reference becomes a checkbox with a stable identifier, and
//! the compiled page rolls all of them up per section and per type.
//!
//! # Architecture: Parse, Aggregate, Render
//!
//! ```text
//! 1. Normalize  text      →  text                (smart quotes, dashes)
//! 2. Parse      text      →  WalkthroughDocument  (+ diagnostics)
//! 3. Aggregate  document  →  ChecklistViews       (by section, by type)
//! 4. Render     document  →  HTML page / zip
//! ```
//!
//! Parsing is a pure function of the input text. It either succeeds, possibly
//! with recoverable [`diagnostic::Diagnostic`]s, or fails on a structural
//! [`diagnostic::ParseError`] such as an unterminated block.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`normalize`] | Typographic normalization applied before parsing |
//! | [`declarations`] | Collectible type registry filled by `\declare` |
//! | [`ids`] | Per-type sequential checklist item identifiers |
//! | [`document`] | The parsed document tree |
//! | [`parser`] | Line/block state machine and inline tokenizer |
//! | [`diagnostic`] | Fatal parse errors and recoverable diagnostics |
//! | [`aggregate`] | By-section and by-type checklist rollups |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`generate`] | HTML page rendering with Maud |
//! | [`package`] | Zip packaging of the page and its images |
//! | [`output`] | CLI output formatting |
//!
//! # Markup
//!
//! ```text
//! \game_short_name{lighthouse}
//! \version{2}
//! \title{The Lighthouse Keeper}
//! \declare{shell}{Painted Shell}{Painted Shells}
//!
//! \section{Chapter 1 - The Beach}{Beach}
//! Under the boat is a [shell|blue shell]. Another one is in the rock pool,
//! [shell|striped shell|Rock pool shell].
//! \begin{spoiler}
//! The crate code is 4-1-7.
//! \img{images/boat.png}
//! \end{spoiler}
//! \checklist
//! ```
//!
//! # Design Decisions
//!
//! ## Stable Item Identifiers
//!
//! Identifiers are `{type}{n}`, counted per type in document order. Readers'
//! progress is saved under these ids, so inserting an item only renumbers
//! later items of the same type. Bumping `\version` tells the page to drop
//! saved progress when the numbering is no longer trustworthy.
//!
//! ## Explicit Parser States
//!
//! The parser is an explicit state enum with one handler per state. Open
//! blocks carry their opening line, which makes "unterminated block" errors
//! point at the right place.

pub mod aggregate;
pub mod config;
pub mod declarations;
pub mod diagnostic;
pub mod document;
pub mod generate;
pub mod ids;
pub mod normalize;
pub mod output;
pub mod package;
pub mod parser;

pub use aggregate::ChecklistViews;
pub use diagnostic::{Diagnostic, ParseError};
pub use document::WalkthroughDocument;
pub use parser::{Parsed, parse};

#[cfg(test)]
pub(crate) mod test_helpers;
