//! Top-level directive table.
//!
//! Directives are recognized by line prefix. The table is ordered and the
//! first matching prefix wins, so the order below is part of the format.

use super::{ListBlock, ParserContext, ParserState, SpoilerBlock};
use crate::declarations::{Declaration, NameProblem, validate_name};
use crate::diagnostic::{DiagnosticKind, ParseError};
use crate::document::{DocumentItem, ParagraphChild};
use std::path::PathBuf;

type Handler = fn(&mut ParserContext, &str, usize) -> Result<ParserState, ParseError>;

pub(super) struct Directive {
    pub(super) name: &'static str,
    prefix: &'static str,
    pub(super) handler: Handler,
}

const DIRECTIVES: &[Directive] = &[
    Directive {
        name: "game_short_name",
        prefix: "\\game_short_name",
        handler: game_short_name,
    },
    Directive {
        name: "version",
        prefix: "\\version",
        handler: version,
    },
    Directive {
        name: "title",
        prefix: "\\title",
        handler: title,
    },
    Directive {
        name: "defaultspoilertitle",
        prefix: "\\defaultspoilertitle",
        handler: default_spoiler_title,
    },
    Directive {
        name: "section",
        prefix: "\\section",
        handler: section,
    },
    Directive {
        name: "declare",
        prefix: "\\declare",
        handler: declare,
    },
    Directive {
        name: "checklist",
        prefix: "\\checklist",
        handler: checklist,
    },
    Directive {
        name: "begin{ul}",
        prefix: "\\begin{ul}",
        handler: begin_unordered_list,
    },
    Directive {
        name: "begin{ol}",
        prefix: "\\begin{ol}",
        handler: begin_ordered_list,
    },
    Directive {
        name: "begin{spoiler}",
        prefix: "\\begin{spoiler}",
        handler: begin_spoiler,
    },
    Directive {
        name: "begin",
        prefix: "\\begin{",
        handler: unknown_begin,
    },
    Directive {
        name: "img",
        prefix: IMAGE_OPEN,
        handler: image,
    },
    Directive {
        name: "end",
        prefix: "\\end{",
        handler: stray_end,
    },
];

/// Find the first directive whose prefix starts `line`.
///
/// Returns the directive and the rest of the line after the prefix.
pub(super) fn match_directive(line: &str) -> Option<(&'static Directive, &str)> {
    DIRECTIVES
        .iter()
        .find_map(|d| line.strip_prefix(d.prefix).map(|rest| (d, rest)))
}

/// Read consecutive `{…}` groups from the start of `text`.
///
/// Whitespace between groups is allowed; reading stops at the first
/// character that does not open a group or at an unclosed group.
pub(crate) fn brace_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut rest = text.trim_start();
    while let Some(inner) = rest.strip_prefix('{') {
        let Some(close) = inner.find('}') else { break };
        groups.push(inner[..close].trim());
        rest = inner[close + 1..].trim_start();
    }
    groups
}

const IMAGE_OPEN: &str = "\\img{";

/// Parse `\img{path}`. `None` when the line is not an image directive.
pub(super) fn image_path(line: &str) -> Option<Result<PathBuf, DiagnosticKind>> {
    line.strip_prefix(IMAGE_OPEN).map(image_argument)
}

/// The path inside `\img{…}`, given the text after the opening brace.
fn image_argument(after_open: &str) -> Result<PathBuf, DiagnosticKind> {
    match after_open.split_once('}').map(|(path, _)| path.trim()) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Err(DiagnosticKind::MalformedImage),
    }
}

/// First non-empty `{…}` argument, or a warning naming the directive.
fn single_argument(
    ctx: &mut ParserContext,
    directive: &str,
    rest: &str,
    line: usize,
) -> Option<String> {
    match brace_groups(rest).first() {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => {
            ctx.report(
                line,
                DiagnosticKind::MalformedDirective {
                    directive: directive.to_string(),
                },
            );
            None
        }
    }
}

fn game_short_name(
    ctx: &mut ParserContext,
    rest: &str,
    line: usize,
) -> Result<ParserState, ParseError> {
    if let Some(value) = single_argument(ctx, "game_short_name", rest, line) {
        ctx.document.game_short_name = value;
    }
    Ok(ParserState::TopLevel)
}

fn version(ctx: &mut ParserContext, rest: &str, line: usize) -> Result<ParserState, ParseError> {
    if let Some(value) = single_argument(ctx, "version", rest, line) {
        ctx.document.version = value;
    }
    Ok(ParserState::TopLevel)
}

fn title(ctx: &mut ParserContext, rest: &str, line: usize) -> Result<ParserState, ParseError> {
    if let Some(value) = single_argument(ctx, "title", rest, line) {
        ctx.document.title = value;
    }
    Ok(ParserState::TopLevel)
}

fn default_spoiler_title(
    ctx: &mut ParserContext,
    rest: &str,
    line: usize,
) -> Result<ParserState, ParseError> {
    if let Some(value) = single_argument(ctx, "defaultspoilertitle", rest, line) {
        ctx.document.default_spoiler_title = value;
    }
    Ok(ParserState::TopLevel)
}

fn section(ctx: &mut ParserContext, rest: &str, line: usize) -> Result<ParserState, ParseError> {
    let groups = brace_groups(rest);
    let Some(title) = groups.first().filter(|t| !t.is_empty()) else {
        ctx.report(
            line,
            DiagnosticKind::MalformedDirective {
                directive: "section".to_string(),
            },
        );
        return Ok(ParserState::TopLevel);
    };
    let short_name = groups
        .get(1)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    ctx.section_name = Some(short_name.clone().unwrap_or_else(|| title.to_string()));
    ctx.push_item(DocumentItem::SectionHeading {
        title: title.to_string(),
        short_name,
    });
    Ok(ParserState::TopLevel)
}

fn declare(ctx: &mut ParserContext, rest: &str, line: usize) -> Result<ParserState, ParseError> {
    let groups = brace_groups(rest);
    let reason = match groups.as_slice() {
        [name, display_name, plural, ..] => match validate_name(name) {
            Ok(()) if display_name.is_empty() || plural.is_empty() => {
                Some("display name and plural must not be empty".to_string())
            }
            Ok(()) => {
                let declaration = Declaration::new(*name, *display_name, *plural);
                if ctx.declarations.register(declaration).is_some() {
                    ctx.report(
                        line,
                        DiagnosticKind::DuplicateDeclaration {
                            name: name.to_string(),
                        },
                    );
                }
                None
            }
            Err(NameProblem::Empty) => Some("empty name".to_string()),
            Err(NameProblem::ReservedCharacter(c)) => {
                Some(format!("name `{name}` contains reserved character {c:?}"))
            }
            Err(NameProblem::TrailingDigit) => {
                Some(format!("name `{name}` must not end with a digit"))
            }
        },
        _ => Some(format!(
            "expected {{name}}{{display name}}{{plural}}, found {} group(s)",
            groups.len()
        )),
    };
    if let Some(reason) = reason {
        ctx.report(line, DiagnosticKind::MalformedDeclaration { reason });
    }
    Ok(ParserState::TopLevel)
}

fn checklist(ctx: &mut ParserContext, _rest: &str, _line: usize) -> Result<ParserState, ParseError> {
    ctx.close_section();
    Ok(ParserState::TopLevel)
}

fn begin_unordered_list(
    _ctx: &mut ParserContext,
    _rest: &str,
    line: usize,
) -> Result<ParserState, ParseError> {
    Ok(ParserState::UnorderedList(ListBlock::new(line)))
}

fn begin_ordered_list(
    _ctx: &mut ParserContext,
    _rest: &str,
    line: usize,
) -> Result<ParserState, ParseError> {
    Ok(ParserState::OrderedList(ListBlock::new(line)))
}

fn begin_spoiler(
    _ctx: &mut ParserContext,
    rest: &str,
    line: usize,
) -> Result<ParserState, ParseError> {
    let title = brace_groups(rest)
        .first()
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string());
    Ok(ParserState::Spoiler(SpoilerBlock {
        opened: line,
        title,
        children: Vec::new(),
        nested: None,
    }))
}

fn image(ctx: &mut ParserContext, rest: &str, line: usize) -> Result<ParserState, ParseError> {
    match image_argument(rest) {
        Ok(path) => {
            ctx.push_item(DocumentItem::Paragraph(vec![ParagraphChild::Image(
                path.clone(),
            )]));
            ctx.reference_image(path);
        }
        Err(kind) => ctx.report(line, kind),
    }
    Ok(ParserState::TopLevel)
}

fn unknown_begin(
    _ctx: &mut ParserContext,
    rest: &str,
    line: usize,
) -> Result<ParserState, ParseError> {
    let err = ParseError::UnknownBlock {
        found: super::marker_name(rest).to_string(),
        line,
    };
    tracing::error!(line, "{err}");
    Err(err)
}

fn stray_end(_ctx: &mut ParserContext, rest: &str, line: usize) -> Result<ParserState, ParseError> {
    let err = ParseError::UnmatchedEnd {
        found: super::marker_name(rest).to_string(),
        line,
    };
    tracing::error!(line, "{err}");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_is_documented_precedence() {
        let names: Vec<&str> = DIRECTIVES.iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "game_short_name",
                "version",
                "title",
                "defaultspoilertitle",
                "section",
                "declare",
                "checklist",
                "begin{ul}",
                "begin{ol}",
                "begin{spoiler}",
                "begin",
                "img",
                "end",
            ]
        );
    }

    #[test]
    fn first_match_wins() {
        let (directive, rest) = match_directive("\\section{Cave}{cave}").unwrap();
        assert_eq!(directive.name, "section");
        assert_eq!(rest, "{Cave}{cave}");

        let (directive, rest) = match_directive("\\begin{spoiler}{Hint}").unwrap();
        assert_eq!(directive.name, "begin{spoiler}");
        assert_eq!(rest, "{Hint}");
    }

    #[test]
    fn non_directives_do_not_match() {
        assert!(match_directive("Walk north.").is_none());
        assert!(match_directive("\\item stray").is_none());
        assert!(match_directive("\\imgur.com/abc").is_none());
    }

    #[test]
    fn unknown_begin_falls_through_to_catch_all() {
        let (directive, rest) = match_directive("\\begin{table}").unwrap();
        assert_eq!(directive.name, "begin");
        assert_eq!(rest, "table}");
    }

    #[test]
    fn brace_groups_read_left_to_right() {
        assert_eq!(
            brace_groups("{gem}{Gem}{Gems}"),
            vec!["gem", "Gem", "Gems"]
        );
        assert_eq!(brace_groups(" { a } {b}"), vec!["a", "b"]);
        assert_eq!(brace_groups("{a}{b"), vec!["a"]);
        assert_eq!(brace_groups("{a} trailing {b}"), vec!["a"]);
        assert!(brace_groups("no braces").is_empty());
    }

    #[test]
    fn image_paths() {
        assert_eq!(
            image_path("\\img{shots/map.png}"),
            Some(Ok(PathBuf::from("shots/map.png")))
        );
        assert_eq!(image_path("\\img{}"), Some(Err(DiagnosticKind::MalformedImage)));
        assert_eq!(image_path("\\img{open"), Some(Err(DiagnosticKind::MalformedImage)));
        assert_eq!(image_path("plain text"), None);
        assert_eq!(image_path("\\imgur.com/abc"), None);
    }
}
