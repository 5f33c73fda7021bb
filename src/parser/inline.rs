//! Tokenizer for regular content lines.
//!
//! A content line is literal text interleaved with two inline forms:
//!
//! ```text
//! Grab the [gem|Shiny Gem|Gem behind the waterfall]. See \link{https://example.com} for a map.
//! ```
//!
//! The tokenizer walks the line left to right and always handles whichever
//! opening marker (`[` or `\link{`) comes first. It only validates and
//! splits; identifiers are assigned by the caller once the whole line is
//! known to be good, so a dropped line never consumes one.

use crate::declarations::DeclarationRegistry;
use crate::diagnostic::DiagnosticKind;

const LINK_OPEN: &str = "\\link{";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Link(&'a str),
    Reference {
        declared_type: &'a str,
        content: String,
        rollup_label: String,
    },
}

enum Marker {
    Bracket(usize),
    Link(usize),
}

fn next_marker(rest: &str) -> Option<Marker> {
    match (rest.find('['), rest.find(LINK_OPEN)) {
        (Some(bracket), Some(link)) if bracket < link => Some(Marker::Bracket(bracket)),
        (_, Some(link)) => Some(Marker::Link(link)),
        (Some(bracket), None) => Some(Marker::Bracket(bracket)),
        (None, None) => None,
    }
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    let text = text.trim();
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}

/// Split a content line into tokens.
///
/// Recoverable problems are appended to `warnings` and the offending form
/// is skipped. An `Err` means the whole line must be dropped.
pub(crate) fn tokenize<'a>(
    line: &'a str,
    declarations: &DeclarationRegistry,
    warnings: &mut Vec<DiagnosticKind>,
) -> Result<Vec<Token<'a>>, DiagnosticKind> {
    let mut tokens = Vec::new();
    let mut rest = line.trim();

    while let Some(marker) = next_marker(rest) {
        match marker {
            Marker::Bracket(at) => {
                push_text(&mut tokens, &rest[..at]);
                let after = &rest[at + 1..];
                let close = after.find(']').ok_or(DiagnosticKind::UnclosedReference)?;
                let inner = &after[..close];
                rest = &after[close + 1..];

                let period = rest.strip_prefix('.');
                let reference = parse_reference(inner, period.is_some(), declarations, warnings)?;
                if let Some(reference) = reference {
                    if let Some(stripped) = period {
                        rest = stripped;
                    }
                    tokens.push(reference);
                }
            }
            Marker::Link(at) => {
                push_text(&mut tokens, &rest[..at]);
                let after = &rest[at + LINK_OPEN.len()..];
                let Some(close) = after.find('}') else {
                    warnings.push(DiagnosticKind::MalformedLink);
                    return Ok(tokens);
                };
                let url = after[..close].trim();
                if url.is_empty() {
                    warnings.push(DiagnosticKind::MalformedLink);
                } else {
                    tokens.push(Token::Link(url));
                }
                rest = &after[close + 1..];
            }
        }
    }

    push_text(&mut tokens, rest);
    Ok(tokens)
}

/// Parse the inside of `[type|content]` or `[type|content|rollup_label]`.
///
/// A `period` directly after the closing bracket belongs to the content,
/// and so to the default rollup label. `Ok(None)` means the reference was
/// malformed and skipped.
fn parse_reference<'a>(
    inner: &'a str,
    period: bool,
    declarations: &DeclarationRegistry,
    warnings: &mut Vec<DiagnosticKind>,
) -> Result<Option<Token<'a>>, DiagnosticKind> {
    let mut fields = inner.splitn(3, '|');
    let declared_type = fields.next().unwrap_or_default().trim();
    let Some(content) = fields.next().map(str::trim) else {
        warnings.push(DiagnosticKind::MissingSeparator {
            text: inner.to_string(),
        });
        return Ok(None);
    };
    if declared_type.is_empty() || content.is_empty() {
        warnings.push(DiagnosticKind::EmptyReference {
            text: inner.to_string(),
        });
        return Ok(None);
    }
    if !declarations.contains(declared_type) {
        return Err(DiagnosticKind::UnknownChecklistType {
            declared_type: declared_type.to_string(),
        });
    }

    let content = if period {
        format!("{content}.")
    } else {
        content.to_string()
    };
    let rollup_label = fields
        .next()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map_or_else(|| content.clone(), str::to_string);

    Ok(Some(Token::Reference {
        declared_type,
        content,
        rollup_label,
    }))
}
