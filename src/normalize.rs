//! Typographic normalization applied before parsing.
//!
//! Walkthroughs are usually drafted in editors that "helpfully" replace
//! quotes, dashes and ellipses with their typographic forms. Those forms
//! break prefix matching (`\section{…}` pasted from a word processor) and
//! look inconsistent next to hand-typed text, so every input is folded to
//! plain ASCII equivalents first.
//!
//! | Input | Output |
//! |-------|--------|
//! | `‘ ’ ‚ ‛ ′` | `'` |
//! | `“ ” „ ‟ ″` | `"` |
//! | `‐ ‑ ‒ –` | `-` |
//! | `— ―` | `--` |
//! | `…` | `...` |
//! | no-break, narrow no-break and figure spaces | ` ` |
//!
//! Every replacement is pure ASCII, so normalizing twice is a no-op.

use std::borrow::Cow;

fn replacement(c: char) -> Option<&'static str> {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => Some("'"),
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => Some("\""),
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' => Some("-"),
        '\u{2014}' | '\u{2015}' => Some("--"),
        '\u{2026}' => Some("..."),
        '\u{00A0}' | '\u{202F}' | '\u{2007}' => Some(" "),
        _ => None,
    }
}

/// Replace typographic characters with their ASCII equivalents.
///
/// Borrows the input unchanged when there is nothing to replace.
pub fn normalize(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(|c| replacement(c).is_some()) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match replacement(c) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}
