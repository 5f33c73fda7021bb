//! Collectible type declarations.
//!
//! A walkthrough declares each kind of collectible before referencing it:
//!
//! ```text
//! \declare{gem}{Gem}{Gems}
//! ```
//!
//! The registry is filled by the parser while it scans `\declare` lines and
//! read afterwards by the renderer, which needs the display name and plural
//! for checklist headings.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A named collectible type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Key used in checklist references (`[gem|…]`) and identifiers (`gem1`).
    pub name: String,
    /// Singular label, e.g. "Gem".
    pub display_name: String,
    /// Plural label used for checklist headings, e.g. "Gems".
    pub plural: String,
}

impl Declaration {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            plural: plural.into(),
        }
    }
}

/// Why a declared name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameProblem {
    Empty,
    ReservedCharacter(char),
    TrailingDigit,
}

/// Check that a name can be used as a checklist type.
///
/// Names end up both inside `[type|…]` references and as the prefix of
/// `{type}{n}` identifiers. A trailing digit would make identifiers
/// ambiguous (`gem` #11 and `gem1` #1 are both `gem11`), so it is refused.
pub fn validate_name(name: &str) -> Result<(), NameProblem> {
    if name.is_empty() {
        return Err(NameProblem::Empty);
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '[' | ']' | '|' | '{' | '}' | '\\'))
    {
        return Err(NameProblem::ReservedCharacter(c));
    }
    if name.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(NameProblem::TrailingDigit);
    }
    Ok(())
}

/// Name → declaration table with last-write-wins semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationRegistry {
    entries: BTreeMap<String, Declaration>,
}

impl DeclarationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, returning the one it replaced (if any).
    pub fn register(&mut self, declaration: Declaration) -> Option<Declaration> {
        self.entries.insert(declaration.name.clone(), declaration)
    }

    pub fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DeclarationRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_missing_is_none() {
        let registry = DeclarationRegistry::new();
        assert!(registry.lookup("gem").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn register_then_lookup() {
        let mut registry = DeclarationRegistry::new();
        assert!(registry.register(Declaration::new("gem", "Gem", "Gems")).is_none());

        let decl = registry.lookup("gem").unwrap();
        assert_eq!(decl.display_name, "Gem");
        assert_eq!(decl.plural, "Gems");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let mut registry = DeclarationRegistry::new();
        registry.register(Declaration::new("gem", "Gem", "Gems"));
        let previous = registry.register(Declaration::new("gem", "Jewel", "Jewels"));

        assert_eq!(previous.unwrap().display_name, "Gem");
        assert_eq!(registry.lookup("gem").unwrap().plural, "Jewels");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn iteration_is_sorted_by_name() {
        let mut registry = DeclarationRegistry::new();
        registry.register(Declaration::new("tape", "Tape", "Tapes"));
        registry.register(Declaration::new("gem", "Gem", "Gems"));
        let names: Vec<&str> = registry.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["gem", "tape"]);
    }

    #[test]
    fn valid_names() {
        assert_eq!(validate_name("gem"), Ok(()));
        assert_eq!(validate_name("cult_stash"), Ok(()));
        assert_eq!(validate_name("v2_tape"), Ok(()));
    }

    #[test]
    fn invalid_names() {
        assert_eq!(validate_name(""), Err(NameProblem::Empty));
        assert_eq!(validate_name("gem1"), Err(NameProblem::TrailingDigit));
        assert_eq!(
            validate_name("word puzzle"),
            Err(NameProblem::ReservedCharacter(' '))
        );
        assert_eq!(
            validate_name("a|b"),
            Err(NameProblem::ReservedCharacter('|'))
        );
    }

    #[test]
    fn serializes_as_map() {
        let mut registry = DeclarationRegistry::new();
        registry.register(Declaration::new("gem", "Gem", "Gems"));
        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json["gem"]["plural"], "Gems");
    }
}
