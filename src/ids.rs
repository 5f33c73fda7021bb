//! Checklist item identifiers.
//!
//! Every checklist reference gets an identifier of the form `{type}{n}`,
//! where `n` counts references of that type from 1 in document order. The
//! identifiers double as keys in the browser's saved checkbox state, so the
//! same input must always produce the same identifiers. Reordering
//! references in the source shifts them; the renderer's storage version is
//! what lets authors invalidate saved state when that happens.

use std::collections::HashMap;

/// Per-type sequential identifier source, scoped to a single parse.
#[derive(Debug, Default)]
pub struct IdAllocator {
    counters: HashMap<String, u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier for `declared_type`.
    pub fn next_id(&mut self, declared_type: &str) -> String {
        let counter = self.counters.entry(declared_type.to_string()).or_insert(0);
        *counter += 1;
        format!("{declared_type}{counter}")
    }
}
