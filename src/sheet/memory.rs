//! In-memory stylesheet.

use tracing::trace;

use super::StyleSheet;
use crate::identity::StyleId;

/// A stylesheet kept in memory, in first-insertion order.
///
/// Replacing an identity's rules keeps its original position, so the
/// rendered sheet's order depends only on when each identity first
/// appeared. Insert and remove calls are counted for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    entries: Vec<(StyleId, String)>,
    inserts: usize,
    removals: usize,
}

impl MemorySheet {
    /// Creates an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every rule in the sheet as one CSS string.
    pub fn css(&self) -> String {
        self.entries
            .iter()
            .map(|(_, css)| css.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the identities currently present, in sheet order.
    pub fn ids(&self) -> impl Iterator<Item = &StyleId> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Number of identities present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times `insert_rules` has been called.
    pub fn insert_count(&self) -> usize {
        self.inserts
    }

    /// How many times `remove_rules` has been called.
    pub fn remove_count(&self) -> usize {
        self.removals
    }

    fn position(&self, id: &StyleId) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == id)
    }
}

impl StyleSheet for MemorySheet {
    fn rules(&self, id: &StyleId) -> Option<&str> {
        self.position(id).map(|i| self.entries[i].1.as_str())
    }

    fn insert_rules(&mut self, id: &StyleId, css: &str) {
        self.inserts += 1;
        match self.position(id) {
            Some(i) => self.entries[i].1 = css.to_string(),
            None => self.entries.push((id.clone(), css.to_string())),
        }
        trace!(%id, "inserted rules");
    }

    fn remove_rules(&mut self, id: &StyleId) {
        self.removals += 1;
        self.entries.retain(|(existing, _)| existing != id);
        trace!(%id, "removed rules");
    }
}
