//! The stylesheet port global styles are written into.
//!
//! A [`StyleSheet`] physically holds CSS text filed under style identities.
//! Hosts implement it over whatever actually applies CSS (a DOM `<style>`
//! element, a server-side collector, a terminal renderer); [`MemorySheet`]
//! is the in-memory implementation used for server rendering and tests.

mod memory;

use std::sync::{Arc, Mutex};

use crate::identity::StyleId;

pub use memory::MemorySheet;

/// Storage for CSS text, addressed by style identity.
///
/// Every method must tolerate repeated calls: inserting the same text
/// twice or removing an absent identity leaves the sheet consistent.
pub trait StyleSheet: Send {
    /// Returns the text currently filed under `id`.
    fn rules(&self, id: &StyleId) -> Option<&str>;

    /// Returns true if anything is filed under `id`.
    fn has_rules(&self, id: &StyleId) -> bool {
        self.rules(id).is_some()
    }

    /// Files `css` under `id`, replacing whatever was there.
    fn insert_rules(&mut self, id: &StyleId, css: &str);

    /// Drops everything filed under `id`.
    fn remove_rules(&mut self, id: &StyleId);
}

/// A stylesheet shared between every consumer rendering into it.
pub type SharedStyleSheet = Arc<Mutex<dyn StyleSheet>>;

/// Wraps a sheet so it can be handed to render environments.
///
/// # Example
///
/// ```rust
/// use global_style::{share_sheet, MemorySheet, SharedStyleSheet};
///
/// let sheet = share_sheet(MemorySheet::new());
/// let port: SharedStyleSheet = sheet.clone();
/// ```
pub fn share_sheet<S: StyleSheet + 'static>(sheet: S) -> Arc<Mutex<S>> {
    Arc::new(Mutex::new(sheet))
}
