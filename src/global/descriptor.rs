//! The global style descriptor: rules plus their identity.

use tracing::{debug, trace};

use crate::context::RenderContext;
use crate::error::GlobalStyleError;
use crate::identity::{IdentityHasher, StyleId};
use crate::rules::RuleSequence;
use crate::sheet::StyleSheet;

/// What a render did to the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing was filed under the identity; the rules were inserted
    Inserted,
    /// Different text was filed under the identity and has been replaced
    Replaced,
    /// Identical text was already present; the sheet was not touched
    Unchanged,
    /// The consumer was no longer mounted, so nothing was rendered
    Skipped,
}

/// An immutable rule set paired with its content-derived identity.
///
/// A descriptor is built once per call site and shared by every consumer
/// mounted from it. It does no reference counting of its own; callers
/// decide when [`remove_styles`](Self::remove_styles) is safe.
///
/// # Example
///
/// ```rust
/// use global_style::{compile_template, GlobalStyle, MemorySheet, RenderContext, Theme};
///
/// let style = GlobalStyle::new(compile_template("body { color: {{ theme.fg }}; }").unwrap());
/// let ctx = RenderContext::new(Default::default(), Some(Theme::new().set("fg", "red")));
///
/// let mut sheet = MemorySheet::new();
/// style.render_styles(&ctx, &mut sheet).unwrap();
/// assert_eq!(sheet.css(), "body { color: red; }");
/// ```
#[derive(Debug)]
pub struct GlobalStyle {
    rules: RuleSequence,
    id: StyleId,
}

impl GlobalStyle {
    /// Creates a descriptor, computing its identity with the default hasher.
    pub fn new(rules: RuleSequence) -> Self {
        let id = StyleId::for_rules(&rules);
        Self { rules, id }
    }

    /// Creates a descriptor, computing its identity with `hasher`.
    pub fn with_hasher(rules: RuleSequence, hasher: &dyn IdentityHasher) -> Self {
        let id = StyleId::for_rules_with(&rules, hasher);
        Self { rules, id }
    }

    pub fn id(&self) -> &StyleId {
        &self.id
    }

    pub fn rules(&self) -> &RuleSequence {
        &self.rules
    }

    /// Resolves the rules against `ctx` and files them in `sheet`.
    ///
    /// The whole CSS text is resolved before the sheet is touched, so a
    /// failing interpolation inserts nothing. If identical text is already
    /// filed under this identity the call is a no-op, which keeps any
    /// number of consumers sharing one identity down to one insertion.
    ///
    /// # Errors
    ///
    /// Returns [`GlobalStyleError::Interpolation`] if any interpolation fails.
    pub fn render_styles(
        &self,
        ctx: &RenderContext,
        sheet: &mut dyn StyleSheet,
    ) -> Result<RenderOutcome, GlobalStyleError> {
        let css = self
            .rules
            .flatten(ctx)
            .map_err(|source| GlobalStyleError::Interpolation {
                id: self.id.to_string(),
                source,
            })?;

        let outcome = match sheet.rules(&self.id) {
            Some(existing) if existing == css => {
                trace!(id = %self.id, "rules already present");
                return Ok(RenderOutcome::Unchanged);
            }
            Some(_) => RenderOutcome::Replaced,
            None => RenderOutcome::Inserted,
        };

        sheet.insert_rules(&self.id, &css);
        debug!(id = %self.id, ?outcome, "rendered global style");
        Ok(outcome)
    }

    /// Drops every rule filed under this identity.
    pub fn remove_styles(&self, sheet: &mut dyn StyleSheet) {
        sheet.remove_rules(&self.id);
        debug!(id = %self.id, "removed global style");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{compile_template, css, lookup};
    use crate::sheet::MemorySheet;
    use crate::Theme;

    fn themed(fg: &str) -> RenderContext {
        RenderContext::new(Default::default(), Some(Theme::new().set("fg", fg)))
    }

    fn color_style() -> GlobalStyle {
        GlobalStyle::new(compile_template("body { color: {{ theme.fg }}; }").unwrap())
    }

    #[test]
    fn test_render_inserts_once() {
        let style = color_style();
        let mut sheet = MemorySheet::new();

        assert_eq!(
            style.render_styles(&themed("red"), &mut sheet).unwrap(),
            RenderOutcome::Inserted
        );
        assert_eq!(
            style.render_styles(&themed("red"), &mut sheet).unwrap(),
            RenderOutcome::Unchanged
        );
        assert_eq!(sheet.insert_count(), 1);
    }

    #[test]
    fn test_render_replaces_on_theme_change() {
        let style = color_style();
        let mut sheet = MemorySheet::new();

        style.render_styles(&themed("red"), &mut sheet).unwrap();
        assert_eq!(
            style.render_styles(&themed("blue"), &mut sheet).unwrap(),
            RenderOutcome::Replaced
        );

        assert_eq!(sheet.insert_count(), 2);
        assert_eq!(sheet.rules(style.id()), Some("body { color: blue; }"));
    }

    #[test]
    fn test_render_failure_inserts_nothing() {
        let style = GlobalStyle::new(
            css(
                &["body { margin: 0; color: ", "; }"],
                vec![lookup("theme.fg")],
            )
            .unwrap(),
        );
        let mut sheet = MemorySheet::new();

        let err = style
            .render_styles(&RenderContext::default(), &mut sheet)
            .unwrap_err();
        assert!(matches!(err, GlobalStyleError::Interpolation { .. }));
        assert_eq!(sheet.insert_count(), 0);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_remove_styles() {
        let style = color_style();
        let mut sheet = MemorySheet::new();
        style.render_styles(&themed("red"), &mut sheet).unwrap();

        style.remove_styles(&mut sheet);
        assert!(!sheet.has_rules(style.id()));
    }

    #[test]
    fn test_equal_templates_share_identity() {
        assert_eq!(color_style().id(), color_style().id());
    }
}
