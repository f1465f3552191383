//! Effective theme selection for a single consumer.

use super::theme::Theme;

/// Picks the theme a consumer's interpolations resolve against.
///
/// A consumer's own `theme` prop wins, unless it is the very theme its
/// component declares as a default prop; defaults only apply when
/// nothing else does. Otherwise the ambient theme from the render
/// environment is used, falling back to the default prop.
///
/// Returns `None` when none of the three sources provide a theme.
///
/// # Example
///
/// ```rust
/// use global_style::{determine_theme, Theme};
///
/// let ambient = Theme::new().set("fg", "red");
/// let own = Theme::new().set("fg", "blue");
///
/// assert_eq!(determine_theme(Some(&own), Some(&ambient), None), Some(own.clone()));
/// assert_eq!(determine_theme(None, Some(&ambient), None), Some(ambient.clone()));
/// ```
pub fn determine_theme(
    own: Option<&Theme>,
    ambient: Option<&Theme>,
    default: Option<&Theme>,
) -> Option<Theme> {
    let is_default_theme = match (own, default) {
        (Some(own), Some(default)) => own == default,
        _ => false,
    };

    match own {
        Some(own) if !is_default_theme => Some(own.clone()),
        _ => ambient.or(default).cloned(),
    }
}
