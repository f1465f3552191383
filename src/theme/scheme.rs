//! Per-color-scheme theme pairs, in the spirit of `prefers-color-scheme`.

use dark_light::Mode;

use super::theme::Theme;

/// The color scheme a render pass targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    /// Asks the host system which scheme the user prefers.
    ///
    /// This queries the desktop settings each time it is called;
    /// [`RenderEnv`](crate::RenderEnv) calls it at most once per pass.
    pub fn detect() -> Self {
        match dark_light::detect() {
            Mode::Dark => ColorScheme::Dark,
            Mode::Light => ColorScheme::Light,
        }
    }
}

/// One theme per color scheme, offered as the ambient theme of a pass.
///
/// # Example
///
/// ```rust
/// use global_style::{ColorScheme, SchemeThemes, Theme};
///
/// let themes = SchemeThemes::new(
///     Theme::new().set("fg", "black"),
///     Theme::new().set("fg", "white"),
/// );
/// let dark = themes.for_scheme(ColorScheme::Dark);
/// assert_eq!(dark.get("fg"), Some(&serde_json::json!("white")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemeThemes {
    light: Theme,
    dark: Theme,
}

impl SchemeThemes {
    pub fn new(light: Theme, dark: Theme) -> Self {
        Self { light, dark }
    }

    /// Returns the theme for `scheme`.
    pub fn for_scheme(&self, scheme: ColorScheme) -> &Theme {
        match scheme {
            ColorScheme::Light => &self.light,
            ColorScheme::Dark => &self.dark,
        }
    }
}
