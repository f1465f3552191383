//! Global style components and their mounted instances.

use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tracing::{trace, warn};

use super::binder::LifecycleBinder;
use super::descriptor::{GlobalStyle, RenderOutcome};
use super::tracker::Release;
use crate::context::{Props, RenderContext};
use crate::error::{GlobalStyleError, TemplateError};
use crate::identity::StyleId;
use crate::rules::{compile_template, RuleSequence};
use crate::sheet::SharedStyleSheet;
use crate::theme::{ColorScheme, SchemeThemes, Theme};

/// Creates a component for `rules` bound to the process-wide binder.
///
/// Call this once per call site, not per render: the returned component
/// carries the descriptor every one of its instances shares.
///
/// # Example
///
/// ```rust
/// use global_style::{create_global_style, css, lookup};
///
/// let reset = create_global_style(css(&["body { color: ", "; }"], vec![lookup("theme.fg")]).unwrap());
/// assert!(reset.id().as_str().starts_with("sc-global-"));
/// ```
pub fn create_global_style(rules: RuleSequence) -> GlobalStyleComponent {
    GlobalStyleComponent::new(rules, LifecycleBinder::global())
}

#[derive(Debug, Clone, Copy)]
enum AmbientTheme<'a> {
    Fixed(&'a Theme),
    PerScheme(&'a SchemeThemes),
}

/// What a render pass makes available to a consumer.
///
/// Both the sheet and the ambient theme are looked up per pass; neither
/// is assumed to stay the same between renders. When the ambient theme is
/// a [`SchemeThemes`] pair and no scheme was given, the host's preferred
/// [`ColorScheme`] is detected on first use and kept for the rest of
/// the pass, so every consumer rendered with one environment sees the
/// same variant.
#[derive(Clone, Default)]
pub struct RenderEnv<'a> {
    sheet: Option<&'a SharedStyleSheet>,
    theme: Option<AmbientTheme<'a>>,
    scheme: OnceCell<ColorScheme>,
}

impl<'a> RenderEnv<'a> {
    /// Creates an environment with no sheet and no theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stylesheet for this pass.
    pub fn with_sheet(mut self, sheet: &'a SharedStyleSheet) -> Self {
        self.sheet = Some(sheet);
        self
    }

    /// Sets a fixed ambient theme for this pass.
    pub fn with_theme(mut self, theme: &'a Theme) -> Self {
        self.theme = Some(AmbientTheme::Fixed(theme));
        self
    }

    /// Sets a light/dark pair as the ambient theme for this pass.
    pub fn with_scheme_themes(mut self, themes: &'a SchemeThemes) -> Self {
        self.theme = Some(AmbientTheme::PerScheme(themes));
        self
    }

    /// Fixes the color scheme for this pass instead of detecting it.
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = OnceCell::with_value(scheme);
        self
    }

    pub fn sheet(&self) -> Option<&'a SharedStyleSheet> {
        self.sheet
    }

    /// The color scheme of this pass, detected once if not set.
    pub fn color_scheme(&self) -> ColorScheme {
        *self.scheme.get_or_init(ColorScheme::detect)
    }

    /// The ambient theme consumers see in this pass, if any.
    pub fn ambient_theme(&self) -> Option<&'a Theme> {
        match self.theme? {
            AmbientTheme::Fixed(theme) => Some(theme),
            AmbientTheme::PerScheme(themes) => Some(themes.for_scheme(self.color_scheme())),
        }
    }
}

/// A global style ready to be mounted any number of times.
///
/// # Example
///
/// ```rust
/// use global_style::{
///     share_sheet, BinderConfig, GlobalStyleComponent, LifecycleBinder, MemorySheet, Props,
///     RenderEnv, SharedStyleSheet, Theme,
/// };
///
/// let binder = LifecycleBinder::new(BinderConfig::default());
/// let component =
///     GlobalStyleComponent::from_template("body { color: {{ theme.fg }}; }", binder).unwrap();
///
/// let sheet = share_sheet(MemorySheet::new());
/// let port: SharedStyleSheet = sheet.clone();
/// let theme = Theme::new().set("fg", "red");
///
/// let mut instance = component.mount();
/// instance
///     .render(&Props::new(), &RenderEnv::new().with_sheet(&port).with_theme(&theme))
///     .unwrap();
/// assert_eq!(sheet.lock().unwrap().css(), "body { color: red; }");
///
/// drop(instance);
/// assert!(sheet.lock().unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct GlobalStyleComponent {
    style: Arc<GlobalStyle>,
    default_props: Props,
    binder: LifecycleBinder,
}

impl GlobalStyleComponent {
    /// Creates a component for `rules` using `binder`.
    pub fn new(rules: RuleSequence, binder: LifecycleBinder) -> Self {
        Self::from_style(GlobalStyle::new(rules), binder)
    }

    /// Creates a component around an existing descriptor.
    pub fn from_style(style: GlobalStyle, binder: LifecycleBinder) -> Self {
        Self {
            style: Arc::new(style),
            default_props: Props::new(),
            binder,
        }
    }

    /// Compiles `source` with [`compile_template`] and creates a component.
    pub fn from_template(source: &str, binder: LifecycleBinder) -> Result<Self, TemplateError> {
        Ok(Self::new(compile_template(source)?, binder))
    }

    /// Sets props applied to every instance unless overridden.
    pub fn with_default_props(mut self, props: Props) -> Self {
        self.default_props = props;
        self
    }

    pub fn id(&self) -> &StyleId {
        self.style.id()
    }

    pub fn style(&self) -> &Arc<GlobalStyle> {
        &self.style
    }

    pub fn binder(&self) -> &LifecycleBinder {
        &self.binder
    }

    /// Mounts a new consumer, counting it against this style's identity.
    pub fn mount(&self) -> GlobalStyleInstance {
        self.binder.on_mount(self.style.id());
        GlobalStyleInstance {
            style: Arc::clone(&self.style),
            default_props: self.default_props.clone(),
            binder: self.binder.clone(),
            context: None,
            mounted: true,
        }
    }
}

/// One mounted consumer of a global style.
///
/// Unmounts when dropped, if [`unmount`](Self::unmount) wasn't called first.
pub struct GlobalStyleInstance {
    style: Arc<GlobalStyle>,
    default_props: Props,
    binder: LifecycleBinder,
    context: Option<RenderContext>,
    mounted: bool,
}

impl GlobalStyleInstance {
    pub fn id(&self) -> &StyleId {
        self.style.id()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The context used on the most recent successful render.
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    /// Renders this consumer's rules for one render pass.
    ///
    /// Safe to call on every pass: unchanged output leaves the sheet alone,
    /// while a changed theme re-resolves and replaces the rules.
    ///
    /// # Errors
    ///
    /// Returns [`GlobalStyleError::PortUnavailable`] if `env` has no sheet,
    /// or [`GlobalStyleError::Interpolation`] if the rules can't be resolved.
    pub fn render(&mut self, props: &Props, env: &RenderEnv<'_>) -> Result<RenderOutcome, GlobalStyleError> {
        if !self.mounted {
            trace!(id = %self.id(), "render after unmount ignored");
            return Ok(RenderOutcome::Skipped);
        }

        if self.binder.config().warn_on_children && props.child_count() > 0 {
            warn!(
                "The global style component {} was given child content. Global styles do not render children.",
                self.id()
            );
        }

        let sheet = env.sheet().ok_or_else(|| GlobalStyleError::PortUnavailable {
            id: self.id().to_string(),
        })?;

        let props = props.with_defaults(&self.default_props);
        let ctx = RenderContext::resolve(&props, env.ambient_theme(), &self.default_props);

        let outcome = self.binder.on_render(&self.style, &ctx, Some(sheet))?;
        self.context = Some(ctx);
        Ok(outcome)
    }

    /// Unmounts this consumer, removing the rules if it was the last one.
    ///
    /// The rules leave every sheet the identity was rendered into, even
    /// if this consumer never rendered.
    ///
    /// Returns `None` if the instance was already unmounted.
    pub fn unmount(&mut self) -> Option<Release> {
        if !self.mounted {
            return None;
        }
        self.mounted = false;
        Some(self.binder.on_unmount(&self.style))
    }
}

impl std::fmt::Debug for GlobalStyleInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalStyleInstance")
            .field("id", self.id())
            .field("mounted", &self.mounted)
            .field("context", &self.context)
            .finish()
    }
}

impl Drop for GlobalStyleInstance {
    fn drop(&mut self) {
        self.unmount();
    }
}
