//! # Global Style - Deduplicated Global Stylesheet Rules
//!
//! `global-style` injects blocks of global (unscoped) CSS into a shared
//! stylesheet exactly once per distinct rule content, no matter how many
//! consumers mount, re-render, or get torn down and rebuilt.
//!
//! ## Concepts
//!
//! - **Rules**: A template compiled into literal text and deferred
//!   interpolations ([`css`], [`compile_template`])
//! - **Identity**: A content hash of the literal rule text ([`StyleId`])
//! - **Descriptor**: Rules plus identity, built once per call site ([`GlobalStyle`])
//! - **Reference tracker**: Live consumers per identity ([`ReferenceTracker`])
//! - **Stylesheet port**: Where CSS text physically lives ([`StyleSheet`])
//! - **Lifecycle binder**: Mount / render / unmount hooks ([`LifecycleBinder`])
//!
//! ## Quick Start
//!
//! ```rust
//! use global_style::{
//!     share_sheet, BinderConfig, GlobalStyleComponent, LifecycleBinder, MemorySheet, Props,
//!     RenderEnv, SharedStyleSheet, Theme,
//! };
//!
//! let binder = LifecycleBinder::new(BinderConfig::default());
//! let global = GlobalStyleComponent::from_template(
//!     "body { margin: 0; color: {{ theme.fg }}; }",
//!     binder,
//! )
//! .unwrap();
//!
//! let sheet = share_sheet(MemorySheet::new());
//! let port: SharedStyleSheet = sheet.clone();
//! let theme = Theme::new().set("fg", "red");
//! let env = RenderEnv::new().with_sheet(&port).with_theme(&theme);
//!
//! // Two consumers, one insertion
//! let mut a = global.mount();
//! let mut b = global.mount();
//! a.render(&Props::new(), &env).unwrap();
//! b.render(&Props::new(), &env).unwrap();
//! assert_eq!(sheet.lock().unwrap().insert_count(), 1);
//!
//! // Rules stay until the last consumer leaves
//! drop(a);
//! assert!(!sheet.lock().unwrap().is_empty());
//! drop(b);
//! assert!(sheet.lock().unwrap().is_empty());
//! ```
//!
//! ## Themes
//!
//! Interpolations resolve against the props of the consumer plus the
//! effective theme: the consumer's own `theme` prop, else the ambient
//! theme of the render pass, else the component's default. Ambient themes
//! can be fixed ([`Theme`]) or a light/dark pair ([`SchemeThemes`]) picked
//! by the pass's [`ColorScheme`].
//!
//! ## Logging
//!
//! Count transitions and sheet mutations are reported through `tracing`
//! at `debug` level. The library never installs a subscriber.

mod context;
mod error;
mod identity;

pub mod global;
pub mod rules;
pub mod sheet;
pub mod theme;

pub use context::{Props, RenderContext};
pub use error::{GlobalStyleError, InterpolationError, TemplateError};
pub use global::{
    create_global_style, BinderConfig, GlobalStyle, GlobalStyleComponent, GlobalStyleInstance,
    LifecycleBinder, ReferenceTracker, Release, RemovalPolicy, RenderEnv, RenderOutcome,
    SharedTracker, REMOVAL_POLICY_ENV,
};
pub use identity::{IdentityHasher, Sha256Hasher, StyleId, GLOBAL_ID_PREFIX};
pub use rules::{
    compile_template, css, interp, lookup, Interp, Interpolation, Resolved, RuleFragment,
    RuleSequence,
};
pub use sheet::{share_sheet, MemorySheet, SharedStyleSheet, StyleSheet};
pub use theme::{determine_theme, ColorScheme, SchemeThemes, Theme};
