//! Theme values and theme resolution for interpolations.
//!
//! This module provides:
//!
//! - [`Theme`]: A tree of named values that interpolations read from
//! - [`SchemeThemes`]: A light and a dark theme, picked per render pass by [`ColorScheme`]
//! - [`determine_theme`]: Picks the effective theme for one consumer
//!
//! The ambient theme is whatever the surrounding render environment provides.
//! A consumer's own `theme` prop overrides it, unless that prop is just the
//! component's default.

mod resolve;
mod scheme;
#[allow(clippy::module_inception)]
mod theme;

pub use resolve::determine_theme;
pub use scheme::{ColorScheme, SchemeThemes};
pub use theme::Theme;
