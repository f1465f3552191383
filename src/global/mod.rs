//! Global styles: deduplicated, reference-counted rules in a shared sheet.
//!
//! This module provides:
//!
//! - [`GlobalStyle`]: A rule sequence paired with its identity
//! - [`ReferenceTracker`]: Live-consumer counts per identity
//! - [`LifecycleBinder`]: The mount / render / unmount hooks a host drives
//! - [`GlobalStyleComponent`] and [`GlobalStyleInstance`]: A ready-made
//!   consumer model over the binder
//!
//! # Lifecycle
//!
//! Mounting a consumer increments its identity's count. Each render
//! resolves the rules against that pass's props and theme and files them
//! in the sheet, unless identical text is already there. Unmounting
//! decrements the count; the rules leave the sheet only when it reaches
//! zero, so a sibling consumer (or a copy of the style rebuilt from the
//! same template on live reload) never loses rules it still needs.
//! The binder remembers which sheets an identity was rendered into, and
//! the rules leave all of them at once.
//!
//! # Removal ordering
//!
//! The last unmount and the next mount of one identity are independent
//! events. Under [`RemovalPolicy::Immediate`] the rules are removed in
//! between and only come back on the new consumer's first render, which
//! can show as a brief flash of unstyled content. [`RemovalPolicy::Deferred`]
//! avoids this by holding removals until [`LifecycleBinder::flush_removals`].

mod binder;
mod component;
mod config;
mod descriptor;
mod tracker;

pub use binder::LifecycleBinder;
pub use component::{create_global_style, GlobalStyleComponent, GlobalStyleInstance, RenderEnv};
pub use config::{BinderConfig, RemovalPolicy, REMOVAL_POLICY_ENV};
pub use descriptor::{GlobalStyle, RenderOutcome};
pub use tracker::{ReferenceTracker, Release, SharedTracker};
