//! Rule compilation: turning templates into rule sequences.
//!
//! This module provides:
//!
//! - [`RuleSequence`]: Ordered literal and interpolated fragments
//! - [`Interpolation`]: A function of the render context
//! - [`css`]: Tagged-template style compilation from parts and values
//! - [`compile_template`]: Compilation of `{{ expr }}` templates
//!
//! Literal values are folded into text when a sequence is compiled.
//! Interpolations stay deferred until a render supplies the context,
//! so a sequence's serialized form (and thus its identity) depends only
//! on its literal text.

mod compile;
mod fragment;
mod template;

pub use compile::{css, interp, lookup, Interp};
pub use fragment::{Interpolation, Resolved, RuleFragment, RuleSequence};
pub use template::compile_template;
