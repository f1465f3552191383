//! Rule fragments and sequences.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::context::RenderContext;
use crate::error::InterpolationError;

type InterpolationFn = dyn Fn(&RenderContext) -> Result<Resolved, InterpolationError> + Send + Sync;

/// What an interpolation produces for one render.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Plain CSS text spliced in as-is
    Text(String),
    /// A nested rule sequence, flattened against the same context
    Rules(RuleSequence),
}

impl From<String> for Resolved {
    fn from(text: String) -> Self {
        Resolved::Text(text)
    }
}

impl From<&str> for Resolved {
    fn from(text: &str) -> Self {
        Resolved::Text(text.to_string())
    }
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        Resolved::Text(stringify_value(&value))
    }
}

impl From<RuleSequence> for Resolved {
    fn from(rules: RuleSequence) -> Self {
        Resolved::Rules(rules)
    }
}

/// A deferred piece of a rule, resolved against each render's context.
///
/// Cloning is cheap; clones share the same function.
#[derive(Clone)]
pub struct Interpolation {
    func: Arc<InterpolationFn>,
    label: Option<String>,
}

impl Interpolation {
    /// Wraps a function of the render context.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&RenderContext) -> Result<Resolved, InterpolationError> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            label: None,
        }
    }

    /// Attaches a label shown in debug output.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Runs the interpolation against `ctx`.
    pub fn resolve(&self, ctx: &RenderContext) -> Result<Resolved, InterpolationError> {
        (self.func)(ctx)
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Interpolation({label})"),
            None => f.write_str("Interpolation(<fn>)"),
        }
    }
}

/// One element of a compiled rule sequence.
#[derive(Debug, Clone)]
pub enum RuleFragment {
    /// CSS text fixed at compile time
    Literal(String),
    /// Text resolved at render time
    Interpolation(Interpolation),
}

/// Literals serialize as strings, interpolations as `null`.
///
/// Interpolations depend on the render context, so they contribute only
/// their position to a style's identity, never their output.
impl Serialize for RuleFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RuleFragment::Literal(text) => serializer.serialize_str(text),
            RuleFragment::Interpolation(_) => serializer.serialize_unit(),
        }
    }
}

/// An ordered sequence of literal and interpolated rule fragments.
///
/// Adjacent literals are always merged, so two sequences built from the
/// same template text serialize identically regardless of how the text
/// was split up.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RuleSequence {
    fragments: Vec<RuleFragment>,
}

impl RuleSequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literal CSS text.
    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(RuleFragment::Literal(last)) = self.fragments.last_mut() {
            last.push_str(text);
        } else {
            self.fragments.push(RuleFragment::Literal(text.to_string()));
        }
    }

    /// Appends an interpolation.
    pub fn push_interpolation(&mut self, interpolation: Interpolation) {
        self.fragments
            .push(RuleFragment::Interpolation(interpolation));
    }

    /// Appends every fragment of `other`.
    pub fn extend(&mut self, other: RuleSequence) {
        for fragment in other.fragments {
            match fragment {
                RuleFragment::Literal(text) => self.push_literal(&text),
                RuleFragment::Interpolation(i) => self.push_interpolation(i),
            }
        }
    }

    /// Returns the fragments in order.
    pub fn fragments(&self) -> &[RuleFragment] {
        &self.fragments
    }

    /// Returns the number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if the sequence has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns true if no fragment depends on the render context.
    pub fn is_static(&self) -> bool {
        self.fragments
            .iter()
            .all(|f| matches!(f, RuleFragment::Literal(_)))
    }

    /// Serializes the sequence into the form its identity is hashed from.
    pub fn serialized(&self) -> String {
        let parts: Vec<Value> = self
            .fragments
            .iter()
            .map(|f| match f {
                RuleFragment::Literal(text) => Value::String(text.clone()),
                RuleFragment::Interpolation(_) => Value::Null,
            })
            .collect();
        Value::Array(parts).to_string()
    }

    /// Resolves every interpolation against `ctx` into one flat CSS string.
    ///
    /// Resolution is all-or-nothing: the first failing interpolation
    /// aborts and nothing partial is returned.
    pub fn flatten(&self, ctx: &RenderContext) -> Result<String, InterpolationError> {
        let mut css = String::new();
        self.flatten_into(ctx, &mut css)?;
        Ok(css)
    }

    fn flatten_into(&self, ctx: &RenderContext, out: &mut String) -> Result<(), InterpolationError> {
        for fragment in &self.fragments {
            match fragment {
                RuleFragment::Literal(text) => out.push_str(text),
                RuleFragment::Interpolation(interpolation) => match interpolation.resolve(ctx)? {
                    Resolved::Text(text) => out.push_str(&text),
                    Resolved::Rules(nested) => nested.flatten_into(ctx, out)?,
                },
            }
        }
        Ok(())
    }
}

/// Renders a literal value the way it appears in CSS text.
///
/// `null`, `false`, and empty strings vanish; arrays concatenate;
/// objects become `property: value;` declarations, with nested objects
/// turned into blocks and camelCase keys hyphenated.
pub(crate) fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify_value).collect(),
        Value::Object(map) => object_to_css(map),
    }
}

fn object_to_css(map: &serde_json::Map<String, Value>) -> String {
    map.iter()
        .filter(|(_, v)| !is_falsish(v))
        .map(|(key, value)| match value {
            Value::Object(inner) => format!("{key} {{\n  {}\n}}", object_to_css(inner)),
            _ => format!("{}: {};", hyphenate(key), stringify_value(value)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_falsish(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn hyphenate(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    // vendor prefixes: msTransition -> -ms-transition
    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}
