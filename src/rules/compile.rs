//! Tagged-template style rule compilation.

use serde_json::Value;

use super::fragment::{stringify_value, Interpolation, Resolved, RuleSequence};
use crate::context::RenderContext;
use crate::error::{InterpolationError, TemplateError};

/// An interpolated value handed to [`css`].
#[derive(Debug, Clone)]
pub enum Interp {
    /// A literal value, stringified once at compile time
    Value(Value),
    /// A function of the render context, resolved on every render
    Func(Interpolation),
    /// Another compiled sequence, spliced in place
    Rules(RuleSequence),
}

impl From<&str> for Interp {
    fn from(value: &str) -> Self {
        Interp::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Interp {
    fn from(value: String) -> Self {
        Interp::Value(Value::String(value))
    }
}

impl From<Value> for Interp {
    fn from(value: Value) -> Self {
        Interp::Value(value)
    }
}

impl From<i64> for Interp {
    fn from(value: i64) -> Self {
        Interp::Value(Value::from(value))
    }
}

impl From<f64> for Interp {
    fn from(value: f64) -> Self {
        Interp::Value(Value::from(value))
    }
}

impl From<Interpolation> for Interp {
    fn from(value: Interpolation) -> Self {
        Interp::Func(value)
    }
}

impl From<RuleSequence> for Interp {
    fn from(value: RuleSequence) -> Self {
        Interp::Rules(value)
    }
}

/// Shorthand for an [`Interp::Func`] built from a closure.
///
/// # Example
///
/// ```rust
/// use global_style::{css, interp, Resolved};
///
/// let rules = css(
///     &["body { margin: ", "px; }"],
///     vec![interp(|ctx| Ok(Resolved::from(ctx.prop("gap").cloned().unwrap_or_default())))],
/// )
/// .unwrap();
/// assert_eq!(rules.len(), 3);
/// ```
pub fn interp<F>(func: F) -> Interp
where
    F: Fn(&RenderContext) -> Result<Resolved, InterpolationError> + Send + Sync + 'static,
{
    Interp::Func(Interpolation::new(func))
}

/// Interpolation reading a dotted path from the render context.
///
/// Fails with [`InterpolationError::MissingValue`] when the path is absent,
/// which makes it the usual way to pull theme values into a rule.
///
/// # Example
///
/// ```rust
/// use global_style::{css, lookup};
///
/// let rules = css(&["body { color: ", "; }"], vec![lookup("theme.fg")]).unwrap();
/// assert!(!rules.is_static());
/// ```
pub fn lookup(path: &str) -> Interp {
    let path = path.to_string();
    let label = path.clone();
    Interp::Func(
        Interpolation::new(move |ctx| {
            ctx.lookup(&path)
                .cloned()
                .map(Resolved::from)
                .ok_or_else(|| InterpolationError::MissingValue { path: path.clone() })
        })
        .labeled(label),
    )
}

/// Compiles template parts and interpolations into a rule sequence.
///
/// `strings` are the literal pieces surrounding each interpolation, so
/// there must be exactly one more string than interpolations. Literal
/// values are folded into the text immediately; functions stay deferred.
///
/// # Errors
///
/// Returns [`TemplateError::Arity`] if the parts don't line up.
///
/// # Example
///
/// ```rust
/// use global_style::css;
///
/// let rules = css(&["body { margin: ", "px; }"], vec![0i64.into()]).unwrap();
/// assert!(rules.is_static());
/// assert_eq!(rules.serialized(), r#"["body { margin: 0px; }"]"#);
/// ```
pub fn css(strings: &[&str], interpolations: Vec<Interp>) -> Result<RuleSequence, TemplateError> {
    if strings.len() != interpolations.len() + 1 {
        return Err(TemplateError::Arity {
            expected: interpolations.len() + 1,
            interpolations: interpolations.len(),
            actual: strings.len(),
        });
    }

    let mut rules = RuleSequence::new();
    let mut strings = strings.iter();
    if let Some(first) = strings.next() {
        rules.push_literal(first);
    }

    for (interpolation, text) in interpolations.into_iter().zip(strings) {
        match interpolation {
            Interp::Value(value) => rules.push_literal(&stringify_value(&value)),
            Interp::Func(func) => rules.push_interpolation(func),
            Interp::Rules(nested) => rules.extend(nested),
        }
        rules.push_literal(text);
    }

    Ok(rules)
}
