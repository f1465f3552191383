//! Rule templates with inline `{{ expression }}` interpolations.
//!
//! Expressions are evaluated by MiniJinja against the render context, so
//! anything MiniJinja accepts as an expression works: attribute access,
//! arithmetic, filters, conditionals.

use minijinja::Environment;
use once_cell::sync::Lazy;

use super::fragment::{Interpolation, Resolved, RuleSequence};
use crate::error::{InterpolationError, TemplateError};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

static EXPRESSIONS: Lazy<Environment<'static>> = Lazy::new(Environment::new);

/// Compiles a rule template into a rule sequence.
///
/// Text outside `{{ }}` is literal CSS. Each `{{ expr }}` is compiled
/// once, here, into an interpolation evaluated on every render, so
/// malformed expressions fail at compile time rather than mid-render.
///
/// # Errors
///
/// Returns [`TemplateError::Unterminated`] for a `{{` with no closing
/// `}}`, and [`TemplateError::Syntax`] for an invalid expression.
///
/// # Example
///
/// ```rust
/// use global_style::{compile_template, RenderContext, Theme};
///
/// let rules = compile_template("body { color: {{ theme.fg }}; }").unwrap();
///
/// let ctx = RenderContext::new(Default::default(), Some(Theme::new().set("fg", "red")));
/// assert_eq!(rules.flatten(&ctx).unwrap(), "body { color: red; }");
/// ```
pub fn compile_template(source: &str) -> Result<RuleSequence, TemplateError> {
    let mut rules = RuleSequence::new();
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        rules.push_literal(&rest[..start]);

        let body_start = start + OPEN.len();
        let end = rest[body_start..]
            .find(CLOSE)
            .ok_or(TemplateError::Unterminated {
                offset: offset + start,
            })?;
        let expr = rest[body_start..body_start + end].trim();
        rules.push_interpolation(compile_expression(expr)?);

        let consumed = body_start + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    rules.push_literal(rest);

    Ok(rules)
}

fn compile_expression(expr: &str) -> Result<Interpolation, TemplateError> {
    let expression = EXPRESSIONS
        .compile_expression_owned(expr.to_string())
        .map_err(|e| TemplateError::Syntax {
            expr: expr.to_string(),
            message: e.to_string(),
        })?;

    let source = expr.to_string();
    Ok(Interpolation::new(move |ctx| {
        let value = expression
            .eval(ctx)
            .map_err(|e| expression_error(&source, e))?;
        if value.is_undefined() {
            return Err(InterpolationError::MissingValue {
                path: source.clone(),
            });
        }
        let value = serde_json::to_value(&value).map_err(|e| InterpolationError::Expression {
            expr: source.clone(),
            message: e.to_string(),
        })?;
        Ok(Resolved::from(value))
    })
    .labeled(expr))
}

fn expression_error(expr: &str, err: minijinja::Error) -> InterpolationError {
    InterpolationError::Expression {
        expr: expr.to_string(),
        message: err.to_string(),
    }
}
