//! Theme struct holding the values interpolations resolve against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named collection of values used when resolving interpolations.
///
/// Values are arbitrary JSON, so a theme can nest palettes, spacing scales,
/// or anything else a rule template needs to look up.
///
/// # Example
///
/// ```rust
/// use global_style::Theme;
/// use serde_json::json;
///
/// let theme = Theme::new()
///     .set("fg", "red")
///     .set("space", json!({ "sm": 4, "lg": 16 }));
///
/// assert_eq!(theme.lookup("space.lg"), Some(&json!(16)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme {
    values: Map<String, Value>,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a theme from an existing JSON object.
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Creates a theme from a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self { values }),
            _ => None,
        }
    }

    /// Sets a named value, returning an updated theme for chaining.
    pub fn set<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Returns a top-level value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Looks up a dotted path such as `"colors.primary"`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns true if the theme holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the theme as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}
