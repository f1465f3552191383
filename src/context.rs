//! Consumer props and the render context interpolations resolve against.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::theme::{determine_theme, Theme};

const THEME_PROP: &str = "theme";

/// Props passed to one consumer of a global style.
///
/// Plain values are exposed to interpolations by name. A `theme` prop is
/// kept apart so it can take part in theme resolution, and `children`
/// counts child content the consumer was handed (which it never renders).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: Map<String, Value>,
    theme: Option<Theme>,
    children: usize,
}

impl Props {
    /// Creates empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named prop, returning updated props for chaining.
    ///
    /// `theme` is not a plain value: an object set under that name becomes
    /// the theme prop (as with [`theme`](Self::theme)), and anything else
    /// clears it.
    pub fn set<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        let value = value.into();
        if name == THEME_PROP {
            self.theme = Theme::from_value(value);
        } else {
            self.values.insert(name.to_string(), value);
        }
        self
    }

    /// Sets the consumer's own theme prop.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Records child content handed to the consumer.
    pub fn children(mut self, count: usize) -> Self {
        self.children = count;
        self
    }

    /// Returns a named prop.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the theme prop, if any.
    pub fn own_theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Returns how many children were handed to the consumer.
    pub fn child_count(&self) -> usize {
        self.children
    }

    /// Layers these props over `defaults`; values set here win.
    pub fn with_defaults(&self, defaults: &Props) -> Props {
        let mut values = defaults.values.clone();
        values.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Props {
            values,
            theme: self.theme.clone().or_else(|| defaults.theme.clone()),
            children: self.children,
        }
    }
}

/// The props and resolved theme used for one render of a consumer.
///
/// Serializes as a flat object: every prop by name, plus `theme` when one
/// was resolved. Template expressions see exactly this shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    props: Map<String, Value>,
    theme: Option<Theme>,
}

impl RenderContext {
    /// Creates a context from raw props and an already-resolved theme.
    pub fn new(props: Map<String, Value>, theme: Option<Theme>) -> Self {
        Self { props, theme }
    }

    /// Builds the context for one render.
    ///
    /// `props` must already carry the component's defaults. When the
    /// environment supplies an ambient theme, the effective theme comes
    /// from [`determine_theme`]; without one, only the consumer's own
    /// props (including a defaulted `theme` prop) are visible.
    pub fn resolve(props: &Props, ambient: Option<&Theme>, defaults: &Props) -> Self {
        let theme = match ambient {
            Some(ambient) => determine_theme(props.own_theme(), Some(ambient), defaults.own_theme()),
            None => props.own_theme().cloned(),
        };
        Self {
            props: props.values.clone(),
            theme,
        }
    }

    /// Returns the resolved theme, if any.
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Returns a named prop.
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Looks up a dotted path such as `"theme.fg"` or `"size"`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        match path.split_once('.') {
            Some((THEME_PROP, rest)) => self.theme.as_ref()?.lookup(rest),
            Some((head, rest)) => {
                let mut current = self.props.get(head)?;
                for part in rest.split('.') {
                    current = match current {
                        Value::Object(map) => map.get(part)?,
                        Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                        _ => return None,
                    };
                }
                Some(current)
            }
            None => self.props.get(path),
        }
    }

    /// Returns the context as a single JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = self.props.clone();
        if let Some(theme) = &self.theme {
            object.insert(THEME_PROP.to_string(), theme.to_value());
        }
        Value::Object(object)
    }
}

impl Serialize for RenderContext {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_with_defaults() {
        let defaults = Props::new().set("size", 1).set("weight", "bold");
        let props = Props::new().set("size", 2).with_defaults(&defaults);

        assert_eq!(props.get("size"), Some(&json!(2)));
        assert_eq!(props.get("weight"), Some(&json!("bold")));
    }

    #[test]
    fn test_props_default_theme_applies() {
        let defaults = Props::new().theme(Theme::new().set("fg", "grey"));
        let props = Props::new().with_defaults(&defaults);
        assert_eq!(props.own_theme(), defaults.own_theme());
    }

    #[test]
    fn test_context_without_ambient_uses_props_theme() {
        let own = Theme::new().set("fg", "blue");
        let props = Props::new().theme(own.clone());
        let ctx = RenderContext::resolve(&props, None, &Props::new());
        assert_eq!(ctx.theme(), Some(&own));
    }

    #[test]
    fn test_context_without_any_theme() {
        let ctx = RenderContext::resolve(&Props::new().set("size", 3), None, &Props::new());
        assert!(ctx.theme().is_none());
        assert_eq!(ctx.to_value(), json!({ "size": 3 }));
    }

    #[test]
    fn test_context_ambient_theme() {
        let ambient = Theme::new().set("fg", "red");
        let ctx = RenderContext::resolve(&Props::new(), Some(&ambient), &Props::new());
        assert_eq!(ctx.lookup("theme.fg"), Some(&json!("red")));
    }

    #[test]
    fn test_context_default_theme_yields_to_ambient() {
        let defaults = Props::new().theme(Theme::new().set("fg", "grey"));
        let props = Props::new().with_defaults(&defaults);
        let ambient = Theme::new().set("fg", "red");

        let ctx = RenderContext::resolve(&props, Some(&ambient), &defaults);
        assert_eq!(ctx.lookup("theme.fg"), Some(&json!("red")));
    }

    #[test]
    fn test_context_lookup_props() {
        let props = Props::new().set("box", json!({ "pad": [1, 2] }));
        let ctx = RenderContext::resolve(&props, None, &Props::new());

        assert_eq!(ctx.lookup("box.pad.1"), Some(&json!(2)));
        assert!(ctx.lookup("box.margin").is_none());
        assert!(ctx.lookup("missing").is_none());
    }

    #[test]
    fn test_context_serializes_flat() {
        let ambient = Theme::new().set("fg", "red");
        let ctx = RenderContext::resolve(&Props::new().set("size", 2), Some(&ambient), &Props::new());
        assert_eq!(
            serde_json::to_value(&ctx).unwrap(),
            json!({ "size": 2, "theme": { "fg": "red" } })
        );
    }

    #[test]
    fn test_props_set_theme_becomes_theme_prop() {
        let props = Props::new().set("theme", json!({ "fg": "teal" }));
        assert_eq!(props.get("theme"), None);
        assert_eq!(props.own_theme(), Some(&Theme::new().set("fg", "teal")));

        let ctx = RenderContext::resolve(&props, None, &Props::new());
        assert_eq!(ctx.lookup("theme.fg"), Some(&json!("teal")));
        assert_eq!(ctx.to_value(), json!({ "theme": { "fg": "teal" } }));
    }

    #[test]
    fn test_props_set_non_object_theme_clears_it() {
        let props = Props::new()
            .theme(Theme::new().set("fg", "teal"))
            .set("theme", Value::Null);
        assert!(props.own_theme().is_none());
        assert!(props.get("theme").is_none());
    }
}
