//! Content-derived identities for global styles.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::rules::RuleSequence;

/// Prefix shared by every global style identity.
pub const GLOBAL_ID_PREFIX: &str = "sc-global-";

/// Number of digest bytes kept in a token.
const TOKEN_BYTES: usize = 5;

/// Maps serialized rules to a short, stable token.
///
/// Implementations must be deterministic and total: the same input always
/// produces the same token, of the same length and alphabet.
pub trait IdentityHasher {
    fn hash(&self, serialized: &str) -> String;
}

/// Default hasher: the first bytes of a SHA-256 digest, lower hex.
///
/// Tokens are always 10 characters of `[0-9a-f]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl IdentityHasher for Sha256Hasher {
    fn hash(&self, serialized: &str) -> String {
        let digest = Sha256::digest(serialized.as_bytes());
        hex::encode(&digest[..TOKEN_BYTES])
    }
}

/// Identity of a global style: the deduplication key for a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(String);

impl StyleId {
    /// Computes the identity of `rules` with the default hasher.
    ///
    /// # Example
    ///
    /// ```rust
    /// use global_style::{compile_template, StyleId};
    ///
    /// let a = compile_template("body { margin: 0; }").unwrap();
    /// let b = compile_template("body { margin: 0; }").unwrap();
    /// assert_eq!(StyleId::for_rules(&a), StyleId::for_rules(&b));
    /// assert!(StyleId::for_rules(&a).as_str().starts_with("sc-global-"));
    /// ```
    pub fn for_rules(rules: &RuleSequence) -> Self {
        Self::for_rules_with(rules, &Sha256Hasher)
    }

    /// Computes the identity of `rules` with a caller-supplied hasher.
    pub fn for_rules_with(rules: &RuleSequence, hasher: &dyn IdentityHasher) -> Self {
        StyleId(format!("{}{}", GLOBAL_ID_PREFIX, hasher.hash(&rules.serialized())))
    }

    /// Wraps an already-computed identity string.
    pub fn from_raw(id: impl Into<String>) -> Self {
        StyleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StyleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{compile_template, css, lookup};
    use proptest::prelude::*;

    #[test]
    fn test_sha256_token_shape() {
        let token = Sha256Hasher.hash("anything");
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_identity_has_prefix() {
        let rules = compile_template("body { margin: 0; }").unwrap();
        let id = StyleId::for_rules(&rules);
        assert!(id.as_str().starts_with(GLOBAL_ID_PREFIX));
        assert_eq!(id.as_str().len(), GLOBAL_ID_PREFIX.len() + 10);
    }

    #[test]
    fn test_identity_differs_for_different_rules() {
        let a = compile_template("body { margin: 0; }").unwrap();
        let b = compile_template("body { margin: 1px; }").unwrap();
        assert_ne!(StyleId::for_rules(&a), StyleId::for_rules(&b));
    }

    #[test]
    fn test_identity_ignores_interpolation_output() {
        let a = css(&["a { color: ", "; }"], vec![lookup("theme.fg")]).unwrap();
        let b = css(&["a { color: ", "; }"], vec![lookup("theme.bg")]).unwrap();
        assert_eq!(StyleId::for_rules(&a), StyleId::for_rules(&b));
    }

    #[test]
    fn test_identity_includes_literal_values() {
        let a = css(&["a { color: ", "; }"], vec!["red".into()]).unwrap();
        let b = css(&["a { color: ", "; }"], vec!["blue".into()]).unwrap();
        assert_ne!(StyleId::for_rules(&a), StyleId::for_rules(&b));
    }

    #[test]
    fn test_custom_hasher() {
        struct Fixed;
        impl IdentityHasher for Fixed {
            fn hash(&self, _: &str) -> String {
                "fixed".into()
            }
        }
        let rules = compile_template("a {}").unwrap();
        assert_eq!(StyleId::for_rules_with(&rules, &Fixed).as_str(), "sc-global-fixed");
    }

    proptest! {
        #[test]
        fn prop_identity_is_deterministic(text in "[a-z{}:; ]{0,40}", value in "[a-z0-9]{0,8}") {
            let a = css(&[text.as_str(), ";"], vec![value.clone().into()]).unwrap();
            let b = css(&[text.as_str(), ";"], vec![value.into()]).unwrap();
            prop_assert_eq!(StyleId::for_rules(&a), StyleId::for_rules(&b));
        }

        #[test]
        fn prop_token_shape_is_fixed(input in ".*") {
            let token = Sha256Hasher.hash(&input);
            prop_assert_eq!(token.len(), 10);
        }
    }
}
