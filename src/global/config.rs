//! Binder configuration.

use std::env;

use tracing::warn;

/// Environment variable selecting the default [`RemovalPolicy`].
pub const REMOVAL_POLICY_ENV: &str = "GLOBAL_STYLE_REMOVAL";

/// When rules for an identity leave the sheet after its last consumer unmounts.
///
/// Unmounting the last consumer and mounting a new one for the same
/// identity are separate events. With [`Immediate`](Self::Immediate) the
/// rules are removed between them, so styles can briefly go missing until
/// the new consumer renders. [`Deferred`](Self::Deferred) holds the removal
/// until [`LifecycleBinder::flush_removals`](super::LifecycleBinder::flush_removals)
/// runs, and drops it if the identity was mounted again by then.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Remove as soon as the count reaches zero
    #[default]
    Immediate,
    /// Queue the removal until the host's next scheduling tick
    Deferred,
}

impl RemovalPolicy {
    /// Parses `immediate` or `deferred` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "immediate" => Some(RemovalPolicy::Immediate),
            "deferred" => Some(RemovalPolicy::Deferred),
            _ => None,
        }
    }
}

/// Settings for a [`LifecycleBinder`](super::LifecycleBinder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderConfig {
    /// When to remove rules nobody references any more
    pub removal: RemovalPolicy,
    /// Warn when a consumer is handed children it will never render
    pub warn_on_children: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            removal: RemovalPolicy::default(),
            warn_on_children: cfg!(debug_assertions),
        }
    }
}

impl BinderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the removal policy from [`REMOVAL_POLICY_ENV`], falling back
    /// to the default for unset or unrecognized values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(REMOVAL_POLICY_ENV) {
            match RemovalPolicy::parse(&value) {
                Some(policy) => config.removal = policy,
                None => warn!(
                    "ignoring {}={:?}: expected \"immediate\" or \"deferred\"",
                    REMOVAL_POLICY_ENV, value
                ),
            }
        }
        config
    }

    pub fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    pub fn with_warn_on_children(mut self, warn: bool) -> Self {
        self.warn_on_children = warn;
        self
    }
}
