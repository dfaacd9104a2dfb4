//! Sanitization policy configuration.
//!
//! Defines which context keys are considered sensitive. A policy can be
//! passed explicitly to [`crate::CtxManager::with_policy`], or managed as a
//! process-wide default mutated through [`set_denylist`] / [`append_denylist`].
//! Denylist configuration is intended as a startup-time action; mutations
//! only affect sanitization calls made after them.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

/// Placeholder stored in place of a denylisted value.
pub const HIDDEN_PLACEHOLDER: &str = "hidden";

/// Sanitization policy: the set of context keys whose values are hidden.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanitizePolicy {
    /// Keys whose values are replaced with [`HIDDEN_PLACEHOLDER`].
    #[serde(default)]
    denylist: HashSet<String>,
}

impl SanitizePolicy {
    /// Create a policy with an empty denylist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy from an initial set of denylisted keys.
    pub fn with_denylist<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denylist: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether values under this key must be hidden.
    pub fn is_denied(&self, key: &str) -> bool {
        self.denylist.contains(key)
    }

    /// Replace the denylist entirely.
    pub fn set_denylist<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylist = fields.into_iter().map(Into::into).collect();
    }

    /// Append entries to the denylist, keeping existing ones.
    pub fn append_denylist<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylist.extend(fields.into_iter().map(Into::into));
    }
}

/// Process-wide default policy, consulted by managers built without an
/// explicit one. Lock poisoning is absorbed: a panic elsewhere must not
/// break sanitization on the caller's failure path.
static DEFAULT_POLICY: Lazy<RwLock<SanitizePolicy>> =
    Lazy::new(|| RwLock::new(SanitizePolicy::new()));

/// Replace the process-wide denylist entirely.
pub fn set_denylist<I, S>(fields: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DEFAULT_POLICY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .set_denylist(fields);
}

/// Append entries to the process-wide denylist.
pub fn append_denylist<I, S>(fields: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    DEFAULT_POLICY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .append_denylist(fields);
}

/// Snapshot of the current process-wide policy.
pub(crate) fn default_policy() -> SanitizePolicy {
    DEFAULT_POLICY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
