//! Sanitization engine.
//!
//! Applies a [`SanitizePolicy`] to context mappings before they are stored:
//! values under denylisted keys are replaced with the placeholder, and the
//! same substitution is applied one level down into values that are
//! themselves string-keyed mappings. Deeper nesting is left untouched.
//!
//! Sanitization never surfaces a failure. Input that cannot be represented
//! as a string-keyed mapping degrades to an empty context; the degradation
//! is reported through a `tracing` debug event only.

use crate::policy::{SanitizePolicy, HIDDEN_PLACEHOLDER};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Convert an arbitrary serializable value into a sanitized context mapping.
///
/// Returns an empty mapping when the value does not serialize or does not
/// serialize to a string-keyed mapping.
pub fn sanitize_context<T: Serialize>(policy: &SanitizePolicy, context: T) -> Map<String, Value> {
    match serde_json::to_value(context) {
        Ok(Value::Object(map)) => sanitize_map(policy, map),
        Ok(Value::Null) => Map::new(),
        Ok(_) => {
            debug!("context is not a string-keyed mapping; storing empty context");
            Map::new()
        }
        Err(err) => {
            debug!(error = %err, "context not serializable; storing empty context");
            Map::new()
        }
    }
}

/// Sanitize a context mapping: hide denylisted top-level entries and descend
/// exactly one level into nested mappings.
pub fn sanitize_map(policy: &SanitizePolicy, map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let value = sanitize_value(policy, &key, value);
            (key, value)
        })
        .collect()
}

/// Sanitize a single entry's value against the policy.
pub(crate) fn sanitize_value(policy: &SanitizePolicy, key: &str, value: Value) -> Value {
    if policy.is_denied(key) {
        return hidden();
    }
    match value {
        Value::Object(nested) => Value::Object(
            nested
                .into_iter()
                .map(|(k, v)| {
                    // One level only: nested values are not descended into.
                    if policy.is_denied(&k) {
                        (k, hidden())
                    } else {
                        (k, v)
                    }
                })
                .collect(),
        ),
        other => other,
    }
}

fn hidden() -> Value {
    Value::String(HIDDEN_PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> SanitizePolicy {
        SanitizePolicy::with_denylist(["password", "token"])
    }

    #[test]
    fn test_denylisted_key_hidden() {
        let map = sanitize_context(&policy(), json!({ "password": "hunter2", "user": "alice" }));
        assert_eq!(map["password"], json!("hidden"));
        assert_eq!(map["user"], json!("alice"));
    }

    #[test]
    fn test_non_denylisted_values_unchanged() {
        let map = sanitize_context(
            &policy(),
            json!({ "count": 3, "flag": true, "items": ["a", "b"] }),
        );
        assert_eq!(map["count"], json!(3));
        assert_eq!(map["flag"], json!(true));
        assert_eq!(map["items"], json!(["a", "b"]));
    }

    #[test]
    fn test_nested_one_level() {
        let map = sanitize_context(
            &policy(),
            json!({
                "auth": { "token": "abc123", "scheme": "bearer" },
            }),
        );
        assert_eq!(map["auth"]["token"], json!("hidden"));
        assert_eq!(map["auth"]["scheme"], json!("bearer"));
    }

    #[test]
    fn test_two_levels_deep_untouched() {
        let map = sanitize_context(
            &policy(),
            json!({
                "outer": { "inner": { "password": "deep-secret" } },
            }),
        );
        assert_eq!(map["outer"]["inner"]["password"], json!("deep-secret"));
    }

    #[test]
    fn test_denylisted_mapping_hidden_whole() {
        // A denylisted key hides the value even when it is itself a mapping.
        let map = sanitize_context(&policy(), json!({ "token": { "value": "abc" } }));
        assert_eq!(map["token"], json!("hidden"));
    }

    #[test]
    fn test_non_mapping_input_degrades_to_empty() {
        assert!(sanitize_context(&policy(), json!("just a string")).is_empty());
        assert!(sanitize_context(&policy(), json!(42)).is_empty());
        assert!(sanitize_context(&policy(), json!(null)).is_empty());
    }
}
