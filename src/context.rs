//! Context manager: holds sanitized ambient facts for a unit of work and
//! acts as the factory for trace frames.

use crate::error::Result;
use crate::policy::{self, SanitizePolicy};
use crate::sanitize;
use crate::trace::{self, Cause, ErrorTrace};
use serde::Serialize;
use serde_json::{Map, Value};
use std::panic::Location;
use tracing::debug;

/// Per-unit-of-work holder of a sanitized key/value mapping.
///
/// Create one manager per logical unit of work (request, job), mutate it as
/// facts become known, and call its wrap/new operations at failure sites.
/// The manager is not internally synchronized: sharing one across concurrent
/// units of work requires external locking.
#[derive(Debug, Clone, Default)]
pub struct CtxManager {
    context: Map<String, Value>,
    /// Explicitly injected policy; when absent the process-wide default is
    /// consulted at each sanitization call.
    policy: Option<SanitizePolicy>,
}

impl CtxManager {
    /// Construct a manager, sanitizing the input mapping immediately against
    /// the process-wide policy.
    ///
    /// Input that is not a string-keyed mapping degrades to empty context.
    pub fn set_context<T: Serialize>(context: T) -> Self {
        let policy = policy::default_policy();
        Self {
            context: sanitize::sanitize_context(&policy, context),
            policy: None,
        }
    }

    /// Construct a manager with an explicitly injected policy, bypassing the
    /// process-wide default entirely.
    pub fn with_policy<T: Serialize>(policy: SanitizePolicy, context: T) -> Self {
        Self {
            context: sanitize::sanitize_context(&policy, context),
            policy: Some(policy),
        }
    }

    /// Add or overwrite one entry, sanitizing it before storage.
    ///
    /// A value that cannot be converted is dropped rather than surfaced; use
    /// [`try_add_context`](Self::try_add_context) to observe the failure.
    pub fn add_context<V: Serialize>(&mut self, key: impl Into<String>, value: V) {
        if let Err(err) = self.try_add_context(key, value) {
            debug!(error = %err, "context value dropped");
        }
    }

    /// As [`add_context`](Self::add_context), surfacing conversion failures.
    pub fn try_add_context<V: Serialize>(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value)?;
        let policy = self.policy_snapshot();
        let sanitized = sanitize::sanitize_value(&policy, &key, value);
        self.context.insert(key, sanitized);
        Ok(())
    }

    /// Read-only view of the stored mapping.
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Wrap a cause with a message, attaching this manager's context to the
    /// new frame. Returns `None` when `cause` is absent.
    #[track_caller]
    pub fn wrap<C: Into<Cause>>(
        &self,
        cause: Option<C>,
        message: impl Into<String>,
    ) -> Option<ErrorTrace> {
        trace::wrap_at(
            cause.map(Into::into),
            message.into(),
            self.context.clone(),
            None,
            Location::caller(),
        )
    }

    /// As [`wrap`](Self::wrap), additionally tagging the resulting trace's
    /// kind (overwriting any kind the wrapped trace carried).
    #[track_caller]
    pub fn wrap_with_kind<C: Into<Cause>>(
        &self,
        kind: impl Into<String>,
        cause: Option<C>,
        message: impl Into<String>,
    ) -> Option<ErrorTrace> {
        trace::wrap_at(
            cause.map(Into::into),
            message.into(),
            self.context.clone(),
            Some(kind.into()),
            Location::caller(),
        )
    }

    /// Originate a fresh single-frame trace carrying this manager's context.
    #[track_caller]
    pub fn new_trace(&self, message: impl Into<String>) -> ErrorTrace {
        trace::new_at(
            message.into(),
            self.context.clone(),
            None,
            Location::caller(),
        )
    }

    /// As [`new_trace`](Self::new_trace), with a kind tag.
    #[track_caller]
    pub fn new_trace_with_kind(
        &self,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> ErrorTrace {
        trace::new_at(
            message.into(),
            self.context.clone(),
            Some(kind.into()),
            Location::caller(),
        )
    }

    fn policy_snapshot(&self) -> SanitizePolicy {
        match &self.policy {
            Some(policy) => policy.clone(),
            None => policy::default_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> CtxManager {
        CtxManager::with_policy(
            SanitizePolicy::with_denylist(["password"]),
            json!({ "request_id": "r-1", "password": "hunter2" }),
        )
    }

    #[test]
    fn test_set_context_sanitizes_immediately() {
        let ctx = manager();
        assert_eq!(ctx.context()["password"], json!("hidden"));
        assert_eq!(ctx.context()["request_id"], json!("r-1"));
    }

    #[test]
    fn test_add_context_sanitizes_new_entry() {
        let mut ctx = manager();
        ctx.add_context("password", "changed");
        ctx.add_context("attempt", 2);
        ctx.add_context("auth", json!({ "password": "nested", "user": "alice" }));

        assert_eq!(ctx.context()["password"], json!("hidden"));
        assert_eq!(ctx.context()["attempt"], json!(2));
        assert_eq!(ctx.context()["auth"]["password"], json!("hidden"));
        assert_eq!(ctx.context()["auth"]["user"], json!("alice"));
    }

    #[test]
    fn test_add_context_overwrites() {
        let mut ctx = manager();
        ctx.add_context("request_id", "r-2");
        assert_eq!(ctx.context()["request_id"], json!("r-2"));
    }

    #[test]
    fn test_wrap_attaches_context_snapshot() {
        let ctx = manager();
        let trace = ctx.wrap(Some("db timeout"), "fetching user").unwrap();

        let frame = &trace.frames()[0];
        assert_eq!(frame.context["request_id"], json!("r-1"));
        assert_eq!(frame.context["password"], json!("hidden"));
        assert_eq!(frame.error, "db timeout");
    }

    #[test]
    fn test_snapshot_not_affected_by_later_mutation() {
        let mut ctx = manager();
        let trace = ctx.new_trace("before");
        ctx.add_context("late_fact", "x");

        assert!(trace.frames()[0].context.get("late_fact").is_none());
    }

    #[test]
    fn test_wrap_absent_cause_is_absent() {
        let ctx = manager();
        assert!(ctx.wrap(None::<Cause>, "msg").is_none());
        assert!(ctx.wrap_with_kind("Internal", None::<Cause>, "msg").is_none());
    }

    #[test]
    fn test_new_with_kind() {
        let ctx = manager();
        let trace = ctx.new_trace_with_kind("missing row", "NotFound");
        assert_eq!(trace.kind(), Some("NotFound"));
        assert_eq!(trace.message(), "missing row");
    }

    #[test]
    fn test_degraded_context_is_empty_not_fatal() {
        let ctx = CtxManager::with_policy(SanitizePolicy::new(), json!(["not", "a", "mapping"]));
        assert!(ctx.context().is_empty());

        let trace = ctx.wrap(Some("cause"), "still works").unwrap();
        assert_eq!(trace.message(), "still works");
    }
}
