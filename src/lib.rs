//! Contextualized error traces.
//!
//! This crate lets call sites attach contextual metadata (key/value facts
//! known at the point of failure) and a human-readable message to an
//! underlying failure, producing an ordered chain of annotated frames that
//! can be serialized, inspected, and re-wrapped as the failure propagates
//! upward.
//!
//! # Key Features
//!
//! - **Sanitized context**: values stored under denylisted keys are replaced
//!   with a fixed placeholder before they ever enter a frame, including one
//!   level of nested mappings.
//! - **Depth-preserving wrapping**: wrapping an existing trace prepends a new
//!   frame; the earliest root cause is always the last frame, the latest
//!   context always the first.
//! - **Fail-safe**: sanitization and serialization never surface a failure on
//!   the caller's error path; degraded paths fall back to empty context or a
//!   textual rendering.
//! - **Call-site capture**: each frame records the file and line of the
//!   application code that created it, via `#[track_caller]`.
//!
//! # Example
//!
//! ```
//! use ctxtrace::{Cause, CtxManager};
//! use serde_json::json;
//!
//! ctxtrace::append_denylist(["password"]);
//!
//! let mut ctx = CtxManager::set_context(json!({ "request_id": "r-42" }));
//! ctx.add_context("user", "alice");
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
//! let trace = ctx
//!     .wrap(Some(Cause::from_error(&io_err)), "loading profile")
//!     .unwrap();
//! assert_eq!(trace.message(), "loading profile");
//! ```

pub mod context;
pub mod error;
pub mod frame;
pub mod policy;
pub mod sanitize;
pub mod trace;

pub use context::CtxManager;
pub use error::{ContextError, Result};
pub use frame::ErrorFrame;
pub use policy::{append_denylist, set_denylist, SanitizePolicy, HIDDEN_PLACEHOLDER};
pub use sanitize::{sanitize_context, sanitize_map};
pub use trace::{new_trace, new_trace_with_kind, wrap, wrap_with_kind, Cause, ErrorTrace};
