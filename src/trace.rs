//! Error trace: the ordered frame chain and the wrap/merge algorithm.
//!
//! A trace is a sequence of [`ErrorFrame`]s ordered most-recent-first:
//! index 0 is the latest annotation, the last index the earliest root cause.
//! Wrapping an existing trace prepends a frame and preserves the full depth
//! of the chain; wrapping an opaque cause starts a one-frame chain carrying
//! the cause's textual rendering.

use crate::frame::ErrorFrame;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::panic::Location;

/// What a wrap operation is given as its underlying failure.
///
/// Replaces runtime type probing with an explicit sum type: a cause is
/// either an opaque textual failure produced outside this crate, or a trace
/// produced by it earlier.
#[derive(Debug, Clone)]
pub enum Cause {
    /// Textual rendering of a failure not produced by this crate.
    Opaque(String),
    /// A trace produced earlier, to be extended.
    Trace(ErrorTrace),
}

impl Cause {
    /// Capture an opaque cause from any error value.
    pub fn from_error(err: &(dyn std::error::Error + '_)) -> Self {
        Cause::Opaque(err.to_string())
    }
}

impl From<ErrorTrace> for Cause {
    fn from(trace: ErrorTrace) -> Self {
        Cause::Trace(trace)
    }
}

impl From<String> for Cause {
    fn from(text: String) -> Self {
        Cause::Opaque(text)
    }
}

impl From<&str> for Cause {
    fn from(text: &str) -> Self {
        Cause::Opaque(text.to_string())
    }
}

/// An ordered chain of annotation frames, most recent first.
///
/// Immutable after construction; wrap operations consume the trace and
/// return a new value. A constructed trace always has at least one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorTrace {
    /// Trace-level classification, e.g. "NotFound". At most one is active;
    /// re-tagging replaces it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    #[serde(rename = "trace")]
    frames: Vec<ErrorFrame>,
}

impl ErrorTrace {
    /// The outermost frame's message, or "" if the trace has no frames.
    pub fn message(&self) -> &str {
        self.frames.first().map(|f| f.message.as_str()).unwrap_or("")
    }

    /// All frames, most recent first.
    pub fn frames(&self) -> &[ErrorFrame] {
        &self.frames
    }

    /// The trace's classification, if one was set.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Structured JSON rendering. Falls back to a debug rendering rather
    /// than failing; serialization problems must not surface on the
    /// caller's error path.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

impl fmt::Display for ErrorTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message())?;
        write!(f, "{}", self.to_json())
    }
}

impl std::error::Error for ErrorTrace {}

/// Thread a new frame onto a cause per the merge contract: an existing
/// trace grows from the front, an opaque cause starts a one-frame trace
/// carrying its text.
fn merge(cause: Cause, frame: ErrorFrame) -> ErrorTrace {
    match cause {
        Cause::Trace(mut trace) => {
            trace.frames.insert(0, frame);
            trace
        }
        Cause::Opaque(text) => {
            let mut frame = frame;
            frame.error = text;
            ErrorTrace {
                kind: None,
                frames: vec![frame],
            }
        }
    }
}

/// Shared wrap path for free functions and manager methods. Absent cause
/// means no trace at all, never a trace wrapping nothing.
pub(crate) fn wrap_at(
    cause: Option<Cause>,
    message: String,
    context: Map<String, Value>,
    kind: Option<String>,
    location: &'static Location<'static>,
) -> Option<ErrorTrace> {
    let cause = cause?;
    let frame = ErrorFrame::annotate(message, context, location);
    let mut trace = merge(cause, frame);
    if kind.is_some() {
        trace.kind = kind;
    }
    Some(trace)
}

/// Shared construction path for originating a fresh failure.
pub(crate) fn new_at(
    message: String,
    context: Map<String, Value>,
    kind: Option<String>,
    location: &'static Location<'static>,
) -> ErrorTrace {
    ErrorTrace {
        kind,
        frames: vec![ErrorFrame::annotate(message, context, location)],
    }
}

/// Wrap a cause with a message and no ambient context.
///
/// Returns `None` when `cause` is absent.
#[track_caller]
pub fn wrap<C: Into<Cause>>(cause: Option<C>, message: impl Into<String>) -> Option<ErrorTrace> {
    wrap_at(
        cause.map(Into::into),
        message.into(),
        Map::new(),
        None,
        Location::caller(),
    )
}

/// As [`wrap`], additionally tagging the resulting trace's kind. The tag
/// overwrites any kind the wrapped trace already carried.
#[track_caller]
pub fn wrap_with_kind<C: Into<Cause>>(
    kind: impl Into<String>,
    cause: Option<C>,
    message: impl Into<String>,
) -> Option<ErrorTrace> {
    wrap_at(
        cause.map(Into::into),
        message.into(),
        Map::new(),
        Some(kind.into()),
        Location::caller(),
    )
}

/// Originate a fresh single-frame trace with no underlying cause.
#[track_caller]
pub fn new_trace(message: impl Into<String>) -> ErrorTrace {
    new_at(message.into(), Map::new(), None, Location::caller())
}

/// As [`new_trace`], with a kind tag.
#[track_caller]
pub fn new_trace_with_kind(message: impl Into<String>, kind: impl Into<String>) -> ErrorTrace {
    new_at(
        message.into(),
        Map::new(),
        Some(kind.into()),
        Location::caller(),
    )
}
