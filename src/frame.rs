//! Error frame: one immutable annotation event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::panic::Location;

/// A single annotation event in a trace.
///
/// Frames are immutable once created. The serialized field names are the
/// wire contract; `context` and `error` are omitted when empty. `error` is
/// populated only on a frame that wrapped an opaque cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorFrame {
    /// Human-readable message supplied at the wrap/new call site.
    pub message: String,

    /// Source file of the call site, best-effort.
    #[serde(default)]
    pub file_name: String,

    /// Line number of the call site, 0 if unavailable.
    #[serde(default)]
    pub line: u32,

    /// Function name of the call site, best-effort. `std::panic::Location`
    /// does not expose it, so this stays empty unless a caller-supplied
    /// capture mechanism fills it in.
    #[serde(default)]
    pub function_name: String,

    /// Sanitized context snapshot taken when the frame was created.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,

    /// Textual rendering of an opaque cause, empty when this frame wraps
    /// another trace.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl ErrorFrame {
    /// Build a frame for the given call-site location.
    pub(crate) fn annotate(
        message: String,
        context: Map<String, Value>,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            message,
            file_name: location.file().to_string(),
            line: location.line(),
            function_name: String::new(),
            context,
            error: String::new(),
        }
    }
}
