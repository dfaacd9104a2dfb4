//! Error types for the fallible context-conversion surface.
//!
//! The crate's product is itself an error value, so almost nothing here
//! returns `Result`. The one exception is converting arbitrary caller values
//! into storable context entries, exposed through the `try_*` methods on
//! [`crate::CtxManager`].

use thiserror::Error;

/// Result type for fallible context operations.
pub type Result<T> = std::result::Result<T, ContextError>;

/// Errors that can occur when storing context values.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The value could not be converted into a storable JSON form.
    #[error("context value error: {0}")]
    Value(#[from] serde_json::Error),
}
