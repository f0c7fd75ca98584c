/// Convenience result type used across wdgt.
pub type WdgtResult<T> = Result<T, WdgtError>;

/// Top-level error taxonomy used by infrastructure APIs (stores, transports, tooling).
///
/// Widget-level failures that callers are expected to branch on have their own enums:
/// [`crate::DefinitionError`] for decoding and [`crate::ResolveError`] for the fetch pipeline.
#[derive(thiserror::Error, Debug)]
pub enum WdgtError {
    /// Invalid caller-provided data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by a cache store backend, with the failing operation and path.
    #[error("storage error: {0}")]
    Storage(String),

    /// Errors raised by a transport before any response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WdgtError {
    /// Build a [`WdgtError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WdgtError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`WdgtError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
