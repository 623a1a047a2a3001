// Error types for definition building, registration and execution
//
// Recoverable dispatch failures are NOT errors: they are emitted as
// DispatchSignal values (see signals.rs) and the dispatcher degrades to a
// fallback render. ComponentError covers the paths where an operation can
// legitimately refuse to proceed.

use thiserror::Error;

/// Result type alias for toolview operations
pub type Result<T> = std::result::Result<T, ComponentError>;

/// Errors returned by the definition builder, the registry and the executor
#[derive(Debug, Error)]
pub enum ComponentError {
    /// Definition rejected before entering the registry
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// No definition registered under the requested tool name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ComponentError {
    /// Create an invalid definition error
    pub fn invalid(msg: impl Into<String>) -> Self {
        ComponentError::InvalidDefinition(msg.into())
    }

    /// Create a tool not found error
    pub fn not_found(tool_name: impl Into<String>) -> Self {
        ComponentError::ToolNotFound(tool_name.into())
    }
}
