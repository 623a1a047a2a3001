// Dispatch diagnostics
//
// Every recoverable failure on the dispatch path is surfaced as a
// DispatchSignal through a SignalSink, so hosts and tests observe failure
// paths deterministically instead of scraping logs. Signals never carry
// control flow: the dispatcher has already degraded to a fallback render by
// the time one is emitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Severity of a dispatch signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Misconfiguration or host wiring gap; the view degrades silently
    Warning,
    /// The message could not be rendered as intended
    Error,
}

/// Diagnostic signals emitted during message and action dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DispatchSignal {
    /// Tool message arrived without a tool name
    MalformedMessage {
        message_id: String,
        detail: String,
        timestamp: DateTime<Utc>,
    },

    /// No definition registered for the message's tool name
    UnknownTool {
        tool_name: String,
        timestamp: DateTime<Utc>,
    },

    /// Content decode or view transform failed
    DataTransformError {
        tool_name: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// Message role this core does not dispatch
    UnsupportedRole {
        role: String,
        timestamp: DateTime<Utc>,
    },

    /// Action name not present in the definition's action map
    UnknownAction {
        tool_name: String,
        action: String,
        timestamp: DateTime<Utc>,
    },

    /// Redirect action fired but no redirect sink is wired
    NoRedirectSink {
        tool_name: String,
        action: String,
        target_tool: String,
        timestamp: DateTime<Utc>,
    },

    /// Local action names a function absent from local_functions
    UnknownLocalFunction {
        tool_name: String,
        function: String,
        timestamp: DateTime<Utc>,
    },

    /// Local function raised; the fault was caught and swallowed
    LocalFunctionError {
        tool_name: String,
        function: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl DispatchSignal {
    /// Create a malformed message signal
    pub fn malformed_message(message_id: impl Into<String>, detail: impl Into<String>) -> Self {
        DispatchSignal::MalformedMessage {
            message_id: message_id.into(),
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an unknown tool signal
    pub fn unknown_tool(tool_name: impl Into<String>) -> Self {
        DispatchSignal::UnknownTool {
            tool_name: tool_name.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a data transform error signal
    pub fn data_transform_error(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        DispatchSignal::DataTransformError {
            tool_name: tool_name.into(),
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an unsupported role signal
    pub fn unsupported_role(role: impl Into<String>) -> Self {
        DispatchSignal::UnsupportedRole {
            role: role.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an unknown action signal
    pub fn unknown_action(tool_name: impl Into<String>, action: impl Into<String>) -> Self {
        DispatchSignal::UnknownAction {
            tool_name: tool_name.into(),
            action: action.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a missing redirect sink signal
    pub fn no_redirect_sink(
        tool_name: impl Into<String>,
        action: impl Into<String>,
        target_tool: impl Into<String>,
    ) -> Self {
        DispatchSignal::NoRedirectSink {
            tool_name: tool_name.into(),
            action: action.into(),
            target_tool: target_tool.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an unknown local function signal
    pub fn unknown_local_function(
        tool_name: impl Into<String>,
        function: impl Into<String>,
    ) -> Self {
        DispatchSignal::UnknownLocalFunction {
            tool_name: tool_name.into(),
            function: function.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a local function error signal
    pub fn local_function_error(
        tool_name: impl Into<String>,
        function: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        DispatchSignal::LocalFunctionError {
            tool_name: tool_name.into(),
            function: function.into(),
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    /// Severity classification for this signal
    pub fn severity(&self) -> Severity {
        match self {
            DispatchSignal::MalformedMessage { .. } => Severity::Error,
            DispatchSignal::UnknownTool { .. } => Severity::Warning,
            DispatchSignal::DataTransformError { .. } => Severity::Error,
            DispatchSignal::UnsupportedRole { .. } => Severity::Error,
            DispatchSignal::UnknownAction { .. } => Severity::Warning,
            DispatchSignal::NoRedirectSink { .. } => Severity::Warning,
            DispatchSignal::UnknownLocalFunction { .. } => Severity::Warning,
            DispatchSignal::LocalFunctionError { .. } => Severity::Error,
        }
    }

    /// The tool name this signal concerns, if it has one
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            DispatchSignal::MalformedMessage { .. } | DispatchSignal::UnsupportedRole { .. } => {
                None
            }
            DispatchSignal::UnknownTool { tool_name, .. }
            | DispatchSignal::DataTransformError { tool_name, .. }
            | DispatchSignal::UnknownAction { tool_name, .. }
            | DispatchSignal::NoRedirectSink { tool_name, .. }
            | DispatchSignal::UnknownLocalFunction { tool_name, .. }
            | DispatchSignal::LocalFunctionError { tool_name, .. } => Some(tool_name),
        }
    }
}

// ============================================================================
// SignalSink - Where diagnostics go
// ============================================================================

/// Receiver for dispatch diagnostics
///
/// Implementations can:
/// - Log signals through `tracing` (the default)
/// - Collect signals in memory for test assertions
/// - Forward signals to the host's own telemetry
pub trait SignalSink: Send + Sync {
    /// Receive a single signal
    fn emit(&self, signal: DispatchSignal);
}

/// Default sink: logs each signal through `tracing` at its severity
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSignalSink;

impl SignalSink for TracingSignalSink {
    fn emit(&self, signal: DispatchSignal) {
        match signal.severity() {
            Severity::Warning => warn!(signal = ?signal, "dispatch signal"),
            Severity::Error => error!(signal = ?signal, "dispatch signal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classification() {
        assert_eq!(
            DispatchSignal::unknown_tool("todo.list").severity(),
            Severity::Warning
        );
        assert_eq!(
            DispatchSignal::data_transform_error("todo.list", "bad json").severity(),
            Severity::Error
        );
        assert_eq!(
            DispatchSignal::no_redirect_sink("todo.list", "toggleTodo", "todo.toggle").severity(),
            Severity::Warning
        );
        assert_eq!(
            DispatchSignal::local_function_error("todo.list", "exportJson", "boom").severity(),
            Severity::Error
        );
    }

    #[test]
    fn test_tool_name_accessor() {
        assert_eq!(
            DispatchSignal::unknown_tool("todo.list").tool_name(),
            Some("todo.list")
        );
        assert_eq!(
            DispatchSignal::unsupported_role("system").tool_name(),
            None
        );
    }

    #[test]
    fn test_signal_serializes() {
        let signal = DispatchSignal::unknown_action("todo.list", "nope");
        let json = serde_json::to_string(&signal).unwrap();
        assert!(json.contains("todo.list"));
        assert!(json.contains("nope"));
    }
}
