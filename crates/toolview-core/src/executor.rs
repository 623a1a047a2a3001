//! ToolCallExecutor - Server-side execution of registered definitions
//!
//! The dispatcher never runs a definition's execute function; the runtime
//! that owns the LLM round-trip does. ToolCallExecutor is the in-process
//! form of that runtime: resolve a call against a registry, run the
//! definition's execute, and package the outcome as a tool-role message
//! ready to be dispatched back into the conversation view.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::error::{ComponentError, Result};
use crate::message::{ConversationMessage, ToolCall};
use crate::registry::ComponentRegistry;
use crate::traits::RedirectRequest;

/// Executes tool calls against the definitions in a registry
#[derive(Debug, Clone)]
pub struct ToolCallExecutor {
    registry: Arc<ComponentRegistry>,
}

impl ToolCallExecutor {
    /// Create a new executor over a registry
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a tool call and package the outcome as a tool-role message.
    ///
    /// Execution faults are logged with full detail but reach the
    /// conversation only as a generic `{"error": ...}` payload, so internal
    /// failures never leak and the message still renders.
    pub async fn execute(&self, tool_call: &ToolCall) -> Result<ConversationMessage> {
        let definition = self
            .registry
            .get(&tool_call.name)
            .ok_or_else(|| ComponentError::not_found(tool_call.name.as_str()))?;

        let content = match (definition.execute)(tool_call.arguments.clone()).await {
            Ok(result) => result,
            Err(err) => {
                error!(
                    tool_name = %tool_call.name,
                    tool_call_id = %tool_call.id,
                    error = %err,
                    "tool execution failed (details hidden from the conversation)"
                );
                serde_json::json!({
                    "error": "An internal error occurred while executing the tool"
                })
            }
        };

        Ok(
            ConversationMessage::tool_result(tool_call.name.as_str(), content)
                .with_tool_call_id(tool_call.id.as_str()),
        )
    }

    /// Execute a redirect request, minting a fresh call ID for it
    pub async fn execute_redirect(&self, request: &RedirectRequest) -> Result<ConversationMessage> {
        let tool_call = ToolCall {
            id: Uuid::now_v7().to_string(),
            name: request.target_tool.clone(),
            arguments: request.call_params.clone(),
        };
        self.execute(&tool_call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ComponentDefinition;
    use crate::message::{MessageContent, MessageRole};
    use serde_json::json;

    fn registry() -> Arc<ComponentRegistry> {
        let registry = Arc::new(ComponentRegistry::new());
        registry
            .register(
                ComponentDefinition::builder("echo.tool")
                    .input_schema(json!({"type": "object"}))
                    .execute(|params| async move { Ok(params) })
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                ComponentDefinition::builder("broken.tool")
                    .input_schema(json!({"type": "object"}))
                    .execute(|_| async move { anyhow::bail!("connection refused") })
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_execute_packages_result_as_tool_message() {
        let executor = ToolCallExecutor::new(registry());
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "echo.tool".to_string(),
            arguments: json!({"value": 42}),
        };

        let message = executor.execute(&call).await.unwrap();
        assert_eq!(message.role, MessageRole::Tool);
        assert_eq!(message.name.as_deref(), Some("echo.tool"));
        assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(
            message.content,
            MessageContent::Structured(json!({"value": 42}))
        );
    }

    #[tokio::test]
    async fn test_execute_hides_internal_errors() {
        let executor = ToolCallExecutor::new(registry());
        let call = ToolCall {
            id: "call_2".to_string(),
            name: "broken.tool".to_string(),
            arguments: json!({}),
        };

        let message = executor.execute(&call).await.unwrap();
        match message.content {
            MessageContent::Structured(value) => {
                let error = value["error"].as_str().unwrap();
                assert!(!error.contains("connection refused"));
            }
            other => panic!("expected structured content, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_errors() {
        let executor = ToolCallExecutor::new(registry());
        let call = ToolCall {
            id: "call_3".to_string(),
            name: "missing.tool".to_string(),
            arguments: json!({}),
        };

        assert!(matches!(
            executor.execute(&call).await,
            Err(ComponentError::ToolNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_redirect_mints_call_id() {
        let executor = ToolCallExecutor::new(registry());
        let request = RedirectRequest {
            target_tool: "echo.tool".to_string(),
            call_params: json!({"id": "42"}),
        };

        let message = executor.execute_redirect(&request).await.unwrap();
        assert_eq!(message.name.as_deref(), Some("echo.tool"));
        assert!(message.tool_call_id.is_some());
    }
}
