// Message types
//
// ConversationMessage is the host-agnostic shape of a single message in the
// conversation history, as handed to the dispatcher by the rendering
// collaborator. Content may arrive as plain text or as already-structured
// JSON; tool-result messages carry the tool name in `name`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// User message
    User,
    /// Assistant response (may request tool calls)
    Assistant,
    /// Tool execution result
    Tool,
    /// Any role this core does not dispatch
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
            MessageRole::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for MessageRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            "tool" => MessageRole::Tool,
            _ => MessageRole::Unknown,
        }
    }
}

/// Message content: either raw text or structured JSON
///
/// Tool results commonly arrive as a JSON-encoded string; the dispatcher
/// decodes `Text` content on the tool path and uses `Structured` as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text (user/assistant messages, string-encoded tool results)
    Text(String),
    /// Structured JSON (decoded tool results)
    Structured(Value),
}

impl MessageContent {
    /// Get text content if this is a text message
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s),
            MessageContent::Structured(_) => None,
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<Value> for MessageContent {
    fn from(v: Value) -> Self {
        MessageContent::Structured(v)
    }
}

/// Tool call requested by the assistant
///
/// Surfaced as an informational item at render time; actually invoking the
/// tool is the LLM runtime's job, not this core's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique ID for this tool call
    pub id: String,
    /// Tool name to execute
    pub name: String,
    /// Arguments as JSON
    pub arguments: Value,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique message ID
    pub id: Uuid,

    /// Message role
    pub role: MessageRole,

    /// Message content
    pub content: MessageContent,

    /// Tool name (present on tool-result messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool calls requested by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Tool call ID this result corresponds to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp when the message was created
    pub created_at: DateTime<Utc>,
}

impl ConversationMessage {
    /// Create a new user message
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: MessageRole::User,
            content: content.into(),
            name: None,
            tool_calls: None,
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: MessageRole::Assistant,
            content: MessageContent::Text(content.into()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new assistant message with tool calls
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::assistant(content)
        }
    }

    /// Create a tool result message
    pub fn tool_result(name: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: MessageRole::Tool,
            content: content.into(),
            name: Some(name.into()),
            tool_calls: None,
            tool_call_id: None,
            created_at: Utc::now(),
        }
    }

    /// Set the tool call ID this result corresponds to
    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    /// Get text content if this is a text message
    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }

    /// Check if this message has tool calls
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|tc| !tc.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = ConversationMessage::user("Hello");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.text(), Some("Hello"));
    }

    #[test]
    fn test_tool_result_message() {
        let msg = ConversationMessage::tool_result(
            "weather.getCurrentWeather",
            serde_json::json!({"temp_c": 18}),
        )
        .with_tool_call_id("call_123");
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.name.as_deref(), Some("weather.getCurrentWeather"));
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_123"));
    }

    #[test]
    fn test_unknown_role_deserializes_to_catch_all() {
        let json = r#"{
            "id": "018f6a10-0000-7000-8000-000000000000",
            "role": "system",
            "content": "You are helpful.",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;

        let msg: ConversationMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.role, MessageRole::Unknown);
    }

    #[test]
    fn test_content_untagged_decoding() {
        let text: MessageContent = serde_json::from_str(r#""plain""#).unwrap();
        assert_eq!(text.as_text(), Some("plain"));

        let structured: MessageContent = serde_json::from_str(r#"{"a": 1}"#).unwrap();
        assert!(matches!(structured, MessageContent::Structured(_)));
    }

    #[test]
    fn test_has_tool_calls() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "todo.list".to_string(),
            arguments: serde_json::json!({}),
        };
        let msg = ConversationMessage::assistant_with_tools("", vec![call]);
        assert!(msg.has_tool_calls());
        assert!(!ConversationMessage::assistant("hi").has_tool_calls());
    }
}
