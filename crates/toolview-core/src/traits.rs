// Collaborator seams
//
// The dispatcher talks to the outside world through narrow traits:
// - RedirectSink: the upward collaborator that owns LLM round-trips and
//   turns redirect requests into actual tool calls
// - SignalSink (signals.rs): the diagnostic channel
//
// Rendering itself is not a trait here - the dispatcher returns
// RenderInstruction values and the host UI interprets them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A new tool-call request produced by a redirect action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectRequest {
    /// Tool the conversation should call next
    pub target_tool: String,
    /// Call parameters, already mapped from the UI action params
    pub call_params: Value,
}

/// Receiver for redirect requests
///
/// Implementations can:
/// - Append a tool-call request to the live conversation and trigger the
///   LLM runtime
/// - Collect requests in memory for testing
#[async_trait]
pub trait RedirectSink: Send + Sync {
    /// Receive a single redirect request
    async fn emit(&self, request: RedirectRequest) -> Result<()>;
}
