// Toolview Core - Definition Registry and Message Dispatch
//
// This crate lets a conversational agent invoke named tools whose results
// are rendered as interactive components instead of plain text, and lets
// that UI trigger further tool calls or local actions without another LLM
// round-trip.
//
// Key design decisions:
// - Definitions bundle identity, input schema, server execute, view
//   transform and action wiring in one ComponentDefinition
// - The registry is an injectable store object (not a global), so multiple
//   independent registries can coexist in tests and multi-tenant hosts
// - The dispatcher is stateless across messages and render-agnostic: it
//   returns RenderInstruction values for the host UI to interpret
// - Every recoverable failure degrades to a visible fallback plus a
//   DispatchSignal through a pluggable SignalSink; nothing on the dispatch
//   path can take down the surrounding conversation view
// - Redirect actions reach the LLM runtime through the RedirectSink seam;
//   ToolCallExecutor closes the loop in-process for demos and tests

pub mod definition;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod memory;
pub mod message;
pub mod registry;
pub mod signals;
pub mod traits;

// Re-exports for convenience
pub use definition::{
    ActionSpec, ComponentDefinition, ComponentDefinitionBuilder, ExecuteFn, LocalFn, ParamMapFn,
    ToolDescriptor, TransformFn,
};
pub use dispatcher::{ActionDispatcher, ActionOutcome, MessageDispatcher, RenderInstruction};
pub use error::{ComponentError, Result};
pub use executor::ToolCallExecutor;
pub use memory::{InMemoryRedirectSink, InMemorySignalSink};
pub use message::{ConversationMessage, MessageContent, MessageRole, ToolCall};
pub use registry::ComponentRegistry;
pub use signals::{DispatchSignal, Severity, SignalSink, TracingSignalSink};
pub use traits::{RedirectRequest, RedirectSink};
