// Message dispatcher
//
// Classifies inbound conversation messages by role, resolves tool messages
// to registered definitions, applies the view transform, and routes UI
// actions to either a tool-call redirect or a local function.
//
// Every fallible stage is isolated: a malformed tool result degrades to a
// visible fallback plus a DispatchSignal. Nothing on this path may take down
// the surrounding conversation view.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::definition::{ActionSpec, ComponentDefinition};
use crate::message::{ConversationMessage, MessageContent, MessageRole, ToolCall};
use crate::registry::ComponentRegistry;
use crate::signals::{DispatchSignal, SignalSink, TracingSignalSink};
use crate::traits::{RedirectRequest, RedirectSink};

// ============================================================================
// RenderInstruction - What the host UI should do with a message
// ============================================================================

/// Render instruction returned for one dispatched message
#[derive(Debug, Clone)]
pub enum RenderInstruction {
    /// Plain user message content, passed through
    User { content: MessageContent },

    /// Assistant text (None when empty) plus requested-but-not-yet-executed
    /// tool calls, surfaced as informational items
    Assistant {
        text: Option<String>,
        tool_calls: Vec<ToolCall>,
    },

    /// An interactive component: transformed view data plus the action
    /// dispatcher bound to its definition
    Component {
        tool_name: String,
        view_data: Value,
        actions: ActionDispatcher,
    },

    /// Raw display of a tool result with no registered definition
    RawToolResult {
        tool_name: String,
        content: MessageContent,
    },

    /// Clearly-labeled error block in place of a component
    ErrorFallback {
        tool_name: Option<String>,
        reason: String,
    },
}

impl RenderInstruction {
    /// View data, if this instruction renders a component
    pub fn view_data(&self) -> Option<&Value> {
        match self {
            RenderInstruction::Component { view_data, .. } => Some(view_data),
            _ => None,
        }
    }

    /// The bound action dispatcher, if this instruction renders a component
    pub fn actions(&self) -> Option<&ActionDispatcher> {
        match self {
            RenderInstruction::Component { actions, .. } => Some(actions),
            _ => None,
        }
    }
}

// ============================================================================
// MessageDispatcher
// ============================================================================

/// Stateless dispatcher over one inbound conversation message at a time
///
/// All state lives in the message and the registry; two independent messages
/// may be dispatched concurrently.
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(ComponentRegistry::new());
/// registry.register(simple_text_display()?)?;
///
/// let dispatcher = MessageDispatcher::new(registry)
///     .with_redirect_sink(Arc::new(InMemoryRedirectSink::new()));
///
/// match dispatcher.dispatch(&message) {
///     RenderInstruction::Component { view_data, actions, .. } => {
///         // hand (view_data, actions) to the rendering layer
///     }
///     other => { /* fallback rendering */ }
/// }
/// ```
pub struct MessageDispatcher {
    registry: Arc<ComponentRegistry>,
    redirect_sink: Option<Arc<dyn RedirectSink>>,
    signals: Arc<dyn SignalSink>,
}

impl MessageDispatcher {
    /// Create a dispatcher over a registry, with diagnostics going to
    /// the default tracing sink and no redirect sink wired
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self {
            registry,
            redirect_sink: None,
            signals: Arc::new(TracingSignalSink),
        }
    }

    /// Wire the upward collaborator that owns LLM round-trips
    pub fn with_redirect_sink(mut self, sink: Arc<dyn RedirectSink>) -> Self {
        self.redirect_sink = Some(sink);
        self
    }

    /// Replace the diagnostic sink
    pub fn with_signal_sink(mut self, sink: Arc<dyn SignalSink>) -> Self {
        self.signals = sink;
        self
    }

    /// Dispatch one conversation message into a render instruction.
    ///
    /// Never panics and never returns an error: every failure path degrades
    /// to `RawToolResult` or `ErrorFallback` plus a signal.
    pub fn dispatch(&self, message: &ConversationMessage) -> RenderInstruction {
        match message.role {
            MessageRole::User => RenderInstruction::User {
                content: message.content.clone(),
            },
            MessageRole::Assistant => self.dispatch_assistant(message),
            MessageRole::Tool => self.dispatch_tool(message),
            MessageRole::Unknown => {
                let role = message.role.to_string();
                self.signals
                    .emit(DispatchSignal::unsupported_role(role.as_str()));
                RenderInstruction::ErrorFallback {
                    tool_name: None,
                    reason: format!("Unsupported message role: {role}"),
                }
            }
        }
    }

    fn dispatch_assistant(&self, message: &ConversationMessage) -> RenderInstruction {
        // Only textual content is surfaced; tool calls are informational and
        // are never re-dispatched from here
        let text = message
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);
        let tool_calls = message.tool_calls.clone().unwrap_or_default();
        RenderInstruction::Assistant { text, tool_calls }
    }

    fn dispatch_tool(&self, message: &ConversationMessage) -> RenderInstruction {
        let Some(tool_name) = message.name.as_deref().filter(|n| !n.is_empty()) else {
            self.signals.emit(DispatchSignal::malformed_message(
                message.id.to_string(),
                "tool message is missing a tool name",
            ));
            return RenderInstruction::ErrorFallback {
                tool_name: None,
                reason: "Tool message is missing a tool name".to_string(),
            };
        };

        let Some(definition) = self.registry.get(tool_name) else {
            // Unregistered tools are rendered raw, never silently dropped
            self.signals.emit(DispatchSignal::unknown_tool(tool_name));
            return RenderInstruction::RawToolResult {
                tool_name: tool_name.to_string(),
                content: message.content.clone(),
            };
        };

        let raw_result = match &message.content {
            MessageContent::Text(encoded) => {
                serde_json::from_str::<Value>(encoded).map_err(anyhow::Error::from)
            }
            MessageContent::Structured(value) => Ok(value.clone()),
        };

        let view_data = match raw_result.and_then(|raw| (definition.transform)(raw)) {
            Ok(view_data) => view_data,
            Err(err) => {
                self.signals.emit(DispatchSignal::data_transform_error(
                    tool_name,
                    err.to_string(),
                ));
                return RenderInstruction::ErrorFallback {
                    tool_name: Some(tool_name.to_string()),
                    reason: format!("Failed to prepare view data for {tool_name}"),
                };
            }
        };

        RenderInstruction::Component {
            tool_name: tool_name.to_string(),
            view_data,
            actions: ActionDispatcher {
                definition,
                redirect_sink: self.redirect_sink.clone(),
                signals: self.signals.clone(),
            },
        }
    }
}

impl fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("registry", &self.registry)
            .field("redirect_sink", &self.redirect_sink.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ActionDispatcher - UI actions for one rendered component
// ============================================================================

/// Outcome of dispatching a UI action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A redirect request was handed to the sink
    Redirected { target_tool: String },

    /// A local function ran; `result` is None when its fault was swallowed
    Completed { result: Option<Value> },

    /// The action could not be resolved and was dropped (see signals)
    Ignored,
}

/// Action dispatch handle bound to one rendered component.
///
/// Captured at dispatch time, so it keeps working against the definition the
/// view was rendered from even if the registry entry is overwritten later.
#[derive(Clone)]
pub struct ActionDispatcher {
    definition: Arc<ComponentDefinition>,
    redirect_sink: Option<Arc<dyn RedirectSink>>,
    signals: Arc<dyn SignalSink>,
}

impl ActionDispatcher {
    /// Name of the tool this dispatcher is bound to
    pub fn tool_name(&self) -> &str {
        &self.definition.tool_name
    }

    /// Dispatch a named UI action with its params.
    ///
    /// Unknown actions, missing functions and local faults are signaled and
    /// resolved locally; this call never returns an error.
    pub async fn dispatch(&self, action_name: &str, params: Value) -> ActionOutcome {
        let tool_name = self.definition.tool_name.as_str();

        let Some(spec) = self.definition.actions.get(action_name) else {
            self.signals
                .emit(DispatchSignal::unknown_action(tool_name, action_name));
            return ActionOutcome::Ignored;
        };

        match spec {
            ActionSpec::Redirect {
                target_tool,
                map_params,
            } => {
                let Some(sink) = &self.redirect_sink else {
                    self.signals.emit(DispatchSignal::no_redirect_sink(
                        tool_name,
                        action_name,
                        target_tool.as_str(),
                    ));
                    return ActionOutcome::Ignored;
                };

                let request = RedirectRequest {
                    target_tool: target_tool.clone(),
                    call_params: map_params(params),
                };
                if let Err(err) = sink.emit(request).await {
                    // Delivery is the collaborator's concern; the action
                    // itself already succeeded
                    warn!(
                        tool_name = %tool_name,
                        target_tool = %target_tool,
                        error = %err,
                        "redirect sink rejected request"
                    );
                }
                ActionOutcome::Redirected {
                    target_tool: target_tool.clone(),
                }
            }

            ActionSpec::Local {
                function_name,
                map_params,
            } => {
                let Some(function) = self.definition.local_functions.get(function_name) else {
                    self.signals.emit(DispatchSignal::unknown_local_function(
                        tool_name,
                        function_name.as_str(),
                    ));
                    return ActionOutcome::Ignored;
                };

                let args = map_params(params);
                match function(args).await {
                    Ok(result) => ActionOutcome::Completed {
                        result: Some(result),
                    },
                    Err(err) => {
                        self.signals.emit(DispatchSignal::local_function_error(
                            tool_name,
                            function_name.as_str(),
                            err.to_string(),
                        ));
                        ActionOutcome::Completed { result: None }
                    }
                }
            }
        }
    }
}

impl fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("tool_name", &self.definition.tool_name)
            .field(
                "actions",
                &self.definition.actions.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ComponentDefinition;
    use crate::memory::{InMemoryRedirectSink, InMemorySignalSink};
    use serde_json::json;

    fn registry_with(definition: ComponentDefinition) -> Arc<ComponentRegistry> {
        let registry = Arc::new(ComponentRegistry::new());
        registry.register(definition).unwrap();
        registry
    }

    fn echo_definition(tool_name: &str) -> ComponentDefinition {
        ComponentDefinition::builder(tool_name)
            .input_schema(json!({"type": "object"}))
            .execute(|params| async move { Ok(params) })
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_message_passes_through() {
        let dispatcher = MessageDispatcher::new(Arc::new(ComponentRegistry::new()));
        let message = ConversationMessage::user("hello");

        match dispatcher.dispatch(&message) {
            RenderInstruction::User { content } => assert_eq!(content.as_text(), Some("hello")),
            other => panic!("expected user instruction, got {other:?}"),
        }
    }

    #[test]
    fn test_assistant_empty_text_is_none() {
        let dispatcher = MessageDispatcher::new(Arc::new(ComponentRegistry::new()));
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "todo.list".to_string(),
            arguments: json!({}),
        };
        let message = ConversationMessage::assistant_with_tools("   ", vec![call]);

        match dispatcher.dispatch(&message) {
            RenderInstruction::Assistant { text, tool_calls } => {
                assert!(text.is_none());
                assert_eq!(tool_calls.len(), 1);
                assert_eq!(tool_calls[0].name, "todo.list");
            }
            other => panic!("expected assistant instruction, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_role_signals_and_falls_back() {
        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher = MessageDispatcher::new(Arc::new(ComponentRegistry::new()))
            .with_signal_sink(signals.clone());

        let mut message = ConversationMessage::user("ignored");
        message.role = MessageRole::Unknown;

        assert!(matches!(
            dispatcher.dispatch(&message),
            RenderInstruction::ErrorFallback { .. }
        ));
        assert!(matches!(
            signals.signals()[..],
            [DispatchSignal::UnsupportedRole { .. }]
        ));
    }

    #[test]
    fn test_tool_message_without_name_is_malformed() {
        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher = MessageDispatcher::new(Arc::new(ComponentRegistry::new()))
            .with_signal_sink(signals.clone());

        let mut message = ConversationMessage::tool_result("placeholder", json!({}));
        message.name = None;

        assert!(matches!(
            dispatcher.dispatch(&message),
            RenderInstruction::ErrorFallback { tool_name: None, .. }
        ));
        assert!(matches!(
            signals.signals()[..],
            [DispatchSignal::MalformedMessage { .. }]
        ));
    }

    #[test]
    fn test_unknown_tool_renders_raw() {
        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher = MessageDispatcher::new(Arc::new(ComponentRegistry::new()))
            .with_signal_sink(signals.clone());

        let message = ConversationMessage::tool_result("missing.tool", r#"{"a": 1}"#);

        match dispatcher.dispatch(&message) {
            RenderInstruction::RawToolResult { tool_name, content } => {
                assert_eq!(tool_name, "missing.tool");
                assert_eq!(content.as_text(), Some(r#"{"a": 1}"#));
            }
            other => panic!("expected raw fallback, got {other:?}"),
        }
        assert!(matches!(
            signals.signals()[..],
            [DispatchSignal::UnknownTool { .. }]
        ));
    }

    #[test]
    fn test_string_content_is_decoded_for_identity_transform() {
        let dispatcher = MessageDispatcher::new(registry_with(echo_definition("echo.tool")));
        let message = ConversationMessage::tool_result("echo.tool", r#"{"value": 42}"#);

        let instruction = dispatcher.dispatch(&message);
        assert_eq!(instruction.view_data(), Some(&json!({"value": 42})));
    }

    #[test]
    fn test_decode_failure_signals_transform_error() {
        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher = MessageDispatcher::new(registry_with(echo_definition("echo.tool")))
            .with_signal_sink(signals.clone());

        let message = ConversationMessage::tool_result("echo.tool", "not json");

        assert!(matches!(
            dispatcher.dispatch(&message),
            RenderInstruction::ErrorFallback { .. }
        ));
        match &signals.signals()[..] {
            [DispatchSignal::DataTransformError { tool_name, .. }] => {
                assert_eq!(tool_name, "echo.tool");
            }
            other => panic!("expected transform error signal, got {other:?}"),
        }
    }

    #[test]
    fn test_failing_transform_signals_transform_error() {
        let definition = ComponentDefinition::builder("strict.tool")
            .input_schema(json!({"type": "object"}))
            .execute(|params| async move { Ok(params) })
            .transform(|_| anyhow::bail!("unexpected shape"))
            .build()
            .unwrap();

        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher =
            MessageDispatcher::new(registry_with(definition)).with_signal_sink(signals.clone());

        let message = ConversationMessage::tool_result("strict.tool", json!({"a": 1}));
        assert!(matches!(
            dispatcher.dispatch(&message),
            RenderInstruction::ErrorFallback { .. }
        ));
        assert_eq!(signals.signals().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_action_is_ignored() {
        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher = MessageDispatcher::new(registry_with(echo_definition("echo.tool")))
            .with_signal_sink(signals.clone());

        let message = ConversationMessage::tool_result("echo.tool", json!({}));
        let instruction = dispatcher.dispatch(&message);
        let actions = instruction.actions().unwrap();

        let outcome = actions.dispatch("nonexistent", json!({})).await;
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert!(matches!(
            signals.signals()[..],
            [DispatchSignal::UnknownAction { .. }]
        ));
    }

    #[tokio::test]
    async fn test_redirect_without_sink_is_ignored() {
        let definition = ComponentDefinition::builder("todo.list")
            .input_schema(json!({"type": "object"}))
            .execute(|params| async move { Ok(params) })
            .action("toggleTodo", ActionSpec::redirect_identity("todo.toggle"))
            .build()
            .unwrap();

        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher =
            MessageDispatcher::new(registry_with(definition)).with_signal_sink(signals.clone());

        let message = ConversationMessage::tool_result("todo.list", json!({}));
        let instruction = dispatcher.dispatch(&message);
        let actions = instruction.actions().unwrap();

        let outcome = actions.dispatch("toggleTodo", json!({"id": "42"})).await;
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert!(matches!(
            signals.signals()[..],
            [DispatchSignal::NoRedirectSink { .. }]
        ));
    }

    #[tokio::test]
    async fn test_redirect_emits_exactly_once() {
        let definition = ComponentDefinition::builder("todo.list")
            .input_schema(json!({"type": "object"}))
            .execute(|params| async move { Ok(params) })
            .action(
                "toggleTodo",
                ActionSpec::redirect("todo.toggle", |params| {
                    json!({ "id": params.get("id").cloned().unwrap_or(Value::Null) })
                }),
            )
            .build()
            .unwrap();

        let sink = Arc::new(InMemoryRedirectSink::new());
        let dispatcher = MessageDispatcher::new(registry_with(definition))
            .with_redirect_sink(sink.clone());

        let message = ConversationMessage::tool_result("todo.list", json!({}));
        let instruction = dispatcher.dispatch(&message);
        let actions = instruction.actions().unwrap();

        let outcome = actions.dispatch("toggleTodo", json!({"id": "42"})).await;
        assert_eq!(
            outcome,
            ActionOutcome::Redirected {
                target_tool: "todo.toggle".to_string()
            }
        );

        let requests = sink.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].target_tool, "todo.toggle");
        assert_eq!(requests[0].call_params, json!({"id": "42"}));
    }

    #[tokio::test]
    async fn test_local_function_fault_is_swallowed() {
        let definition = ComponentDefinition::builder("todo.list")
            .input_schema(json!({"type": "object"}))
            .execute(|params| async move { Ok(params) })
            .action("export", ActionSpec::local("exportJson", |params| params))
            .local_function("exportJson", |_| async move {
                anyhow::bail!("disk full")
            })
            .build()
            .unwrap();

        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher =
            MessageDispatcher::new(registry_with(definition)).with_signal_sink(signals.clone());

        let message = ConversationMessage::tool_result("todo.list", json!({}));
        let instruction = dispatcher.dispatch(&message);
        let actions = instruction.actions().unwrap();

        let outcome = actions.dispatch("export", json!({})).await;
        assert_eq!(outcome, ActionOutcome::Completed { result: None });
        match &signals.signals()[..] {
            [DispatchSignal::LocalFunctionError { function, error, .. }] => {
                assert_eq!(function, "exportJson");
                assert!(error.contains("disk full"));
            }
            other => panic!("expected local function error signal, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_local_action_with_missing_function_is_ignored() {
        let definition = ComponentDefinition::builder("todo.list")
            .input_schema(json!({"type": "object"}))
            .execute(|params| async move { Ok(params) })
            .action("export", ActionSpec::local("exportJson", |params| params))
            .build()
            .unwrap();

        let signals = Arc::new(InMemorySignalSink::new());
        let dispatcher =
            MessageDispatcher::new(registry_with(definition)).with_signal_sink(signals.clone());

        let message = ConversationMessage::tool_result("todo.list", json!({}));
        let actions = dispatcher.dispatch(&message).actions().cloned().unwrap();

        let outcome = actions.dispatch("export", json!({})).await;
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert!(matches!(
            signals.signals()[..],
            [DispatchSignal::UnknownLocalFunction { .. }]
        ));
    }
}
