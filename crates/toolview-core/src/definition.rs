// Component definitions
//
// A ComponentDefinition bundles everything one tool-backed component needs:
// identity for the LLM (name, description, input schema), the server-side
// execute function, the transform from raw tool result to render-ready view
// data, and the action wiring a rendered view can trigger.
//
// Design decisions:
// - Closures are Arc-wrapped type aliases so definitions clone cheaply into
//   dispatch handles
// - The builder normalizes optional fields (identity transform, empty action
//   and function maps) so no downstream consumer re-checks presence
// - Local actions are resolved against local_functions at dispatch time, not
//   at build time - functions may be attached after construction

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ComponentError, Result};

// ============================================================================
// Closure type aliases
// ============================================================================

/// Server-side execution function: validated call params in, JSON result out.
///
/// Owned by the server-side tool-calling runtime; the dispatcher never
/// invokes it.
pub type ExecuteFn =
    Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Pure transform from a raw tool result to render-ready view data
pub type TransformFn = Arc<dyn Fn(Value) -> anyhow::Result<Value> + Send + Sync>;

/// Maps UI action params onto the params of the action target
pub type ParamMapFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Local side-effecting function, invoked without an LLM round-trip
pub type LocalFn = Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

fn box_async<F, Fut>(function: F) -> Arc<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |params| function(params).boxed())
}

// ============================================================================
// ActionSpec - How a named UI action is handled
// ============================================================================

/// How a named UI interaction is handled.
///
/// Adding a new kind here is a compile-time-checked change: the dispatcher
/// matches exhaustively.
#[derive(Clone)]
pub enum ActionSpec {
    /// Produce a new tool-call request for the upward collaborator
    Redirect {
        /// Tool to call next
        target_tool: String,
        /// Maps the UI action params onto the target tool's call params
        map_params: ParamMapFn,
    },
    /// Run a function from the definition's `local_functions` map
    Local {
        /// Key into `local_functions`
        function_name: String,
        /// Maps the UI action params onto the function's arguments
        map_params: ParamMapFn,
    },
}

impl ActionSpec {
    /// Create a redirect action with a param mapping
    pub fn redirect<F>(target_tool: impl Into<String>, map_params: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        ActionSpec::Redirect {
            target_tool: target_tool.into(),
            map_params: Arc::new(map_params),
        }
    }

    /// Create a redirect action that passes the UI params through unchanged
    pub fn redirect_identity(target_tool: impl Into<String>) -> Self {
        ActionSpec::redirect(target_tool, |params| params)
    }

    /// Create a local action with a param mapping
    pub fn local<F>(function_name: impl Into<String>, map_params: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        ActionSpec::Local {
            function_name: function_name.into(),
            map_params: Arc::new(map_params),
        }
    }
}

impl fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionSpec::Redirect { target_tool, .. } => f
                .debug_struct("Redirect")
                .field("target_tool", target_tool)
                .finish_non_exhaustive(),
            ActionSpec::Local { function_name, .. } => f
                .debug_struct("Local")
                .field("function_name", function_name)
                .finish_non_exhaustive(),
        }
    }
}

// ============================================================================
// ComponentDefinition
// ============================================================================

/// LLM-facing advertisement of one tool: name, description, parameter schema.
///
/// This is what the host sends to the provider so the model knows the tool
/// exists; dispatch logic never consults it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (used by the LLM and for registry lookup)
    pub name: String,
    /// Tool description for the LLM
    pub description: String,
    /// JSON schema for tool parameters
    pub parameters: Value,
}

/// The full definition of one tool-backed component
pub struct ComponentDefinition {
    /// Globally unique tool name, immutable once registered
    pub tool_name: String,

    /// Description for the LLM; never consulted by dispatch logic
    pub description: String,

    /// JSON schema for the tool's call parameters (shape metadata; the
    /// dispatcher does not validate against it)
    pub input_schema: Value,

    /// Server-side execution function
    pub execute: ExecuteFn,

    /// Transform from raw tool result to view data (identity if unset)
    pub transform: TransformFn,

    /// Named UI actions a rendered view can emit
    pub actions: HashMap<String, ActionSpec>,

    /// Targets for `ActionSpec::Local` entries
    pub local_functions: HashMap<String, LocalFn>,
}

impl ComponentDefinition {
    /// Create a builder for this tool name
    pub fn builder(tool_name: impl Into<String>) -> ComponentDefinitionBuilder {
        ComponentDefinitionBuilder::new(tool_name)
    }

    /// Attach a local function to an already-built definition.
    ///
    /// Local actions resolve their target at dispatch time, so functions may
    /// arrive after the definition was constructed (a host wiring UI-side
    /// handlers onto a server-authored definition).
    pub fn attach_local_function<F, Fut>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.local_functions.insert(name.into(), box_async(function));
    }

    /// The LLM-facing descriptor for this definition
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.tool_name.clone(),
            description: self.description.clone(),
            parameters: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("tool_name", &self.tool_name)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field(
                "local_functions",
                &self.local_functions.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ComponentDefinitionBuilder
// ============================================================================

/// Builder for ComponentDefinition.
///
/// Fails closed: `build()` rejects a definition with an empty tool name, a
/// missing input schema, or a missing execute function.
///
/// # Example
///
/// ```ignore
/// let definition = ComponentDefinition::builder("ui.displaySimpleText")
///     .description("Displays a simple text message to the user.")
///     .input_schema(json!({"type": "object"}))
///     .execute(|params| async move { Ok(params) })
///     .transform(|raw| Ok(json!({ "displayText": raw["textToDisplay"] })))
///     .build()?;
/// ```
pub struct ComponentDefinitionBuilder {
    tool_name: String,
    description: String,
    input_schema: Option<Value>,
    execute: Option<ExecuteFn>,
    transform: Option<TransformFn>,
    actions: HashMap<String, ActionSpec>,
    local_functions: HashMap<String, LocalFn>,
}

impl ComponentDefinitionBuilder {
    /// Create a new builder
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            description: String::new(),
            input_schema: None,
            execute: None,
            transform: None,
            actions: HashMap::new(),
            local_functions: HashMap::new(),
        }
    }

    /// Set the description for the LLM
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the JSON schema for the tool's call parameters
    pub fn input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Set the server-side execution function
    pub fn execute<F, Fut>(mut self, function: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.execute = Some(box_async(function));
        self
    }

    /// Set the result-to-view transform (defaults to identity)
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Add a named UI action
    pub fn action(mut self, name: impl Into<String>, spec: ActionSpec) -> Self {
        self.actions.insert(name.into(), spec);
        self
    }

    /// Add a local function (target for `ActionSpec::Local`)
    pub fn local_function<F, Fut>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.local_functions.insert(name.into(), box_async(function));
        self
    }

    /// Build the definition, rejecting structurally invalid input
    pub fn build(self) -> Result<ComponentDefinition> {
        if self.tool_name.trim().is_empty() {
            return Err(ComponentError::invalid("tool_name must be non-empty"));
        }
        let input_schema = self.input_schema.ok_or_else(|| {
            ComponentError::invalid(format!("'{}' is missing an input schema", self.tool_name))
        })?;
        let execute = self.execute.ok_or_else(|| {
            ComponentError::invalid(format!(
                "'{}' is missing an execute function",
                self.tool_name
            ))
        })?;

        Ok(ComponentDefinition {
            tool_name: self.tool_name,
            description: self.description,
            input_schema,
            execute,
            // Identity transform: raw result passed through unchanged
            transform: self.transform.unwrap_or_else(|| Arc::new(|raw| Ok(raw))),
            actions: self.actions,
            local_functions: self.local_functions,
        })
    }
}
