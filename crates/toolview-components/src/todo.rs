// Todo list component family
//
// todo.list renders the list; the other todo.* tools are the redirect
// targets its actions fire. All of them execute against one shared TodoStore
// and return the refreshed `{todos, filter}` payload, so whichever tool the
// conversation calls, the rendered view shows the current list.
//
// Every definition in the family also carries an `exportJson` local action:
// exporting is a pure UI-side concern and needs no LLM round-trip.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use toolview_core::{ActionSpec, ComponentDefinition, Result};

/// Tool names of the todo family
pub const TODO_LIST_TOOL: &str = "todo.list";
pub const TODO_ADD_TOOL: &str = "todo.add";
pub const TODO_TOGGLE_TOOL: &str = "todo.toggle";
pub const TODO_DELETE_TOOL: &str = "todo.delete";
pub const TODO_CLEAR_COMPLETED_TOOL: &str = "todo.clearCompleted";
pub const TODO_SET_FILTER_TOOL: &str = "todo.setFilter";

/// A single todo entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Create a new open todo
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Which todos the list view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    fn matches(self, todo: &Todo) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Active => !todo.completed,
            TodoFilter::Completed => todo.completed,
        }
    }
}

#[derive(Debug, Default)]
struct TodoState {
    todos: Vec<Todo>,
    filter: TodoFilter,
}

/// Shared in-memory todo store backing the todo.* tool family
#[derive(Debug, Default, Clone)]
pub struct TodoStore {
    state: Arc<RwLock<TodoState>>,
}

impl TodoStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with todos (useful for demos and testing)
    pub async fn seed(&self, todos: Vec<Todo>) {
        self.state.write().await.todos = todos;
    }

    /// The `{todos, filter}` payload for the current filter
    pub async fn list(&self, filter: Option<TodoFilter>) -> Value {
        let mut state = self.state.write().await;
        if let Some(filter) = filter {
            state.filter = filter;
        }
        Self::payload(&state)
    }

    /// Add a todo and return the refreshed payload
    pub async fn add(&self, text: impl Into<String>) -> Value {
        let mut state = self.state.write().await;
        state.todos.push(Todo::new(text));
        Self::payload(&state)
    }

    /// Toggle a todo's completion and return the refreshed payload
    pub async fn toggle(&self, id: &str) -> Value {
        let mut state = self.state.write().await;
        if let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = !todo.completed;
        }
        Self::payload(&state)
    }

    /// Delete a todo and return the refreshed payload
    pub async fn delete(&self, id: &str) -> Value {
        let mut state = self.state.write().await;
        state.todos.retain(|t| t.id != id);
        Self::payload(&state)
    }

    /// Remove every completed todo and return the refreshed payload
    pub async fn clear_completed(&self) -> Value {
        let mut state = self.state.write().await;
        state.todos.retain(|t| !t.completed);
        Self::payload(&state)
    }

    /// Change the current filter and return the refreshed payload
    pub async fn set_filter(&self, filter: TodoFilter) -> Value {
        let mut state = self.state.write().await;
        state.filter = filter;
        Self::payload(&state)
    }

    /// Every todo regardless of filter, as JSON
    pub async fn export(&self) -> Value {
        let state = self.state.read().await;
        json!({ "todos": state.todos })
    }

    fn payload(state: &TodoState) -> Value {
        let visible: Vec<&Todo> = state
            .todos
            .iter()
            .filter(|t| state.filter.matches(t))
            .collect();
        json!({ "todos": visible, "filter": state.filter })
    }
}

fn parse_filter(params: &Value) -> Option<TodoFilter> {
    params
        .get("filter")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Transform shared by the family: enrich the payload with counts
fn with_counts(raw: Value) -> anyhow::Result<Value> {
    let todos = raw
        .get("todos")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow::anyhow!("todo payload is missing 'todos'"))?;

    let completed = todos
        .iter()
        .filter(|t| t.get("completed").and_then(Value::as_bool).unwrap_or(false))
        .count();
    let active = todos.len() - completed;

    let mut view = raw;
    view["activeCount"] = json!(active);
    view["completedCount"] = json!(completed);
    Ok(view)
}

fn todo_actions() -> Vec<(&'static str, ActionSpec)> {
    vec![
        (
            "addTodo",
            ActionSpec::redirect(TODO_ADD_TOOL, |params| {
                json!({ "text": params.get("text").cloned().unwrap_or(Value::Null) })
            }),
        ),
        (
            "toggleTodo",
            ActionSpec::redirect(TODO_TOGGLE_TOOL, |params| {
                json!({ "id": params.get("id").cloned().unwrap_or(Value::Null) })
            }),
        ),
        (
            "deleteTodo",
            ActionSpec::redirect(TODO_DELETE_TOOL, |params| {
                json!({ "id": params.get("id").cloned().unwrap_or(Value::Null) })
            }),
        ),
        (
            "clearCompleted",
            ActionSpec::redirect(TODO_CLEAR_COMPLETED_TOOL, |_| json!({})),
        ),
        (
            "setFilter",
            ActionSpec::redirect(TODO_SET_FILTER_TOOL, |params| {
                json!({ "filter": params.get("filter").cloned().unwrap_or(Value::Null) })
            }),
        ),
        ("exportJson", ActionSpec::local("exportJson", |params| params)),
    ]
}

fn todo_definition<F, Fut>(
    store: &TodoStore,
    tool_name: &str,
    description: &str,
    input_schema: Value,
    execute: F,
) -> Result<ComponentDefinition>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    let export_store = store.clone();
    let mut builder = ComponentDefinition::builder(tool_name)
        .description(description)
        .input_schema(input_schema)
        .execute(execute)
        .transform(with_counts)
        .local_function("exportJson", move |_| {
            let store = export_store.clone();
            async move { Ok(store.export().await) }
        });

    for (name, spec) in todo_actions() {
        builder = builder.action(name, spec);
    }
    builder.build()
}

fn id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "description": description }
        },
        "required": ["id"],
        "additionalProperties": false
    })
}

/// Build the whole todo.* family over one shared store
pub fn todo_components(store: &TodoStore) -> Result<Vec<ComponentDefinition>> {
    let list = todo_definition(
        store,
        TODO_LIST_TOOL,
        "A todo list component that allows adding, toggling, and removing todos.",
        json!({
            "type": "object",
            "properties": {
                "filter": {
                    "type": "string",
                    "enum": ["all", "active", "completed"],
                    "description": "Filter todos by status"
                }
            },
            "additionalProperties": false
        }),
        {
            let store = store.clone();
            move |params| {
                let store = store.clone();
                async move { Ok(store.list(parse_filter(&params)).await) }
            }
        },
    )?;

    let add = todo_definition(
        store,
        TODO_ADD_TOOL,
        "Add a new todo to the list.",
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "minLength": 1, "description": "Todo text" }
            },
            "required": ["text"],
            "additionalProperties": false
        }),
        {
            let store = store.clone();
            move |params| {
                let store = store.clone();
                async move {
                    let text = params
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string();
                    if text.is_empty() {
                        anyhow::bail!("todo text is required");
                    }
                    Ok(store.add(text).await)
                }
            }
        },
    )?;

    let toggle = todo_definition(
        store,
        TODO_TOGGLE_TOOL,
        "Toggle a todo's completion state.",
        id_schema("ID of the todo to toggle"),
        {
            let store = store.clone();
            move |params| {
                let store = store.clone();
                async move {
                    let id = params
                        .get("id")
                        .and_then(Value::as_str)
                        .ok_or_else(|| anyhow::anyhow!("todo id is required"))?
                        .to_string();
                    Ok(store.toggle(&id).await)
                }
            }
        },
    )?;

    let delete = todo_definition(
        store,
        TODO_DELETE_TOOL,
        "Delete a todo from the list.",
        id_schema("ID of the todo to delete"),
        {
            let store = store.clone();
            move |params| {
                let store = store.clone();
                async move {
                    let id = params
                        .get("id")
                        .and_then(Value::as_str)
                        .ok_or_else(|| anyhow::anyhow!("todo id is required"))?
                        .to_string();
                    Ok(store.delete(&id).await)
                }
            }
        },
    )?;

    let clear_completed = todo_definition(
        store,
        TODO_CLEAR_COMPLETED_TOOL,
        "Remove every completed todo.",
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
        {
            let store = store.clone();
            move |_| {
                let store = store.clone();
                async move { Ok(store.clear_completed().await) }
            }
        },
    )?;

    let set_filter = todo_definition(
        store,
        TODO_SET_FILTER_TOOL,
        "Change which todos the list shows.",
        json!({
            "type": "object",
            "properties": {
                "filter": {
                    "type": "string",
                    "enum": ["all", "active", "completed"],
                    "description": "Filter todos by status"
                }
            },
            "required": ["filter"],
            "additionalProperties": false
        }),
        {
            let store = store.clone();
            move |params| {
                let store = store.clone();
                async move {
                    let filter = parse_filter(&params)
                        .ok_or_else(|| anyhow::anyhow!("unknown todo filter"))?;
                    Ok(store.set_filter(filter).await)
                }
            }
        },
    )?;

    Ok(vec![list, add, toggle, delete, clear_completed, set_filter])
}
