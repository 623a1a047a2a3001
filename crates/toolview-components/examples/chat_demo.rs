//! Chat Demo - Dispatching messages and actions end to end
//!
//! This example walks one conversation turn through the whole protocol:
//! register the ready-made components, dispatch user/assistant/tool
//! messages, fire a UI action that redirects into a new tool call, execute
//! that call, and dispatch the follow-up message.
//!
//! Run with: cargo run --example chat_demo -p toolview-components

use std::sync::Arc;

use serde_json::json;
use toolview_components::{register_defaults, Todo};
use toolview_core::{
    ComponentRegistry, ConversationMessage, InMemoryRedirectSink, MessageDispatcher,
    RenderInstruction, ToolCall, ToolCallExecutor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Set up the registry with the ready-made components and seed the todo
    // store so there is something to render
    let registry = Arc::new(ComponentRegistry::new());
    let store = register_defaults(&registry)?;
    let mut done = Todo::new("Build a sample app");
    done.completed = true;
    store.seed(vec![Todo::new("Learn the dispatch flow"), done]).await;

    println!("registered tools: {:?}\n", registry.tool_names());

    let redirects = Arc::new(InMemoryRedirectSink::new());
    let dispatcher =
        MessageDispatcher::new(registry.clone()).with_redirect_sink(redirects.clone());
    let executor = ToolCallExecutor::new(registry);

    // 1. A user message passes straight through
    let user = ConversationMessage::user("What's on my todo list?");
    println!("user -> {:?}\n", dispatcher.dispatch(&user));

    // 2. The assistant answers and requests a tool call; the call itself is
    //    the LLM runtime's job - here the executor stands in for it
    let call = ToolCall {
        id: "call_1".to_string(),
        name: "todo.list".to_string(),
        arguments: json!({"filter": "all"}),
    };
    let assistant =
        ConversationMessage::assistant_with_tools("Let me check your list.", vec![call.clone()]);
    println!("assistant -> {:?}\n", dispatcher.dispatch(&assistant));

    let tool_message = executor.execute(&call).await?;

    // 3. The tool result renders as an interactive component
    let (view_data, actions) = match dispatcher.dispatch(&tool_message) {
        RenderInstruction::Component {
            view_data, actions, ..
        } => (view_data, actions),
        other => anyhow::bail!("expected a component render, got {other:?}"),
    };
    println!("todo.list view data: {view_data:#}\n");

    // 4. The user clicks the first todo's checkbox: the action redirects
    //    into a todo.toggle call without another LLM round-trip
    let first_id = view_data["todos"][0]["id"]
        .as_str()
        .map(String::from)
        .unwrap_or_default();
    let outcome = actions.dispatch("toggleTodo", json!({"id": first_id})).await;
    println!("toggleTodo outcome: {outcome:?}");

    // 5. Execute the emitted request and dispatch the refreshed list
    for request in redirects.drain().await {
        let follow_up = executor.execute_redirect(&request).await?;
        let refreshed = dispatcher.dispatch(&follow_up);
        println!(
            "after {}: {:#}",
            request.target_tool,
            refreshed.view_data().cloned().unwrap_or_default()
        );
    }

    // 6. Exporting runs locally - no tool call, no redirect
    let export = actions.dispatch("exportJson", json!({})).await;
    println!("\nexportJson outcome: {export:?}");

    Ok(())
}
