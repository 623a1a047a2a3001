// Component registry
//
// A keyed store mapping tool name to ComponentDefinition. The registry is an
// injectable object rather than a process-global, so independent registries
// can coexist (test isolation, multi-tenant hosts).
//
// Registration is last-write-wins: re-registering a name replaces the entry,
// but Arcs handed out earlier keep the old definition alive, so views already
// rendered against it keep their captured wiring.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::error;

use crate::definition::{ComponentDefinition, ToolDescriptor};
use crate::error::{ComponentError, Result};

/// Keyed store of component definitions
///
/// Reads (`get`, `list`) take a shared lock; only `register` and `clear_all`
/// take the exclusive lock. Guards never cross an await point.
#[derive(Default)]
pub struct ComponentRegistry {
    definitions: RwLock<HashMap<String, Arc<ComponentDefinition>>>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any prior entry with the same name.
    ///
    /// A definition with an empty tool name is rejected and the map is left
    /// untouched; the rejection is returned to the caller and logged.
    pub fn register(&self, definition: ComponentDefinition) -> Result<()> {
        if definition.tool_name.trim().is_empty() {
            error!("component definition has an empty tool name, skipping registration");
            return Err(ComponentError::invalid("tool_name must be non-empty"));
        }

        let mut definitions = self.write_lock();
        definitions.insert(definition.tool_name.clone(), Arc::new(definition));
        Ok(())
    }

    /// Look up a definition by tool name
    pub fn get(&self, tool_name: &str) -> Option<Arc<ComponentDefinition>> {
        self.read_lock().get(tool_name).cloned()
    }

    /// Check if a tool is registered
    pub fn has(&self, tool_name: &str) -> bool {
        self.read_lock().contains_key(tool_name)
    }

    /// Get the number of registered definitions
    pub fn len(&self) -> usize {
        self.read_lock().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }

    /// Get all registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.read_lock().keys().cloned().collect()
    }

    /// Read-only snapshot of all registered definitions
    pub fn list(&self) -> Vec<Arc<ComponentDefinition>> {
        self.read_lock().values().cloned().collect()
    }

    /// LLM-facing descriptors for every registered definition.
    ///
    /// This is what the host advertises to the provider as its tool list.
    pub fn tool_descriptors(&self) -> Vec<ToolDescriptor> {
        self.read_lock().values().map(|d| d.descriptor()).collect()
    }

    /// Remove every entry (test isolation, hot reload)
    pub fn clear_all(&self) {
        self.write_lock().clear();
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<ComponentDefinition>>> {
        // HashMap::insert/clear leave no partially-mutated state to recover from
        self.definitions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<ComponentDefinition>>> {
        self.definitions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(tool_name: &str) -> ComponentDefinition {
        ComponentDefinition::builder(tool_name)
            .input_schema(json!({"type": "object"}))
            .execute(|params| async move { Ok(params) })
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let registry = ComponentRegistry::new();
        registry.register(definition("todo.list")).unwrap();

        let found = registry.get("todo.list").unwrap();
        assert_eq!(found.tool_name, "todo.list");
        assert!(registry.get("todo.missing").is_none());
    }

    #[test]
    fn test_register_overwrites_last_write_wins() {
        let registry = ComponentRegistry::new();

        let mut first = definition("todo.list");
        first.description = "first".to_string();
        let mut second = definition("todo.list");
        second.description = "second".to_string();

        registry.register(first).unwrap();
        let captured = registry.get("todo.list").unwrap();

        registry.register(second).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("todo.list").unwrap().description, "second");

        // Arcs handed out before the overwrite keep the old definition
        assert_eq!(captured.description, "first");
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let registry = ComponentRegistry::new();

        // Bypass the builder to construct a definition with a blank name
        let mut invalid = definition("placeholder");
        invalid.tool_name = "".to_string();

        let result = registry.register(invalid);
        assert!(matches!(result, Err(ComponentError::InvalidDefinition(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let registry = ComponentRegistry::new();
        registry.register(definition("a")).unwrap();
        registry.register(definition("b")).unwrap();
        assert_eq!(registry.len(), 2);

        registry.clear_all();
        assert!(registry.is_empty());
        assert!(registry.get("a").is_none());
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let registry = ComponentRegistry::new();
        registry.register(definition("a")).unwrap();

        let snapshot = registry.list();
        registry.register(definition("b")).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_tool_descriptors() {
        let registry = ComponentRegistry::new();
        registry.register(definition("todo.list")).unwrap();

        let descriptors = registry.tool_descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "todo.list");
    }
}
