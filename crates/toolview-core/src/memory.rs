// In-memory implementations for examples and testing
//
// These sinks keep everything in memory, making them perfect for:
// - Standalone examples that don't need a real LLM runtime
// - Unit and integration tests asserting on failure paths

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::signals::{DispatchSignal, SignalSink};
use crate::traits::{RedirectRequest, RedirectSink};

// ============================================================================
// InMemoryRedirectSink - Collects redirect requests
// ============================================================================

/// In-memory redirect sink
///
/// Collects every emitted redirect request for later inspection.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRedirectSink {
    requests: Arc<RwLock<Vec<RedirectRequest>>>,
}

impl InMemoryRedirectSink {
    /// Create a new in-memory redirect sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected requests
    pub async fn requests(&self) -> Vec<RedirectRequest> {
        self.requests.read().await.clone()
    }

    /// Take all collected requests, leaving the sink empty
    pub async fn drain(&self) -> Vec<RedirectRequest> {
        std::mem::take(&mut *self.requests.write().await)
    }

    /// Clear all collected requests
    pub async fn clear(&self) {
        self.requests.write().await.clear();
    }
}

#[async_trait]
impl RedirectSink for InMemoryRedirectSink {
    async fn emit(&self, request: RedirectRequest) -> Result<()> {
        self.requests.write().await.push(request);
        Ok(())
    }
}

// ============================================================================
// InMemorySignalSink - Collects dispatch signals
// ============================================================================

/// In-memory signal sink
///
/// Collects every dispatch signal so tests can assert on failure paths
/// deterministically.
#[derive(Debug, Default, Clone)]
pub struct InMemorySignalSink {
    signals: Arc<Mutex<Vec<DispatchSignal>>>,
}

impl InMemorySignalSink {
    /// Create a new in-memory signal sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected signals
    pub fn signals(&self) -> Vec<DispatchSignal> {
        self.lock().clone()
    }

    /// Check if no signal was emitted
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clear all collected signals
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DispatchSignal>> {
        self.signals.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SignalSink for InMemorySignalSink {
    fn emit(&self, signal: DispatchSignal) {
        self.lock().push(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_redirect_sink_collects_and_drains() {
        let sink = InMemoryRedirectSink::new();
        sink.emit(RedirectRequest {
            target_tool: "todo.toggle".to_string(),
            call_params: json!({"id": "42"}),
        })
        .await
        .unwrap();

        assert_eq!(sink.requests().await.len(), 1);

        let drained = sink.drain().await;
        assert_eq!(drained.len(), 1);
        assert!(sink.requests().await.is_empty());
    }

    #[test]
    fn test_signal_sink_collects() {
        let sink = InMemorySignalSink::new();
        assert!(sink.is_empty());

        sink.emit(DispatchSignal::unknown_tool("todo.list"));
        assert_eq!(sink.signals().len(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
