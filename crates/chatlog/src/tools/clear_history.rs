use chatlog_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tokio::task::spawn_blocking;

use crate::store::TranscriptStore;

#[derive(Deserialize, JsonSchema)]
pub struct ClearHistoryParameters {}

/// A tool for discarding the chat transcript.
pub struct ClearHistoryTool {
    parameter_schema: Value,
    store: TranscriptStore,
}

impl ClearHistoryTool {
    /// Creates a new clear history tool backed by `store`.
    #[inline]
    pub fn new(store: TranscriptStore) -> Self {
        ClearHistoryTool {
            parameter_schema: schema_for!(ClearHistoryParameters).to_value(),
            store,
        }
    }
}

impl Tool for ClearHistoryTool {
    type Input = ClearHistoryParameters;

    fn name(&self) -> &str {
        "clear_chat_history"
    }

    fn description(&self) -> &str {
        r#"
Discards the entire chat history transcript.
The file is rewritten with a fresh header; prior entries are not recoverable."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        _input: ClearHistoryParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        async move {
            spawn_blocking(move || {
                store.clear().map_err(|err| {
                    ToolError::io().with_reason(format!(
                        "Failed to clear chat history: {err}"
                    ))
                })?;
                Ok(format!(
                    "Cleared chat history in {}",
                    store.path().display()
                ))
            })
            .await
            .map_err(|_| {
                ToolError::io().with_reason("Failed to clear chat history")
            })?
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_clear_removes_prior_entries() {
        let dir = TempDir::new().unwrap();
        let store = TranscriptStore::new(dir.path().join("h.md"));
        store.append("Alice", "hi", None).unwrap();
        let tool = ClearHistoryTool::new(store.clone());

        let result = tool.execute(ClearHistoryParameters {}).await.unwrap();

        assert!(result.contains("Cleared"));
        assert!(store.entries().unwrap().is_empty());
        assert!(store.read().unwrap().contains("*Recreated at: "));
    }
}
