use chatlog_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tokio::task::spawn_blocking;

use crate::store::TranscriptStore;

const NO_USER_MESSAGE: &str = "No user message found in chat history.";

#[derive(Deserialize, JsonSchema)]
pub struct GetHistoryParameters {
    #[schemars(
        description = "Number of trailing lines to return. Omit to use the configured no-limit behavior."
    )]
    limit: Option<usize>,
}

/// Selects what `get_chat_history` returns when `limit` is omitted.
///
/// The two variants reflect two historical behaviors of this tool. They are
/// kept apart behind this flag instead of being merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryMode {
    /// Return the body of the second-most-recent human-authored entry, with
    /// the most recent one taken to be the message currently being answered.
    #[default]
    LastUserMessage,
    /// Return the entire transcript verbatim.
    FullTranscript,
}

/// A tool for reading the chat transcript.
pub struct GetHistoryTool {
    parameter_schema: Value,
    store: TranscriptStore,
    query_mode: QueryMode,
}

impl GetHistoryTool {
    /// Creates a new get history tool backed by `store`.
    #[inline]
    pub fn new(store: TranscriptStore) -> Self {
        GetHistoryTool {
            parameter_schema: schema_for!(GetHistoryParameters).to_value(),
            store,
            query_mode: QueryMode::default(),
        }
    }

    /// Sets the no-limit query mode.
    #[inline]
    pub fn with_query_mode(mut self, query_mode: QueryMode) -> Self {
        self.query_mode = query_mode;
        self
    }
}

impl Tool for GetHistoryTool {
    type Input = GetHistoryParameters;

    fn name(&self) -> &str {
        "get_chat_history"
    }

    fn description(&self) -> &str {
        r#"
Reads the chat history transcript.
Pass `limit` to get the last N raw lines of the file. Without `limit`, returns either the previous user message or the whole transcript, depending on how the tool is configured."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: GetHistoryParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        let query_mode = self.query_mode;
        async move {
            spawn_blocking(move || read_history(&store, input.limit, query_mode))
                .await
                .map_err(|_| {
                    ToolError::io().with_reason("Failed to read chat history")
                })?
        }
    }
}

fn read_history(
    store: &TranscriptStore,
    limit: Option<usize>,
    query_mode: QueryMode,
) -> ToolResult {
    // A zero limit counts as omitted.
    let result = match limit {
        Some(limit) if limit > 0 => store.tail(limit),
        _ => match query_mode {
            QueryMode::FullTranscript => store.read(),
            QueryMode::LastUserMessage => store.last_user_message().map(
                |message| message.unwrap_or_else(|| NO_USER_MESSAGE.to_owned()),
            ),
        },
    };
    result.map_err(|err| {
        ToolError::io()
            .with_reason(format!("Failed to read chat history: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_no_limit_on_fresh_store_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let tool =
            GetHistoryTool::new(TranscriptStore::new(dir.path().join("h.md")));

        let result = tool.execute(GetHistoryParameters { limit: None }).await;
        assert_eq!(result.unwrap(), NO_USER_MESSAGE);
    }

    #[tokio::test]
    async fn test_zero_limit_counts_as_omitted() {
        let dir = TempDir::new().unwrap();
        let store = TranscriptStore::new(dir.path().join("h.md"));
        store.append("Alice", "hi", None).unwrap();
        let tool = GetHistoryTool::new(store);

        let result = tool.execute(GetHistoryParameters { limit: Some(0) }).await;
        assert_eq!(result.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_full_transcript_mode_returns_everything() {
        let dir = TempDir::new().unwrap();
        let store = TranscriptStore::new(dir.path().join("h.md"));
        store.append("Alice", "hi", None).unwrap();
        let tool = GetHistoryTool::new(store.clone())
            .with_query_mode(QueryMode::FullTranscript);

        let result = tool.execute(GetHistoryParameters { limit: None }).await;
        assert_eq!(result.unwrap(), store.read().unwrap());
    }
}
