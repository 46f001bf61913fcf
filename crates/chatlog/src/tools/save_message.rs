use chatlog_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tokio::task::spawn_blocking;

use crate::store::TranscriptStore;

#[derive(Deserialize, JsonSchema)]
pub struct SaveMessageParameters {
    #[schemars(description = "Name of the message author.")]
    user: String,
    #[schemars(
        description = "The message text. Only the first line is recognized when reading back."
    )]
    message: String,
    #[schemars(
        description = "Timestamp stored verbatim; the current time is used when omitted."
    )]
    timestamp: Option<String>,
}

/// A tool for appending one message to the chat transcript.
pub struct SaveMessageTool {
    parameter_schema: Value,
    store: TranscriptStore,
}

impl SaveMessageTool {
    /// Creates a new save message tool backed by `store`.
    #[inline]
    pub fn new(store: TranscriptStore) -> Self {
        SaveMessageTool {
            parameter_schema: schema_for!(SaveMessageParameters).to_value(),
            store,
        }
    }
}

impl Tool for SaveMessageTool {
    type Input = SaveMessageParameters;

    fn name(&self) -> &str {
        "save_chat_message"
    }

    fn description(&self) -> &str {
        r#"
Appends one message to the chat history transcript.
The entry records the author, the message text and a timestamp."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: SaveMessageParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        async move {
            spawn_blocking(move || {
                store
                    .append(
                        &input.user,
                        &input.message,
                        input.timestamp.as_deref(),
                    )
                    .map_err(|err| {
                        ToolError::io().with_reason(format!(
                            "Failed to save message: {err}"
                        ))
                    })?;
                Ok(format!(
                    "Saved message from {} to {}",
                    input.user,
                    store.path().display()
                ))
            })
            .await
            .map_err(|_| ToolError::io().with_reason("Failed to save message"))?
        }
    }
}
