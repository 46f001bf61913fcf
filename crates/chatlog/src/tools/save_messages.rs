use chatlog_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use tokio::task::spawn_blocking;

use crate::store::{Draft, TranscriptStore};

#[derive(Deserialize, JsonSchema)]
pub struct MessageRecord {
    #[schemars(description = "Name of the message author, defaults to \"Unknown\".")]
    #[serde(default = "default_user")]
    user: String,
    #[schemars(description = "The message text, defaults to empty.")]
    #[serde(default)]
    message: String,
    #[schemars(
        description = "Timestamp stored verbatim; the current time is used when omitted."
    )]
    timestamp: Option<String>,
}

fn default_user() -> String {
    "Unknown".to_owned()
}

#[derive(Deserialize, JsonSchema)]
pub struct SaveMessagesParameters {
    #[schemars(description = "Messages to append, in order.")]
    messages: Vec<MessageRecord>,
}

/// A tool for appending a batch of messages to the chat transcript.
pub struct SaveMessagesTool {
    parameter_schema: Value,
    store: TranscriptStore,
}

impl SaveMessagesTool {
    /// Creates a new save messages tool backed by `store`.
    #[inline]
    pub fn new(store: TranscriptStore) -> Self {
        SaveMessagesTool {
            parameter_schema: schema_for!(SaveMessagesParameters).to_value(),
            store,
        }
    }
}

impl Tool for SaveMessagesTool {
    type Input = SaveMessagesParameters;

    fn name(&self) -> &str {
        "save_chat_messages"
    }

    fn description(&self) -> &str {
        r#"
Appends several messages to the chat history transcript in one call.
Each record may omit the author (stored as "Unknown"), the message text and the timestamp."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: SaveMessagesParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        async move {
            spawn_blocking(move || {
                let drafts: Vec<Draft> = input
                    .messages
                    .into_iter()
                    .map(|record| Draft {
                        author: record.user,
                        body: record.message,
                        timestamp: record.timestamp,
                    })
                    .collect();
                let written = store.append_batch(&drafts).map_err(|err| {
                    ToolError::io().with_reason(format!(
                        "Failed to save messages: {err}"
                    ))
                })?;
                Ok(format!(
                    "Saved {written} messages to {}",
                    store.path().display()
                ))
            })
            .await
            .map_err(|_| {
                ToolError::io().with_reason("Failed to save messages")
            })?
        }
    }
}
