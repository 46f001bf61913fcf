//! A minimal host harness that serves the transcript tools over stdio.
//!
//! Each input line is a JSON object of the form
//! `{"tool": "save_chat_message", "arguments": {"user": "Alice", "message": "hi"}}`,
//! and each output line is the tool's result encoded as a JSON string. The
//! result channel is always a string; failures are described, never raised.

#[macro_use]
extern crate tracing;

use chatlog::ToolsetBuilder;
use chatlog::core::tool::{Registry, ToolCallRequest};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};

#[derive(Deserialize)]
struct HostRequest {
    tool: String,
    #[serde(default = "empty_arguments")]
    arguments: Value,
}

fn empty_arguments() -> Value {
    Value::Object(serde_json::Map::new())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = ToolsetBuilder::new().build();

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        line.clear();
        match stdin.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                error!("error reading input: {}", err);
                break;
            }
        }

        let request = line.trim();
        if request.is_empty() {
            continue;
        }

        let response = serve_line(&registry, request).await;
        let mut encoded =
            serde_json::to_string(&response).unwrap_or_default();
        encoded.push('\n');
        if stdout.write_all(encoded.as_bytes()).await.is_err() {
            break;
        }
        stdout.flush().await.ok();
    }
}

async fn serve_line(registry: &Registry, line: &str) -> String {
    let request: HostRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => return format!("Invalid request: {err}"),
    };
    registry
        .invoke(ToolCallRequest {
            name: request.tool,
            arguments: request.arguments,
        })
        .await
}
