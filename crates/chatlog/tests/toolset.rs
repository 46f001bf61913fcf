use chatlog::ToolsetBuilder;
use chatlog::core::tool::ToolCallRequest;
use chatlog::tools::QueryMode;
use serde_json::{Value, json};
use tempfile::TempDir;

fn request(name: &str, arguments: Value) -> ToolCallRequest {
    ToolCallRequest {
        name: name.to_owned(),
        arguments,
    }
}

#[tokio::test]
async fn test_lookup_returns_previous_user_message() {
    let dir = TempDir::new().unwrap();
    let registry = ToolsetBuilder::new()
        .with_history_path(dir.path().join("chat_history.md"))
        .build();

    for (user, message) in
        [("Alice", "hi"), ("Bot", "hello"), ("Alice", "how are you")]
    {
        let reply = registry
            .invoke(request(
                "save_chat_message",
                json!({ "user": user, "message": message }),
            ))
            .await;
        assert!(reply.contains(user));
    }

    let reply = registry
        .invoke(request("get_chat_history", json!({})))
        .await;
    assert_eq!(reply, "hi");
}

#[tokio::test]
async fn test_limit_returns_raw_line_tail() {
    let dir = TempDir::new().unwrap();
    let registry = ToolsetBuilder::new()
        .with_history_path(dir.path().join("chat_history.md"))
        .build();

    registry
        .invoke(request(
            "save_chat_message",
            json!({ "user": "Alice", "message": "hi" }),
        ))
        .await;

    let reply = registry
        .invoke(request("get_chat_history", json!({ "limit": 6 })))
        .await;
    assert!(reply.contains("**Alice**: hi"));
    // A line-count tail never includes the file header.
    assert!(!reply.contains("# Chat History"));
}

#[tokio::test]
async fn test_batch_save_applies_defaults() {
    let dir = TempDir::new().unwrap();
    let registry = ToolsetBuilder::new()
        .with_history_path(dir.path().join("chat_history.md"))
        .with_query_mode(QueryMode::FullTranscript)
        .build();

    let reply = registry
        .invoke(request(
            "save_chat_messages",
            json!({
                "messages": [
                    { "user": "U1", "message": "m1" },
                    { "message": "m2" },
                ]
            }),
        ))
        .await;
    assert!(reply.contains("Saved 2 messages"));

    let transcript = registry
        .invoke(request("get_chat_history", json!({})))
        .await;
    assert!(transcript.contains("**U1**: m1"));
    assert!(transcript.contains("**Unknown**: m2"));
}

#[tokio::test]
async fn test_clear_resets_to_fresh_header() {
    let dir = TempDir::new().unwrap();
    let registry = ToolsetBuilder::new()
        .with_history_path(dir.path().join("chat_history.md"))
        .with_query_mode(QueryMode::FullTranscript)
        .build();

    registry
        .invoke(request(
            "save_chat_message",
            json!({ "user": "Alice", "message": "hi" }),
        ))
        .await;
    let reply = registry
        .invoke(request("clear_chat_history", json!({})))
        .await;
    assert!(reply.contains("Cleared"));

    let transcript = registry
        .invoke(request("get_chat_history", json!({})))
        .await;
    assert!(transcript.starts_with("# Chat History"));
    assert!(transcript.contains("*Recreated at: "));
    assert!(!transcript.contains("Alice"));
}

#[tokio::test]
async fn test_unknown_tool_is_reported_by_name() {
    let dir = TempDir::new().unwrap();
    let registry = ToolsetBuilder::new()
        .with_history_path(dir.path().join("chat_history.md"))
        .build();

    let reply = registry
        .invoke(request("drop_chat_history", json!({})))
        .await;
    assert!(reply.contains("drop_chat_history"));
}

#[tokio::test]
async fn test_definitions_cover_all_four_tools() {
    let dir = TempDir::new().unwrap();
    let registry = ToolsetBuilder::new()
        .with_history_path(dir.path().join("chat_history.md"))
        .build();

    let mut names: Vec<String> = registry
        .definitions()
        .into_iter()
        .map(|definition| definition.name)
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "clear_chat_history",
            "get_chat_history",
            "save_chat_message",
            "save_chat_messages",
        ]
    );
}
