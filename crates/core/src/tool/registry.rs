use std::collections::HashMap;

use serde_json::Value;

use crate::tool::object::{ToolObject, ToolObjectImpl};
use crate::tool::{Error, Tool, ToolResult};

/// Describes a tool to the host runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolDefinition {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most host runtimes, the parameters should typically be defined by
    /// a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}

/// A single invocation issued by the host runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCallRequest {
    /// Name of the tool to invoke.
    pub name: String,
    /// The JSON arguments of the invocation.
    pub arguments: Value,
}

/// An object that owns the toolset and dispatches requests from the host
/// runtime.
#[derive(Default)]
pub struct Registry {
    tools: HashMap<String, Box<dyn ToolObject>>,
}

impl Registry {
    /// Registers a tool under the name it reports.
    pub fn add_tool<T: Tool>(&mut self, tool: T) {
        let name = tool.name().to_owned();
        self.tools.insert(name, Box::new(ToolObjectImpl(tool)));
    }

    /// Returns the definitions of every registered tool.
    #[inline]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect()
    }

    /// Invokes a tool, keeping the typed error.
    ///
    /// Internal callers and tests should prefer this over [`Registry::invoke`]
    /// so that failure kinds stay distinguishable.
    pub async fn try_invoke(&self, request: ToolCallRequest) -> ToolResult {
        let Some(tool) = self.tools.get(&request.name) else {
            warn!("tool not found: {}", request.name);
            return Err(Error::unknown_tool().with_reason(format!(
                "no tool named `{}` is registered",
                request.name
            )));
        };

        trace!(
            "invoking tool `{}` with args: {:?}",
            request.name, request.arguments
        );
        tool.execute(request.arguments).await
    }

    /// Invokes a tool and flattens the outcome into a display string.
    ///
    /// This is the host-facing boundary: the returned string is either the
    /// tool's output or a description of the failure, and nothing is ever
    /// raised to the caller.
    pub async fn invoke(&self, request: ToolCallRequest) -> String {
        self.try_invoke(request)
            .await
            .unwrap_or_else(|err| format!("{err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::*;
    use crate::tool::ErrorKind;

    static EMPTY_SCHEMA: &Value = &Value::Null;

    #[derive(Deserialize)]
    struct EchoInput {
        text: String,
    }

    struct EchoTool;

    impl Tool for EchoTool {
        type Input = EchoInput;

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes the input text"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(input.text))
        }
    }

    fn request(name: &str, arguments: Value) -> ToolCallRequest {
        ToolCallRequest {
            name: name.to_owned(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_try_invoke_dispatches_by_name() {
        let mut registry = Registry::default();
        registry.add_tool(EchoTool);

        let result = registry
            .try_invoke(request("echo", json!({ "text": "hello" })))
            .await;
        assert_eq!(result.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_try_invoke_unknown_tool() {
        let registry = Registry::default();

        let result = registry.try_invoke(request("echo", json!({}))).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnknownTool);
    }

    #[tokio::test]
    async fn test_try_invoke_rejects_malformed_arguments() {
        let mut registry = Registry::default();
        registry.add_tool(EchoTool);

        let result = registry
            .try_invoke(request("echo", json!({ "text": 42 })))
            .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_invoke_flattens_errors_into_strings() {
        let registry = Registry::default();

        let result = registry.invoke(request("echo", json!({}))).await;
        assert!(result.contains("echo"));
        assert!(result.starts_with("Unknown tool"));
    }

    #[tokio::test]
    async fn test_definitions() {
        let mut registry = Registry::default();
        registry.add_tool(EchoTool);

        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "echo");
    }
}
