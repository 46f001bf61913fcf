//! The tool-invocation framework: tool trait, typed call errors, and the
//! registry that dispatches host requests to registered tools.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod tool;

pub use tool::{Registry, Tool, ToolCallRequest, ToolDefinition, ToolResult};
