//! Tools for keeping a human-readable chat transcript in a Markdown file.
//!
//! The crate includes a CLI harness that serves the tools over stdio. And you
//! can also use it as a library to register the tools with your own host
//! runtime.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

pub mod store;
mod toolset;
pub mod tools;

pub use toolset::ToolsetBuilder;

/// Re-exports of [`chatlog_core`] crate.
pub mod core {
    pub use chatlog_core::*;
}
