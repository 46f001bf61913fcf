use std::path::PathBuf;

use chatlog_core::tool::Registry;

use crate::store::{DEFAULT_HISTORY_FILE, TranscriptStore};
use crate::tools::*;

/// A builder that wires the transcript tools into a [`Registry`].
///
/// The registry it produces is the plain interface a host runtime registers
/// with; no particular registration mechanism is assumed beyond "call the
/// tool by name with JSON arguments".
pub struct ToolsetBuilder {
    path: PathBuf,
    query_mode: QueryMode,
}

impl ToolsetBuilder {
    /// Creates a builder writing to `chat_history.md` in the working
    /// directory.
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_HISTORY_FILE),
            query_mode: QueryMode::default(),
        }
    }

    /// Sets the path of the backing transcript file.
    #[inline]
    pub fn with_history_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the behavior of `get_chat_history` when `limit` is omitted.
    #[inline]
    pub fn with_query_mode(mut self, query_mode: QueryMode) -> Self {
        self.query_mode = query_mode;
        self
    }

    /// Builds a registry holding the four transcript tools, all backed by
    /// the same store.
    pub fn build(self) -> Registry {
        let store = TranscriptStore::new(self.path);
        let mut registry = Registry::default();
        registry.add_tool(
            GetHistoryTool::new(store.clone()).with_query_mode(self.query_mode),
        );
        registry.add_tool(SaveMessageTool::new(store.clone()));
        registry.add_tool(SaveMessagesTool::new(store.clone()));
        registry.add_tool(ClearHistoryTool::new(store));
        registry
    }
}

impl Default for ToolsetBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
