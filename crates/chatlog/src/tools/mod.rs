//! The callable tools the host runtime can invoke.

mod clear_history;
mod get_history;
mod save_message;
mod save_messages;

pub use clear_history::ClearHistoryTool;
pub use get_history::{GetHistoryTool, QueryMode};
pub use save_message::SaveMessageTool;
pub use save_messages::SaveMessagesTool;
