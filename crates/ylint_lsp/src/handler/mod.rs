//! LSP request/notification handlers.

pub(crate) mod commands;
mod configuration;
mod documents;
mod files;
mod initialize;

pub use commands::{COMMANDS, LINT_FILE_COMMAND, LINT_WORKSPACE_COMMAND, handle_execute_command};
pub use configuration::handle_did_change_configuration;
pub use documents::{handle_did_change, handle_did_close, handle_did_open, handle_did_save};
pub use files::{handle_did_change_watched_files, handle_did_change_workspace_folders};
pub use initialize::{handle_initialize, handle_initialized, handle_shutdown};
