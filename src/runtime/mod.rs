//! Application lifecycle
//!
//! - `server`: HTTP server mode (default)
//! - `commands`: one-shot CLI commands
//! - `startup`: shared pre-startup (database, schema bootstrap, content)

pub mod commands;
pub mod server;
pub mod startup;

pub use commands::run_command;
pub use server::run_server;
