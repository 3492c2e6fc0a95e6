//! Click tracking storage
//!
//! SeaORM over SQLite, MySQL/MariaDB or PostgreSQL. Table definitions live
//! in the `migration` crate and are shared by bootstrap and `Migrator`.

mod bootstrap;
mod click_store;
mod connection;

pub use bootstrap::{BootstrapReport, SchemaBootstrap, SchemaState};
pub use click_store::{
    ClickCounter, ClickEvent, ClickStore, IP_MAX_CHARS, NewClick, TITLE_MAX_CHARS, UNKNOWN_TITLE,
    USER_AGENT_MAX_CHARS,
};
pub use connection::{BackendKind, connect, connect_generic, connect_sqlite, infer_backend_from_url};
