//! Policy handbook companion service
//!
//! Plugin-side services for a content-managed policy handbook: policy card
//! click tracking, a substring search over published content and a CSV
//! export of all policies.
//!
//! # Architecture
//! - `content`: read-only view of the published content tree
//! - `storage`: click tracking tables, schema bootstrap and queries
//! - `services`: click tracking, search and export logic
//! - `api`: HTTP handlers and middleware
//! - `config`: static configuration (TOML + `HB__*` environment)
//! - `runtime`: startup, server mode and CLI commands
//! - `system`: logging and signal handling

pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
