//! Process signal handling
//!
//! - Ctrl+C: graceful shutdown (closes the database pool)
//! - SIGHUP (unix): reload the published content snapshot

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::content::JsonFileContentSource;

const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Wait for Ctrl+C, then release the database pool
pub async fn listen_for_shutdown(db: Option<DatabaseConnection>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }

    let Some(db) = db else {
        return;
    };

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), db.close()).await {
        Ok(Ok(())) => info!("Database pool closed"),
        Ok(Err(e)) => error!("Failed to close database pool: {}", e),
        Err(_) => error!(
            "Closing database pool timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}

/// Reload the content snapshot every time the process receives SIGHUP
#[cfg(unix)]
pub fn spawn_content_reload_listener(source: Arc<JsonFileContentSource>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to register SIGHUP handler: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading content snapshot");
            source.reload().await;
        }
    });
}

#[cfg(not(unix))]
pub fn spawn_content_reload_listener(_source: Arc<JsonFileContentSource>) {}
