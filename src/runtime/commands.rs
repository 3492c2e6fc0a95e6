//! One-shot CLI commands

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use tracing::warn;

use crate::cli::Commands;
use crate::config::{StaticConfig, get_config};
use crate::content::{ContentSource, JsonFileContentSource};
use crate::runtime::{run_server, startup::open_tracking_database};
use crate::services::ExportService;
use crate::storage::SchemaBootstrap;

const SAMPLE_CONFIG_PATH: &str = "config.example.toml";

pub async fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Serve => run_server().await,
        Commands::Bootstrap => bootstrap().await,
        Commands::ExportCsv { output } => export_csv(&output).await,
        Commands::GenerateConfig { output_path, force } => {
            generate_config(output_path.as_deref().unwrap_or(SAMPLE_CONFIG_PATH), force)
        }
    }
}

async fn bootstrap() -> Result<()> {
    let config = get_config();
    let db = open_tracking_database(&config).await;

    let report = SchemaBootstrap::new().run(db.as_ref()).await;
    if let Some(db) = db {
        db.close().await.context("Failed to close database")?;
    }

    if !report.state.is_ready() {
        bail!("Schema bootstrap finished in state {}", report.state);
    }

    if report.created.is_empty() {
        println!("{} Click tracking tables already present", "✓".green());
    }
    for table in &report.created {
        println!("{} Created table {}", "✓".green(), table.bold());
    }
    Ok(())
}

async fn export_csv(output: &str) -> Result<()> {
    let config = get_config();
    let source = Arc::new(JsonFileContentSource::open(&config.content.snapshot_path).await);
    if source.published().await?.is_none() {
        warn!(
            "Content snapshot {} unavailable, export will only contain the header",
            source.path().display()
        );
    }

    let bytes = ExportService::new(source)
        .export_csv()
        .await
        .context("CSV export failed")?;
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output))?;

    println!("{} Exported policies to {}", "✓".green(), output.bold());
    Ok(())
}

fn generate_config(path: &str, force: bool) -> Result<()> {
    if Path::new(path).exists() && !force {
        bail!("{} already exists, use --force to overwrite", path);
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    println!("{} Example configuration written to {}", "✓".green(), path.bold());
    Ok(())
}
