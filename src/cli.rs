//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Policy handbook companion service
#[derive(Parser, Debug)]
#[command(name = "policy-handbook")]
#[command(version)]
#[command(
    about = "Policy card click tracking, handbook search and CSV export",
    long_about = None
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create missing click tracking tables and exit
    ///
    /// Exits with a non-zero status when the schema cannot be made ready.
    Bootstrap,

    /// Write the policy CSV export from the configured content snapshot
    ExportCsv {
        /// Output file path
        #[arg(long, short = 'o', default_value = "policies-export.csv")]
        output: String,
    },

    /// Generate an example configuration file
    GenerateConfig {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Selected command, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
