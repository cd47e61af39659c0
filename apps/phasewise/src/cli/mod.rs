//! # Phasewise CLI Module
//!
//! This module implements the CLI interface for Phasewise.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `projects` - List catalog projects with progress and health
//! - `status` - Show a project's phase board
//! - `export-concept` - Write a project's Concept Note
//! - `search` - Search the strategic plan
//! - `insights` - Show planning insights for a project

mod commands;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use phasewise_core::PhasewiseError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Phasewise - project lifecycle dashboard
///
/// Six phases from concept to final report, each unlocked by finishing
/// the one before it.
#[derive(Parser, Debug)]
#[command(name = "phasewise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List catalog projects
    Projects,

    /// Show a project's phase board
    Status {
        /// Catalog project id
        #[arg(short, long)]
        project: u32,

        /// Directory of saved `<phase>.json` content files to replay
        #[arg(short, long)]
        content: Option<PathBuf>,
    },

    /// Write a project's Concept Note
    ExportConcept {
        /// Catalog project id
        #[arg(short, long)]
        project: u32,

        /// Saved Concept phase content (JSON)
        #[arg(short, long)]
        content: Option<PathBuf>,

        /// Directory to write the note into
        #[arg(short, long)]
        output: PathBuf,

        /// Date printed on the note (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Search the strategic plan
    Search {
        /// Text to look for (case-insensitive)
        term: String,
    },

    /// Show planning insights for a project
    Insights {
        /// Catalog project id
        #[arg(short, long)]
        project: u32,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), PhasewiseError> {
    let config = Config::load(&cli.config)?.with_env();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(config, host, port).await,
        Some(Commands::Projects) | None => cmd_projects(json_mode),
        Some(Commands::Status { project, content }) => {
            cmd_status(&config, project, content.as_deref(), json_mode, cli.verbose)
        }
        Some(Commands::ExportConcept {
            project,
            content,
            output,
            date,
        }) => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let path = cmd_export_concept(&config, project, content.as_deref(), &output, date)?;
            if json_mode {
                println!("{}", serde_json::json!({ "path": path.to_string_lossy() }));
            } else {
                println!("Concept Note written to {}", path.display());
            }
            Ok(())
        }
        Some(Commands::Search { term }) => cmd_search(&config, &term, json_mode),
        Some(Commands::Insights { project }) => cmd_insights(&config, project, json_mode),
    }
}
