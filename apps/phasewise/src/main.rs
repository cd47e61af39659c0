//! # Phasewise
//!
//! The main binary for the Phasewise project lifecycle dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │            apps/phasewise (THE BINARY)           │
//! │                                                  │
//! │   ┌─────────────┐          ┌─────────────┐       │
//! │   │    CLI      │          │  HTTP API   │       │
//! │   │   (clap)    │          │   (axum)    │       │
//! │   └──────┬──────┘          └──────┬──────┘       │
//! │          └──────────┬─────────────┘              │
//! │                     ▼                            │
//! │            ┌────────────────┐                    │
//! │            │ phasewise-core │                    │
//! │            │  (THE LOGIC)   │                    │
//! │            └────────────────┘                    │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! phasewise server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! phasewise projects
//! phasewise status -p 1 -c saved/
//! phasewise export-concept -p 1 -o notes/
//! phasewise search wellness
//! ```

use clap::Parser;
use phasewise::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // PHASEWISE_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("PHASEWISE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "phasewise=info,phasewise_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Phasewise startup banner.
fn print_banner() {
    println!(
        r#"
  Phasewise v{}
  Concept > Feasibility > Planning > Implementation > Monitoring > Reporting
"#,
        env!("CARGO_PKG_VERSION")
    );
}
