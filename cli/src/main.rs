//! Plugin Binding CLI
//!
//! Resolves the per-control-plane bindings of a plugin from an entity
//! snapshot.
//!
//! # Usage
//!
//! ```bash
//! pluginbind resolve --snapshot entities.yaml --plugin rate-limit
//! pluginbind resolve -s entities.json -p auth --namespace team-a --format json
//! pluginbind tenants --snapshot entities.yaml --plugin rate-limit
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "pluginbind")]
#[command(version)]
#[command(about = "Resolve plugin bindings per control plane", long_about = None)]
struct Cli {
    /// Resolver config file (TOML)
    #[arg(long, short, global = true, env = "PLUGINBIND_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, env = "PLUGINBIND_FORMAT", default_value = "table")]
    format: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Snapshot and plugin selection shared by all commands
#[derive(clap::Args)]
pub struct Selection {
    /// Snapshot file (YAML, or JSON with a .json extension)
    #[arg(long, short)]
    snapshot: PathBuf,

    /// Plugin name
    #[arg(long, short)]
    plugin: String,

    /// Plugin namespace
    #[arg(long, short, default_value = "default")]
    namespace: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bindings of a plugin per control plane
    Resolve {
        #[command(flatten)]
        selection: Selection,
    },
    /// Print the entities referencing a plugin, grouped per control plane
    Tenants {
        #[command(flatten)]
        selection: Selection,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match config::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Resolve { selection } => {
                commands::resolve::handle(&selection, config, cli.format).await
            }
            Commands::Tenants { selection } => {
                commands::tenants::handle(&selection, config, cli.format).await
            }
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
