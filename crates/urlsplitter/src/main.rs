// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! urlsplitter - inspect the parameters, endpoints, and plugins the source
//! filter would use.

mod params;
mod plugins;
mod resolve;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use urlsplitter_config::SplitterConfig;
use urlsplitter_core::SplitterError;

/// urlsplitter - URL source filter tooling.
#[derive(Parser, Debug)]
#[command(name = "urlsplitter", version, about, long_about = None)]
struct Cli {
    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the parameter collection plugins would be configured with.
    Params {
        /// Override a parameter, as NAME=VALUE. May be repeated.
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
    /// Resolve a host into its ordered failover list.
    Resolve {
        host: String,
        port: u16,
        /// Resolve for datagram (UDP) sockets instead of stream (TCP).
        #[arg(long)]
        datagram: bool,
    },
    /// List known plugins, optionally filtered by a search query.
    Plugins {
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match urlsplitter_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            urlsplitter_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    info!(version = env!("CARGO_PKG_VERSION"), "urlsplitter starting");
    debug!(
        disabled_plugins = config.plugins.disabled.len(),
        extra_parameters = config.parameters.len(),
        "configuration loaded"
    );

    if let Err(e) = run(cli, &config).await {
        eprintln!("urlsplitter: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &SplitterConfig) -> Result<(), SplitterError> {
    debug!(command = ?cli.command, json = cli.json, "dispatching command");
    match cli.command {
        Some(Commands::Params { set }) => params::run_params(config, &set, cli.json),
        Some(Commands::Resolve {
            host,
            port,
            datagram,
        }) => resolve::run_resolve(host, port, datagram, cli.json).await,
        Some(Commands::Plugins { query }) => {
            plugins::run_plugins(config, query.as_deref(), cli.json);
            Ok(())
        }
        None => {
            println!("urlsplitter: use --help for available commands");
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("urlsplitter={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
