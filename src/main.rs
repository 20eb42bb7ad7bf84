// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Repograph CLI - explore a remote repository as a force-directed graph

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use repograph::commands;
use repograph::config::{self, Config};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "repograph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "REPOGRAPH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Access token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "REPOGRAPH_API_URL", global = true)]
    api_url: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive explorer
    View {
        /// Repository URL to load on startup
        url: Option<String>,
    },

    /// Export the repository graph
    Graph {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,

        /// Keep only nodes whose name contains this term
        #[arg(short, long)]
        search: Option<String>,

        /// Output format (dot, json, toml)
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the repository hierarchy
    Tree {
        /// Repository URL
        url: String,

        /// Highlight names containing this term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show repository metadata
    Info {
        /// Repository URL
        url: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Dotted key to print, e.g. layout.steps
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn level(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr, or to a file while the terminal belongs to the TUI
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("repograph={}", level(cli.verbose, cli.quiet))));

    if matches!(cli.command, Commands::View { .. }) {
        fs::create_dir_all(&config.cache_dir).with_context(|| {
            format!("Failed to create {}", config.cache_dir.display())
        })?;
        let path = config.cache_dir.join("repograph.log");
        let file = File::create(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url.clone_from(api_url);
    }
    init_logging(&cli, &config)?;

    let color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::View { url } => commands::view::run(&config, url).await,
        Commands::Graph {
            url,
            search,
            format,
            output,
        } => commands::export::run(&config, &url, &format, output, search).await,
        Commands::Tree { url, search } => commands::tree::run(&config, &url, search, color).await,
        Commands::Info { url, json } => commands::info::run(&config, &url, json, color).await,
        Commands::Config { key } => commands::config::run(&config, key.as_deref()),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
