//! rouletabille CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod watch;

#[derive(Parser)]
#[command(name = "rouletabille")]
#[command(version)]
#[command(about = "Static site builder for rouletabille.fr", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that opens a project.
#[derive(Args, Debug, Clone, Default)]
struct SiteOptions {
    /// Project root (defaults to the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Configuration file (defaults to rouletabille.yml in the project root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write output to DIR (project relative)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Deploy under this URL path prefix
    #[arg(long)]
    path_prefix: Option<String>,

    /// Suppress console output
    #[arg(long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site once
    Build {
        #[command(flatten)]
        site: SiteOptions,
    },

    /// Build the site, then rebuild whenever sources change
    Watch {
        #[command(flatten)]
        site: SiteOptions,

        /// Milliseconds to wait for changes to settle before rebuilding
        #[arg(long, default_value_t = watch::DEFAULT_DEBOUNCE_MS)]
        debounce_ms: u64,
    },
}

impl Commands {
    fn quiet(&self) -> bool {
        match self {
            Commands::Build { site } | Commands::Watch { site, .. } => site.quiet,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.command.quiet() {
        "rouletabille=warn"
    } else {
        "rouletabille=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Build { site } => commands::build::execute(commands::build::BuildArgs {
            site: site.into(),
        }),
        Commands::Watch { site, debounce_ms } => {
            commands::watch::execute(commands::watch::WatchArgs {
                site: site.into(),
                debounce_ms,
            })
        }
    }
}

impl From<SiteOptions> for commands::SiteArgs {
    fn from(options: SiteOptions) -> Self {
        Self {
            root: options.root,
            config: options.config,
            output: options.output,
            path_prefix: options.path_prefix,
        }
    }
}
