//! gys-scraper - Guess Your Sneaker shoe file generator
//!
//! Turns a Flight Club catalog page into numbered shoe JSON files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gys_scraper::commands::batch::DEFAULT_SITE_TEMPLATE;
use gys_scraper::commands::{BatchCommand, BatchPlan, InitCommand, RunCommand};
use gys_scraper::config::{Config, Strategy};
use gys_scraper::prompt::ConsolePrompter;
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gys-scraper",
    version,
    about = "Guess Your Sneaker shoe file generator",
    long_about = "Scrapes a Flight Club catalog into numbered {\"name\", \"img\"} JSON files, driven by an execution JSON file."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Site root to scrape
    #[arg(long, global = true, env = "GYS_BASE_URL")]
    base_url: Option<String>,

    /// Item resolution strategy (search, catalog)
    #[arg(short, long, global = true, env = "GYS_STRATEGY")]
    strategy: Option<Strategy>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "GYS_PROXY")]
    proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shoe files from an execution JSON file
    #[command(alias = "r")]
    Run {
        /// Execution JSON file; prompts when omitted
        descriptor: Option<PathBuf>,
    },

    /// Create an execution JSON file interactively
    Init,

    /// Generate shoe files for a numbered range of catalogs
    #[command(alias = "b")]
    Batch {
        /// Execution JSON file to use and rewrite
        #[arg(short, long)]
        descriptor: PathBuf,

        /// First number of the range
        #[arg(long)]
        from: u32,

        /// Last number of the range (inclusive)
        #[arg(long)]
        to: u32,

        /// Site template; {} is replaced with each number
        #[arg(long, default_value = DEFAULT_SITE_TEMPLATE)]
        site_template: String,

        /// First file number (defaults to the descriptor's start)
        #[arg(long)]
        start: Option<NonZeroU32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else if cli.quiet {
        EnvFilter::new(Level::WARN.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Run { descriptor } => {
            let mut prompter = ConsolePrompter::new();
            let (_, descriptor) = InitCommand::new(&config).obtain(&mut prompter, descriptor)?;

            let summary = RunCommand::new(config).execute(&descriptor).await?;
            println!(
                "Last file number: {} ({} written, {} excluded, {} incomplete)",
                summary.last_number, summary.written, summary.excluded, summary.degraded
            );
        }

        Commands::Init => {
            let mut prompter = ConsolePrompter::new();
            let path = InitCommand::new(&config).execute(&mut prompter)?;
            println!("Wrote {}", path.display());
        }

        Commands::Batch { descriptor, from, to, site_template, start } => {
            let plan = BatchPlan { from, to, site_template, start };
            let summary = BatchCommand::new(RunCommand::new(config)).execute(&descriptor, &plan).await?;

            for (number, run) in &summary.runs {
                println!("{:>4}  last file {:>6}  ({} written)", number, run.last_number, run.written);
            }
            if let Some(last) = summary.last_number() {
                println!(
                    "Last file number: {} ({} written, {} excluded)",
                    last,
                    summary.written(),
                    summary.excluded()
                );
            }
        }
    }

    Ok(())
}
