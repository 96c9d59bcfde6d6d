//! # mbget CLI Entry Point
//!
//! Parses arguments with clap, layers them over `mbget.toml` and routes to
//! the command handlers.
//!
//! ## Commands
//!
//! - `update` - Fetch uncached barrels and regenerate `barrels.jungle`
//! - `cache ls|path|clean` - Inspect or clear the barrel cache
//! - `completion <shell>` - Generate shell completions

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mbget::cache::Cache;
use mbget::config::{Config, ConfigOverrides, TOKEN_ENV};
use mbget::fetch::GithubFetcher;
use mbget::manifest::Manifest;
use mbget::packages::PackageMap;
use mbget::project::Project;
use mbget::update::{Update, UpdateReport};

#[derive(Parser)]
#[command(name = "mbget")]
#[command(about = "Connect IQ Package Manager", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Github API token for requests
    #[arg(short, long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,
    /// Specify path to config file [default: mbget.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Specify application manifest
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,
    /// Specify the package map text file
    #[arg(short, long, global = true)]
    package: Option<PathBuf>,
    /// Barrel jungle file to generate
    #[arg(short, long, global = true)]
    jungle: Option<PathBuf>,
    /// Specify directory to store barrels in
    #[arg(short = 'o', long, global = true)]
    directory: Option<PathBuf>,
    /// Show diagnostics (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and update dependencies
    Update,
    /// Manage the barrel cache
    Cache {
        #[command(subcommand)]
        op: CacheOp,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

#[derive(Subcommand)]
enum CacheOp {
    /// List cached barrels
    Ls,
    /// Print cache file path
    Path,
    /// Delete cached barrels and the cache file
    Clean,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config: self.config.clone(),
            manifest: self.manifest.clone(),
            package: self.package.clone(),
            directory: self.directory.clone(),
            jungle: self.jungle.clone(),
            token: self.token.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.overrides())?;

    match command {
        Commands::Update => run_update(&config),
        Commands::Cache { op } => match op {
            CacheOp::Ls => list_cache(&config),
            CacheOp::Path => {
                println!("{}", config.cache_file().display());
                Ok(())
            }
            CacheOp::Clean => clean_cache(&config),
        },
        Commands::Completion { .. } => Ok(()),
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("mbget=warn"),
        1 => EnvFilter::new("mbget=info"),
        _ => EnvFilter::new("mbget=debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run_update(config: &Config) -> Result<()> {
    let manifest = Manifest::load(&config.manifest)?;
    let packages = PackageMap::load(&config.package)?;
    let mut cache = Cache::open(&config.directory);
    let mut project = Project::new(&manifest, &packages, &mut cache)?;

    let fetcher = GithubFetcher::new(config.token.clone());
    let report = Update::new(&mut project, &fetcher, config).update_project()?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &UpdateReport) {
    println!(
        "{} {} cached, {} updated, {} failed",
        if report.is_complete() {
            "✓".green()
        } else {
            "!".yellow()
        },
        report.cached.len(),
        report.updated.len(),
        report.failed.len()
    );

    for failed in &report.failed {
        println!(
            "{} Warning: {} was not updated: {}",
            "!".yellow(),
            failed.label.bold(),
            failed.error
        );
    }
}

fn list_cache(config: &Config) -> Result<()> {
    let cache = Cache::open(&config.directory);
    if cache.is_empty() {
        println!("{} Cache is empty.", "ℹ".blue());
        return Ok(());
    }

    for (name, entry) in cache.entries() {
        println!(
            "   {} {} {}",
            name.bold(),
            entry.version.green(),
            entry.artifact.display()
        );
    }
    Ok(())
}

fn clean_cache(config: &Config) -> Result<()> {
    // Unvalidated, so modified barrels are removed as well.
    let mut cache = Cache::load(config.cache_file());
    if cache.is_empty() && !config.cache_file().exists() {
        println!("{} Cache already empty.", "✓".green());
        return Ok(());
    }

    println!("{} Cleaning cache...", "🧹".yellow());
    let removed = cache.clean()?;
    println!("{} Removed {} cached barrels.", "✓".green(), removed);
    Ok(())
}
