//! Extcat - builds static documentation pages from an extension catalog
//!
//! Subcommands:
//! - `build`   fetch, normalize, generate routes and export data files
//! - `pin`     pin the remote catalog as the local snapshot
//! - `list`    print the normalized catalog
//! - `resolve` resolve a detail path or `?id=` query the way the site does at runtime

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use extcat_core::SiteConfig;

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "extcat", version, about = "Build static pages for an extension catalog")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand. Each overrides the matching EXTCAT_* variable.
#[derive(Args, Debug, Default)]
struct GlobalArgs {
    /// Remote catalog endpoint
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// Static asset root holding the pinned servers.json
    #[arg(long, global = true)]
    static_dir: Option<PathBuf>,

    /// Site output root
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Listing route path (detail routes live under <route-base>/detail)
    #[arg(long, global = true)]
    route_base: Option<String>,

    /// Total attempts for the remote fetch
    #[arg(long, global = true)]
    fetch_attempts: Option<u32>,

    /// Delay between fetch attempts, in milliseconds
    #[arg(long, global = true)]
    fetch_backoff_ms: Option<u64>,

    /// Timeout for each catalog request, in seconds
    #[arg(long, global = true)]
    http_timeout_secs: Option<u64>,

    /// Ignore the pinned local snapshot and always fetch remotely
    #[arg(long, global = true)]
    no_local: bool,

    /// Allow a plain http:// catalog endpoint
    #[arg(long, global = true)]
    allow_insecure: bool,

    /// Directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Debug-level logging for extcat crates
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the catalog and write routes and data files
    Build {
        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch the remote catalog and pin it as the local snapshot
    Pin,

    /// Print the normalized catalog
    List {
        /// Filter by text in id, name or description
        #[arg(long)]
        search: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = commands::list::Sort::Catalog)]
        sort: commands::list::Sort,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a detail path (e.g. /extensions/detail/github or /extensions/detail?id=github)
    Resolve {
        location: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl GlobalArgs {
    /// Environment-derived config with CLI flags applied on top
    fn site_config(&self) -> Result<SiteConfig> {
        let mut config = SiteConfig::from_env().context("Invalid EXTCAT_* environment")?;

        if let Some(url) = &self.catalog_url {
            config.catalog_url = url.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if let Some(base) = &self.route_base {
            config.route_base = base.clone();
        }
        if let Some(attempts) = self.fetch_attempts {
            config.fetch.attempts = attempts;
        }
        if let Some(ms) = self.fetch_backoff_ms {
            config.fetch.backoff = Duration::from_millis(ms);
        }
        if let Some(secs) = self.http_timeout_secs {
            config.fetch.timeout = Duration::from_secs(secs);
        }
        if self.no_local {
            config.fetch.prefer_local = false;
        }
        if self.allow_insecure {
            config.fetch.allow_insecure = true;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for local builds)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = logging::init_tracing(cli.global.log_dir.clone(), cli.global.verbose);

    let config = cli.global.site_config()?;

    match cli.command {
        Command::Build { json } => commands::build::run(config, json).await,
        Command::Pin => commands::pin::run(config).await,
        Command::List { search, sort, json } => {
            commands::list::run(config, search.as_deref(), sort, json).await
        }
        Command::Resolve { location, json } => commands::resolve::run(config, &location, json).await,
    }
}
