use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use sorted_playlists::clients::errors::Result;
use sorted_playlists::refresh::{ConfigBuilder, RefreshOptions, Refresher};

#[derive(Parser)]
#[command(name = "sorted-playlists")]
#[command(version, about = "Republish an artist's catalog as sorted Spotify playlists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog and rewrite every configured playlist
    Refresh {
        /// Settings file (defaults to $SORTED_PLAYLISTS_CONFIG or the user config dir)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the assembled playlists without updating them
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete every cached API response
    ClearCache {
        /// Settings file naming the cache directory (same lookup as `refresh`)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Refresh { config, dry_run } => refresh_playlists(config, dry_run).await,
        Commands::ClearCache { config } => clear_cache(config).await,
    }
}

async fn refresh_playlists(config_path: Option<PathBuf>, dry_run: bool) -> Result<()> {
    info!("Building config ...");
    let config = ConfigBuilder::new()
        .settings_path(config_path)
        .build()
        .await?;
    info!("Authorizing client ...");
    // CLI prompt may be shown here on the first run
    config.api.authorize_client().await?;

    let refresher = Refresher::new(config);
    refresher
        .refresh(RefreshOptions {
            dry_run,
            ..RefreshOptions::default()
        })
        .await?;
    Ok(())
}

async fn clear_cache(config_path: Option<PathBuf>) -> Result<()> {
    let cache = ConfigBuilder::new()
        .settings_path(config_path)
        .build_cache()
        .await?;
    let removed = cache.clear().await?;
    info!("Removed {removed} cached responses from {:?}", cache.path());
    Ok(())
}
