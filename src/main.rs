use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skillmatch::api::{self, AppState};
use skillmatch::config::{Config, DEFAULT_CONFIG_FILE};
use skillmatch::matching::service;
use skillmatch::store::sqlite::Store;
use skillmatch::store::ProfileStore;
use skillmatch::{EmbeddingClient, Matchmaker, Profile};

#[derive(Parser)]
#[command(name = "skillmatch", version, about = "Rank collaborators by skills, age and reputation")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Load profiles from a JSON array into the store
    Import {
        /// Path to the JSON file
        path: PathBuf,
    },
    /// Rank collaborators for a user
    Rank {
        /// User whose profile is the reference
        user_id: String,
    },
    /// Semantic search over profiles
    Search {
        /// Natural language query
        query: String,
        /// Leave this user out of the results
        #[arg(long)]
        user: Option<String>,
    },
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        addr: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Init => {
            config.save(&cli.config)?;
            info!(path = %cli.config.display(), "configuration saved");
        }
        Commands::Import { path } => {
            let profiles = read_profiles(&path)?;
            let store = Store::open(&config.storage.path)?;
            let count = store.import(&profiles)?;
            info!(count, db = %config.storage.path.display(), "imported profiles");
        }
        Commands::Rank { user_id } => {
            let store: Arc<dyn ProfileStore> =
                Arc::new(Mutex::new(Store::open(&config.storage.path)?));
            let matchmaker = matchmaker(&config);
            let ranked = service::ranked_collaborators(&store, &matchmaker, &user_id).await?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Commands::Search { query, user } => {
            let store: Arc<dyn ProfileStore> =
                Arc::new(Mutex::new(Store::open(&config.storage.path)?));
            let matchmaker = matchmaker(&config);
            let results =
                service::search_collaborators(&store, &matchmaker, user.as_deref(), &query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.server.listen_addr.clone());
            let store = Store::open(&config.storage.path)?;
            info!(
                profiles = store.profile_count()?,
                db = %config.storage.path.display(),
                "opened profile store"
            );
            let state = AppState::new(
                matchmaker(&config),
                Arc::new(Mutex::new(store)),
                config.auth.clone(),
            );
            api::serve(&addr, state).await?;
        }
    }

    Ok(())
}

fn matchmaker(config: &Config) -> Matchmaker {
    Matchmaker::new(
        EmbeddingClient::from_config(&config.embed),
        config.ranking.clone(),
    )
}

fn read_profiles(path: &Path) -> Result<Vec<Profile>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading profiles from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing profiles from {}", path.display()))
}
