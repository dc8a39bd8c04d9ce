use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};

use nb_cache::{MemoryCache, SupabaseCache};
use nb_core::{Config, NewsCache};
use nb_inference::OpenAiModel;
use nb_sources::NewsApiClient;
use nb_web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "nb", about = "Personalized news briefing server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// Use the in-memory cache instead of Supabase
        #[arg(long)]
        memory_cache: bool,
    },
    /// Delete expired cache rows
    SweepCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { port, memory_cache } => serve(port, memory_cache).await,
        Commands::SweepCache => sweep_cache().await,
    }
}

async fn serve(port: u16, memory_cache: bool) -> anyhow::Result<()> {
    let config = Config::from_env();
    let missing = config.missing_required(!memory_cache);
    if !missing.is_empty() {
        anyhow::bail!(
            "missing required environment variables: {}",
            missing.join(", ")
        );
    }

    let source = Arc::new(NewsApiClient::new(config.news_api_key.clone())?);
    let summarizer = Arc::new(OpenAiModel::new(config.openai_api_key.clone())?);
    let cache: Arc<dyn NewsCache> = if memory_cache {
        info!("using in-memory cache");
        Arc::new(MemoryCache::new())
    } else {
        Arc::new(build_supabase_cache(&config)?)
    };

    // Best-effort sweep of expired rows; expiry is enforced on lookup anyway.
    let sweeper = cache.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            if let Err(err) = sweeper.sweep_expired().await {
                warn!("cache sweep failed: {}", err);
            }
        }
    });

    let app = create_app(AppState {
        config,
        source,
        summarizer,
        cache,
    })
    .await;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn sweep_cache() -> anyhow::Result<()> {
    let config = Config::from_env();
    let cache = build_supabase_cache(&config)?;
    cache.sweep_expired().await?;
    info!("expired cache entries swept");
    Ok(())
}

fn build_supabase_cache(config: &Config) -> anyhow::Result<SupabaseCache> {
    let url = config
        .supabase_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("SUPABASE_URL is not configured"))?;
    let key = config
        .supabase_service_role_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("SUPABASE_SERVICE_ROLE_KEY is not configured"))?;
    Ok(SupabaseCache::new(url, key))
}
