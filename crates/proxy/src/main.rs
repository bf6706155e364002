mod config;
mod middleware;
mod reverse_proxy;
mod tenants;

use anyhow::Context;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use clap::{Parser, Subcommand};
use dbfilter_tenant::{
    EmbeddedSuffixList, SuffixClassifier, SuffixListFile, TenantExtractor, TenantResolver,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use config::ProxyConfig;
use tenants::TenantDirectory;

/// Host-based database selecting reverse proxy
#[derive(Parser)]
#[command(name = "dbfilter-proxy", about = "Routes each request to the tenant database its host selects")]
struct Cli {
    /// Path to the proxy configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = "dbfilter.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve HTTP and forward requests (default)
    Serve,
    /// Print the databases selected for a host and exit
    Resolve {
        /// Host header value, e.g. `www.example.com:8069`
        host: String,
    },
}

/// Shared application state available to all request handlers.
pub struct ProxyState {
    pub extractor: TenantExtractor,
    pub directory: TenantDirectory,
}

/// Build the router, all requests go through the tenant handler.
pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .fallback(move |req: Request<Body>| {
            let state = Arc::clone(&state);
            async move { middleware::handle_request(state, req).await }
        })
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dbfilter_proxy=info,dbfilter_tenant=info,tower_http=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ProxyConfig::load(&cli.config)?;
    config.dbfilter = config.dbfilter.with_env_overrides();

    // The suffix list is loaded once, before any request is accepted
    let classifier: Arc<dyn SuffixClassifier> = match &config.public_suffix_list {
        Some(path) => Arc::new(SuffixListFile::load(path)?),
        None => Arc::new(EmbeddedSuffixList::new()),
    };

    let resolver = TenantResolver::new(&config.dbfilter, classifier);
    let directory = TenantDirectory::new(&config.tenants);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Resolve { host } => {
            let databases = resolver.resolve(&host, &directory.names())?;
            let output = serde_json::json!({ "host": host, "databases": databases });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Command::Serve => serve(config, resolver, directory).await,
    }
}

async fn serve(
    config: ProxyConfig,
    resolver: TenantResolver,
    directory: TenantDirectory,
) -> anyhow::Result<()> {
    tracing::info!("dbfilter proxy starting");
    tracing::info!("  Listen:     {}", config.server.listen);
    tracing::info!("  Mode:       {:?}", resolver.mode());
    tracing::info!("  Proxy mode: {}", config.server.proxy_mode);
    tracing::info!("  Tenants:    {}", directory.len());

    if directory.is_empty() {
        tracing::warn!("No tenants configured, every request will be rejected");
    }

    let state = Arc::new(ProxyState {
        extractor: TenantExtractor::new(resolver, config.server.proxy_mode),
        directory,
    });

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.listen))?;

    tracing::info!("dbfilter proxy listening on {}", config.server.listen);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
