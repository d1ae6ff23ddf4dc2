mod cache;
mod config;
mod error;
mod failover;
mod rate_limiter;
mod resolver;
mod routes;
mod types;
mod upstream;
mod validation;

#[cfg(test)]
mod test_support;

use cache::CacheStore;
use config::Config;
use failover::Failover;
use rate_limiter::RateLimiter;
use resolver::Resolver;
use routes::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "btc_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting BTC Gateway");

    let config = Config::from_env()?;

    if config.upstreams.is_empty() {
        tracing::warn!("No upstreams configured; every lookup will fail");
    }
    tracing::info!("Configured {} upstreams", config.upstreams.len());
    for (priority, upstream) in config.upstreams.iter().enumerate() {
        tracing::info!("  {}. {}", priority + 1, upstream);
    }
    tracing::info!(
        "Cache TTL {:?}, rate limit {} rps, upstream timeout {:?}",
        config.cache_ttl,
        config.rate_limit_rps,
        config.upstream_timeout
    );

    let limiter = Arc::new(RateLimiter::new(config.rate_limit_rps));
    let failover = Arc::new(Failover::new(
        &config.upstreams,
        config.upstream_timeout,
        limiter,
    )?);
    let cache = Arc::new(CacheStore::new(config.cache_ttl));

    let state = AppState {
        resolver: Arc::new(Resolver::new(cache, failover)),
    };

    let app = routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
