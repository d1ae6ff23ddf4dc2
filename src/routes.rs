use crate::error::ApiError;
use crate::resolver::Resolver;
use crate::types::Payload;
use crate::validation::{ValidationError, validate_path_param};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
}

/// Logical endpoints the gateway proxies, with their path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    TipHeight,
    BlockHeight(String),
    Block(String),
    Tx(String),
    AddressUtxo(String),
    AddressTxs(String),
}

impl Endpoint {
    pub fn cache_key(&self) -> String {
        match self {
            Self::TipHeight => "tip-height".to_string(),
            Self::BlockHeight(height) => format!("block-height:{}", height),
            Self::Block(hash) => format!("block:{}", hash),
            Self::Tx(txid) => format!("tx:{}", txid),
            Self::AddressUtxo(address) => format!("utxo:{}", address),
            Self::AddressTxs(address) => format!("address-txs:{}", address),
        }
    }

    /// Check the path parameter before it reaches a cache key or upstream URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::TipHeight => Ok(()),
            Self::BlockHeight(height) => validate_path_param("height", height),
            Self::Block(hash) => validate_path_param("hash", hash),
            Self::Tx(txid) => validate_path_param("txid", txid),
            Self::AddressUtxo(address) | Self::AddressTxs(address) => {
                validate_path_param("address", address)
            }
        }
    }

    /// Path relative to an upstream base URL.
    pub fn upstream_path(&self) -> String {
        match self {
            Self::TipHeight => "/blocks/tip/height".to_string(),
            Self::BlockHeight(height) => format!("/block-height/{}", height),
            Self::Block(hash) => format!("/block/{}", hash),
            Self::Tx(txid) => format!("/tx/{}", txid),
            Self::AddressUtxo(address) => format!("/address/{}/utxo", address),
            Self::AddressTxs(address) => format!("/address/{}/txs", address),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/status", get(status_check))
        .route("/api/blocks/tip/height", get(tip_height))
        .route("/api/block-height/{height}", get(block_height))
        .route("/api/block/{hash}", get(block))
        .route("/api/tx/{txid}", get(tx))
        .route("/api/address/{address}/utxo", get(address_utxo))
        .route("/api/address/{address}/txs", get(address_txs))
        .with_state(state)
}

async fn serve(state: &AppState, endpoint: Endpoint) -> Result<Json<Payload>, ApiError> {
    endpoint.validate()?;
    let payload = state
        .resolver
        .resolve(&endpoint.cache_key(), &endpoint.upstream_path())
        .await?;
    Ok(Json(payload))
}

async fn tip_height(State(state): State<AppState>) -> Result<Json<Payload>, ApiError> {
    serve(&state, Endpoint::TipHeight).await
}

async fn block_height(
    State(state): State<AppState>,
    Path(height): Path<String>,
) -> Result<Json<Payload>, ApiError> {
    serve(&state, Endpoint::BlockHeight(height)).await
}

async fn block(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<Payload>, ApiError> {
    serve(&state, Endpoint::Block(hash)).await
}

async fn tx(
    State(state): State<AppState>,
    Path(txid): Path<String>,
) -> Result<Json<Payload>, ApiError> {
    serve(&state, Endpoint::Tx(txid)).await
}

async fn address_utxo(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Payload>, ApiError> {
    serve(&state, Endpoint::AddressUtxo(address)).await
}

async fn address_txs(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Payload>, ApiError> {
    serve(&state, Endpoint::AddressTxs(address)).await
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Upstreams in priority order with their counters, plus cache and limiter settings
async fn status_check(State(state): State<AppState>) -> impl IntoResponse {
    let failover = state.resolver.failover();
    let cache = state.resolver.cache();

    let status_json = serde_json::json!({
        "upstreams": failover.nodes_status(),
        "cache": {
            "entries": cache.len(),
            "ttl_secs": cache.ttl().as_secs(),
        },
        "rate_limit": {
            "enabled": failover.limiter().is_enabled(),
            "rps": failover.limiter().rps(),
        },
    });

    (StatusCode::OK, Json(status_json))
}
