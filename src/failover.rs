use crate::error::FetchError;
use crate::rate_limiter::RateLimiter;
use crate::types::Payload;
use crate::upstream::{NodeStats, UpstreamNode};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Successful fetch: the payload and the base URL that served it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub payload: Payload,
    pub source: String,
}

/// Ordered upstream list. Every fetch starts at the first node; there is no
/// memory of which node answered last time.
pub struct Failover {
    nodes: Vec<UpstreamNode>,
    limiter: Arc<RateLimiter>,
}

impl Failover {
    pub fn new(
        base_urls: &[String],
        timeout: Duration,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(base_urls, client, limiter))
    }

    pub fn with_client(
        base_urls: &[String],
        client: reqwest::Client,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        let nodes = base_urls
            .iter()
            .map(|url| UpstreamNode::new(url.clone(), client.clone()))
            .collect();

        Self { nodes, limiter }
    }

    /// Try each upstream in order, one rate-limiter slot per attempt, and
    /// return the first success.
    pub async fn fetch(&self, path: &str) -> Result<Fetched, FetchError> {
        for node in &self.nodes {
            self.limiter.acquire().await;

            match node.get(path).await {
                Ok(payload) => {
                    return Ok(Fetched {
                        payload,
                        source: node.base_url().to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Upstream {} failed: {}", node.url_for(path), e);
                }
            }
        }

        tracing::error!("All {} upstreams failed for {}", self.nodes.len(), path);
        Err(FetchError::AllUpstreamsExhausted {
            attempts: self.nodes.len(),
        })
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn nodes_status(&self) -> Vec<NodeStats> {
        self.nodes.iter().map(UpstreamNode::stats).collect()
    }
}
