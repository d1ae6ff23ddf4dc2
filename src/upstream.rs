use crate::error::UpstreamError;
use crate::types::{Payload, decode};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// One upstream data provider, addressed by its base URL.
///
/// Tracks outcome counters for the status endpoint. Unlike a circuit
/// breaker, nothing here ever skips the node.
pub struct UpstreamNode {
    base_url: String,
    client: reqwest::Client,
    successes: AtomicU64,
    failures: AtomicU64,
    last_failure_time: RwLock<Option<Instant>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeStats {
    pub url: String,
    pub successes: u64,
    pub failures: u64,
    /// Seconds since the last failed attempt, if any.
    pub last_failure_secs_ago: Option<u64>,
}

impl UpstreamNode {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            last_failure_time: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `base + path` and decode the body.
    pub async fn get(&self, path: &str) -> Result<Payload, UpstreamError> {
        match self.get_internal(path).await {
            Ok(payload) => {
                self.mark_success();
                Ok(payload)
            }
            Err(e) => {
                self.mark_failure();
                Err(e)
            }
        }
    }

    async fn get_internal(&self, path: &str) -> Result<Payload, UpstreamError> {
        let response = self
            .client
            .get(self.url_for(path))
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status()));
        }

        let body = response.text().await.map_err(UpstreamError::Body)?;
        Ok(decode(&body))
    }

    fn mark_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    fn mark_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        *self.last_failure_time.write() = Some(Instant::now());
    }

    pub fn stats(&self) -> NodeStats {
        NodeStats {
            url: self.base_url.clone(),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            last_failure_secs_ago: self
                .last_failure_time
                .read()
                .map(|at| at.elapsed().as_secs()),
        }
    }
}
