//! Local stand-in upstreams for tests.

use axum::{Router, extract::State, http::StatusCode, http::Uri};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Default)]
struct Recorded {
    hits: AtomicUsize,
    paths: Mutex<Vec<String>>,
    arrivals: Mutex<Vec<Instant>>,
}

#[derive(Clone)]
struct Behavior {
    status: StatusCode,
    body: &'static str,
    delay: Option<Duration>,
    recorded: Arc<Recorded>,
}

/// An HTTP server on 127.0.0.1 answering every path with a fixed response.
pub struct MockUpstream {
    base_url: String,
    recorded: Arc<Recorded>,
}

impl MockUpstream {
    pub async fn spawn(status: StatusCode, body: &'static str) -> Self {
        Self::spawn_with(status, body, None).await
    }

    /// Never answers within any sane client timeout.
    pub async fn spawn_hanging() -> Self {
        Self::spawn_with(StatusCode::OK, "", Some(Duration::from_secs(3600))).await
    }

    async fn spawn_with(status: StatusCode, body: &'static str, delay: Option<Duration>) -> Self {
        let recorded = Arc::new(Recorded::default());
        let behavior = Behavior {
            status,
            body,
            delay,
            recorded: Arc::clone(&recorded),
        };

        let app = Router::new().fallback(respond).with_state(behavior);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            recorded,
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn hits(&self) -> usize {
        self.recorded.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.recorded.paths.lock().clone()
    }

    pub fn arrivals(&self) -> Vec<Instant> {
        self.recorded.arrivals.lock().clone()
    }
}

async fn respond(State(behavior): State<Behavior>, uri: Uri) -> (StatusCode, &'static str) {
    behavior.recorded.arrivals.lock().push(Instant::now());
    behavior.recorded.paths.lock().push(uri.path().to_string());
    behavior.recorded.hits.fetch_add(1, Ordering::SeqCst);

    if let Some(delay) = behavior.delay {
        tokio::time::sleep(delay).await;
    }
    (behavior.status, behavior.body)
}

/// Base URL of a port nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder().timeout(timeout).build().unwrap()
}
