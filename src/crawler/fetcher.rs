//! Governed HTTP fetching
//!
//! Every outbound request the crawler makes passes through [`RequestGate`],
//! which enforces the global concurrency ceiling. The gate wraps a shared
//! `reqwest` client and hands out one semaphore permit per request, so the
//! ceiling is a hard bound rather than a best-effort one. Atomic
//! issued/completed counters sit alongside the semaphore for observability:
//! the in-flight count they derive is what the ceiling tests sample.

use crate::{Result, SounderError};
use reqwest::{Client, Method, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Builds the HTTP client shared by all requests
///
/// Redirects are left at the reqwest default (followed, up to 10 hops)
/// because package discovery resolves hrefs against the response's final
/// URL. Timeouts bound how long a single probe can hold a gate permit.
pub fn build_http_client() -> std::result::Result<Client, reqwest::Error> {
    let user_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// The shared gate all outbound requests pass through
///
/// `issued - completed` never exceeds the ceiling (the semaphore guarantees
/// it) and never goes negative (`issued` is incremented strictly before the
/// matching `completed`).
pub struct RequestGate {
    client: Client,
    permits: Semaphore,
    issued: AtomicU64,
    completed: AtomicU64,
}

impl RequestGate {
    /// Creates a gate over `client` admitting at most `ceiling` concurrent requests
    pub fn new(client: Client, ceiling: usize) -> Self {
        Self {
            client,
            permits: Semaphore::new(ceiling),
            issued: AtomicU64::new(0),
            completed: AtomicU64::new(0),
        }
    }

    /// Issues a governed GET request
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.request(Method::GET, url).await
    }

    /// Issues a governed HEAD request
    pub async fn head(&self, url: &str) -> Result<Response> {
        self.request(Method::HEAD, url).await
    }

    /// Issues a governed request:
    ///
    /// 1. Wait for a permit while `ceiling` requests are in flight.
    /// 2. Parse the URL; a malformed URL fails here, before any counter is
    ///    touched and before anything goes on the wire.
    /// 3. Count the request as issued, perform it, count it as completed
    ///    regardless of outcome.
    async fn request(&self, method: Method, raw_url: &str) -> Result<Response> {
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("gate semaphore is never closed");

        let url = Url::parse(raw_url).map_err(|source| SounderError::MalformedUrl {
            url: raw_url.to_string(),
            source,
        })?;

        self.issued.fetch_add(1, Ordering::Relaxed);
        let result = self.client.request(method, url).send().await;
        self.completed.fetch_add(1, Ordering::Relaxed);

        result.map_err(|source| SounderError::Fetch {
            url: raw_url.to_string(),
            source,
        })
    }

    /// Number of requests currently in flight
    ///
    /// Reads two counters without a common ordering, so the value is a
    /// snapshot: loading `completed` first keeps it from underflowing.
    pub fn in_flight(&self) -> u64 {
        let completed = self.completed.load(Ordering::Relaxed);
        let issued = self.issued.load(Ordering::Relaxed);
        issued.saturating_sub(completed)
    }

    /// Total number of requests issued so far
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}
