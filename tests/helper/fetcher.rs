//! Fetcher test utilities

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use toleo::version::error::ResolveError;
use toleo::version::fetch::{FetchResponse, Fetcher};

struct Route {
    pattern: String,
    status: u16,
    body: Vec<u8>,
    delay: Option<Duration>,
}

/// Fetcher answering from fixed routes, counting every call
///
/// A route matches when its pattern is a substring of the URL; the first
/// match wins. Unmatched URLs get an empty 404.
#[derive(Default)]
pub struct StubFetcher {
    routes: Vec<Route>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, pattern: &str, status: u16, body: &str) -> Self {
        self.add(pattern, status, body, None)
    }

    pub fn delayed_route(self, pattern: &str, delay: Duration, status: u16, body: &str) -> Self {
        self.add(pattern, status, body, Some(delay))
    }

    fn add(mut self, pattern: &str, status: u16, body: &str, delay: Option<Duration>) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            status,
            body: body.as_bytes().to_vec(),
            delay,
        });
        self
    }

    /// Number of fetches made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str, _use_headers: bool) -> Result<FetchResponse, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let response = match self.routes.iter().find(|r| url.contains(&r.pattern)) {
            Some(route) => {
                if let Some(delay) = route.delay {
                    tokio::time::sleep(delay).await;
                }
                FetchResponse::new(route.status, route.body.clone())
            }
            None => FetchResponse::new(404, ""),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(response)
    }
}
