//! Test utilities for html-include
//!
//! This module provides helpers for writing tests against the resolver
//! without real network traffic: a routing in-memory [`StaticTransport`]
//! and one-call logging initialization. It is compiled for unit tests and,
//! via the `test-utils` feature, for the crate's integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use crate::core::IncludeError;
use crate::transport::{FetchOptions, FetchResponse, Transport};

/// Global flag to ensure logging is only initialized once in tests.
static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests, once per process.
///
/// Respects `RUST_LOG` when set; defaults to `debug` for this crate
/// otherwise. Safe to call from every test.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("html_include=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Canned outcome for one routed URL.
#[derive(Debug, Clone)]
enum Route {
    /// Successful response with this body.
    Body(String),
    /// Non-success response (e.g. a 404): `ok == false`, empty body.
    Missing,
    /// Transport-level failure with this reason.
    Broken(String),
}

#[derive(Debug, Default)]
struct Inner {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<String>>,
    options_seen: Mutex<Vec<(String, FetchOptions)>>,
}

/// In-memory transport with canned responses per URL.
///
/// Clones share state, so a test can hand one clone to the resolver and
/// keep another to inspect the request log afterwards. Unrouted URLs
/// behave as transport failures, which keeps typos loud.
#[derive(Debug, Clone, Default)]
pub struct StaticTransport {
    inner: Arc<Inner>,
}

impl StaticTransport {
    /// An empty transport; every fetch fails until routes are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_route(self, url: &str, route: Route) -> Self {
        // Routes are added builder-style before the transport is shared;
        // a shared clone is deep-copied instead.
        let mut inner = Arc::try_unwrap(self.inner).unwrap_or_else(|arc| Inner {
            routes: arc.routes.clone(),
            requests: Mutex::new(arc.requests.lock().unwrap().clone()),
            options_seen: Mutex::new(arc.options_seen.lock().unwrap().clone()),
        });
        inner.routes.insert(url.to_string(), route);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Route `url` to a successful response with `body`.
    #[must_use]
    pub fn route(self, url: &str, body: &str) -> Self {
        self.with_route(url, Route::Body(body.to_string()))
    }

    /// Route `url` to a non-success response.
    #[must_use]
    pub fn missing(self, url: &str) -> Self {
        self.with_route(url, Route::Missing)
    }

    /// Route `url` to a transport-level failure.
    #[must_use]
    pub fn broken(self, url: &str) -> Self {
        self.with_route(url, Route::Broken("simulated connection failure".to_string()))
    }

    /// URLs fetched so far, in request order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// `(url, options)` pairs seen so far, in request order.
    #[must_use]
    pub fn options_seen(&self) -> Vec<(String, FetchOptions)> {
        self.inner.options_seen.lock().unwrap().clone()
    }
}

impl Transport for StaticTransport {
    async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchResponse, IncludeError> {
        self.inner.requests.lock().unwrap().push(url.to_string());
        self.inner
            .options_seen
            .lock()
            .unwrap()
            .push((url.to_string(), *options));
        match self.inner.routes.get(url) {
            Some(Route::Body(body)) => Ok(FetchResponse::success(body.clone())),
            Some(Route::Missing) => Ok(FetchResponse::failure()),
            Some(Route::Broken(reason)) => Err(IncludeError::Transport {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(IncludeError::Transport {
                url: url.to_string(),
                reason: "no route configured".to_string(),
            }),
        }
    }
}
