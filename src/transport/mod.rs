//! Fragment fetching.
//!
//! The resolver is transport-agnostic: it hands a URL plus normalized
//! request options to a [`Transport`] and receives either a response
//! (success flag and text body) or a transport-level error. Policy for
//! both lives in the resolver, not here:
//!
//! - a response with `ok == false` becomes empty content (the directive
//!   vanishes without inserting anything),
//! - a transport error deletes the directive and is logged, never
//!   propagated.
//!
//! One network operation per call; no retries; no timeout beyond the
//! transport's own.
//!
//! [`HttpTransport`] is the production implementation on `reqwest`. The
//! directive's cache mode travels as a `Cache-Control` request header and
//! its request mode as `Sec-Fetch-Mode`, which is as close as a plain
//! HTTP client gets to a host's fetch cache/mode semantics.

use std::future::Future;

use crate::core::IncludeError;
use crate::directive::{CacheMode, RequestMode};

/// Normalized request options derived from a directive's configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Request mode (`cors`, `no-cors`, `same-origin`).
    pub mode: RequestMode,
    /// Cache behavior requested from the transport layer.
    pub cache: CacheMode,
}

/// A fetched response: success flag plus text body.
///
/// `ok` mirrors a 2xx-equivalent status. Callers must not interpret the
/// body when `ok` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub ok: bool,
    pub body: String,
}

impl FetchResponse {
    /// A successful response carrying `body`.
    #[must_use]
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            ok: true,
            body: body.into(),
        }
    }

    /// A non-success response (body is irrelevant and kept empty).
    #[must_use]
    pub fn failure() -> Self {
        Self {
            ok: false,
            body: String::new(),
        }
    }
}

/// Outcome of a fetch after the resolver applies response policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body of a successful response, ready for materialization.
    Content(String),
    /// Non-success response; the directive is removed with nothing
    /// inserted.
    Empty,
}

/// The network side of fragment inclusion.
///
/// Implementations perform exactly one network operation per call and
/// report transport-level failures as [`IncludeError::Transport`].
/// Non-success statuses are not errors; they surface as a response with
/// `ok == false`.
pub trait Transport {
    /// Fetch `url` under the given options.
    fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<FetchResponse, IncludeError>> + Send;
}

impl CacheMode {
    /// The `Cache-Control` request header value for this mode, if the mode
    /// asks for one. `Default` defers entirely to intermediary caches.
    #[must_use]
    pub const fn cache_control_value(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::NoStore => Some("no-store"),
            // A reload bypasses caches on the way out, same as no-cache at
            // the request-header level.
            Self::Reload | Self::NoCache => Some("no-cache"),
            Self::ForceCache => Some("max-stale"),
            Self::OnlyIfCached => Some("only-if-cached"),
        }
    }
}

/// HTTP transport on a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport reusing an existing client (connection pools,
    /// proxies, and timeouts are the caller's).
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchResponse, IncludeError> {
        let mut request = self
            .client
            .get(url)
            .header("Sec-Fetch-Mode", options.mode.as_str());
        if let Some(cache_control) = options.cache.cache_control_value() {
            request = request.header(reqwest::header::CACHE_CONTROL, cache_control);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_builder() {
                IncludeError::InvalidUrl {
                    url: url.to_string(),
                    reason: err.to_string(),
                }
            } else {
                IncludeError::Transport {
                    url: url.to_string(),
                    reason: err.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            tracing::debug!(url, status = %response.status(), "fragment fetch returned non-success status");
            return Ok(FetchResponse::failure());
        }

        let body = response
            .text()
            .await
            .map_err(|err| IncludeError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        Ok(FetchResponse::success(body))
    }
}
