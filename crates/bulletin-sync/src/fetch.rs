//! The request/response boundary every network attempt goes through.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// How a request treats intermediate HTTP caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Default,
    /// Revalidate end to end; no intermediate cache may answer.
    Bypass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub cache: CacheMode,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            url,
            cache: CacheMode::Default,
        }
    }

    pub fn bypass_cache(mut self) -> Self {
        self.cache = CacheMode::Bypass;
        self
    }

    /// Key under which a response to this request is cached. The fragment
    /// never reaches the server, so it is not part of the key.
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("request interceptor unavailable: {0}")]
    Interceptor(String),
}

/// Anything that can answer a request: the real network, the cache agent,
/// or a scripted stand-in.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        (**self).fetch(request).await
    }
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
    use tracing::debug;

    use super::{CacheMode, FetchError, Fetcher, Request, Response};

    /// Plain network access through reqwest. No retries.
    #[derive(Debug, Clone, Default)]
    pub struct HttpFetcher {
        client: reqwest::Client,
    }

    impl HttpFetcher {
        pub fn new() -> Self {
            let client = reqwest::Client::builder()
                .user_agent(concat!("bulletin/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default();
            Self { client }
        }
    }

    #[async_trait]
    impl Fetcher for HttpFetcher {
        async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
            let url = request.url.to_string();
            let network = |e: reqwest::Error| FetchError::Network {
                url: url.clone(),
                message: e.to_string(),
            };

            let mut builder = self.client.get(request.url.clone());
            if request.cache == CacheMode::Bypass {
                builder = builder
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache");
            }

            let resp = builder.send().await.map_err(network)?;
            let status = resp.status().as_u16();
            let content_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let final_url = resp.url().to_string();
            let body = resp.bytes().await.map_err(network)?.to_vec();
            debug!(url = %url, status, bytes = body.len(), "network response");

            Ok(Response {
                url: final_url,
                status,
                content_type,
                body,
            })
        }
    }

}
