//! Feed loader: the index document once at startup, detail documents
//! lazily per item.

use std::fmt;

use bulletin_core::{Diagnostic, DetailRecord, IndexDocument};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::fetch::{FetchError, Fetcher, Request, Response};

pub const INDEX_PATH: &str = "/data/index.json";

/// Directory of per-item detail documents, `<DETAIL_DIR><prid>.json`.
pub const DETAIL_DIR: &str = "/data/items/";

/// Why the index document could not be used. Fatal to the list view.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not reach {path}: {source}")]
    Network { path: String, source: FetchError },

    #[error("{path} returned status {status}")]
    Status { path: String, status: u16 },

    #[error("{path} returned an empty body")]
    EmptyBody { path: String },

    #[error("{path} is not a valid index document: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &str {
        match self {
            LoadError::Network { path, .. }
            | LoadError::Status { path, .. }
            | LoadError::EmptyBody { path }
            | LoadError::Parse { path, .. } => path,
        }
    }

    /// Message card for the list view.
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            resource: self.path().to_string(),
            message: self.to_string(),
        }
    }
}

/// Why a detail document was not used. Never surfaced as an error: the
/// reader shows the item's snippet instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Network(String),
    Status(u16),
    EmptyBody,
    Parse(String),
    /// The item has no id, so there is no document to ask for.
    MissingId,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Network(msg) => write!(f, "network: {msg}"),
            FallbackReason::Status(status) => write!(f, "status {status}"),
            FallbackReason::EmptyBody => f.write_str("empty body"),
            FallbackReason::Parse(msg) => write!(f, "parse: {msg}"),
            FallbackReason::MissingId => f.write_str("item has no id"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    Loaded(DetailRecord),
    /// Caller should show the snippet it already has.
    Fallback(FallbackReason),
}

impl DetailOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            DetailOutcome::Loaded(record) => Some(&record.text),
            DetailOutcome::Fallback(_) => None,
        }
    }
}

/// Loads feed documents from `origin` through any [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FeedClient<F> {
    fetcher: F,
    origin: Url,
}

impl<F: Fetcher> FeedClient<F> {
    pub fn new(fetcher: F, origin: Url) -> Self {
        Self { fetcher, origin }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        self.origin
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")))
    }

    /// URL of the detail document for `prid`, with the id percent-encoded as
    /// a single path segment.
    pub fn detail_url(&self, prid: &str) -> Result<Url, FetchError> {
        let mut url = self.url(DETAIL_DIR)?;
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(format!("{} cannot be a base", self.origin)))?
            .pop_if_empty()
            .push(&format!("{prid}.json"));
        Ok(url)
    }

    /// Fetch and parse the index document, bypassing HTTP caches.
    pub async fn load_index(&self) -> Result<IndexDocument, LoadError> {
        let path = INDEX_PATH.to_string();
        let request = match self.url(&path) {
            Ok(url) => Request::get(url).bypass_cache(),
            Err(source) => return Err(LoadError::Network { path, source }),
        };
        let resp = match self.fetcher.fetch(request).await {
            Ok(resp) => resp,
            Err(source) => return Err(LoadError::Network { path, source }),
        };
        if !resp.is_success() {
            return Err(LoadError::Status {
                path,
                status: resp.status,
            });
        }
        if is_blank(&resp) {
            return Err(LoadError::EmptyBody { path });
        }
        let doc: IndexDocument = serde_json::from_slice(&resp.body)
            .map_err(|source| LoadError::Parse { path, source })?;

        info!(
            items = doc.items.len(),
            updated_at = %doc.updated_at_utc,
            "loaded index document"
        );
        Ok(doc)
    }

    /// Fetch the detail document for `prid`. Failures come back as
    /// [`DetailOutcome::Fallback`].
    pub async fn load_detail(&self, prid: &str) -> DetailOutcome {
        let outcome = if prid.is_empty() {
            DetailOutcome::Fallback(FallbackReason::MissingId)
        } else {
            match self.detail_url(prid) {
                Ok(url) => match self.fetcher.fetch(Request::get(url)).await {
                    Ok(resp) => parse_detail(&resp),
                    Err(e) => DetailOutcome::Fallback(FallbackReason::Network(e.to_string())),
                },
                Err(e) => DetailOutcome::Fallback(FallbackReason::Network(e.to_string())),
            }
        };
        if let DetailOutcome::Fallback(reason) = &outcome {
            warn!(prid, reason = %reason, "detail unavailable; falling back to snippet");
        }
        outcome
    }
}

fn parse_detail(resp: &Response) -> DetailOutcome {
    if !resp.is_success() {
        return DetailOutcome::Fallback(FallbackReason::Status(resp.status));
    }
    if is_blank(resp) {
        return DetailOutcome::Fallback(FallbackReason::EmptyBody);
    }
    match serde_json::from_slice::<DetailRecord>(&resp.body) {
        Ok(record) => DetailOutcome::Loaded(record),
        Err(e) => DetailOutcome::Fallback(FallbackReason::Parse(e.to_string())),
    }
}

fn is_blank(resp: &Response) -> bool {
    resp.body.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::tests::ScriptedNet;
    use crate::fetch::CacheMode;

    const ORIGIN: &str = "https://feed.example";

    fn client(net: &Arc<ScriptedNet>) -> FeedClient<Arc<ScriptedNet>> {
        FeedClient::new(net.clone(), Url::parse(ORIGIN).unwrap())
    }

    const INDEX: &str = r#"{
        "updated_at_utc": "2025-02-01T06:30:00+00:00",
        "count": 2,
        "items": [
            {"prid": 2100001, "ministry": "Ministry of Finance", "title": "Union Budget 2025",
             "snippet": "Budget", "posted_on_raw": "", "source_url": "", "pdfs": []},
            {"ministry": "Ministry of Finance", "title": "No id"}
        ]
    }"#;

    #[tokio::test]
    async fn index_loads_and_normalises_ids() {
        let net = Arc::new(ScriptedNet::default());
        net.serve("https://feed.example/data/index.json", 200, INDEX);

        let doc = client(&net).load_index().await.unwrap();
        assert_eq!(doc.items.len(), 2);
        assert_eq!(doc.items[0].prid, "2100001");
        assert_eq!(doc.items[1].prid, "");
        assert_eq!(net.calls()[0].cache, CacheMode::Bypass);
    }

    #[tokio::test]
    async fn index_failures_are_distinguishable() {
        let net = Arc::new(ScriptedNet::default());
        let feed = client(&net);

        net.serve("https://feed.example/data/index.json", 503, "");
        assert!(matches!(feed.load_index().await, Err(LoadError::Status { status: 503, .. })));

        net.serve("https://feed.example/data/index.json", 200, "  \n");
        assert!(matches!(feed.load_index().await, Err(LoadError::EmptyBody { .. })));

        net.serve("https://feed.example/data/index.json", 200, "<html>");
        assert!(matches!(feed.load_index().await, Err(LoadError::Parse { .. })));

        net.set_offline(true);
        let err = feed.load_index().await.unwrap_err();
        assert!(matches!(err, LoadError::Network { .. }));
        assert_eq!(err.path(), INDEX_PATH);
        let card = err.diagnostic();
        assert_eq!(card.resource, "/data/index.json");
        assert!(card.message.contains("/data/index.json"));
    }

    #[tokio::test]
    async fn detail_loads_text() {
        let net = Arc::new(ScriptedNet::default());
        net.serve(
            "https://feed.example/data/items/2100001.json",
            200,
            r#"{"prid": "2100001", "text": "Full release text", "fetched_at_utc": "x"}"#,
        );
        let outcome = client(&net).load_detail("2100001").await;
        assert_eq!(outcome.text(), Some("Full release text"));
    }

    #[tokio::test]
    async fn detail_failures_fall_back() {
        let net = Arc::new(ScriptedNet::default());
        let feed = client(&net);

        assert_eq!(
            feed.load_detail("missing").await,
            DetailOutcome::Fallback(FallbackReason::Status(404))
        );

        net.serve("https://feed.example/data/items/1.json", 200, "");
        assert_eq!(
            feed.load_detail("1").await,
            DetailOutcome::Fallback(FallbackReason::EmptyBody)
        );

        net.serve("https://feed.example/data/items/2.json", 200, "{broken");
        assert!(matches!(
            feed.load_detail("2").await,
            DetailOutcome::Fallback(FallbackReason::Parse(_))
        ));

        net.set_offline(true);
        assert!(matches!(
            feed.load_detail("3").await,
            DetailOutcome::Fallback(FallbackReason::Network(_))
        ));
    }

    #[tokio::test]
    async fn detail_ids_stay_in_one_segment() {
        let net = Arc::new(ScriptedNet::default());
        let feed = client(&net);
        assert_eq!(
            feed.detail_url("a/b?c#d").unwrap().as_str(),
            "https://feed.example/data/items/a%2Fb%3Fc%23d.json"
        );

        net.serve("https://feed.example/data/items/a%2Fb%3Fc%23d.json", 200, r#"{"text": "ok"}"#);
        assert_eq!(feed.load_detail("a/b?c#d").await.text(), Some("ok"));
    }

    #[tokio::test]
    async fn empty_id_falls_back_without_fetching() {
        let net = Arc::new(ScriptedNet::default());
        assert_eq!(
            client(&net).load_detail("").await,
            DetailOutcome::Fallback(FallbackReason::MissingId)
        );
        assert!(net.calls().is_empty());
    }

    #[cfg(feature = "http")]
    mod over_http {
        use super::*;
        use crate::fetch::HttpFetcher;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[tokio::test]
        async fn index_and_detail_over_real_http() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/data/index.json"))
                .respond_with(ResponseTemplate::new(200).set_body_string(INDEX))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/data/items/2100001.json"))
                .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"text": "body"}"#))
                .mount(&server)
                .await;

            let feed = FeedClient::new(HttpFetcher::new(), Url::parse(&server.uri()).unwrap());
            let doc = feed.load_index().await.unwrap();
            assert_eq!(doc.items[0].title, "Union Budget 2025");
            assert_eq!(feed.load_detail("2100001").await.text(), Some("body"));
            assert!(matches!(
                feed.load_detail("404").await,
                DetailOutcome::Fallback(FallbackReason::Status(404))
            ));
        }
    }
}
