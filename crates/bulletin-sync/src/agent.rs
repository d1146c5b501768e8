//! Cache agent: decides per request whether the network or the cache
//! answers, and keeps cache generations consistent across deployments.
//!
//! The agent sits between page logic and the network. Page code only ever
//! sees a [`Fetcher`]; [`AgentHandle`] is that fetcher, forwarding each
//! request to the agent task and resolving it independently of the others.
//!
//! Strategies, chosen by path through a [`StrategyTable`]:
//!
//! - network-first (the feed, `/data/*.json`): one network attempt that
//!   bypasses HTTP caches; a successful response is copied into the current
//!   generation, a failed attempt falls back to the best cached copy.
//! - cache-first (everything else on the origin): a cached copy if any,
//!   otherwise one network attempt whose response is returned as-is and
//!   **not** written back. Shell assets only enter the cache through the
//!   install precache, so offline availability of the shell is exactly the
//!   install manifest.
//!
//! Cross-origin requests are never intercepted.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::CacheStorage;
use crate::fetch::{FetchError, Fetcher, Request, Response};

/// Shell resources precached on install. The data feed is not listed.
pub const SHELL_MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/app.js",
    "/styles.css",
    "/manifest.webmanifest",
];

const REQUEST_QUEUE: usize = 64;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error(transparent)]
    Network(#[from] FetchError),

    #[error("cache storage error: {0}")]
    Storage(String),

    #[error("precache of {path} failed: {reason}")]
    Precache { path: String, reason: String },

    #[error("generation {0} has not been installed")]
    NotInstalled(String),

    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NetworkFirst,
    CacheFirst,
}

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    suffix: String,
    strategy: Strategy,
}

/// Path pattern to strategy. First matching route wins; unmatched paths use
/// the fallback.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    routes: Vec<Route>,
    fallback: Strategy,
}

impl StrategyTable {
    pub fn new(fallback: Strategy) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// Add a route for paths starting with `prefix` and ending with `suffix`.
    pub fn route(
        mut self,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        strategy: Strategy,
    ) -> Self {
        self.routes.push(Route {
            prefix: prefix.into(),
            suffix: suffix.into(),
            strategy,
        });
        self
    }

    pub fn resolve(&self, path: &str) -> Strategy {
        self.routes
            .iter()
            .find(|r| path.starts_with(&r.prefix) && path.ends_with(&r.suffix))
            .map(|r| r.strategy)
            .unwrap_or(self.fallback)
    }
}

impl Default for StrategyTable {
    /// Feed documents network-first, everything else cache-first.
    fn default() -> Self {
        StrategyTable::new(Strategy::CacheFirst).route("/data/", ".json", Strategy::NetworkFirst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Parsed,
    Installing,
    Installed,
    Activating,
    Active,
    /// Install failed; older generations are left in place.
    Failed,
}

impl Lifecycle {
    pub fn is_settled(self) -> bool {
        matches!(self, Lifecycle::Active | Lifecycle::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub origin: Url,
    /// Opaque version token; changing it is how old shell caches get dropped.
    pub generation: String,
    pub manifest: Vec<String>,
    pub strategies: StrategyTable,
}

impl AgentConfig {
    pub fn new(origin: Url, generation: impl Into<String>) -> Self {
        Self {
            origin,
            generation: generation.into(),
            manifest: SHELL_MANIFEST.iter().map(|p| p.to_string()).collect(),
            strategies: StrategyTable::default(),
        }
    }

    pub fn with_manifest<I, P>(mut self, manifest: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.manifest = manifest.into_iter().map(Into::into).collect();
        self
    }
}

pub struct CacheAgent<F, S> {
    config: AgentConfig,
    fetcher: F,
    storage: S,
    lifecycle: watch::Sender<Lifecycle>,
}

impl<F: Fetcher, S: CacheStorage> CacheAgent<F, S> {
    pub fn new(config: AgentConfig, fetcher: F, storage: S) -> Self {
        let (lifecycle, _) = watch::channel(Lifecycle::Parsed);
        Self {
            config,
            fetcher,
            storage,
            lifecycle,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Lifecycle> {
        self.lifecycle.subscribe()
    }

    fn set_lifecycle(&self, next: Lifecycle) {
        self.lifecycle.send_replace(next);
    }

    fn resolve(&self, path: &str) -> Result<Url, CacheError> {
        self.config
            .origin
            .join(path)
            .map_err(|e| CacheError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Whether every manifest entry is already cached in the current generation.
    pub async fn is_installed(&self) -> Result<bool, CacheError> {
        for path in &self.config.manifest {
            let key = Request::get(self.resolve(path)?).cache_key();
            if self.storage.get(&self.config.generation, &key).await?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Precache the shell manifest into the current generation.
    ///
    /// All entries are fetched before anything is written; a single failed
    /// or unsuccessful fetch aborts the install and commits nothing.
    pub async fn install(&self) -> Result<usize, CacheError> {
        self.set_lifecycle(Lifecycle::Installing);
        match self.precache().await {
            Ok(count) => {
                self.set_lifecycle(Lifecycle::Installed);
                info!(generation = %self.config.generation, entries = count, "cache generation installed");
                Ok(count)
            }
            Err(e) => {
                self.set_lifecycle(Lifecycle::Failed);
                warn!(generation = %self.config.generation, error = %e, "cache install failed");
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<usize, CacheError> {
        let fetches = self.config.manifest.iter().map(|path| async move {
            let request = Request::get(self.resolve(path)?);
            let key = request.cache_key();
            let resp = self
                .fetcher
                .fetch(request)
                .await
                .map_err(|e| CacheError::Precache {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            if !resp.is_success() {
                return Err(CacheError::Precache {
                    path: path.clone(),
                    reason: format!("status {}", resp.status),
                });
            }
            Ok::<_, CacheError>((key, resp))
        });
        let entries = try_join_all(fetches).await?;

        for (key, resp) in &entries {
            self.storage.put(&self.config.generation, key, resp).await?;
        }
        Ok(entries.len())
    }

    /// Delete every generation other than the current one and start
    /// controlling requests. Returns the purged generation names.
    pub async fn activate(&self) -> Result<Vec<String>, CacheError> {
        if !matches!(self.lifecycle(), Lifecycle::Installed | Lifecycle::Active) {
            return Err(CacheError::NotInstalled(self.config.generation.clone()));
        }
        self.set_lifecycle(Lifecycle::Activating);

        let mut purged = Vec::new();
        for name in self.storage.generations().await? {
            if name != self.config.generation && self.storage.delete_generation(&name).await? {
                purged.push(name);
            }
        }

        self.set_lifecycle(Lifecycle::Active);
        info!(generation = %self.config.generation, purged = purged.len(), "cache agent active");
        Ok(purged)
    }

    /// Install (unless the generation is already complete) then activate.
    pub async fn bring_up(&self) -> Lifecycle {
        let installed = match self.is_installed().await {
            Ok(true) => {
                self.set_lifecycle(Lifecycle::Installed);
                true
            }
            Ok(false) => self.install().await.is_ok(),
            Err(e) => {
                warn!(error = %e, "could not inspect cache; reinstalling");
                self.install().await.is_ok()
            }
        };
        if installed && let Err(e) = self.activate().await {
            warn!(error = %e, "cache activation failed");
            self.set_lifecycle(Lifecycle::Failed);
        }
        self.lifecycle()
    }

    /// Answer one intercepted request.
    pub async fn handle(&self, request: Request) -> Result<Response, CacheError> {
        if request.url.origin() != self.config.origin.origin() {
            debug!(url = %request.url, "cross-origin request passed through");
            return Ok(self.fetcher.fetch(request).await?);
        }
        match self.config.strategies.resolve(request.url.path()) {
            Strategy::NetworkFirst => self.network_first(request).await,
            Strategy::CacheFirst => self.cache_first(request).await,
        }
    }

    async fn network_first(&self, request: Request) -> Result<Response, CacheError> {
        let key = request.cache_key();
        match self.fetcher.fetch(request.bypass_cache()).await {
            Ok(resp) => {
                if resp.is_success()
                    && let Err(e) = self.storage.put(&self.config.generation, &key, &resp).await
                {
                    warn!(key = %key, error = %e, "could not cache fresh response");
                }
                debug!(key = %key, status = resp.status, "network-first: network");
                Ok(resp)
            }
            Err(err) => match self.lookup(&key).await {
                Some(hit) => {
                    info!(key = %key, error = %err, "network-first: serving cached copy");
                    Ok(hit)
                }
                None => Err(CacheError::Network(err)),
            },
        }
    }

    async fn cache_first(&self, request: Request) -> Result<Response, CacheError> {
        let key = request.cache_key();
        if let Some(hit) = self.lookup(&key).await {
            debug!(key = %key, "cache-first: hit");
            return Ok(hit);
        }
        debug!(key = %key, "cache-first: miss, going to network");
        Ok(self.fetcher.fetch(request).await?)
    }

    /// Best cached match: the current generation first, then any other.
    async fn lookup(&self, key: &str) -> Option<Response> {
        let current = &self.config.generation;
        let mut names = match self.storage.generations().await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "cache lookup failed");
                return None;
            }
        };
        names.retain(|n| n != current);
        names.insert(0, current.clone());

        for name in names {
            match self.storage.get(&name, key).await {
                Ok(Some(hit)) => return Some(hit),
                Ok(None) => {}
                Err(e) => warn!(generation = %name, error = %e, "cache read failed"),
            }
        }
        None
    }
}

struct Envelope {
    request: Request,
    reply: oneshot::Sender<Result<Response, CacheError>>,
}

/// Fetcher that routes every request through a running agent task.
#[derive(Clone)]
pub struct AgentHandle {
    tx: mpsc::Sender<Envelope>,
    lifecycle: watch::Receiver<Lifecycle>,
}

impl AgentHandle {
    /// Start the agent: lifecycle work runs in its own task while requests
    /// are served immediately, each in a task of its own.
    pub fn spawn<F, S>(agent: Arc<CacheAgent<F, S>>) -> Self
    where
        F: Fetcher + 'static,
        S: CacheStorage + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Envelope>(REQUEST_QUEUE);
        let lifecycle = agent.subscribe();

        let boot = Arc::clone(&agent);
        tokio::spawn(async move {
            boot.bring_up().await;
        });

        tokio::spawn(async move {
            while let Some(Envelope { request, reply }) = rx.recv().await {
                let agent = Arc::clone(&agent);
                tokio::spawn(async move {
                    let _ = reply.send(agent.handle(request).await);
                });
            }
        });

        Self { tx, lifecycle }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.borrow()
    }

    /// Wait until install/activate have settled.
    pub async fn ready(&self) -> Lifecycle {
        let mut rx = self.lifecycle.clone();
        let settled = rx.wait_for(|l| l.is_settled()).await.map(|state| *state);
        settled.unwrap_or_else(|_| *rx.borrow())
    }
}

#[async_trait]
impl Fetcher for AgentHandle {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| FetchError::Interceptor("agent task stopped".into()))?;
        match rx.await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(CacheError::Network(e))) => Err(e),
            Ok(Err(other)) => Err(FetchError::Interceptor(other.to_string())),
            Err(_) => Err(FetchError::Interceptor("agent dropped the request".into())),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;
    use crate::cache::MemoryCache;
    use crate::fetch::CacheMode;

    /// In-process network: canned bodies per URL, switchable offline.
    /// Held URLs stall until [`ScriptedNet::release`].
    #[derive(Default)]
    pub(crate) struct ScriptedNet {
        routes: Mutex<HashMap<String, (u16, String)>>,
        offline: AtomicBool,
        calls: Mutex<Vec<Request>>,
        held: Mutex<HashSet<String>>,
        released: Notify,
    }

    impl ScriptedNet {
        pub(crate) fn serve(&self, url: &str, status: u16, body: &str) {
            self.routes
                .lock()
                .unwrap()
                .insert(url.to_string(), (status, body.to_string()));
        }

        pub(crate) fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        pub(crate) fn hold(&self, url: &str) {
            self.held.lock().unwrap().insert(url.to_string());
        }

        pub(crate) fn release(&self) {
            self.held.lock().unwrap().clear();
            self.released.notify_one();
        }

        pub(crate) fn calls(&self) -> Vec<Request> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn calls_to(&self, url: &str) -> usize {
            self.calls().iter().filter(|r| r.url.as_str() == url).count()
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedNet {
        async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
            self.calls.lock().unwrap().push(request.clone());
            let url = request.url.to_string();
            let held = self.held.lock().unwrap().contains(&url);
            if held {
                self.released.notified().await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(FetchError::Network {
                    url,
                    message: "offline".into(),
                });
            }
            let (status, body) = self
                .routes
                .lock()
                .unwrap()
                .get(&url)
                .cloned()
                .unwrap_or((404, String::new()));
            Ok(Response {
                url,
                status,
                content_type: None,
                body: body.into_bytes(),
            })
        }
    }

    const ORIGIN: &str = "https://feed.example";

    fn config(generation: &str) -> AgentConfig {
        AgentConfig::new(Url::parse(ORIGIN).unwrap(), generation)
            .with_manifest(["/", "/app.js"])
    }

    fn online_net() -> Arc<ScriptedNet> {
        let net = Arc::new(ScriptedNet::default());
        net.serve("https://feed.example/", 200, "<html>");
        net.serve("https://feed.example/app.js", 200, "js");
        net.serve("https://feed.example/data/index.json", 200, r#"{"items":[]}"#);
        net
    }

    fn get(path: &str) -> Request {
        Request::get(Url::parse(ORIGIN).unwrap().join(path).unwrap())
    }

    #[test]
    fn default_table_routes_feed_network_first() {
        let table = StrategyTable::default();
        assert_eq!(table.resolve("/data/index.json"), Strategy::NetworkFirst);
        assert_eq!(table.resolve("/data/items/2100001.json"), Strategy::NetworkFirst);
        assert_eq!(table.resolve("/data/readme.txt"), Strategy::CacheFirst);
        assert_eq!(table.resolve("/app.js"), Strategy::CacheFirst);
        assert_eq!(table.resolve("/index.json"), Strategy::CacheFirst);
    }

    #[tokio::test]
    async fn install_precaches_shell_only() {
        let net = online_net();
        let agent = CacheAgent::new(config("v1"), net.clone(), MemoryCache::new());

        assert!(!agent.is_installed().await.unwrap());
        assert_eq!(agent.install().await.unwrap(), 2);
        assert_eq!(agent.lifecycle(), Lifecycle::Installed);
        assert!(agent.is_installed().await.unwrap());
        assert!(
            agent
                .storage()
                .get("v1", "https://feed.example/data/index.json")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn failed_precache_commits_nothing() {
        let net = online_net();
        net.serve("https://feed.example/app.js", 500, "");
        let agent = CacheAgent::new(config("v1"), net, MemoryCache::new());

        let err = agent.install().await.unwrap_err();
        assert!(matches!(err, CacheError::Precache { ref path, .. } if path == "/app.js"));
        assert_eq!(agent.lifecycle(), Lifecycle::Failed);
        assert!(agent.storage().generations().await.unwrap().is_empty());
        assert!(matches!(agent.activate().await, Err(CacheError::NotInstalled(_))));
    }

    #[tokio::test]
    async fn activate_purges_other_generations() {
        let storage = MemoryCache::new();
        let stale = Response {
            url: String::new(),
            status: 200,
            content_type: None,
            body: Vec::new(),
        };
        storage.put("v0", "k", &stale).await.unwrap();
        storage.put("older", "k", &stale).await.unwrap();

        let agent = CacheAgent::new(config("v1"), online_net(), storage);
        agent.install().await.unwrap();
        let mut purged = agent.activate().await.unwrap();
        purged.sort();
        assert_eq!(purged, ["older", "v0"]);
        assert_eq!(agent.storage().generations().await.unwrap(), ["v1"]);
        assert_eq!(agent.lifecycle(), Lifecycle::Active);
    }

    #[tokio::test]
    async fn network_first_refreshes_then_serves_offline_copy() {
        let net = online_net();
        let agent = CacheAgent::new(config("v1"), net.clone(), MemoryCache::new());

        let fresh = agent.handle(get("/data/index.json")).await.unwrap();
        assert_eq!(fresh.text(), r#"{"items":[]}"#);
        assert_eq!(net.calls().last().unwrap().cache, CacheMode::Bypass);

        net.serve("https://feed.example/data/index.json", 200, r#"{"items":[1]}"#);
        let newer = agent.handle(get("/data/index.json")).await.unwrap();
        assert_eq!(newer.text(), r#"{"items":[1]}"#);

        net.set_offline(true);
        let cached = agent.handle(get("/data/index.json")).await.unwrap();
        assert_eq!(cached.text(), r#"{"items":[1]}"#);
    }

    #[tokio::test]
    async fn network_first_without_copy_propagates_failure() {
        let net = online_net();
        net.set_offline(true);
        let agent = CacheAgent::new(config("v1"), net, MemoryCache::new());
        let err = agent.handle(get("/data/items/9.json")).await.unwrap_err();
        assert!(matches!(err, CacheError::Network(FetchError::Network { .. })));
    }

    #[tokio::test]
    async fn network_first_does_not_cache_error_statuses() {
        let net = online_net();
        let agent = CacheAgent::new(config("v1"), net.clone(), MemoryCache::new());
        let resp = agent.handle(get("/data/items/404.json")).await.unwrap();
        assert_eq!(resp.status, 404);

        net.set_offline(true);
        assert!(agent.handle(get("/data/items/404.json")).await.is_err());
    }

    #[tokio::test]
    async fn network_first_falls_back_to_older_generation() {
        let net = online_net();
        let storage = MemoryCache::new();
        let old = Response {
            url: "https://feed.example/data/index.json".into(),
            status: 200,
            content_type: None,
            body: b"old".to_vec(),
        };
        storage
            .put("v0", "https://feed.example/data/index.json", &old)
            .await
            .unwrap();
        net.set_offline(true);

        let agent = CacheAgent::new(config("v1"), net, storage);
        let resp = agent.handle(get("/data/index.json")).await.unwrap();
        assert_eq!(resp.text(), "old");
    }

    #[tokio::test]
    async fn cache_first_prefers_cache_and_never_backfills() {
        let net = online_net();
        net.serve("https://feed.example/logo.png", 200, "png");
        let agent = CacheAgent::new(config("v1"), net.clone(), MemoryCache::new());
        agent.install().await.unwrap();

        net.serve("https://feed.example/app.js", 200, "js v2");
        let hit = agent.handle(get("/app.js")).await.unwrap();
        assert_eq!(hit.text(), "js");
        assert_eq!(net.calls_to("https://feed.example/app.js"), 1);

        agent.handle(get("/logo.png")).await.unwrap();
        agent.handle(get("/logo.png")).await.unwrap();
        assert_eq!(net.calls_to("https://feed.example/logo.png"), 2);
        assert!(agent.storage().get("v1", "https://feed.example/logo.png").await.unwrap().is_none());

        net.set_offline(true);
        assert!(agent.handle(get("/logo.png")).await.is_err());
        assert_eq!(agent.handle(get("/")).await.unwrap().text(), "<html>");
    }

    #[tokio::test]
    async fn cross_origin_is_passed_through_untouched() {
        let net = online_net();
        net.serve("https://cdn.example/data/index.json", 200, "cdn");
        let agent = CacheAgent::new(config("v1"), net.clone(), MemoryCache::new());

        let req = Request::get(Url::parse("https://cdn.example/data/index.json").unwrap());
        let resp = agent.handle(req).await.unwrap();
        assert_eq!(resp.text(), "cdn");
        assert_eq!(net.calls().last().unwrap().cache, CacheMode::Default);
        assert!(agent.storage().generations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn handle_serves_requests_and_settles_lifecycle() {
        let net = online_net();
        let agent = Arc::new(CacheAgent::new(config("v1"), net, MemoryCache::new()));
        let handle = AgentHandle::spawn(agent);

        let resp = handle.fetch(get("/data/index.json")).await.unwrap();
        assert!(resp.is_success());
        assert_eq!(handle.ready().await, Lifecycle::Active);
    }

    #[tokio::test]
    async fn handle_maps_network_failures_back_to_fetch_errors() {
        let net = online_net();
        net.set_offline(true);
        let agent = Arc::new(CacheAgent::new(config("v1"), net, MemoryCache::new()));
        let handle = AgentHandle::spawn(agent);

        let err = handle.fetch(get("/data/index.json")).await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(handle.ready().await, Lifecycle::Failed);
    }

    #[tokio::test]
    async fn bring_up_skips_precache_when_generation_complete() {
        let net = online_net();
        let storage = Arc::new(MemoryCache::new());
        let first = CacheAgent::new(config("v1"), net.clone(), storage.clone());
        assert_eq!(first.bring_up().await, Lifecycle::Active);
        let calls = net.calls().len();

        net.set_offline(true);
        let second = CacheAgent::new(config("v1"), net.clone(), storage);
        assert_eq!(second.bring_up().await, Lifecycle::Active);
        assert_eq!(net.calls().len(), calls);
    }

    #[tokio::test]
    async fn stalled_feed_request_does_not_block_shell() {
        let net = online_net();
        net.hold("https://feed.example/data/index.json");
        let agent = Arc::new(CacheAgent::new(config("v1"), net.clone(), MemoryCache::new()));
        let handle = AgentHandle::spawn(agent);

        let stalled = tokio::spawn({
            let handle = handle.clone();
            async move { handle.fetch(get("/data/index.json")).await }
        });
        while net.calls_to("https://feed.example/data/index.json") == 0 {
            tokio::task::yield_now().await;
        }

        let shell = tokio::time::timeout(Duration::from_secs(5), handle.fetch(get("/app.js")))
            .await
            .expect("shell request waited on the stalled feed request")
            .unwrap();
        assert_eq!(shell.text(), "js");
        assert!(!stalled.is_finished());

        net.release();
        let feed = stalled.await.unwrap().unwrap();
        assert!(feed.is_success());
    }
}
