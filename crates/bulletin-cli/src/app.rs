//! Runtime wiring: settings, persisted stores and the cache agent.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bulletin_store::{BookmarkStore, FileStore};
use bulletin_sync::{AgentConfig, AgentHandle, CacheAgent, DirCache, FeedClient, HttpFetcher};
use url::Url;

pub type Agent = CacheAgent<HttpFetcher, DirCache>;

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub origin: Option<Url>,
    pub state_dir: PathBuf,
    pub generation: String,
}

impl Settings {
    pub fn new(origin: Option<Url>, state_dir: Option<PathBuf>, generation: Option<String>) -> Self {
        Self {
            origin,
            state_dir: state_dir.unwrap_or_else(default_state_dir),
            generation: generation.unwrap_or_else(default_generation),
        }
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.state_dir.join("prefs.json")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.state_dir.join("cache")
    }

    pub fn origin(&self) -> anyhow::Result<&Url> {
        self.origin
            .as_ref()
            .context("no origin configured; pass --origin or set BULLETIN_ORIGIN")
    }

    pub fn prefs(&self) -> FileStore {
        FileStore::open(self.prefs_path())
    }

    pub fn bookmarks(&self) -> BookmarkStore<FileStore> {
        BookmarkStore::new(self.prefs())
    }

    /// Build the cache agent for the configured origin and generation.
    pub fn agent(&self) -> anyhow::Result<Agent> {
        let config = AgentConfig::new(self.origin()?.clone(), self.generation.clone());
        Ok(CacheAgent::new(
            config,
            HttpFetcher::new(),
            DirCache::new(self.cache_dir()),
        ))
    }

    /// Start the agent task and a feed client whose requests all go
    /// through it.
    pub fn feed(&self) -> anyhow::Result<(AgentHandle, FeedClient<AgentHandle>)> {
        let handle = AgentHandle::spawn(Arc::new(self.agent()?));
        let feed = FeedClient::new(handle.clone(), self.origin()?.clone());
        Ok((handle, feed))
    }
}

pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bulletin")
}

pub fn default_generation() -> String {
    format!("bulletin-shell-v{}", env!("CARGO_PKG_VERSION"))
}
