//! Network side: the fetch boundary, the cache agent that intercepts every
//! request, and the feed loader built on top of it.

pub mod agent;
pub mod cache;
pub mod feed;
pub mod fetch;

pub use agent::{AgentConfig, AgentHandle, CacheAgent, CacheError, Lifecycle, Strategy, StrategyTable};
pub use cache::{CacheStorage, DirCache, MemoryCache};
pub use feed::{DETAIL_DIR, DetailOutcome, FallbackReason, FeedClient, INDEX_PATH, LoadError};
pub use fetch::{CacheMode, FetchError, Fetcher, Request, Response};

#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
