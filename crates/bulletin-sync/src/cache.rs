//! Named cache generations holding request-keyed responses.
//!
//! A generation is a flat map from cache key to response. [`MemoryCache`]
//! keeps everything in process; [`DirCache`] keeps one directory per
//! generation so cached shell and feed responses survive restarts.

use std::collections::BTreeMap;
use std::hash::Hasher;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fnv::FnvHasher;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::agent::CacheError;
use crate::fetch::Response;

#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Names of all generations currently stored.
    async fn generations(&self) -> Result<Vec<String>, CacheError>;

    /// Remove a generation and everything in it. Returns whether it existed.
    async fn delete_generation(&self, generation: &str) -> Result<bool, CacheError>;

    /// Store `response` under `key`, creating the generation if needed.
    async fn put(&self, generation: &str, key: &str, response: &Response) -> Result<(), CacheError>;

    async fn get(&self, generation: &str, key: &str) -> Result<Option<Response>, CacheError>;
}

#[async_trait]
impl<T: CacheStorage + ?Sized> CacheStorage for Arc<T> {
    async fn generations(&self) -> Result<Vec<String>, CacheError> {
        (**self).generations().await
    }

    async fn delete_generation(&self, generation: &str) -> Result<bool, CacheError> {
        (**self).delete_generation(generation).await
    }

    async fn put(&self, generation: &str, key: &str, response: &Response) -> Result<(), CacheError> {
        (**self).put(generation, key, response).await
    }

    async fn get(&self, generation: &str, key: &str) -> Result<Option<Response>, CacheError> {
        (**self).get(generation, key).await
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    generations: RwLock<BTreeMap<String, BTreeMap<String, Response>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCache {
    async fn generations(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.generations.read().await.keys().cloned().collect())
    }

    async fn delete_generation(&self, generation: &str) -> Result<bool, CacheError> {
        Ok(self.generations.write().await.remove(generation).is_some())
    }

    async fn put(&self, generation: &str, key: &str, response: &Response) -> Result<(), CacheError> {
        self.generations
            .write()
            .await
            .entry(generation.to_string())
            .or_default()
            .insert(key.to_string(), response.clone());
        Ok(())
    }

    async fn get(&self, generation: &str, key: &str) -> Result<Option<Response>, CacheError> {
        Ok(self
            .generations
            .read()
            .await
            .get(generation)
            .and_then(|entries| entries.get(key))
            .cloned())
    }
}

/// On-disk layout: `<root>/<hex(generation)>/<fnv(key)>.entry`, one file per
/// response: a line of JSON metadata followed by the raw body. The full key
/// is kept in the metadata and checked on read. Entries are replaced whole
/// through a uniquely named temp file, so concurrent writers of one key never
/// mix their bodies and metadata.
#[derive(Debug, Clone)]
pub struct DirCache {
    root: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct StoredMeta {
    key: String,
    url: String,
    status: u16,
    content_type: Option<String>,
}

impl DirCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generation_dir(&self, generation: &str) -> PathBuf {
        self.root.join(hex::encode(generation))
    }

    fn io(path: &Path) -> impl Fn(std::io::Error) -> CacheError + '_ {
        move |source| CacheError::Storage(format!("{}: {source}", path.display()))
    }
}

#[async_trait]
impl CacheStorage for DirCache {
    async fn generations(&self) -> Result<Vec<String>, CacheError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io(&self.root)(e)),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(Self::io(&self.root))? {
            if !entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str().and_then(decode_generation) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete_generation(&self, generation: &str) -> Result<bool, CacheError> {
        let dir = self.generation_dir(generation);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io(&dir)(e)),
        }
    }

    async fn put(&self, generation: &str, key: &str, response: &Response) -> Result<(), CacheError> {
        let dir = self.generation_dir(generation);
        tokio::fs::create_dir_all(&dir).await.map_err(Self::io(&dir))?;

        let meta = StoredMeta {
            key: key.to_string(),
            url: response.url.clone(),
            status: response.status,
            content_type: response.content_type.clone(),
        };
        let mut entry = serde_json::to_vec(&meta).map_err(|e| CacheError::Storage(e.to_string()))?;
        entry.push(b'\n');
        entry.extend_from_slice(&response.body);

        let path = dir.join(format!("{}.entry", key_stem(key)));
        write_atomic(dir, path, entry).await?;
        debug!(generation, key, bytes = response.body.len(), "cached response");
        Ok(())
    }

    async fn get(&self, generation: &str, key: &str) -> Result<Option<Response>, CacheError> {
        let dir = self.generation_dir(generation);
        let path = dir.join(format!("{}.entry", key_stem(key)));
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io(&path)(e)),
        };
        let Some(split) = raw.iter().position(|&b| b == b'\n') else {
            return Err(CacheError::Storage(format!("{}: truncated entry", path.display())));
        };
        let meta: StoredMeta = serde_json::from_slice(&raw[..split])
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        if meta.key != key {
            return Ok(None);
        }
        let body = raw[split + 1..].to_vec();

        Ok(Some(Response {
            url: meta.url,
            status: meta.status,
            content_type: meta.content_type,
            body,
        }))
    }
}

async fn write_atomic(dir: PathBuf, path: PathBuf, bytes: Vec<u8>) -> Result<(), CacheError> {
    tokio::task::spawn_blocking(move || {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(DirCache::io(&dir))?;
        tmp.write_all(&bytes).map_err(DirCache::io(&dir))?;
        tmp.persist(&path).map_err(|e| DirCache::io(&path)(e.error))?;
        Ok::<_, CacheError>(())
    })
    .await
    .map_err(|e| CacheError::Storage(format!("cache write task failed: {e}")))?
}

fn key_stem(key: &str) -> String {
    let mut hasher = FnvHasher::default();
    hasher.write(key.as_bytes());
    format!("{:016x}", hasher.finish())
}

fn decode_generation(name: &str) -> Option<String> {
    String::from_utf8(hex::decode(name).ok()?).ok()
}
