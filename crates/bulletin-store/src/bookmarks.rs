//! Bookmark persistence over a [`KeyValueStore`].

use bulletin_core::BookmarkSet;
use tracing::info;

use crate::{KeyValueStore, StoreError};

/// Key holding the JSON array of bookmarked ids.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Bookmarks backed by a key-value store. The store is the source of truth:
/// every read and every toggle goes back to it rather than trusting a copy.
#[derive(Debug)]
pub struct BookmarkStore<K> {
    kv: K,
}

impl<K: KeyValueStore> BookmarkStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn load(&self) -> Result<BookmarkSet, StoreError> {
        let raw = self.kv.get(BOOKMARKS_KEY)?;
        Ok(BookmarkSet::decode(raw.as_deref()))
    }

    /// Flip `prid`, persist, and return whether it is now bookmarked along
    /// with the freshly written set.
    pub fn toggle(&mut self, prid: &str) -> Result<(bool, BookmarkSet), StoreError> {
        let mut set = self.load()?;
        let now = set.toggle(prid);
        self.kv.set(BOOKMARKS_KEY, &set.encode())?;
        info!(prid, bookmarked = now, total = set.len(), "bookmark toggled");
        Ok((now, set))
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut K {
        &mut self.kv
    }
}
