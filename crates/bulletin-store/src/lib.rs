//! Persistence layer: a string key-value port with in-memory and
//! file-backed adapters, plus the bookmark and theme records kept in it.

mod bookmarks;
mod error;
mod kv;
mod prefs;

pub use bookmarks::{BOOKMARKS_KEY, BookmarkStore};
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use prefs::{THEME_KEY, Theme, load_theme, save_theme};
