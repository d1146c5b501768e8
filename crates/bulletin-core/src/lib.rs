//! Core bulletin types, text normalisation, filter engine and view state.

pub mod bookmarks;
pub mod catalog;
pub mod filter;
pub mod model;
pub mod render;
pub mod state;
pub mod text;

pub use bookmarks::BookmarkSet;
pub use catalog::{CANONICAL_MINISTRIES, ChipId, UnknownChip, ministry_options};
pub use filter::{FilterState, MinistryFilter, compute_view};
pub use model::{DetailRecord, IndexDocument, Item, Pdf};
pub use render::{DetailBody, DetailTicket, DetailView, ListModel, Row, Surface};
pub use state::{Action, AppState, Diagnostic, FeedMeta, LoadState, PAGE_SIZE};
pub use text::{normalize_text, snippet};
