//! Application state and its named transitions.
//!
//! [`AppState`] is never mutated in place: [`AppState::apply`] takes an
//! [`Action`] and returns the next state. Items and the computed view are
//! shared behind `Arc`, so a transition only copies the small parts.

use std::sync::Arc;

use crate::bookmarks::BookmarkSet;
use crate::catalog::ChipId;
use crate::filter::{FilterState, MinistryFilter, view_indices};
use crate::model::{IndexDocument, Item};

/// Rows revealed per page and per "load more".
pub const PAGE_SIZE: usize = 40;

/// What the list shows instead of rows when the index could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Resource path the list expected, e.g. `/data/index.json`.
    pub resource: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(Diagnostic),
}

#[derive(Debug, Clone)]
pub enum Action {
    Loaded(IndexDocument),
    LoadFailed(Diagnostic),
    SetMinistry(MinistryFilter),
    SetChip(Option<ChipId>),
    SetQuery(String),
    SetBookmarksOnly(bool),
    /// The persisted bookmark set changed; carries the freshly read set.
    BookmarksChanged(BookmarkSet),
    LoadMore,
}

/// Header facts from the index document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedMeta {
    pub updated: String,
    pub count: Option<u64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    items: Arc<[Item]>,
    meta: FeedMeta,
    filter: FilterState,
    bookmarks: BookmarkSet,
    view: Arc<[usize]>,
    render_limit: usize,
    load: LoadState,
}

impl AppState {
    /// Empty state awaiting the index document.
    pub fn new(bookmarks: BookmarkSet) -> Self {
        Self {
            items: Arc::from(Vec::new()),
            meta: FeedMeta::default(),
            filter: FilterState::default(),
            bookmarks,
            view: Arc::from(Vec::new()),
            render_limit: 0,
            load: LoadState::Loading,
        }
    }

    /// Produce the next state.
    pub fn apply(&self, action: Action) -> AppState {
        let mut next = self.clone();
        match action {
            Action::Loaded(doc) => {
                next.meta = FeedMeta {
                    updated: doc.updated_label(),
                    count: doc.count,
                    note: doc.note.clone(),
                };
                next.items = Arc::from(doc.items);
                next.load = LoadState::Ready;
                next.recompute()
            }
            Action::LoadFailed(diagnostic) => {
                next.items = Arc::from(Vec::new());
                next.view = Arc::from(Vec::new());
                next.render_limit = 0;
                next.load = LoadState::Failed(diagnostic);
                next
            }
            Action::SetMinistry(ministry) => {
                next.filter.ministry = ministry;
                next.recompute()
            }
            Action::SetChip(chip) => {
                next.filter.chip = chip;
                next.recompute()
            }
            Action::SetQuery(query) => {
                next.filter.query = query;
                next.recompute()
            }
            Action::SetBookmarksOnly(on) => {
                next.filter.bookmarks_only = on;
                next.recompute()
            }
            Action::BookmarksChanged(bookmarks) => {
                next.bookmarks = bookmarks;
                let limit = next.render_limit;
                next.view = Arc::from(view_indices(&next.items, &next.filter, &next.bookmarks));
                // Keep loaded pages, but never show less than a first page.
                next.render_limit = limit.max(PAGE_SIZE).min(next.view.len());
                next
            }
            Action::LoadMore => {
                next.render_limit = (next.render_limit + PAGE_SIZE).min(next.view.len());
                next
            }
        }
    }

    fn recompute(mut self) -> Self {
        self.view = Arc::from(view_indices(&self.items, &self.filter, &self.bookmarks));
        self.render_limit = PAGE_SIZE.min(self.view.len());
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn meta(&self) -> &FeedMeta {
        &self.meta
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.bookmarks
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn render_limit(&self) -> usize {
        self.render_limit
    }

    /// The whole ordered view.
    pub fn view(&self) -> impl Iterator<Item = &Item> {
        self.view.iter().map(|&idx| &self.items[idx])
    }

    /// The rendered prefix `[0, render_limit)` of the view.
    pub fn visible(&self) -> impl Iterator<Item = &Item> {
        self.view[..self.render_limit]
            .iter()
            .map(|&idx| &self.items[idx])
    }

    /// Whether the "load more" action is offered.
    pub fn has_more(&self) -> bool {
        self.render_limit < self.view.len()
    }

    pub fn find(&self, prid: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.prid == prid)
    }
}
