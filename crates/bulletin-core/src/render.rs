//! View-model for the list and reader views, and the surface they paint on.
//!
//! Nothing here draws. [`ListModel`] and [`DetailView`] carry exactly what a
//! surface needs; a terminal, a test recorder or anything else implements
//! [`Surface`].

use crate::filter::FilterState;
use crate::model::Item;
use crate::state::{AppState, Diagnostic, FeedMeta, LoadState};
use crate::text::normalize_text;

pub trait Surface {
    fn paint_list(&mut self, list: &ListModel<'_>);
    fn paint_detail(&mut self, detail: &DetailView);
}

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// 1-based position in the view.
    pub position: usize,
    pub item: &'a Item,
    pub bookmarked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListModel<'a> {
    pub meta: &'a FeedMeta,
    pub filter: &'a FilterState,
    pub rows: Vec<Row<'a>>,
    pub total: usize,
    pub loading: bool,
    /// Set when the index failed to load; rows are empty.
    pub diagnostic: Option<&'a Diagnostic>,
    /// Whether the "load more" action is shown.
    pub load_more: bool,
}

impl<'a> ListModel<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        let bookmarks = state.bookmarks();
        let rows = state
            .visible()
            .enumerate()
            .map(|(i, item)| Row {
                position: i + 1,
                item,
                bookmarked: bookmarks.contains(&item.prid),
            })
            .collect();
        let diagnostic = match state.load_state() {
            LoadState::Failed(d) => Some(d),
            _ => None,
        };
        Self {
            meta: state.meta(),
            filter: state.filter(),
            rows,
            total: state.view_len(),
            loading: matches!(state.load_state(), LoadState::Loading),
            load_more: diagnostic.is_none() && state.has_more(),
            diagnostic,
        }
    }

    pub fn remaining(&self) -> usize {
        self.total - self.rows.len()
    }
}

/// Identifies one opening of the reader view. A settled fetch only patches
/// the view it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetailTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailBody {
    Loading,
    /// Normalised full text.
    Text(String),
    /// Normalised snippet shown because the full text was unavailable.
    Snippet(String),
}

impl DetailBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DetailBody::Loading => None,
            DetailBody::Text(t) | DetailBody::Snippet(t) => Some(t),
        }
    }
}

/// The reader view for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub ticket: DetailTicket,
    pub item: Item,
    pub bookmarked: bool,
    pub body: DetailBody,
}

impl DetailView {
    /// Open with static fields and a loading placeholder.
    pub fn open(ticket: DetailTicket, item: Item, bookmarked: bool) -> Self {
        Self {
            ticket,
            item,
            bookmarked,
            body: DetailBody::Loading,
        }
    }

    /// Fill the body from the fetched text, or from the snippet when the
    /// fetch gave nothing usable.
    pub fn settle(&mut self, full_text: Option<&str>) {
        self.body = match full_text.map(normalize_text) {
            Some(text) if !text.is_empty() => DetailBody::Text(text),
            _ => DetailBody::Snippet(normalize_text(&self.item.snippet)),
        };
    }
}
