//! Render pipeline: owns the current state, applies transitions, and
//! repaints the surface after each one.

use std::future::Future;

use bulletin_core::{Action, AppState, DetailTicket, DetailView, ListModel, Surface};
use bulletin_store::{BookmarkStore, KeyValueStore, StoreError};
use bulletin_sync::{DetailOutcome, FeedClient, Fetcher};
use tracing::{debug, warn};

/// A detail fetch issued by [`RenderPipeline::open`], not yet settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDetail {
    pub ticket: DetailTicket,
    pub prid: String,
}

pub struct RenderPipeline<S, K, F> {
    state: AppState,
    detail: Option<DetailView>,
    next_ticket: u64,
    surface: S,
    bookmarks: BookmarkStore<K>,
    feed: FeedClient<F>,
}

impl<S, K, F> RenderPipeline<S, K, F>
where
    S: Surface,
    K: KeyValueStore,
    F: Fetcher + Clone + 'static,
{
    pub fn new(surface: S, bookmarks: BookmarkStore<K>, feed: FeedClient<F>) -> Result<Self, StoreError> {
        let state = AppState::new(bookmarks.load()?);
        Ok(Self {
            state,
            detail: None,
            next_ticket: 0,
            surface,
            bookmarks,
            feed,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Load the index document and paint the first page (or the
    /// diagnostic card).
    pub async fn start(&mut self) {
        let action = match self.feed.load_index().await {
            Ok(doc) => Action::Loaded(doc),
            Err(e) => {
                warn!(error = %e, "index load failed");
                Action::LoadFailed(e.diagnostic())
            }
        };
        self.dispatch(action);
    }

    /// Apply one transition and repaint the list.
    pub fn dispatch(&mut self, action: Action) {
        self.state = self.state.apply(action);
        self.paint_list();
    }

    /// Open the reader for `prid`, painting its static fields with a
    /// loading placeholder. The caller drives the returned fetch.
    pub fn open(&mut self, prid: &str) -> Option<PendingDetail> {
        let item = self.state.find(prid)?.clone();
        self.next_ticket += 1;
        let ticket = DetailTicket(self.next_ticket);
        let bookmarked = self.state.bookmarks().contains(&item.prid);
        let view = DetailView::open(ticket, item, bookmarked);
        self.surface.paint_detail(&view);
        self.detail = Some(view);
        Some(PendingDetail {
            ticket,
            prid: prid.to_string(),
        })
    }

    /// Open the row at 1-based `position` among the visible rows.
    pub fn open_position(&mut self, position: usize) -> Option<PendingDetail> {
        let prid = self
            .state
            .visible()
            .nth(position.checked_sub(1)?)?
            .prid
            .clone();
        self.open(&prid)
    }

    /// The fetch for `pending`, detached from the pipeline so it can run
    /// while other input is handled.
    pub fn fetch_detail(
        &self,
        pending: PendingDetail,
    ) -> impl Future<Output = (DetailTicket, DetailOutcome)> + Send + use<S, K, F> {
        let feed = self.feed.clone();
        async move {
            let outcome = feed.load_detail(&pending.prid).await;
            (pending.ticket, outcome)
        }
    }

    /// Patch the reader with a settled fetch. Results for a view that was
    /// closed or replaced are dropped. Returns whether the view was patched.
    pub fn settle(&mut self, ticket: DetailTicket, outcome: &DetailOutcome) -> bool {
        match self.detail.as_mut() {
            Some(view) if view.ticket == ticket => {
                view.settle(outcome.text());
                self.surface.paint_detail(view);
                true
            }
            _ => {
                debug!(ticket = ticket.0, "dropping detail result for a closed view");
                false
            }
        }
    }

    pub fn close(&mut self) {
        if self.detail.take().is_some() {
            self.paint_list();
        }
    }

    /// Flip the bookmark on the open item, persist it, and repaint the list
    /// and reader from the freshly stored set. `None` when no item is open.
    pub fn toggle_bookmark(&mut self) -> Result<Option<bool>, StoreError> {
        let Some(prid) = self.detail.as_ref().map(|v| v.item.prid.clone()) else {
            return Ok(None);
        };
        let (now, set) = self.bookmarks.toggle(&prid)?;
        self.dispatch(Action::BookmarksChanged(set));
        if let Some(view) = self.detail.as_mut() {
            view.bookmarked = now;
            self.surface.paint_detail(view);
        }
        Ok(Some(now))
    }

    fn paint_list(&mut self) {
        let list = ListModel::from_state(&self.state);
        self.surface.paint_list(&list);
    }
}
