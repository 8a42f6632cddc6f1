//! Remote list viewer: fetch once, then search and paginate locally.
//!
//! # Responsibility
//! - Track the load lifecycle of one fetched collection.
//! - Derive matches and the visible page from `(items, query, page)`.
//!
//! # Invariants
//! - `current_page` stays within `[1, max(total_pages, 1)]`.
//! - Changing the query resets to page 1.
//! - Derived lists are recomputed on every call, never cached.

pub mod paging;

use crate::model::remote_item::RemoteItem;
use crate::remote::PostSource;
use log::debug;
use paging::{clamp_page, page_slice, search_items, total_pages, PAGE_SIZE};

/// Lifecycle of the single fetch backing the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready(Vec<RemoteItem>),
    /// Human-readable failure message.
    Failed(String),
}

/// Search and pagination state over the last successful fetch.
#[derive(Debug, Clone)]
pub struct RemoteListViewer {
    state: LoadState,
    query: String,
    current_page: usize,
}

impl Default for RemoteListViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteListViewer {
    /// Creates a viewer in the loading state.
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            query: String::new(),
            current_page: 1,
        }
    }

    /// Issues one fetch and settles into `Ready` or `Failed`.
    pub fn load(&mut self, source: &impl PostSource) -> &LoadState {
        self.state = match source.fetch_posts() {
            Ok(items) => LoadState::Ready(items),
            Err(err) => LoadState::Failed(err.to_string()),
        };
        self.current_page = 1;
        &self.state
    }

    /// Resets query, page and load state, then fetches again.
    pub fn reload(&mut self, source: &impl PostSource) -> &LoadState {
        *self = Self::new();
        self.load(source)
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Items from the last successful fetch, empty otherwise.
    pub fn items(&self) -> &[RemoteItem] {
        match &self.state {
            LoadState::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.current_page = 1;
        debug!(
            "event=viewer_search module=viewer status=ok matches={}",
            self.match_count()
        );
    }

    pub fn matches(&self) -> Vec<&RemoteItem> {
        search_items(self.items(), &self.query)
    }

    pub fn match_count(&self) -> usize {
        self.matches().len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.match_count(), PAGE_SIZE)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Posts visible on the current page.
    pub fn page_items(&self) -> Vec<&RemoteItem> {
        let matches = self.matches();
        page_slice(&matches, self.current_page, PAGE_SIZE).to_vec()
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    /// Moves to `page`, clamped to the available range.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.current_page = clamp_page(page, self.total_pages());
        self.current_page
    }

    /// Result line such as `Found 1 post` or `Found 12 posts`.
    pub fn summary_label(&self) -> String {
        let count = self.match_count();
        let plural = if count == 1 { "" } else { "s" };
        format!("Found {count} post{plural}")
    }

    /// Pager caption, e.g. `Page 2 of 3`.
    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {}",
            self.current_page,
            self.total_pages().max(1)
        )
    }
}
