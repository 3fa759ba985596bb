//! Incremental store listing
//!
//! `StorePager` is the state machine behind an infinite-scroll listing:
//!
//! ```text
//! Idle -> Loading -> Idle        (page appended, cursor advanced)
//!                 -> Exhausted   (page had no next_page)
//!                 -> Failed      (accumulated items kept, retry() allowed)
//! ```
//!
//! It never performs I/O. Callers ask it for a [`PageRequest`], fetch the
//! page however they like, and feed the response back tagged with the
//! request id. Responses for any other id are stale and dropped.

use crate::listing::{search_by_key, sort_by_prop, SortProp};
use crate::store::{Store, StorePage};

/// Scroll geometry of the viewport showing the listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub viewport_height: f64,
    pub scroll_top: f64,
    pub scroll_height: f64,
}

impl ScrollPosition {
    /// True once the viewport reaches the bottom of the document.
    pub fn near_bottom(&self) -> bool {
        self.viewport_height + self.scroll_top + 1.0 >= self.scroll_height
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerState {
    Idle,
    Loading { request_id: u64 },
    Failed { message: String },
    Exhausted,
}

/// A page the caller should fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub id: u64,
    /// `None` for the first page
    pub cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StorePager {
    items: Vec<Store>,
    state: PagerState,
    cursor: Option<String>,
    pages_loaded: usize,
    last_request_id: u64,
}

impl Default for StorePager {
    fn default() -> Self {
        Self::new()
    }
}

impl StorePager {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            state: PagerState::Idle,
            cursor: None,
            pages_loaded: 0,
            last_request_id: 0,
        }
    }

    pub fn state(&self) -> &PagerState {
        &self.state
    }

    pub fn items(&self) -> &[Store] {
        &self.items
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PagerState::Loading { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == PagerState::Exhausted
    }

    /// Request the first page. `None` once anything has been loaded or requested.
    pub fn request_initial(&mut self) -> Option<PageRequest> {
        if self.pages_loaded > 0 || self.cursor.is_some() {
            return None;
        }
        self.request_next()
    }

    /// Request the next page, if one may be fetched now.
    ///
    /// Returns `None` while a request is in flight, after a failure
    /// (until [`retry`](Self::retry)), and once the listing is exhausted.
    pub fn request_next(&mut self) -> Option<PageRequest> {
        if self.state != PagerState::Idle {
            return None;
        }

        self.last_request_id += 1;
        let request = PageRequest {
            id: self.last_request_id,
            cursor: self.cursor.clone(),
        };
        self.state = PagerState::Loading {
            request_id: request.id,
        };
        tracing::debug!(id = request.id, cursor = ?request.cursor, "requesting store page");
        Some(request)
    }

    /// Request the next page if the viewport has reached the bottom.
    pub fn on_scroll(&mut self, position: ScrollPosition) -> Option<PageRequest> {
        if position.near_bottom() {
            self.request_next()
        } else {
            None
        }
    }

    /// Accept a fetched page. Returns false if the response was stale.
    pub fn on_page(&mut self, request_id: u64, page: StorePage) -> bool {
        if !self.expects(request_id) {
            tracing::debug!(id = request_id, "discarding stale store page");
            return false;
        }

        self.items.extend(page.items);
        self.pages_loaded += 1;
        self.state = match page.next_page {
            Some(next) => {
                self.cursor = Some(next);
                PagerState::Idle
            }
            None => {
                self.cursor = None;
                PagerState::Exhausted
            }
        };
        true
    }

    /// Record a failed fetch. Items already loaded are kept.
    pub fn on_error(&mut self, request_id: u64, message: impl Into<String>) -> bool {
        if !self.expects(request_id) {
            return false;
        }
        self.state = PagerState::Failed {
            message: message.into(),
        };
        true
    }

    /// Clear a failure so the same cursor can be fetched again.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if let PagerState::Failed { .. } = self.state {
            self.state = PagerState::Idle;
        }
        self.request_next()
    }

    /// Drop everything and start over; in-flight responses become stale.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = None;
        self.pages_loaded = 0;
        self.state = PagerState::Idle;
    }

    /// Search and sort the accumulated items without fetching.
    pub fn view(&self, query: Option<&str>, sort: Option<SortProp>) -> Vec<Store> {
        let found = match query {
            Some(q) => search_by_key(q, &self.items),
            None => self.items.clone(),
        };
        match sort {
            Some(prop) => sort_by_prop(prop, &found),
            None => found,
        }
    }

    fn expects(&self, request_id: u64) -> bool {
        self.state == PagerState::Loading { request_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreKey;

    fn page(names: &[&str], next: Option<&str>) -> StorePage {
        StorePage {
            items: names
                .iter()
                .map(|n| Store::new(&StoreKey::new("maven", crate::store::StoreType::Remote, *n)))
                .collect(),
            next_page: next.map(str::to_string),
        }
    }

    const BOTTOM: ScrollPosition = ScrollPosition {
        viewport_height: 800.0,
        scroll_top: 1200.0,
        scroll_height: 2000.0,
    };

    #[test]
    fn pages_accumulate_until_exhausted() {
        let mut pager = StorePager::new();

        let first = pager.request_next().unwrap();
        assert_eq!(first.cursor, None);
        assert!(pager.on_page(first.id, page(&["a", "b"], Some("2"))));

        let second = pager.on_scroll(BOTTOM).unwrap();
        assert_eq!(second.cursor.as_deref(), Some("2"));
        assert!(pager.on_page(second.id, page(&["c"], None)));

        assert_eq!(pager.items().len(), 3);
        assert!(pager.is_exhausted());
        assert_eq!(pager.on_scroll(BOTTOM), None);
    }

    #[test]
    fn initial_request_only_once() {
        let mut pager = StorePager::new();
        let first = pager.request_initial().unwrap();
        assert_eq!(first.cursor, None);
        assert!(pager.request_initial().is_none());

        pager.on_page(first.id, page(&["a"], Some("1")));
        assert!(pager.request_initial().is_none());
        assert_eq!(pager.request_next().unwrap().cursor.as_deref(), Some("1"));
    }

    #[test]
    fn no_duplicate_request_while_loading() {
        let mut pager = StorePager::new();
        assert!(pager.request_next().is_some());
        assert_eq!(pager.on_scroll(BOTTOM), None);
        assert_eq!(pager.request_next(), None);
    }

    #[test]
    fn scroll_above_threshold_does_nothing() {
        let mut pager = StorePager::new();
        let far = ScrollPosition {
            viewport_height: 800.0,
            scroll_top: 0.0,
            scroll_height: 5000.0,
        };
        assert_eq!(pager.on_scroll(far), None);
        assert_eq!(pager.state(), &PagerState::Idle);
    }

    #[test]
    fn failure_keeps_items_and_allows_retry() {
        let mut pager = StorePager::new();
        let first = pager.request_next().unwrap();
        pager.on_page(first.id, page(&["a"], Some("1")));

        let second = pager.request_next().unwrap();
        assert!(pager.on_error(second.id, "boom"));
        assert_eq!(pager.items().len(), 1);
        assert_eq!(pager.on_scroll(BOTTOM), None);

        let again = pager.retry().unwrap();
        assert_eq!(again.cursor.as_deref(), Some("1"));
        assert_ne!(again.id, second.id);
    }

    #[test]
    fn stale_responses_are_dropped() {
        let mut pager = StorePager::new();
        let first = pager.request_next().unwrap();
        pager.reset();
        assert!(!pager.on_page(first.id, page(&["a"], None)));
        assert!(pager.items().is_empty());
    }

    #[test]
    fn view_filters_accumulated_items() {
        let mut pager = StorePager::new();
        let req = pager.request_next().unwrap();
        pager.on_page(req.id, page(&["zeta", "alpha", "central"], None));

        let view = pager.view(Some("a"), Some(SortProp::Name));
        let names: Vec<&str> = view.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "central", "zeta"]);

        let view = pager.view(Some("cent"), None);
        assert_eq!(view.len(), 1);
    }
}
