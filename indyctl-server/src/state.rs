//! Application state shared across handlers

use std::sync::Arc;

use crate::fixtures::Fixtures;

/// Default number of stores per listing page
pub const DEFAULT_PAGE_SIZE: usize = 2;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    fixtures: Fixtures,
    page_size: usize,
}

impl AppState {
    pub fn new(fixtures: Fixtures, page_size: usize) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                fixtures,
                page_size: page_size.max(1),
            }),
        }
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.inner.fixtures
    }

    pub fn page_size(&self) -> usize {
        self.inner.page_size
    }
}
