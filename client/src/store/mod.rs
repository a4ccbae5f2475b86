//! Resource stores: the last fetched list of a resource together with its
//! loading and error state.
//!
//! Every store remembers the parameters of its last `fetch` and replays
//! them after each successful mutation. Tag and category lists are loaded
//! with default parameters when a mutation comes before any fetch; the
//! article list is only reloaded once a page has been fetched. Operations are not queued: overlapping calls each run, and
//! `loading()` stays true until the last one finishes. When fetches
//! overlap only the most recently issued one may replace the list.

mod articles;
mod categories;
mod tags;

use std::{future::Future, sync::Arc};

use nnews_shared::{NewsError, NewsResult};
use parking_lot::RwLock;

pub use self::{articles::ArticleStore, categories::CategoryStore, tags::TagStore};

struct StoreState<T, P> {
    data: Option<T>,
    last_params: Option<P>,
    error: Option<NewsError>,
    in_flight: usize,
    issued: u64,
}

/// State shared by every store flavour.
pub(crate) struct StoreCore<T, P> {
    state: Arc<RwLock<StoreState<T, P>>>,
}

impl<T, P> Clone for StoreCore<T, P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

/// Marks one operation as in flight until dropped.
struct Activity<'a, T, P> {
    state: &'a RwLock<StoreState<T, P>>,
}

impl<T, P> Drop for Activity<'_, T, P> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl<T: Clone, P: Clone> StoreCore<T, P> {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                data: None,
                last_params: None,
                error: None,
                in_flight: 0,
                issued: 0,
            })),
        }
    }

    fn begin(&self) -> Activity<'_, T, P> {
        let mut state = self.state.write();
        state.in_flight += 1;
        state.error = None;
        Activity {
            state: &self.state,
        }
    }

    /// Record `params`, run `load` and let its result replace the data
    /// unless a newer fetch was issued meanwhile.
    pub(crate) async fn fetch<F>(&self, resource: &'static str, params: P, load: F) -> NewsResult<T>
    where
        F: Future<Output = NewsResult<T>>,
    {
        let ticket = {
            let mut state = self.state.write();
            state.last_params = Some(params);
            state.issued += 1;
            state.issued
        };
        let _activity = self.begin();

        let result = load.await;

        let mut state = self.state.write();
        if state.issued != ticket {
            tracing::warn!(
                resource,
                ticket,
                latest = state.issued,
                "discarding response of a superseded fetch"
            );
            return result;
        }
        match &result {
            Ok(data) => {
                state.data = Some(data.clone());
                state.error = None;
            },
            Err(err) => {
                tracing::warn!(resource, "fetch failed: {err}");
                state.error = Some(err.clone());
            },
        }
        result
    }

    /// Run an operation that does not replace the data, recording its error.
    pub(crate) async fn run<R, F>(&self, operation: F) -> NewsResult<R>
    where
        F: Future<Output = NewsResult<R>>,
    {
        let _activity = self.begin();
        let result = operation.await;
        if let Err(err) = &result {
            self.state.write().error = Some(err.clone());
        }
        result
    }

    pub(crate) fn data(&self) -> Option<T> {
        self.state.read().data.clone()
    }

    pub(crate) fn last_params(&self) -> Option<P> {
        self.state.read().last_params.clone()
    }

    pub(crate) fn loading(&self) -> bool {
        self.state.read().in_flight > 0
    }

    pub(crate) fn error(&self) -> Option<NewsError> {
        self.state.read().error.clone()
    }
}
