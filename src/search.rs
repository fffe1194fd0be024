//! Search box and filter panel state with a trailing debounce on typing.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::catalog::ProductFilter;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing debounce: the callback receives the last pushed value once no new
/// value has arrived for `window`.
///
/// The worker task is tied to a [`CancellationToken`]; after [`cancel`] or
/// drop, no further callback is started.
///
/// [`cancel`]: Debouncer::cancel
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<Option<T>>,
    token: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called inside a tokio runtime.
    pub fn new<F>(window: Duration, mut callback: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        // `None` discards whatever is waiting out the window.
        let (tx, mut rx) = mpsc::unbounded_channel::<Option<T>>();
        let token = CancellationToken::new();
        let shutdown = token.clone();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let mut deadline: Option<Instant> = None;

            loop {
                let sleep_until =
                    deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

                tokio::select! {
                    biased;

                    _ = shutdown.cancelled() => break,

                    _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                        deadline = None;
                        if let Some(value) = pending.take() {
                            callback(value);
                        }
                    }

                    received = rx.recv() => match received {
                        Some(Some(value)) => {
                            pending = Some(value);
                            deadline = Some(Instant::now() + window);
                        }
                        Some(None) => {
                            pending = None;
                            deadline = None;
                        }
                        None => break,
                    },
                }
            }
            tracing::trace!("debouncer stopped");
        });

        Self { tx, token }
    }
}

impl<T> Debouncer<T> {
    pub fn push(&self, value: T) {
        if self.tx.send(Some(value)).is_err() {
            tracing::debug!("debouncer already stopped, input dropped");
        }
    }

    /// Drops the value waiting out the window, if any, without firing it.
    pub fn reset(&self) {
        if self.tx.send(None).is_err() {
            tracing::debug!("debouncer already stopped, reset ignored");
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterValues {
    pub category: String,
    pub brand: String,
    pub status: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl FilterValues {
    pub fn active_count(&self) -> usize {
        [
            !self.category.is_empty(),
            !self.brand.is_empty(),
            !self.status.is_empty(),
            self.min_price.is_some(),
            self.max_price.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// What the widget reports upward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub search: String,
    pub filters: FilterValues,
}

impl SearchQuery {
    pub fn to_product_filter(&self) -> ProductFilter {
        ProductFilter {
            search: self.search.clone(),
            category: self.filters.category.clone(),
            brand: self.filters.brand.clone(),
            status: self.filters.status.clone(),
        }
    }
}

type Notify = Arc<dyn Fn(SearchQuery) + Send + Sync>;

/// Search text is shown as typed and reported after the debounce window;
/// filter edits stay pending until applied.
pub struct SearchAndFilter {
    search_text: String,
    pending: FilterValues,
    applied: Arc<Mutex<FilterValues>>,
    notify: Notify,
    debouncer: Debouncer<String>,
}

impl SearchAndFilter {
    pub fn new<F>(window: Duration, on_change: F) -> Self
    where
        F: Fn(SearchQuery) + Send + Sync + 'static,
    {
        let notify: Notify = Arc::new(on_change);
        let applied = Arc::new(Mutex::new(FilterValues::default()));

        let debounced_notify = notify.clone();
        let debounced_filters = applied.clone();
        let debouncer = Debouncer::new(window, move |search: String| {
            let filters = debounced_filters
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            debounced_notify(SearchQuery { search, filters });
        });

        Self {
            search_text: String::new(),
            pending: FilterValues::default(),
            applied,
            notify,
            debouncer,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn pending_filters(&self) -> &FilterValues {
        &self.pending
    }

    pub fn pending_filters_mut(&mut self) -> &mut FilterValues {
        &mut self.pending
    }

    pub fn applied_filters(&self) -> FilterValues {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn on_search_input(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_text.clone_from(&text);
        self.debouncer.push(text);
    }

    /// Commits the pending filters and reports immediately.
    pub fn apply_filters(&self) {
        let filters = self.pending.clone();
        *self.applied.lock().unwrap_or_else(PoisonError::into_inner) = filters.clone();
        (self.notify)(SearchQuery {
            search: self.search_text.clone(),
            filters,
        });
    }

    /// Resets search and filters and reports immediately.
    pub fn clear(&mut self) {
        self.debouncer.reset();
        self.search_text.clear();
        self.pending = FilterValues::default();
        *self.applied.lock().unwrap_or_else(PoisonError::into_inner) = FilterValues::default();
        (self.notify)(SearchQuery::default());
    }

    pub fn active_filter_count(&self) -> usize {
        self.applied_filters().active_count()
    }

    /// Stops any pending debounced report, e.g. when the view goes away.
    pub fn close(&self) {
        self.debouncer.cancel();
    }
}
