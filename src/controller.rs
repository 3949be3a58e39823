//! Debounced, cancellable search state.
//!
//! [`SearchController`] owns the search box. Every keystroke updates the
//! visible query right away, while the network is only hit once the input
//! has been quiet for the debounce window. At most one search request is
//! pending: issuing a new one cancels its predecessor, and a cancelled
//! request never touches the published [`SearchState`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::github_searcher::RepoSource;
use crate::models::ResultRecord;

/// Snapshot of the search screen, published on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    /// Query whose results are currently shown. Empty when none are.
    pub last_fetched_query: String,
    pub results: Vec<ResultRecord>,
    pub loading: bool,
    /// Why the latest search for `query` failed, if it did.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce,
            min_query_len: config.min_query_len,
        }
    }
}

/// Debounce timer and pending request. Always locked before `state` is
/// modified so that cancellation and result delivery cannot interleave.
#[derive(Default)]
struct Control {
    timer: Option<(u64, JoinHandle<()>)>,
    next_timer_id: u64,
    pending: Option<CancellationToken>,
}

impl Control {
    fn stop_timer(&mut self) {
        if let Some((id, timer)) = self.timer.take() {
            debug!("Dropping debounce timer #{}", id);
            timer.abort();
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            debug!("Cancelling pending search");
            token.cancel();
        }
    }
}

struct Inner<S> {
    source: S,
    settings: ControllerSettings,
    control: Mutex<Control>,
    state: watch::Sender<SearchState>,
}

pub struct SearchController<S: RepoSource> {
    inner: Arc<Inner<S>>,
}

impl<S: RepoSource> SearchController<S> {
    /// Must be called from within a tokio runtime; timers and requests are
    /// spawned onto it.
    pub fn new(source: S, settings: ControllerSettings) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                source,
                settings,
                control: Mutex::new(Control::default()),
                state,
            }),
        }
    }

    /// The source searches are sent to.
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Replace the content of the search box.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let inner = &self.inner;
        let mut control = inner.lock_control();

        if query.chars().count() < inner.settings.min_query_len {
            // Too short to search: drop everything without waiting
            control.stop_timer();
            control.cancel_pending();
            inner.state.send_modify(|state| {
                state.query = query;
                state.results.clear();
                state.last_fetched_query.clear();
                state.loading = false;
                state.error = None;
            });
            return;
        }

        control.stop_timer();
        let already_shown = query == inner.state.borrow().last_fetched_query;
        if already_shown {
            // Back to what is already shown: nothing to fetch, and whatever
            // is in flight would overwrite it
            control.cancel_pending();
            inner.state.send_modify(|state| {
                state.query = query;
                state.loading = false;
                state.error = None;
            });
            return;
        }

        let id = control.next_timer_id;
        control.next_timer_id += 1;

        let debounce = inner.settings.debounce;
        let task_inner = Arc::clone(inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            Inner::fire(&task_inner, id);
        });
        control.timer = Some((id, timer));
        debug!("Scheduled search #{} in {:?}", id, debounce);

        inner.state.send_modify(|state| {
            state.loading = true;
            state.query = query;
        });
    }

    /// Empty the search box, dropping results and any pending work.
    pub fn clear_query(&self) {
        let mut control = self.inner.lock_control();
        control.stop_timer();
        control.cancel_pending();
        self.inner.state.send_modify(|state| {
            state.query.clear();
            state.last_fetched_query.clear();
            state.results.clear();
            state.loading = false;
            state.error = None;
        });
    }
}

impl<S: RepoSource> Drop for SearchController<S> {
    fn drop(&mut self) {
        let mut control = self.inner.lock_control();
        control.stop_timer();
        control.cancel_pending();
    }
}

impl<S: RepoSource> Inner<S> {
    fn lock_control(&self) -> MutexGuard<'_, Control> {
        self.control
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Debounce window elapsed: check the latest query and start a request.
    fn fire(this: &Arc<Self>, timer_id: u64) {
        let mut control = this.lock_control();
        if !matches!(&control.timer, Some((id, _)) if *id == timer_id) {
            return;
        }
        control.timer = None;

        let (query, last_fetched) = {
            let state = this.state.borrow();
            (state.query.clone(), state.last_fetched_query.clone())
        };

        if query.chars().count() < this.settings.min_query_len || query == last_fetched {
            debug!("Skipping search for '{}'", query);
            control.cancel_pending();
            this.state.send_if_modified(|state| {
                let was_loading = state.loading;
                state.loading = false;
                was_loading
            });
            return;
        }

        control.cancel_pending();
        let token = CancellationToken::new();
        control.pending = Some(token.clone());
        this.state.send_if_modified(|state| {
            let changed = !state.loading || state.error.is_some();
            state.loading = true;
            state.error = None;
            changed
        });
        drop(control);

        debug!("Searching for '{}'", query);
        let task_inner = Arc::clone(this);
        tokio::spawn(async move {
            task_inner.run_search(query, token).await;
        });
    }

    async fn run_search(&self, query: String, token: CancellationToken) {
        let outcome = self.source.search(&query, token.clone()).await;

        let mut control = self.lock_control();
        if token.is_cancelled() {
            debug!("Discarding superseded search for '{}'", query);
            return;
        }
        control.pending = None;

        match outcome {
            Ok(hits) => {
                let results: Vec<ResultRecord> = hits.into_iter().map(ResultRecord::from).collect();
                info!("Found {} repositories for '{}'", results.len(), query);
                self.state.send_modify(|state| {
                    state.results = results;
                    state.last_fetched_query = query;
                    state.loading = false;
                    state.error = None;
                });
            }
            // The source noticed a cancellation the controller did not issue
            Err(e) if e.is_cancelled() => {
                debug!("Search for '{}' cancelled by source", query);
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(e.to_string());
                });
            }
        }
    }
}
