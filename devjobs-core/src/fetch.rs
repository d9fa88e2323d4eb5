//! Fetch lifecycle shared by every listing page
//!
//! A [`FetchController`] owns one page's [`FetchState`]: it flips the page to
//! loading the moment a fetch is initiated, runs the fetch on the tokio
//! runtime, and on resolution either replaces the payload or raises a single
//! notification. Loading is cleared on every path, including a fetch task
//! that panics.
//!
//! ```text
//! initiate() ──► in_flight += 1 ──► spawn(fetch) ──► Ok(payload)  ──► replace items
//!                (synchronous)                  └──► Err(cause)   ──► notify once
//!                                                    in_flight -= 1 (always)
//! ```
//!
//! Overlapping fetches are not cancelled. With [`ResolutionOrder::LastResolved`]
//! whichever response resolves last is what the page shows; the page stays in
//! its loading state until every outstanding fetch has resolved.
//!
//! State lives in a `tokio::sync::watch` channel, so views re-render by
//! awaiting `changed()` on a [`FetchController::subscribe`] receiver.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::Listing;
use crate::notify::{fetch_failed, Detail, Notification, Notifier};

/// Zero-argument remote operation producing a payload.
pub type FetchFn<P> = Arc<dyn Fn() -> BoxFuture<'static, Result<P, FetchError>> + Send + Sync>;

/// Called with every payload that gets applied.
pub type LoadedHook<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Controller for pages that list records.
pub type ListFetchController<T> = FetchController<Listing<T>>;

/// Which response wins when fetches overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionOrder {
    /// The response that resolves last is shown, whenever it was issued.
    #[default]
    LastResolved,
    /// A response older than the one already shown is discarded.
    LatestIssued,
}

/// What a page knows about its collection right now.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<P> {
    pub items: P,
    in_flight: usize,
    applied: u64,
}

impl<P> FetchState<P> {
    /// A state with one fetch outstanding.
    pub fn loading(items: P) -> Self {
        Self {
            items,
            in_flight: 1,
            applied: 0,
        }
    }

    /// A settled state holding `items`.
    pub fn loaded(items: P) -> Self {
        Self {
            items,
            in_flight: 0,
            applied: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of fetches initiated but not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl<P: Default> Default for FetchState<P> {
    fn default() -> Self {
        Self::loaded(P::default())
    }
}

struct Shared<P> {
    state: watch::Sender<FetchState<P>>,
    mounted: AtomicBool,
    issued: AtomicU64,
    subject: String,
    detail: Detail,
    order: ResolutionOrder,
    notifier: Arc<dyn Notifier>,
    on_loaded: Option<LoadedHook<P>>,
}

impl<P: Clone> Shared<P> {
    fn resolve(&self, seq: u64, outcome: Result<P, FetchError>) {
        if !self.mounted.load(Ordering::Acquire) {
            debug!(subject = %self.subject, seq, "view torn down, dropping fetch result");
            return;
        }

        match outcome {
            Ok(payload) => {
                let hook_copy = self.on_loaded.as_ref().map(|_| payload.clone());
                let order = self.order;
                let mut applied = false;
                self.state.send_modify(|state| {
                    state.in_flight = state.in_flight.saturating_sub(1);
                    if order == ResolutionOrder::LatestIssued && seq < state.applied {
                        return;
                    }
                    state.items = payload;
                    state.applied = seq;
                    applied = true;
                });

                if !applied {
                    debug!(subject = %self.subject, seq, "stale response discarded");
                    return;
                }
                debug!(subject = %self.subject, seq, "fetch applied");
                if let (Some(hook), Some(payload)) = (&self.on_loaded, hook_copy) {
                    hook(&payload);
                }
            }
            Err(cause) => {
                self.state
                    .send_modify(|state| state.in_flight = state.in_flight.saturating_sub(1));
                warn!(subject = %self.subject, seq, kind = ?cause.kind(), error = %cause, "fetch failed");
                self.notifier.notify(Notification::error(fetch_failed(
                    &self.subject,
                    &cause,
                    self.detail,
                )));
            }
        }
    }

    fn abandon(&self, seq: u64) {
        if !self.mounted.load(Ordering::Acquire) {
            return;
        }
        warn!(subject = %self.subject, seq, "fetch task ended without a result");
        self.state
            .send_modify(|state| state.in_flight = state.in_flight.saturating_sub(1));
    }
}

/// One outstanding fetch. Dropping it unresolved still clears its share of
/// the loading state.
struct Pending<P: Clone> {
    shared: Arc<Shared<P>>,
    seq: u64,
    settled: bool,
}

impl<P: Clone> Pending<P> {
    fn settle(mut self, outcome: Result<P, FetchError>) {
        self.settled = true;
        self.shared.resolve(self.seq, outcome);
    }
}

impl<P: Clone> Drop for Pending<P> {
    fn drop(&mut self) {
        if !self.settled {
            self.shared.abandon(self.seq);
        }
    }
}

/// Owns a page's fetch lifecycle. See the module docs.
pub struct FetchController<P: Clone> {
    shared: Arc<Shared<P>>,
    fetch: FetchFn<P>,
}

impl<P> FetchController<P>
where
    P: Clone + Default + Send + Sync + 'static,
{
    /// Start configuring a controller around `fetch`.
    pub fn builder<F, Fut>(fetch: F) -> FetchControllerBuilder<P>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<P, FetchError>> + Send + 'static,
    {
        FetchControllerBuilder {
            fetch: Arc::new(move || fetch().boxed()),
            notifier: None,
            subject: "jobs".to_string(),
            detail: Detail::default(),
            order: ResolutionOrder::default(),
            on_loaded: None,
            initial: None,
        }
    }

    /// Begin a fetch. Loading is set before this returns.
    ///
    /// Must be called from within a tokio runtime. Returns `None` once the
    /// controller has been unmounted.
    pub fn initiate(&self) -> Option<JoinHandle<()>> {
        if !self.shared.mounted.load(Ordering::Acquire) {
            warn!(subject = %self.shared.subject, "initiate called after unmount");
            return None;
        }

        let seq = self.shared.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared
            .state
            .send_modify(|state| state.in_flight += 1);
        debug!(subject = %self.shared.subject, seq, "fetch initiated");

        let fetch = (self.fetch)();
        let pending = Pending {
            shared: Arc::clone(&self.shared),
            seq,
            settled: false,
        };
        Some(tokio::spawn(async move {
            let outcome = fetch.await;
            pending.settle(outcome);
        }))
    }

    /// Fetch again with the same operation. Safe while a fetch is in flight.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        info!(subject = %self.shared.subject, "refresh requested");
        self.initiate()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<P> {
        self.shared.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading()
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<P>> {
        self.shared.state.subscribe()
    }

    /// Wait until nothing is in flight and return that state.
    pub async fn settled(&self) -> FetchState<P> {
        let mut rx = self.shared.state.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => FetchState::clone(&state),
            Err(_) => self.state(),
        };
        settled
    }

    pub fn subject(&self) -> &str {
        &self.shared.subject
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.load(Ordering::Acquire)
    }
}

impl<P: Clone> FetchController<P> {
    /// Mark the owning view as gone. Later completions are ignored.
    pub fn unmount(&self) {
        if self.shared.mounted.swap(false, Ordering::AcqRel) {
            debug!(subject = %self.shared.subject, "controller unmounted");
        }
    }
}

impl<P: Clone> Drop for FetchController<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Configuration for a [`FetchController`].
pub struct FetchControllerBuilder<P> {
    fetch: FetchFn<P>,
    notifier: Option<Arc<dyn Notifier>>,
    subject: String,
    detail: Detail,
    order: ResolutionOrder,
    on_loaded: Option<LoadedHook<P>>,
    initial: Option<P>,
}

impl<P> FetchControllerBuilder<P>
where
    P: Clone + Default + Send + Sync + 'static,
{
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Noun used in failure messages ("could not get {subject}").
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn detail(mut self, detail: Detail) -> Self {
        self.detail = detail;
        self
    }

    pub fn order(mut self, order: ResolutionOrder) -> Self {
        self.order = order;
        self
    }

    pub fn on_loaded(mut self, hook: impl Fn(&P) + Send + Sync + 'static) -> Self {
        self.on_loaded = Some(Arc::new(hook));
        self
    }

    /// Start settled with data the caller already has.
    pub fn preloaded(mut self, payload: P) -> Self {
        self.initial = Some(payload);
        self
    }

    /// Build without fetching.
    pub fn build(self) -> FetchController<P> {
        let (state, _) = watch::channel(FetchState::loaded(self.initial.unwrap_or_default()));
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(crate::notify::Silent));
        FetchController {
            shared: Arc::new(Shared {
                state,
                mounted: AtomicBool::new(true),
                issued: AtomicU64::new(0),
                subject: self.subject,
                detail: self.detail,
                order: self.order,
                notifier,
                on_loaded: self.on_loaded,
            }),
            fetch: self.fetch,
        }
    }

    /// Build and initiate the first fetch.
    pub fn mount(self) -> FetchController<P> {
        let controller = self.build();
        controller.initiate();
        controller
    }
}
