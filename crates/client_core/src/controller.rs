//! View state controller.
//!
//! Owns the query parameters currently on display, mirrors them into the
//! address state and drives background refetches through a [`QueryBoundary`].
//!
//! Every issued fetch is tagged with a monotonically increasing sequence
//! number. A completion is published only when its sequence number is the
//! latest issued and its parameters still equal the current ones; anything
//! else is a superseded response and is dropped. Fetches are never
//! serialized, so several may be in flight at once and may complete in any
//! order.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::Product,
    protocol::{PaginatedResult, QueryParams, RawQueryParams, SortOption, DEFAULT_LIMIT},
};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{address::AddressState, boundary::QueryBoundary, error::FetchError};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub fetch_timeout: Duration,
    /// Limit used when the address does not specify one.
    pub page_size: u32,
    /// Abort the transport task of a superseded fetch instead of only
    /// discarding its response on arrival.
    pub abort_superseded: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            page_size: DEFAULT_LIMIT,
            abort_superseded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing in flight for the current params.
    Idle,
    /// A fetch for the current params is in flight; the previous result
    /// stays visible.
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub params: QueryParams,
    pub result: PaginatedResult<Product>,
    pub status: ViewStatus,
    /// Message of the most recent failed refresh, cleared by the next
    /// published result.
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    AddressChanged { query: String },
    FetchIssued { seq: u64, params: QueryParams },
    ResultPublished { seq: u64, total: usize, page: u32 },
    Superseded { seq: u64, latest: u64 },
    RefreshFailed { seq: u64, message: String },
    ScrollToTop,
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub seq: u64,
    pub params: QueryParams,
    pub outcome: Result<PaginatedResult<Product>, FetchError>,
}

/// What [`ViewController::apply`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Published,
    Superseded,
    Failed,
}

pub struct ViewController<A: AddressState> {
    vendor_slug: String,
    boundary: Arc<dyn QueryBoundary>,
    address: A,
    config: ControllerConfig,
    state: ViewState,
    /// Params the displayed result was produced for.
    shown_params: QueryParams,
    latest_seq: u64,
    in_flight: Vec<(u64, JoinHandle<()>)>,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    events: broadcast::Sender<ViewEvent>,
}

impl<A: AddressState> ViewController<A> {
    /// Mounts a view from the current address and an already rendered
    /// initial result. No fetch is issued.
    pub fn mount(
        vendor_slug: impl Into<String>,
        boundary: Arc<dyn QueryBoundary>,
        address: A,
        initial: PaginatedResult<Product>,
        config: ControllerConfig,
    ) -> Self {
        let params = params_from_address(&address.read(), config.page_size);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(256);
        Self {
            vendor_slug: vendor_slug.into(),
            boundary,
            address,
            config,
            shown_params: params.clone(),
            state: ViewState {
                params,
                result: initial,
                status: ViewStatus::Idle,
                last_error: None,
            },
            latest_seq: 0,
            in_flight: Vec::new(),
            completions_tx,
            completions_rx,
            events,
        }
    }

    /// Fetches the initial result for the address and mounts on it. A failure
    /// here is terminal for the view (for example an unknown vendor).
    pub async fn open(
        vendor_slug: impl Into<String>,
        boundary: Arc<dyn QueryBoundary>,
        address: A,
        config: ControllerConfig,
    ) -> Result<Self, FetchError> {
        let vendor_slug = vendor_slug.into();
        let params = params_from_address(&address.read(), config.page_size);
        let initial = match tokio::time::timeout(
            config.fetch_timeout,
            boundary.fetch_products(&vendor_slug, &params),
        )
        .await
        {
            Ok(outcome) => outcome?,
            Err(_) => return Err(FetchError::Timeout(config.fetch_timeout)),
        };
        info!(vendor_slug = %vendor_slug, total = initial.total, "view mounted");
        Ok(Self::mount(vendor_slug, boundary, address, initial, config))
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn params(&self) -> &QueryParams {
        &self.state.params
    }

    pub fn result(&self) -> &PaginatedResult<Product> {
        &self.state.result
    }

    pub fn status(&self) -> ViewStatus {
        self.state.status
    }

    pub fn vendor_slug(&self) -> &str {
        &self.vendor_slug
    }

    pub fn address(&self) -> &A {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut A {
        &mut self.address
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    /// Every keystroke is an update; there is no debounce window.
    pub fn set_search(&mut self, search: impl Into<String>) -> Option<u64> {
        let next = self.state.params.with_search(search);
        self.navigate(next, false)
    }

    pub fn set_sort(&mut self, sort: SortOption) -> Option<u64> {
        let next = self.state.params.with_sort(sort);
        self.navigate(next, false)
    }

    pub fn select_page(&mut self, page: u32) -> Option<u64> {
        let next = self.state.params.with_page(page);
        self.navigate(next, true)
    }

    /// Only moves forward when the displayed page count describes the
    /// current search, sort and limit. After a pending search or sort change
    /// the count is unknown and this is a no-op.
    pub fn next_page(&mut self) -> Option<u64> {
        let (params, shown) = (&self.state.params, &self.shown_params);
        if params.search != shown.search || params.sort != shown.sort || params.limit != shown.limit
        {
            return None;
        }
        if params.page as usize >= self.state.result.total_pages {
            return None;
        }
        let next = params.page.saturating_add(1);
        self.select_page(next)
    }

    pub fn previous_page(&mut self) -> Option<u64> {
        if self.state.params.page <= 1 {
            return None;
        }
        self.select_page(self.state.params.page - 1)
    }

    /// Refetches the current params without touching the address.
    pub fn refresh(&mut self) -> u64 {
        self.issue_fetch()
    }

    /// Re-reads the address after an external history move (back/forward)
    /// and refetches if it now describes a different view.
    pub fn sync_from_address(&mut self) -> Option<u64> {
        let params = params_from_address(&self.address.read(), self.config.page_size);
        if params == self.state.params {
            return None;
        }
        self.state.params = params;
        Some(self.issue_fetch())
    }

    fn default_limit(&self) -> u32 {
        self.config.page_size.max(1)
    }

    fn navigate(&mut self, next: QueryParams, scroll_to_top: bool) -> Option<u64> {
        if next == self.state.params {
            return None;
        }
        let query = next.to_query_string_with_default_limit(self.default_limit());
        self.address.push(&query);
        self.emit(ViewEvent::AddressChanged { query });
        if scroll_to_top {
            self.emit(ViewEvent::ScrollToTop);
        }
        self.state.params = next;
        Some(self.issue_fetch())
    }

    fn issue_fetch(&mut self) -> u64 {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let params = self.state.params.clone();
        self.state.status = ViewStatus::Pending;

        if self.config.abort_superseded {
            for (stale_seq, handle) in self.in_flight.drain(..) {
                debug!(seq = stale_seq, "aborting superseded fetch");
                handle.abort();
            }
        } else {
            self.in_flight.retain(|(_, handle)| !handle.is_finished());
        }

        let boundary = Arc::clone(&self.boundary);
        let tx = self.completions_tx.clone();
        let vendor_slug = self.vendor_slug.clone();
        let timeout = self.config.fetch_timeout;
        let task_params = params.clone();
        let handle = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(
                timeout,
                boundary.fetch_products(&vendor_slug, &task_params),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchError::Timeout(timeout)),
            };
            let _ = tx.send(FetchCompletion {
                seq,
                params: task_params,
                outcome,
            });
        });
        self.in_flight.push((seq, handle));

        debug!(
            seq,
            vendor_slug = %self.vendor_slug,
            query = %params.to_query_string_with_default_limit(self.default_limit()),
            "fetch issued"
        );
        self.emit(ViewEvent::FetchIssued { seq, params });
        seq
    }

    /// Applies one completion under the superseded-response rule.
    pub fn apply(&mut self, completion: FetchCompletion) -> Disposition {
        let FetchCompletion {
            seq,
            params,
            outcome,
        } = completion;
        self.in_flight.retain(|(in_flight_seq, _)| *in_flight_seq != seq);

        if seq != self.latest_seq || params != self.state.params {
            debug!(seq, latest = self.latest_seq, "discarding superseded response");
            self.emit(ViewEvent::Superseded {
                seq,
                latest: self.latest_seq,
            });
            return Disposition::Superseded;
        }

        self.state.status = ViewStatus::Idle;
        match outcome {
            Ok(result) => {
                let (total, page) = (result.total, result.page);
                self.state.result = result;
                self.shown_params = params;
                self.state.last_error = None;
                self.emit(ViewEvent::ResultPublished { seq, total, page });
                Disposition::Published
            }
            Err(error) => {
                warn!(seq, vendor_slug = %self.vendor_slug, %error, "could not refresh products");
                let message = error.to_string();
                self.state.last_error = Some(message.clone());
                self.emit(ViewEvent::RefreshFailed { seq, message });
                Disposition::Failed
            }
        }
    }

    /// Waits for the next fetch to complete, in whatever order the transport
    /// delivers, and applies it.
    pub async fn next_completion(&mut self) -> Option<Disposition> {
        let completion = self.completions_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Processes completions until the latest issued fetch has been applied.
    pub async fn settle(&mut self) {
        while self.state.status == ViewStatus::Pending {
            if self.next_completion().await.is_none() {
                break;
            }
        }
    }

    fn emit(&self, event: ViewEvent) {
        let _ = self.events.send(event);
    }
}

fn params_from_address(query: &str, page_size: u32) -> QueryParams {
    let raw = RawQueryParams::from_query_string(query);
    let limit_given = raw.limit.is_some();
    let mut params = raw.normalize();
    if !limit_given {
        params.limit = page_size.max(1);
    }
    params
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
