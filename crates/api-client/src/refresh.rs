//! Single-flight credential refresh
//!
//! The first request to see a 401 starts a refresh; every request that sees
//! a 401 while it is in flight awaits the same shared future instead of
//! calling the refresh endpoint again. The slot is emptied after the refresh
//! settles, on a later scheduler turn, so the next expiry can start a new
//! one.

use crate::credentials::{ACCESS_TOKEN_KEY, CredentialStore, REFRESH_TOKEN_KEY};
use crate::endpoints::auth::request_refresh;
use crate::error::RefreshError;
use crate::session::{SessionListener, local_logout};
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a refresh: the new access token or why there is none
pub type RefreshOutcome = Result<String, RefreshError>;

/// Handle on an in-flight refresh; clones observe the same outcome
pub type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

struct InFlight {
    generation: u64,
    future: SharedRefresh,
}

/// Owner of the at-most-one pending refresh
#[derive(Default)]
pub struct RefreshCoordinator {
    pending: Mutex<Option<InFlight>>,
    generations: AtomicU64,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("pending", &self.is_pending())
            .field("started", &self.started())
            .finish()
    }
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Join the pending refresh, or start one with `start`
    ///
    /// `start` is only called when nothing is pending; returning `None` from
    /// it means no refresh can be attempted, and `None` is returned here.
    pub fn join_or_start<F, Fut>(self: &Arc<Self>, start: F) -> Option<SharedRefresh>
    where
        F: FnOnce() -> Option<Fut>,
        Fut: Future<Output = RefreshOutcome> + Send + 'static,
    {
        let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(in_flight) = slot.as_ref() {
            debug!(generation = in_flight.generation, "Joining pending credential refresh");
            return Some(in_flight.future.clone());
        }

        let operation = start()?;
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let coordinator = Arc::downgrade(self);

        let future = async move {
            let outcome = operation.await;
            Self::settle(coordinator, generation);
            outcome
        }
        .boxed()
        .shared();

        debug!(generation, "Started credential refresh");
        *slot = Some(InFlight {
            generation,
            future: future.clone(),
        });
        Some(future)
    }

    /// Empty the slot on a later turn, unless a newer refresh took it
    fn settle(coordinator: Weak<Self>, generation: u64) {
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            if let Some(coordinator) = coordinator.upgrade() {
                coordinator.clear(generation);
            }
        });
    }

    fn clear(&self, generation: u64) {
        let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|f| f.generation == generation) {
            *slot = None;
            debug!(generation, "Cleared settled credential refresh");
        }
    }

    /// A refresh is in flight (or settled but not yet cleared)
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Number of refresh operations started so far
    #[must_use]
    pub fn started(&self) -> u64 {
        self.generations.load(Ordering::SeqCst)
    }
}

/// Everything a refresh needs, detached from the client that started it
pub(crate) struct RefreshTask {
    pub http: Client,
    pub url: String,
    pub timeout: Duration,
    pub store: Arc<dyn CredentialStore>,
    pub session: Arc<dyn SessionListener>,
}

impl RefreshTask {
    /// Exchange `refresh_token` for new credentials and persist them
    ///
    /// Any failure ends the local session before it is reported.
    pub async fn run(self, refresh_token: String) -> RefreshOutcome {
        let result = self.exchange(&refresh_token).await;
        if let Err(ref e) = result {
            warn!(error = %e, "Credential refresh failed, ending session");
            local_logout(self.store.as_ref(), self.session.as_ref());
        }
        result
    }

    async fn exchange(&self, refresh_token: &str) -> RefreshOutcome {
        let response = request_refresh(&self.http, &self.url, self.timeout, refresh_token).await?;

        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(RefreshError::MissingAccessToken)?;
        let rotated = response.refresh_token.filter(|t| !t.is_empty());

        self.store
            .set(ACCESS_TOKEN_KEY, &access_token)
            .map_err(|e| RefreshError::Storage(e.to_string()))?;
        if let Some(ref next) = rotated {
            self.store
                .set(REFRESH_TOKEN_KEY, next)
                .map_err(|e| RefreshError::Storage(e.to_string()))?;
        }

        info!(rotated = rotated.is_some(), "Credentials refreshed");
        Ok(access_token)
    }
}
