//! Local logout and session invalidation
//!
//! Clearing credentials is the client's job; what the user sees afterwards
//! is the host application's. The host plugs in a [`SessionListener`], for
//! instance [`LoginRedirect`] to send a browser-like front-end to `/login`.

use crate::credentials::{CredentialStore, SESSION_KEYS};
use tracing::{info, warn};

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";

/// Told when the local session has been cleared
pub trait SessionListener: Send + Sync {
    /// The stored credentials are gone; the user must authenticate again
    fn session_invalidated(&self);
}

/// Listener that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SessionListener for NoopListener {
    fn session_invalidated(&self) {}
}

impl<F> SessionListener for F
where
    F: Fn() + Send + Sync,
{
    fn session_invalidated(&self) {
        self();
    }
}

/// View navigation capability of the host application
pub trait Navigator: Send + Sync {
    /// Path of the view currently shown
    fn current_path(&self) -> String;

    /// Replace the current view with `path`, resetting application state
    fn assign(&self, path: &str);
}

/// Sends the host to the login view unless it is already there
#[derive(Debug, Clone)]
pub struct LoginRedirect<N> {
    navigator: N,
}

impl<N: Navigator> LoginRedirect<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }
}

impl<N: Navigator> SessionListener for LoginRedirect<N> {
    fn session_invalidated(&self) {
        if self.navigator.current_path() != LOGIN_PATH {
            self.navigator.assign(LOGIN_PATH);
        }
    }
}

/// Clear every stored identity value and notify the host
///
/// Idempotent. Storage failures are logged, never returned: a logout that
/// half-fails must still end the session from the user's point of view.
pub fn local_logout(store: &dyn CredentialStore, listener: &dyn SessionListener) {
    for key in SESSION_KEYS {
        if let Err(e) = store.remove(key) {
            warn!(key, error = %e, "Failed to clear stored credential");
        }
    }
    info!("Local session cleared");
    listener.session_invalidated();
}
