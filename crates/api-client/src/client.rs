//! Main API client implementation

use crate::config::ClientConfig;
use crate::credentials::{CredentialStore, FileStore, MemoryStore};
use crate::endpoints::{AuthApi, CategoriesApi, ProductsApi};
use crate::error::{ApiError, ApiResult};
use crate::refresh::{RefreshCoordinator, RefreshTask};
use crate::request::RequestContext;
use crate::session::{NoopListener, SessionListener, local_logout};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Request correlation ID header
const X_REQUEST_ID: &str = "x-request-id";

/// Menu backend client
///
/// Attaches the stored bearer token to every request. A 401 triggers one
/// credential refresh shared by every request that hits it, then a single
/// replay of each affected request.
#[derive(Clone)]
pub struct MenuClient {
    inner: Client,
    refresh_http: Client,
    config: Arc<ClientConfig>,
    store: Arc<dyn CredentialStore>,
    session: Arc<dyn SessionListener>,
    refresh: Arc<RefreshCoordinator>,
}

impl std::fmt::Debug for MenuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuClient")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl MenuClient {
    /// Client configured from the environment, with the default session file
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        let store = FileStore::open_default()?;
        Ok(Self::with_config(config)?.with_store(Arc::new(store)))
    }

    /// Client with a specific configuration and an empty in-memory session
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("menu-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers.clone())
            .build()
            .map_err(ApiError::Request)?;

        // Separate transport so the refresh call never goes through `execute`
        let refresh_http = Client::builder()
            .timeout(config.refresh_timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            refresh_http,
            config: Arc::new(config),
            store: Arc::new(MemoryStore::new()),
            session: Arc::new(NoopListener),
            refresh: RefreshCoordinator::new(),
        })
    }

    /// Use `store` for credentials
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = store;
        self
    }

    /// Notify `listener` whenever the local session is cleared
    #[must_use]
    pub fn with_session_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.session = listener;
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Credential storage in use
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Refresh bookkeeping, shared by every clone of this client
    #[must_use]
    pub fn refresh_coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.refresh
    }

    /// Whether an access token is stored
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.access_token().is_some()
    }

    /// Clear the local session
    pub fn logout(&self) {
        local_logout(self.store.as_ref(), self.session.as_ref());
    }

    pub(crate) fn refresh_http(&self) -> &Client {
        &self.refresh_http
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access product endpoints
    #[must_use]
    pub fn products(&self) -> ProductsApi {
        ProductsApi::new(self.clone())
    }

    /// Access category endpoints
    #[must_use]
    pub fn categories(&self) -> CategoriesApi {
        CategoriesApi::new(self.clone())
    }

    /// Access auth endpoints
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// GET a path below the base URL
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let ctx = RequestContext::new(Method::GET, self.config.endpoint_url(path));
        self.execute(ctx).await
    }

    /// POST a JSON body to a path below the base URL
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let ctx = RequestContext::new(Method::POST, self.config.endpoint_url(path))
            .with_json_body(serde_json::to_value(body)?);
        self.execute(ctx).await
    }

    /// Send a request, refreshing credentials and replaying it once on 401
    #[instrument(
        skip(self, ctx),
        fields(method = %ctx.method(), url = %ctx.url(), request_id = %ctx.request_id())
    )]
    pub async fn execute<T: DeserializeOwned>(&self, mut ctx: RequestContext) -> ApiResult<T> {
        loop {
            let start = Instant::now();
            let response = self.dispatch(&ctx).await?;
            let status = response.status();
            debug!(
                status = status.as_u16(),
                retry = ctx.is_retry(),
                elapsed_ms = start.elapsed().as_millis(),
                "Response received"
            );

            if status != StatusCode::UNAUTHORIZED {
                return Self::handle_response(response).await;
            }

            let unauthorized = Self::error_response(response).await;
            if ctx.is_retry() {
                return Err(unauthorized);
            }
            ctx = self.recover_unauthorized(ctx.into_retry(), unauthorized).await?;
        }
    }

    /// Send one attempt with the stored credentials attached
    async fn dispatch(&self, ctx: &RequestContext) -> ApiResult<Response> {
        let mut headers = ctx.headers().clone();
        if let Ok(value) = HeaderValue::from_str(ctx.request_id()) {
            headers.insert(X_REQUEST_ID, value);
        }
        if let Some(token) = self.store.access_token() {
            if let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        let mut request = self
            .inner
            .request(ctx.method().clone(), ctx.url())
            .headers(headers);
        if let Some(body) = ctx.body() {
            request = request.json(body);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.config.timeout)
            } else {
                ApiError::Request(e)
            }
        })
    }

    /// Refresh (or join the pending refresh) and prepare the replay
    ///
    /// Without a refresh token the session is cleared and the original 401
    /// is returned.
    async fn recover_unauthorized(
        &self,
        ctx: RequestContext,
        unauthorized: ApiError,
    ) -> ApiResult<RequestContext> {
        let task = RefreshTask {
            http: self.refresh_http.clone(),
            url: self.config.refresh_url(),
            timeout: self.config.refresh_timeout,
            store: Arc::clone(&self.store),
            session: Arc::clone(&self.session),
        };

        let store = &self.store;
        let session = &self.session;
        let pending = self.refresh.join_or_start(move || {
            match store.refresh_token().filter(|t| !t.is_empty()) {
                Some(refresh_token) => Some(task.run(refresh_token)),
                None => {
                    warn!("No refresh token stored, ending session");
                    local_logout(store.as_ref(), session.as_ref());
                    None
                }
            }
        });

        let Some(pending) = pending else {
            return Err(unauthorized);
        };

        let refreshed = pending.await?;
        let token = self.store.access_token().unwrap_or(refreshed);
        debug!("Replaying request with refreshed credentials");
        Ok(ctx.with_bearer(&token))
    }

    /// Decode a success body, or turn a failure status into an error
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(Self::error_response(response).await)
        }
    }

    async fn error_response(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ApiError::api_response(status, message)
    }
}
