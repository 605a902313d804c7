//! Authenticated client for the menu backend
//!
//! Every request carries the stored bearer token. When the backend answers
//! 401 the client exchanges the refresh token for a new access token, sharing
//! one refresh between all requests that failed at the same time, and
//! replays each failed request once. When no refresh is possible the local
//! session is cleared and the host is told through a [`SessionListener`].
//!
//! # Features
//!
//! - **Environment-based configuration**: base URL resolution from `MENU_*` variables
//! - **Single-flight refresh**: at most one `POST /auth/refresh` in flight
//! - **Durable sessions**: in-memory or JSON-file credential storage
//! - **Request correlation**: every request carries an `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use menu_api_client::MenuClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MenuClient::new()?;
//!
//!     let products = client.products();
//!     let categories = client.categories();
//!     let (products, categories) = tokio::join!(products.list(), categories.list_or_empty());
//!     println!("{} products, {} categories", products?.len(), categories.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod refresh;
pub mod request;
pub mod session;

pub use client::MenuClient;
pub use config::{BaseUrlSource, ClientConfig};
pub use credentials::{CredentialStore, FileStore, MemoryStore};
pub use error::{ApiError, ApiResult, RefreshError};
pub use request::{Attempt, RequestContext};
pub use session::{LoginRedirect, Navigator, NoopListener, SessionListener, local_logout};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::MenuClient;
    pub use crate::config::ClientConfig;
    pub use crate::credentials::{CredentialStore, FileStore, MemoryStore};
    pub use crate::endpoints::{AuthApi, CategoriesApi, ProductsApi};
    pub use crate::error::{ApiError, ApiResult, RefreshError};
    pub use crate::session::SessionListener;
}
