//! Command implementations

pub mod auth;
pub mod categories;
pub mod menu;

use crate::GlobalArgs;
use anyhow::Result;
use menu_api_client::{ApiError, ClientConfig, CredentialStore, FileStore, MenuClient, SessionListener};
use menu_cli::output::Status;
use menu_core::config::Config;
use menu_core::error::exit_codes;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs
pub struct AppContext {
    pub settings: Config,
    pub client: MenuClient,
    pub store: Arc<FileStore>,
}

impl AppContext {
    /// Load display settings, API configuration and the session file
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let settings = Config::load(args.config.as_deref())?;

        let mut config = ClientConfig::from_env()?;
        if let Some(url) = args.base_url.as_deref() {
            config = config.with_base_url(url)?;
        }

        let path = args.session_file.clone().unwrap_or_else(FileStore::default_path);
        let store = Arc::new(FileStore::open(path)?);

        debug!(
            base_url = %config.base_url,
            source = ?config.base_url_source,
            session = %store.path().display(),
            "Context loaded"
        );

        let client = MenuClient::with_config(config)?
            .with_store(Arc::clone(&store) as Arc<dyn CredentialStore>)
            .with_session_listener(Arc::new(CliSessionListener));

        Ok(Self {
            settings,
            client,
            store,
        })
    }
}

/// Tells the user to sign in again once the session is gone
struct CliSessionListener;

impl SessionListener for CliSessionListener {
    fn session_invalidated(&self) {
        Status::warning("Session expired. Sign in again and run `menu-display auth import`.");
    }
}

/// Process exit code for a failed command
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    if let Some(api) = error.downcast_ref::<ApiError>() {
        if api.is_refresh_failure() || api.is_unauthorized() {
            return exit_codes::SESSION_EXPIRED;
        }
        if matches!(api, ApiError::Config(_) | ApiError::InvalidUrl(_)) {
            return exit_codes::CONFIG_ERROR;
        }
    }
    if let Some(core) = error.downcast_ref::<menu_core::Error>() {
        if core.code.category() == "Configuration" {
            return exit_codes::CONFIG_ERROR;
        }
    }
    exit_codes::FAILURE
}
