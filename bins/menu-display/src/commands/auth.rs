//! `auth` commands

use super::AppContext;
use anyhow::Result;
use menu_api_client::credentials::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use menu_api_client::{CredentialStore, NoopListener, local_logout};
use menu_cli::output::{Status, mask_secret};

/// Show what is stored
pub fn status(ctx: &AppContext) -> Result<()> {
    Status::header("Session");
    Status::field("Base URL", ctx.client.base_url());
    Status::field("Session file", &ctx.store.path().display().to_string());

    match ctx.store.access_token() {
        Some(token) => Status::field("Access token", &mask_secret(&token)),
        None => Status::field("Access token", "not signed in"),
    }
    let refresh = if ctx.store.refresh_token().is_some() { "stored" } else { "none" };
    Status::field("Refresh token", refresh);
    Ok(())
}

/// Replace the stored credentials
pub fn import(
    ctx: &AppContext,
    access_token: &str,
    refresh_token: Option<&str>,
    user: Option<&str>,
) -> Result<()> {
    if access_token.trim().is_empty() {
        anyhow::bail!("Access token cannot be empty");
    }
    if let Some(profile) = user {
        serde_json::from_str::<serde_json::Value>(profile)
            .map_err(|e| anyhow::anyhow!("User profile is not valid JSON: {e}"))?;
    }

    let store = ctx.store.as_ref();
    store.set(ACCESS_TOKEN_KEY, access_token.trim())?;
    match refresh_token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => store.set(REFRESH_TOKEN_KEY, token)?,
        None => store.remove(REFRESH_TOKEN_KEY)?,
    }
    match user {
        Some(profile) => store.set(USER_KEY, profile)?,
        None => store.remove(USER_KEY)?,
    }

    Status::success(&format!("Credentials stored in {}", ctx.store.path().display()));
    Ok(())
}

/// Clear the stored session
pub fn logout(ctx: &AppContext) -> Result<()> {
    local_logout(ctx.store.as_ref(), &NoopListener);
    Status::success("Signed out");
    Ok(())
}
