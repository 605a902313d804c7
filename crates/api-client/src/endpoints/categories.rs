//! Categories API endpoints

use crate::client::MenuClient;
use crate::error::ApiResult;
use menu_core::catalog::{Category, ListEnvelope};
use tracing::warn;

/// Categories API interface
#[derive(Clone)]
pub struct CategoriesApi {
    client: MenuClient,
}

impl CategoriesApi {
    pub(crate) fn new(client: MenuClient) -> Self {
        Self { client }
    }

    /// List the backend's categories
    ///
    /// GET /categories
    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        let envelope: ListEnvelope<Category> = self.client.get("categories").await?;
        Ok(envelope.into_items())
    }

    /// List categories, treating any failure as "no categories"
    ///
    /// Chips can still be derived from products, so a missing category
    /// list is not worth failing the menu over.
    pub async fn list_or_empty(&self) -> Vec<Category> {
        match self.list().await {
            Ok(categories) => categories,
            Err(e) => {
                warn!(error = %e, "Category list unavailable, continuing without it");
                Vec::new()
            }
        }
    }
}
