//! Products API endpoints

use crate::client::MenuClient;
use crate::error::ApiResult;
use menu_core::catalog::{ListEnvelope, Product};

/// Products API interface
#[derive(Clone)]
pub struct ProductsApi {
    client: MenuClient,
}

impl ProductsApi {
    pub(crate) fn new(client: MenuClient) -> Self {
        Self { client }
    }

    /// List every product on the menu
    ///
    /// GET /products, accepting a bare array or an `{ items }` envelope
    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        let envelope: ListEnvelope<Product> = self.client.get("products").await?;
        Ok(envelope.into_items())
    }
}
