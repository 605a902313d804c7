//! `menu` command

use super::AppContext;
use anyhow::{Context, Result};
use menu_api_client::{ApiResult, MenuClient};
use menu_cli::output::{Status, format_count, format_duration};
use menu_cli::{Renderer, progress};
use menu_core::catalog::{Category, Product, decode_list};
use menu_core::menu::{MenuView, ProductCard};
use menu_telemetry::Timer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options of the `menu` command
pub struct MenuOptions {
    pub category: Option<String>,
    pub search: Option<String>,
    pub from_file: Option<PathBuf>,
    pub json: bool,
}

#[derive(Serialize)]
struct MenuOutput<'a> {
    selected: &'a str,
    search: &'a str,
    chips: Vec<String>,
    products: Vec<ProductCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_state: Option<String>,
}

/// Load the catalog and print the menu
pub async fn run(ctx: &AppContext, options: MenuOptions) -> Result<()> {
    let mut view = MenuView::new(ctx.settings.schema.clone());
    if let Some(category) = options.category {
        view.select(category);
    }

    let spinner = if options.json {
        progress::hidden()
    } else {
        progress::spinner("Loading menu...")
    };
    let timer = Timer::start("menu_load");

    let (products, categories) = match options.from_file.as_deref() {
        Some(path) => (Ok(read_catalog(path)?), Vec::new()),
        None => load_catalog(&ctx.client).await,
    };
    let elapsed = timer.stop();
    spinner.finish_and_clear();

    let products = products.unwrap_or_else(|e| {
        warn!(error = %e, "Product list unavailable, showing an empty menu");
        Status::warning(&format!("Could not load products: {e}"));
        Vec::new()
    });

    view.set_products(products);
    view.set_categories(categories);
    if let Some(search) = options.search {
        view.set_search(search);
    }

    let cards = view.cards();

    if options.json {
        let output = MenuOutput {
            selected: view.selected(),
            search: view.search(),
            chips: view.chips(),
            empty_state: cards.is_empty().then(|| view.empty_state_title()),
            products: cards,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", Renderer::detect().menu(&view));
    Status::info(&format!(
        "{} of {} in {}",
        format_count(cards.len(), "product", "products"),
        view.products().len(),
        format_duration(elapsed)
    ));
    Ok(())
}

/// Fetch products and categories concurrently
///
/// A missing category list is not an error; chips then come from products.
pub(crate) async fn load_catalog(client: &MenuClient) -> (ApiResult<Vec<Product>>, Vec<Category>) {
    let products = client.products();
    let categories = client.categories();
    tokio::join!(products.list(), categories.list_or_empty())
}

fn read_catalog(path: &Path) -> Result<Vec<Product>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decode_list(&content)?)
}
