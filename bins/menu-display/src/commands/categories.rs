//! `categories` command

use super::AppContext;
use super::menu::load_catalog;
use anyhow::Result;
use menu_cli::progress;
use menu_core::menu::MenuView;
use tracing::warn;

/// Print the chip row, one chip per line
pub async fn run(ctx: &AppContext, json: bool) -> Result<()> {
    let spinner = if json {
        progress::hidden()
    } else {
        progress::spinner("Loading categories...")
    };
    let (products, categories) = load_catalog(&ctx.client).await;
    spinner.finish_and_clear();

    let products = products.unwrap_or_else(|e| {
        warn!(error = %e, "Product list unavailable, chips come from categories only");
        Vec::new()
    });

    let mut view = MenuView::new(ctx.settings.schema.clone());
    view.set_products(products);
    view.set_categories(categories);
    let chips = view.chips();

    if json {
        println!("{}", serde_json::to_string(&chips)?);
    } else {
        for chip in &chips {
            println!("{chip}");
        }
    }
    Ok(())
}
