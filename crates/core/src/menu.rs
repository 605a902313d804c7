//! Menu view state
//!
//! [`MenuView`] owns everything the menu screen shows: the loaded catalog,
//! the loading flags, the chip row and the visitor's selection and search.
//! Front-ends feed it fetch results and read back cards to render.

use crate::catalog::{Category, Product};
use crate::chips::{ALL_CHIP, build_ordered_chips, derive_category_names, includes_ci, preferred_selection};
use crate::config::ConfigSchema;
use crate::filter::MenuFilter;
use crate::image::{ImageSource, resolve_image_source};
use crate::money::format_idr;
use serde::Serialize;
use std::path::PathBuf;

/// A rendered product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    /// Stable key; generated when the product has no identifier
    pub key: String,
    /// Display name, `Untitled` when missing
    pub name: String,
    /// Description, possibly empty
    pub description: String,
    /// Resolved image location
    pub image: ImageSource,
    /// Localized price, e.g. `Rp 25.000,00`
    pub price: String,
}

impl ProductCard {
    /// Build a card from a catalog product
    pub fn from_product(product: &Product, assets_dir: Option<&std::path::Path>, with_decimals: bool) -> Self {
        Self {
            key: product
                .key()
                .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from),
            name: product.display_name().to_string(),
            description: product.display_description().to_string(),
            image: resolve_image_source(product, assets_dir),
            price: format_idr(product.price_value(), with_decimals),
        }
    }
}

/// State behind the menu screen
#[derive(Debug, Clone)]
pub struct MenuView {
    settings: ConfigSchema,
    products: Vec<Product>,
    api_categories: Vec<String>,
    loading_products: bool,
    loading_categories: bool,
    selected: String,
    search: String,
}

impl MenuView {
    /// Empty view in the loading state, selecting the configured default category
    pub fn new(settings: ConfigSchema) -> Self {
        let selected = settings.menu.default_category.clone();
        Self {
            settings,
            products: Vec::new(),
            api_categories: Vec::new(),
            loading_products: true,
            loading_categories: true,
            selected,
            search: String::new(),
        }
    }

    /// Mark both sources as loading again (soft refresh)
    pub fn begin_refresh(&mut self) {
        self.loading_products = true;
        self.loading_categories = true;
    }

    /// Replace the catalog and clear the products loading flag
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.loading_products = false;
        self.reconcile_selection();
    }

    /// Replace the API categories and clear the categories loading flag
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.api_categories = categories
            .into_iter()
            .map(|c| c.name)
            .filter(|name| !name.is_empty())
            .collect();
        self.loading_categories = false;
        self.reconcile_selection();
    }

    /// Every loaded product, unfiltered
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product list still loading
    #[must_use]
    pub fn is_loading_products(&self) -> bool {
        self.loading_products
    }

    /// Either source still loading
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.loading_products || self.loading_categories
    }

    /// Both sources settled
    #[must_use]
    pub fn data_ready(&self) -> bool {
        !self.is_refreshing()
    }

    /// Ordered chip row
    #[must_use]
    pub fn chips(&self) -> Vec<String> {
        let from_products = derive_category_names(&self.products);
        build_ordered_chips(&self.api_categories, &from_products, &self.settings.menu)
    }

    /// Chips can be shown: data loaded and at least one chip
    #[must_use]
    pub fn chip_ready(&self) -> bool {
        self.data_ready() && !self.chips().is_empty()
    }

    /// Selected chip
    #[must_use]
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Select a chip; the choice is kept only if it names one once data is ready
    pub fn select(&mut self, category: impl Into<String>) {
        self.selected = category.into();
        self.reconcile_selection();
    }

    /// Current search term
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search term
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Drop the search term
    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Snap the selection onto an existing chip
    ///
    /// Does nothing while loading. Returns `true` when the selection changed.
    pub fn reconcile_selection(&mut self) -> bool {
        if !self.data_ready() {
            return false;
        }
        let chips = self.chips();
        if chips.is_empty() || includes_ci(&chips, &self.selected) {
            return false;
        }
        match preferred_selection(&chips, &self.selected, &self.settings.menu.default_category) {
            Some(next) => {
                self.selected = next.to_string();
                true
            }
            None => false,
        }
    }

    /// Active filter
    #[must_use]
    pub fn filter(&self) -> MenuFilter {
        MenuFilter::new(self.selected.clone(), self.search.clone())
    }

    /// Products passing the current selection and search
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.filter().apply(&self.products)
    }

    /// Cards for the visible products
    #[must_use]
    pub fn cards(&self) -> Vec<ProductCard> {
        let assets_dir = self.settings.display.assets_dir.as_ref().map(PathBuf::from);
        self.visible_products()
            .into_iter()
            .map(|p| ProductCard::from_product(p, assets_dir.as_deref(), self.settings.display.price_decimals))
            .collect()
    }

    /// Heading shown when no product passes the filter
    #[must_use]
    pub fn empty_state_title(&self) -> String {
        let label = if self.selected.is_empty() { ALL_CHIP } else { self.selected.as_str() };
        format!("No products in \u{201c}{label}\u{201d}")
    }

    /// Image shown for products without one
    #[must_use]
    pub fn placeholder_image(&self) -> &str {
        &self.settings.display.placeholder_image
    }
}
