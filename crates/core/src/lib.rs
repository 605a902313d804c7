//! Core catalog and presentation logic for the menu display
//!
//! This crate holds everything the menu needs that is not HTTP:
//!
//! - **Catalog**: lenient decoding of products, categories and list envelopes
//! - **Chips**: category chip derivation, ordering and selection
//! - **Filtering**: category plus name search
//! - **Images**: Google Drive link normalization and local asset resolution
//! - **Money**: Indonesian Rupiah formatting
//! - **Menu view**: the state behind the menu screen
//! - **Configuration**: TOML settings with validation
//!
//! # Example
//!
//! ```rust
//! use menu_core::catalog::decode_list;
//! use menu_core::config::ConfigSchema;
//! use menu_core::menu::MenuView;
//!
//! let products = decode_list(r#"[{"_id": "1", "name": "Latte", "category": "Coffee", "price": 32000}]"#)?;
//! let mut view = MenuView::new(ConfigSchema::default());
//! view.set_products(products);
//! view.set_categories(Vec::new());
//!
//! assert_eq!(view.cards()[0].price, "Rp\u{a0}32.000,00");
//! # Ok::<(), menu_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod chips;
pub mod config;
pub mod error;
pub mod filter;
pub mod image;
pub mod menu;
pub mod money;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{Category, ListEnvelope, Product, decode_list};
    pub use crate::chips::{ALL_CHIP, build_ordered_chips, derive_category_names};
    pub use crate::config::{Config, ConfigSchema, DisplayConfig, MenuConfig};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt, exit_codes};
    pub use crate::filter::MenuFilter;
    pub use crate::image::{ImageSource, normalize_image_url};
    pub use crate::menu::{MenuView, ProductCard};
    pub use crate::money::format_idr;
}
