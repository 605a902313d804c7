//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// Category selection and chip ordering
    #[serde(default)]
    pub menu: MenuConfig,

    /// Price and image presentation
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Category chip rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Category selected when the menu first loads
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Categories pinned to the front of the chip row, in order
    #[serde(default = "default_primary_categories")]
    pub primary_categories: Vec<String>,

    /// Chips shown when neither the API nor the products name any category
    #[serde(default = "default_fallback_categories")]
    pub fallback_categories: Vec<String>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            primary_categories: default_primary_categories(),
            fallback_categories: default_fallback_categories(),
        }
    }
}

fn default_category() -> String {
    "Coffee".to_string()
}

fn default_primary_categories() -> Vec<String> {
    vec!["Coffee".to_string(), "Burger".to_string()]
}

fn default_fallback_categories() -> Vec<String> {
    ["Coffee", "Drink", "Burger", "Beer", "Patisserie", "Matcha"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

/// Product card rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show prices with two decimal places
    #[serde(default = "default_price_decimals")]
    pub price_decimals: bool,

    /// Directory that relative image paths are resolved against
    #[serde(default)]
    pub assets_dir: Option<String>,

    /// Shown in place of a missing product image
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            price_decimals: default_price_decimals(),
            assets_dir: None,
            placeholder_image: default_placeholder_image(),
        }
    }
}

fn default_price_decimals() -> bool {
    true
}

fn default_placeholder_image() -> String {
    "not-available.png".to_string()
}
