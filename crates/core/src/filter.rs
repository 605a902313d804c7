//! Category and name filtering

use crate::catalog::Product;
use crate::chips::ALL_CHIP;

/// Visitor-selected category plus free-text search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    /// Selected chip; empty or `All` disables category filtering
    pub category: String,
    /// Case-insensitive substring matched against product names
    pub search: String,
}

impl MenuFilter {
    /// Filter for a chip and a search term
    pub fn new(category: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            search: search.into(),
        }
    }

    /// Whether `product` passes both the category and the search filter
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category_matches(product) && self.search_matches(product)
    }

    fn category_matches(&self, product: &Product) -> bool {
        if self.category.is_empty() || self.category == ALL_CHIP {
            return true;
        }
        product.category_name().to_lowercase() == self.category.to_lowercase()
    }

    fn search_matches(&self, product: &Product) -> bool {
        product
            .search_name()
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }

    /// Products passing the filter, in catalog order
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, category: &str) -> Product {
        Product {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            ..Product::default()
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Iced Latte", "Coffee"),
            product("Cheeseburger", " burger "),
            product("Latte Macchiato", "coffee"),
            product("Lager", "Beer"),
        ]
    }

    #[test]
    fn test_all_and_empty_category_pass_everything() {
        let products = catalog();
        assert_eq!(MenuFilter::new("All", "").apply(&products).len(), 4);
        assert_eq!(MenuFilter::new("", "").apply(&products).len(), 4);
    }

    #[test]
    fn test_category_is_case_insensitive_and_trimmed() {
        let products = catalog();
        let burgers = MenuFilter::new("Burger", "").apply(&products);
        assert_eq!(burgers.len(), 1);
        assert_eq!(burgers[0].display_name(), "Cheeseburger");

        assert_eq!(MenuFilter::new("COFFEE", "").apply(&products).len(), 2);
    }

    #[test]
    fn test_search_combines_with_category() {
        let products = catalog();
        let hits = MenuFilter::new("Coffee", "LATTE").apply(&products);
        assert_eq!(hits.len(), 2);

        let hits = MenuFilter::new("All", "lag").apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name(), "Lager");
    }

    #[test]
    fn test_unnamed_product_only_matches_empty_search() {
        let products = vec![Product::default()];
        assert!(MenuFilter::new("All", "").matches(&products[0]));
        assert!(!MenuFilter::new("All", "untitled").matches(&products[0]));
    }

    #[test]
    fn test_lowercase_all_is_a_category() {
        let products = catalog();
        assert!(MenuFilter::new("all", "").apply(&products).is_empty());
    }
}
