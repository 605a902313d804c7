//! Category chip derivation
//!
//! Chips come from two sources, the `/categories` endpoint and the
//! categories products actually carry. Names are merged case-insensitively,
//! pinned categories go first, and an `All` chip leads whenever there is a
//! real choice to make.

use crate::catalog::Product;
use crate::config::MenuConfig;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Label of the chip that disables category filtering
pub const ALL_CHIP: &str = "All";

/// Distinct, trimmed, non-empty product categories in first-seen order
#[must_use]
pub fn derive_category_names(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .map(Product::category_name)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .map(String::from)
        .collect()
}

/// Case-insensitive membership test
#[must_use]
pub fn includes_ci<S: AsRef<str>>(names: &[S], name: &str) -> bool {
    find_ci(names, name).is_some()
}

fn find_ci<'a, S: AsRef<str>>(names: &'a [S], name: &str) -> Option<&'a str> {
    let needle = name.to_lowercase();
    names
        .iter()
        .map(AsRef::as_ref)
        .find(|n| n.to_lowercase() == needle)
}

/// Build the ordered chip row
///
/// API names win over product names when both spell the same category
/// differently. When neither source names anything the configured fallback
/// list is used.
#[must_use]
pub fn build_ordered_chips<A, P>(api_categories: &[A], product_categories: &[P], rules: &MenuConfig) -> Vec<String>
where
    A: AsRef<str>,
    P: AsRef<str>,
{
    let mut merged = ChipSet::default();
    api_categories.iter().for_each(|n| merged.add(n.as_ref()));
    product_categories.iter().for_each(|n| merged.add(n.as_ref()));

    if merged.is_empty() {
        rules.fallback_categories.iter().for_each(|n| merged.add(n));
    }

    let all_names = merged.into_names();

    let primary: Vec<String> = rules
        .primary_categories
        .iter()
        .filter_map(|p| find_ci(&all_names, p))
        .map(String::from)
        .collect();

    let mut rest: Vec<String> = all_names
        .iter()
        .filter(|n| !includes_ci(&primary, n))
        .cloned()
        .collect();
    rest.sort_by(|a, b| locale_cmp(a, b));

    let ordered: Vec<String> = primary.into_iter().chain(rest).collect();
    if ordered.len() > 1 {
        std::iter::once(ALL_CHIP.to_string()).chain(ordered).collect()
    } else {
        ordered
    }
}

/// Chip the menu should show as selected
///
/// Keeps `current` when it names a chip; otherwise prefers the configured
/// default category, then the first chip. Returns `None` when there are no
/// chips to choose from.
#[must_use]
pub fn preferred_selection<'a>(chips: &'a [String], current: &str, default_category: &str) -> Option<&'a str> {
    if let Some(existing) = find_ci(chips, current) {
        return Some(existing);
    }
    find_ci(chips, default_category).or_else(|| chips.first().map(String::as_str))
}

fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Insertion-ordered set keyed by lowercase name
#[derive(Default)]
struct ChipSet {
    keys: HashSet<String>,
    names: Vec<String>,
}

impl ChipSet {
    fn add(&mut self, name: &str) {
        let clean = name.trim();
        if clean.is_empty() {
            return;
        }
        if self.keys.insert(clean.to_lowercase()) {
            self.names.push(clean.to_string());
        }
    }

    fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn into_names(self) -> Vec<String> {
        self.names
    }
}
