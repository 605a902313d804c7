//! Product image references
//!
//! Menu editors paste all sorts of Google Drive links into the backend.
//! Everything that identifies a Drive file is rewritten to the direct-view
//! form; anything else is left for the caller to resolve.

use crate::catalog::Product;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

const DRIVE_VIEW_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";
const DRIVE_ORIGIN: &str = "https://drive.google.com/";

static ABSOLUTE_HTTP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").unwrap());
static OPEN_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)").unwrap());
static FILE_D: Lazy<Regex> = Lazy::new(|| Regex::new(r"/file/d/([a-zA-Z0-9_-]+)/").unwrap());
static BARE_FILE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{20,}$").unwrap());

fn is_absolute(url: &str) -> bool {
    ABSOLUTE_HTTP.is_match(url) || url.starts_with("data:")
}

/// Return absolute http(s) and `data:` URLs unchanged, and anything else raw
#[must_use]
pub fn drive_share_to_direct(url: &str) -> String {
    url.to_string()
}

/// Rewrite Drive links to a fully-qualified direct-view URL
///
/// Accepts `file/d/<id>/view` and `open?id=<id>` share links, `uc?export=...`
/// links missing their domain, and bare file ids. Other input, including
/// relative asset paths like `coffee/latte.jpg`, is returned trimmed.
#[must_use]
pub fn normalize_image_url(input: &str) -> String {
    let u = input.trim();
    if u.is_empty() {
        return String::new();
    }

    if ABSOLUTE_HTTP.is_match(u) {
        if let Some(id) = OPEN_ID.captures(u).or_else(|| FILE_D.captures(u)) {
            return format!("{DRIVE_VIEW_PREFIX}{}", &id[1]);
        }
        return u.to_string();
    }

    if u.starts_with("uc?") {
        return format!("{DRIVE_ORIGIN}{u}");
    }

    if BARE_FILE_ID.is_match(u) {
        return format!("{DRIVE_VIEW_PREFIX}{u}");
    }

    u.to_string()
}

/// Where a product card's image comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum ImageSource {
    /// Absolute http(s) or `data:` URL
    Remote(String),
    /// File found in the local assets directory
    Local(PathBuf),
    /// Relative reference that could not be resolved locally
    Unresolved(String),
    /// No image reference at all
    Placeholder,
}

impl ImageSource {
    /// Location string for display, using `placeholder` when there is none
    #[must_use]
    pub fn display<'a>(&'a self, placeholder: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            Self::Remote(url) | Self::Unresolved(url) => url.as_str().into(),
            Self::Local(path) => path.to_string_lossy(),
            Self::Placeholder => placeholder.into(),
        }
    }
}

/// Resolve a product's image reference
pub fn resolve_image_source(product: &Product, assets_dir: Option<&Path>) -> ImageSource {
    let Some(raw) = product.image_ref() else {
        return ImageSource::Placeholder;
    };

    let normalized = normalize_image_url(raw);
    if normalized.is_empty() {
        return ImageSource::Placeholder;
    }
    if is_absolute(&normalized) {
        return ImageSource::Remote(normalized);
    }

    let relative = normalized.trim_start_matches("./");
    match assets_dir.map(|dir| dir.join(relative)) {
        Some(path) if path.is_file() => ImageSource::Local(path),
        _ => ImageSource::Unresolved(normalized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FILE_ID: &str = "1AbCdEfGhIjKlMnOpQrStUv";

    #[test]
    fn test_file_d_share_link() {
        let url = format!("https://drive.google.com/file/d/{FILE_ID}/view?usp=sharing");
        assert_eq!(normalize_image_url(&url), format!("{DRIVE_VIEW_PREFIX}{FILE_ID}"));
    }

    #[test]
    fn test_open_id_link() {
        let url = format!("https://drive.google.com/open?id={FILE_ID}");
        assert_eq!(normalize_image_url(&url), format!("{DRIVE_VIEW_PREFIX}{FILE_ID}"));
    }

    #[test]
    fn test_uc_without_domain() {
        let url = format!("uc?export=view&id={FILE_ID}");
        assert_eq!(normalize_image_url(&url), format!("{DRIVE_VIEW_PREFIX}{FILE_ID}"));
    }

    #[test]
    fn test_bare_file_id() {
        assert_eq!(
            normalize_image_url(&format!("  {FILE_ID}  ")),
            format!("{DRIVE_VIEW_PREFIX}{FILE_ID}")
        );
    }

    #[test]
    fn test_other_inputs_unchanged() {
        assert_eq!(normalize_image_url(""), "");
        assert_eq!(normalize_image_url("   "), "");
        assert_eq!(normalize_image_url("coffee/latte.jpg"), "coffee/latte.jpg");
        assert_eq!(normalize_image_url("short_id"), "short_id");
        assert_eq!(
            normalize_image_url("HTTPS://cdn.example.com/a.png"),
            "HTTPS://cdn.example.com/a.png"
        );
        assert_eq!(normalize_image_url("data:image/png;base64,AAA"), "data:image/png;base64,AAA");
    }

    #[test]
    fn test_drive_share_to_direct_passthrough() {
        assert_eq!(drive_share_to_direct(""), "");
        assert_eq!(drive_share_to_direct("https://x.test/a.png"), "https://x.test/a.png");
        assert_eq!(drive_share_to_direct("coffee/latte.jpg"), "coffee/latte.jpg");
    }

    #[test]
    fn test_resolve_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("coffee")).unwrap();
        std::fs::write(dir.path().join("coffee/latte.jpg"), b"jpg").unwrap();

        let mut product = Product::default();
        assert_eq!(resolve_image_source(&product, Some(dir.path())), ImageSource::Placeholder);

        product.image_url = Some("coffee/latte.jpg".to_string());
        assert_eq!(
            resolve_image_source(&product, Some(dir.path())),
            ImageSource::Local(dir.path().join("coffee/latte.jpg"))
        );
        assert_eq!(
            resolve_image_source(&product, None),
            ImageSource::Unresolved("coffee/latte.jpg".to_string())
        );

        product.image_url = Some(FILE_ID.to_string());
        assert_eq!(
            resolve_image_source(&product, None),
            ImageSource::Remote(format!("{DRIVE_VIEW_PREFIX}{FILE_ID}"))
        );
    }

    #[test]
    fn test_placeholder_display() {
        assert_eq!(ImageSource::Placeholder.display("na.png"), "na.png");
        assert_eq!(ImageSource::Remote("https://a".into()).display("na.png"), "https://a");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(input in "[ -~]{0,60}") {
            // `uc?id=...` gains a domain first and an `export=view` second
            prop_assume!(!input.trim().starts_with("uc?"));
            let once = normalize_image_url(&input);
            prop_assert_eq!(normalize_image_url(&once), once.clone());
        }

        #[test]
        fn bare_ids_become_drive_links(id in "[a-zA-Z0-9_-]{20,40}") {
            prop_assert_eq!(normalize_image_url(&id), format!("{DRIVE_VIEW_PREFIX}{id}"));
        }
    }
}
