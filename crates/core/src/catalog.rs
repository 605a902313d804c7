//! Catalog entities as served by the backend
//!
//! The backend is loosely typed: identifiers may be strings or numbers,
//! prices may arrive as numeric strings, and list endpoints answer either a
//! bare array or an `{ "items": [...] }` object. Decoding here is lenient so
//! a single odd record never blanks the whole menu.

use crate::error::{Error, Result};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name shown for products without one
pub const UNTITLED: &str = "Untitled";

/// A product on the menu
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Document id (`_id`), preferred identifier
    #[serde(rename = "_id", default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Plain `id`
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stock keeping unit, last-resort identifier
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Display name
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short description under the name
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in rupiah; numeric strings are accepted
    #[serde(default, deserialize_with = "lenient_price", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Category name, untrimmed as sent
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Image reference (`imageUrl`), preferred over `image`
    #[serde(rename = "imageUrl", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Legacy image reference
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Stable identifier: `_id`, then `id`, then `sku`
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.object_id
            .as_deref()
            .or(self.id.as_deref())
            .or(self.sku.as_deref())
    }

    /// Name for display, falling back to [`UNTITLED`]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNTITLED)
    }

    /// Name used for search matching (empty when absent)
    #[must_use]
    pub fn search_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Description for display, empty when absent
    #[must_use]
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Trimmed category name, empty when absent
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Price as a finite number, zero when missing or unparsable
    #[must_use]
    pub fn price_value(&self) -> f64 {
        self.price.filter(|p| p.is_finite()).unwrap_or(0.0)
    }

    /// Raw image reference: `imageUrl`, then `image`
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        self.image_url.as_deref().or(self.image.as_deref())
    }
}

/// A menu category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCategory")]
pub struct Category {
    /// Identifier: `_id`, then `id`
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Category name, empty when absent
    pub name: String,
}

#[derive(Deserialize)]
struct RawCategory {
    #[serde(rename = "_id", default, deserialize_with = "lenient_id")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        Self {
            id: raw.object_id.or(raw.id),
            name: raw.name.unwrap_or_default(),
        }
    }
}

/// Records of a list endpoint
///
/// Accepts a bare array or an `{ "items": [...] }` object; any other shape
/// holds no records. Each element decodes on its own, so an element that is
/// not a usable record (`null`, a number) becomes `T::default()` instead of
/// failing the whole list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEnvelope<T> {
    items: Vec<T>,
}

impl<T> ListEnvelope<T> {
    /// Decoded records in payload order
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for ListEnvelope<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for ListEnvelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let records = match Value::deserialize(deserializer)? {
            Value::Array(records) => records,
            Value::Object(mut body) => match body.remove("items") {
                Some(Value::Array(records)) => records,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        let items = records
            .into_iter()
            .map(|record| serde_json::from_value(record).unwrap_or_default())
            .collect();
        Ok(Self { items })
    }
}

/// Decode a list payload from JSON text
///
/// Only malformed JSON is an error; a well-formed payload of the wrong shape
/// yields an empty list.
pub fn decode_list<T: DeserializeOwned + Default>(json: &str) -> Result<Vec<T>> {
    let envelope: ListEnvelope<T> = serde_json::from_str(json)
        .map_err(|e| Error::invalid_payload(format!("Malformed catalog JSON: {e}")).with_source(e))?;
    Ok(envelope.into_items())
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
