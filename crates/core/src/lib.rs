//! Shelf core types: products, catalog snapshot, view state and errors.

#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod columns;
pub mod error;
pub mod images;
pub mod source;

pub use error::{ImageDecodeError, LoadError, ViewError};
pub use images::RawImages;
pub use source::CatalogSource;

/// Page sizes a front end offers for selection. The pipeline itself accepts any size >= 1.
pub const ALLOWED_PAGE_SIZES: [usize; 3] = [10, 20, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Opaque product identifier, kept as the raw JSON scalar the API returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct ProductId(pub serde_json::Value);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            serde_json::Value::Null => f.write_str("-"),
            other => write!(f, "{}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Category {
    pub name: Option<String>,
    /// Remaining category fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    /// Normalized image URLs; empty when the raw field was absent or malformed.
    pub images: Vec<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// Shape a raw API record into a product.
    ///
    /// Never fails: a missing or mistyped `title`/`price` degrades to `""`/`0.0`
    /// and the image field goes through [`images::normalize`].
    pub fn from_raw(raw: serde_json::Value) -> Self {
        let mut obj = match raw {
            serde_json::Value::Object(map) => map,
            other => {
                warn!(kind = json_kind(&other), "catalog record is not an object; keeping an empty row");
                serde_json::Map::new()
            }
        };
        let id = ProductId(obj.remove("id").unwrap_or(serde_json::Value::Null));
        let title = match obj.remove("title") {
            Some(serde_json::Value::String(s)) => s,
            other => {
                warn!(id = %id, found = other.as_ref().map(json_kind).unwrap_or("missing"), "record title is not a string");
                String::new()
            }
        };
        let price = match obj.remove("price") {
            Some(v) if v.is_number() => v.as_f64().unwrap_or(0.0),
            other => {
                warn!(id = %id, found = other.as_ref().map(json_kind).unwrap_or("missing"), "record price is not a number");
                0.0
            }
        };
        let images = images::normalize(&RawImages::from_json(obj.remove("images").as_ref()));
        let category = match obj.remove("category") {
            Some(serde_json::Value::Object(mut c)) => {
                let name = match c.remove("name") {
                    Some(serde_json::Value::String(s)) => Some(s),
                    _ => None,
                };
                Some(Category { name, extra: c })
            }
            _ => None,
        };
        let description = match obj.remove("description") {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        };
        Self { id, title, price, images, category, description, extra: obj }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name.as_deref()).filter(|n| !n.is_empty())
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Immutable catalog snapshot. A reload replaces it wholesale with a higher epoch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub epoch: u64,
    /// Unix seconds of the load that produced this snapshot; 0 for the initial empty catalog.
    pub loaded_at: i64,
    pub items: Vec<Product>,
}

impl Catalog {
    pub fn from_items(items: Vec<Product>) -> Self {
        Self { epoch: 1, loaded_at: 0, items }
    }

    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [SortKey::None, SortKey::PriceAsc, SortKey::PriceDesc, SortKey::NameAsc, SortKey::NameDesc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == norm || k.as_str().replace('-', "") == norm)
            .ok_or_else(|| format!("unknown sort key: {} (expect none, price-asc, price-desc, name-asc, name-desc)", s))
    }
}

/// The mutable view parameters. Owned by a pipeline, never shared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub sort: SortKey,
    pub page_size: usize,
    /// 1-based.
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { query: String::new(), sort: SortKey::None, page_size: DEFAULT_PAGE_SIZE, current_page: 1 }
    }
}

/// Display metadata for pager controls and the "showing X - Y of N" caption.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: usize,
    pub total_pages: usize,
    pub display_start: usize,
    pub display_end: usize,
    pub total_count: usize,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self { current_page: 1, total_pages: 1, display_start: 0, display_end: 0, total_count: 0 }
    }
}

pub mod prelude {
    pub use super::{
        Catalog, CatalogSource, Category, LoadError, PageMeta, Product, ProductId, RawImages, SortKey, ViewError,
        ViewState,
    };
}
