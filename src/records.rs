//! Source and warehouse record types
//!
//! Wire types mirror the product payload of the Shopify-style Admin REST API.
//! Deserialization is deliberately permissive: every field the sync does not
//! key on is optional with a default, so a sparse record never fails a page.

use chrono::NaiveDate;
use serde::Deserialize;

/// One page of the products collection, as returned by the source API
#[derive(Debug, Default, Deserialize)]
pub struct ProductsPage {
    /// Products on this page, in source order
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

/// A product as fetched from the source API
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    /// Product ID (natural key together with the snapshot date)
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// HTML description
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    /// URL handle
    #[serde(default)]
    pub handle: Option<String>,
    /// Tags arrive either comma-joined or as a list depending on API version
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Creation timestamp, passed through as-is
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// Product tags in either of the source's two representations
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    /// Already comma-joined (`"a, b"`)
    Joined(String),
    /// A list of tag strings (`["a", "b"]`)
    List(Vec<String>),
}

impl Default for Tags {
    fn default() -> Self {
        Self::Joined(String::new())
    }
}

/// A product variant; only the fields the sync consumes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Variant {
    /// Price, serialized by the source as a decimal string
    #[serde(default)]
    pub price: Option<String>,
    /// Compare-at price (original price if on sale)
    #[serde(default)]
    pub compare_at_price: Option<String>,
    /// Inventory on hand across locations
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

/// A product image; only the URL is carried into the warehouse
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductImage {
    /// Image URL
    #[serde(default)]
    pub src: String,
}

/// A normalized warehouse row
///
/// One row per [`RawProduct`]; `(id, snapshot_date)` is the natural key of
/// the sink table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: i64,
    pub snapshot_date: NaiveDate,
    pub title: Option<String>,
    pub body_html: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub handle: Option<String>,
    /// Comma-joined tag string
    pub tags: String,
    /// JSON array of image URLs, source order preserved
    pub images: String,
    /// First variant's price; 0.00 when the product has no variants
    pub price: f64,
    /// First variant's compare-at price; absent when not on sale or no variants
    pub compare_at_price: Option<f64>,
    /// Sum of inventory across all variants
    pub inventory_quantity: i64,
    pub created_at: Option<String>,
}
