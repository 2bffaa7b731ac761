//! Record normalization
//!
//! Pure mapping from source products to warehouse rows. No I/O and no
//! failure path: missing fields are absorbed by defaults so one sparse
//! product can never sink a run.

use crate::records::{ProductImage, ProductRow, RawProduct, Tags};
use chrono::NaiveDate;

/// Normalize a fetched product set into warehouse rows
///
/// Produces exactly one row per product, all tagged with `snapshot_date`.
/// The date is computed once per run by the orchestrator and threaded
/// through here so every phase of a run agrees on it.
pub fn normalize(products: &[RawProduct], snapshot_date: NaiveDate) -> Vec<ProductRow> {
    products
        .iter()
        .map(|product| normalize_one(product, snapshot_date))
        .collect()
}

fn normalize_one(product: &RawProduct, snapshot_date: NaiveDate) -> ProductRow {
    let first_variant = product.variants.first();

    ProductRow {
        id: product.id,
        snapshot_date,
        title: product.title.clone(),
        body_html: product.body_html.clone(),
        vendor: product.vendor.clone(),
        product_type: product.product_type.clone(),
        handle: product.handle.clone(),
        tags: join_tags(&product.tags),
        images: image_urls_json(&product.images),
        price: first_variant
            .and_then(|v| parse_price(v.price.as_deref()))
            .unwrap_or(0.0),
        compare_at_price: first_variant.and_then(|v| parse_price(v.compare_at_price.as_deref())),
        inventory_quantity: product
            .variants
            .iter()
            .map(|v| v.inventory_quantity.unwrap_or(0))
            .sum(),
        created_at: product.created_at.clone(),
    }
}

/// Collapse either tag representation into one comma-joined string
pub fn join_tags(tags: &Tags) -> String {
    match tags {
        Tags::Joined(s) => s.clone(),
        Tags::List(list) => list.join(", "),
    }
}

/// Serialize image URLs to a JSON array string, preserving source order
pub fn image_urls_json(images: &[ProductImage]) -> String {
    let urls: Vec<&str> = images.iter().map(|image| image.src.as_str()).collect();
    serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a source decimal-string price
fn parse_price(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse().ok())
}
