//! The statically bundled product snapshot.
//!
//! Careers and FAQs have no snapshot; they degrade to empty catalogs in
//! [`crate::CatalogClient`].

use opto_catalog_core::content::model::{Catalog, Product};
use opto_catalog_core::content::normalize;

static PRODUCT_SNAPSHOT: &str = include_str!("product_snapshot.json");

/// Build-time snapshot of the product catalog, passed through the same
/// category canonicalization as live data.
pub fn product_snapshot() -> Catalog<Product> {
    let parsed: Catalog<Product> = match serde_json::from_str(PRODUCT_SNAPSHOT) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!("bundled product snapshot is malformed: {err}");
            Catalog::default()
        }
    };
    Catalog {
        de: parsed
            .de
            .into_iter()
            .map(normalize::canonicalize_product)
            .collect(),
        en: parsed
            .en
            .into_iter()
            .map(normalize::canonicalize_product)
            .collect(),
    }
}
