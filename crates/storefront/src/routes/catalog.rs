//! Product catalog.

use axum::Json;
use la_comanda_core::Product;
use serde::Serialize;

/// Catalog entry as served to clients.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub product: &'static Product,
    /// `false` for preview products that cannot be added to a cart.
    pub orderable: bool,
}

/// List the catalog in display order.
///
/// GET /catalog
pub async fn index() -> Json<Vec<CatalogEntry>> {
    Json(
        la_comanda_core::catalog::catalog()
            .iter()
            .map(|product| CatalogEntry {
                product,
                orderable: product.is_orderable(),
            })
            .collect(),
    )
}
