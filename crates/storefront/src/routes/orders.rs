//! Quotes and order submission.
//!
//! Orders are not stored. Submission validates the customer data, builds the
//! cart through the reducer, and hands back everything the client needs to
//! forward the order: the message text, the click-to-chat URL and the print
//! links.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use la_comanda_core::{
    AdminStatus, CartAction, CartState, CustomerData, OrderType, OrderingSchedule, PrintData,
    Quote, ValidationError, catalog, message,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::json_body;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// One cart line as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub observations: String,
}

/// Body of `POST /quote`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub neighborhood: Option<String>,
}

/// Body of `POST /orders`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<ItemRequest>,
    pub customer_data: CustomerData,
}

/// Response of `POST /orders`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub message: String,
    pub whatsapp_url: String,
    pub quote: Quote,
    pub print_url: String,
    pub short_print_url: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Price a cart.
///
/// POST /quote
///
/// # Errors
///
/// Returns `AppError::Validation` for unknown or preview products.
pub async fn quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<Quote>> {
    let request = json_body(payload)?;
    let cart = build_cart(&request.items)?;
    let fees = state.config().business.delivery_fees;
    Ok(Json(fees.quote(
        &cart,
        request.order_type,
        request.neighborhood.as_deref(),
    )))
}

/// Validate an order and render it for the messaging channel.
///
/// POST /orders
///
/// # Errors
///
/// Returns `AppError::OrderingClosed` when the flag is off or the store is
/// outside its ordering hours, `AppError::Validation` for bad customer data
/// or cart lines.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>> {
    let request = json_body(payload)?;
    let business = &state.config().business;

    let status = match state.store().get().await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, "Status read failed, assuming ordering enabled");
            AdminStatus::default()
        }
    };
    let now = Utc::now().with_timezone(&business.utc_offset);
    if let Some(reason) = closed_reason(status, business.ordering_hours.as_ref(), &now) {
        return Err(AppError::OrderingClosed(reason));
    }

    let customer = request.customer_data.normalized();
    customer.validate()?;
    let cart = build_cart(&request.items)?;
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    let fees = business.delivery_fees;
    let quote = fees.quote(&cart, customer.order_type, customer.neighborhood());
    let text = message::render(&business.name, &cart, &customer, &fees);
    let whatsapp_url = message::whatsapp_url(&business.whatsapp_number, &text);

    let snapshot = PrintData::new(customer, &cart, quote);
    let encoded = snapshot
        .encode()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let base_url = &state.config().base_url;
    let print_url = format!("{base_url}/print?data={encoded}");
    let reference = state.print_refs().insert(snapshot).await;
    let short_print_url = format!("{base_url}/print/{reference}");

    tracing::info!(
        items = cart.len(),
        total = %quote.total,
        reference = %reference,
        "Order formatted"
    );
    add_breadcrumb("order", "Order formatted", Some(&[("reference", reference.as_str())]));

    Ok(Json(OrderResponse {
        success: true,
        message: text,
        whatsapp_url,
        quote,
        print_url,
        short_print_url,
    }))
}

// =============================================================================
// Helpers
// =============================================================================

/// Build a cart from submitted lines, resolving products against the catalog.
///
/// # Errors
///
/// Returns `ValidationError::UnknownProduct` or `ValidationError::NotOrderable`.
pub fn build_cart(items: &[ItemRequest]) -> std::result::Result<CartState, ValidationError> {
    items.iter().try_fold(CartState::new(), |cart, item| {
        let product = catalog::find(&item.product_id)
            .ok_or_else(|| ValidationError::UnknownProduct(item.product_id.clone()))?;
        if !product.is_orderable() {
            return Err(ValidationError::NotOrderable(product.name.clone()));
        }
        Ok(cart.reduce(CartAction::AddItem {
            product: product.clone(),
            observations: item.observations.clone(),
        }))
    })
}

/// Why ordering is closed at `now`, or `None` when it is open.
pub fn closed_reason<Tz: chrono::TimeZone>(
    status: AdminStatus,
    schedule: Option<&OrderingSchedule>,
    now: &DateTime<Tz>,
) -> Option<String> {
    if !status.ordering_enabled {
        return Some("Los pedidos están pausados en este momento".to_string());
    }
    match schedule {
        Some(schedule) if !schedule.is_open(now) => {
            Some(format!("Fuera del horario de pedidos ({schedule})"))
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use la_comanda_core::Price;

    use super::*;

    fn item(id: &str, observations: &str) -> ItemRequest {
        ItemRequest {
            product_id: id.to_string(),
            observations: observations.to_string(),
        }
    }

    #[test]
    fn test_build_cart_preserves_order_and_observations() {
        let cart = build_cart(&[item("1", ""), item("7", "bien crocantes"), item("1", "")]).unwrap();
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.items()[1].product.id, "7");
        assert_eq!(cart.items()[1].observations(), Some("bien crocantes"));
        assert_eq!(cart.subtotal(), Price::new(24000));
    }

    #[test]
    fn test_build_cart_rejects_unknown_and_preview() {
        assert_eq!(
            build_cart(&[item("99", "")]).unwrap_err(),
            ValidationError::UnknownProduct("99".to_string())
        );
        assert!(matches!(
            build_cart(&[item("8", "")]).unwrap_err(),
            ValidationError::NotOrderable(_)
        ));
    }

    #[test]
    fn test_closed_reason() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        // 2026-10-15 is a Thursday
        let thursday_night = offset.with_ymd_and_hms(2026, 10, 15, 21, 0, 0).unwrap();
        let monday_night = offset.with_ymd_and_hms(2026, 10, 19, 21, 0, 0).unwrap();
        let schedule: OrderingSchedule = "thu,fri,sat,sun 20:30-23:49".parse().unwrap();

        let open = AdminStatus::default();
        let paused = AdminStatus {
            ordering_enabled: false,
            ..AdminStatus::default()
        };

        assert_eq!(closed_reason(open, None, &monday_night), None);
        assert_eq!(closed_reason(open, Some(&schedule), &thursday_night), None);
        assert!(closed_reason(open, Some(&schedule), &monday_night).is_some());
        assert!(closed_reason(paused, Some(&schedule), &thursday_night).is_some());
    }

    #[test]
    fn test_quote_request_defaults() {
        let request: QuoteRequest = serde_json::from_str(r#"{"items":[{"productId":"1"}]}"#).unwrap();
        assert_eq!(request.order_type, OrderType::Pickup);
        assert!(request.neighborhood.is_none());
        assert_eq!(request.items[0].observations, "");
    }
}
