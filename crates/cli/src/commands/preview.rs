//! Offline order preview.
//!
//! Renders the order message and the print ticket for an order file without
//! contacting the storefront.
//!
//! # Usage
//!
//! ```bash
//! lc-cli preview --file order.json
//! lc-cli preview --file order.json --whatsapp 5493772406996
//! ```
//!
//! # File Format
//!
//! ```json
//! {
//!   "items": [{ "productId": "1", "observations": "sin cebolla" }],
//!   "customerData": {
//!     "name": "Juan", "phone": "3772406996",
//!     "paymentMethod": "efectivo", "orderType": "pickup"
//!   }
//! }
//! ```

use std::path::Path;

use la_comanda_core::{
    CartAction, CartState, CustomerData, DeliveryFees, PrintData, Ticket, ValidationError,
    catalog, message,
};
use serde::Deserialize;
use thiserror::Error;

/// Errors building a preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Order file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Order file is not valid JSON for an order.
    #[error("Invalid order file: {0}")]
    Json(#[from] serde_json::Error),

    /// Order data rejected.
    #[error("Invalid order: {0}")]
    Validation(#[from] ValidationError),
}

/// One cart line in an order file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    #[serde(default)]
    pub observations: String,
}

/// Contents of an order file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFile {
    pub items: Vec<OrderLine>,
    pub customer_data: CustomerData,
}

/// Rendered preview.
#[derive(Debug)]
pub struct Preview {
    pub message: String,
    pub ticket: String,
}

/// Build the preview for an order.
///
/// # Errors
///
/// Returns `PreviewError::Validation` for bad customer data, an empty cart,
/// or products that are unknown or not orderable.
pub fn build(order: OrderFile, business: &str, fees: &DeliveryFees) -> Result<Preview, PreviewError> {
    let customer = order.customer_data.normalized();
    customer.validate()?;

    let mut cart = CartState::new();
    for line in order.items {
        let product = catalog::find(&line.product_id)
            .ok_or_else(|| ValidationError::UnknownProduct(line.product_id.clone()))?;
        if !product.is_orderable() {
            return Err(ValidationError::NotOrderable(product.name.clone()).into());
        }
        cart = cart.reduce(CartAction::AddItem {
            product: product.clone(),
            observations: line.observations,
        });
    }
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart.into());
    }

    let text = message::render(business, &cart, &customer, fees);
    let quote = fees.quote(&cart, customer.order_type, customer.neighborhood());
    let ticket = Ticket::from_print_data(business, &PrintData::new(customer, &cart, quote));

    Ok(Preview {
        message: text,
        ticket: ticket.to_string(),
    })
}

/// Read an order file and print its message and ticket.
///
/// # Errors
///
/// Returns `PreviewError` if the file cannot be read or the order is invalid.
pub fn run(file: &Path, business: &str, whatsapp: Option<&str>) -> Result<(), PreviewError> {
    let raw = std::fs::read_to_string(file).map_err(|source| PreviewError::Io {
        path: file.display().to_string(),
        source,
    })?;
    let order: OrderFile = serde_json::from_str(&raw)?;
    let preview = build(order, business, &DeliveryFees::default())?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", preview.message);
        println!();
        if let Some(number) = whatsapp {
            println!("{}", message::whatsapp_url(number, &preview.message));
            println!();
        }
        print!("{}", preview.ticket);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(json: &str) -> OrderFile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_preview_pickup_order() {
        let preview = build(
            order(
                r#"{
                    "items": [
                        {"productId": "1"},
                        {"productId": "1", "observations": "sin cebolla"}
                    ],
                    "customerData": {
                        "name": "Juan", "phone": "3772406996",
                        "paymentMethod": "efectivo", "orderType": "pickup"
                    }
                }"#,
            ),
            "LA COMANDA",
            &DeliveryFees::default(),
        )
        .unwrap();

        assert!(preview.message.contains("*Resumen:* 2x Argenta\n"));
        assert!(preview.message.contains("2. Argenta - sin cebolla ($8500)\n"));
        assert!(preview.message.contains("*Total:* 8500+8500=17000\n"));
        assert!(preview.ticket.starts_with("LA COMANDA - PEDIDO\n"));
    }

    #[test]
    fn test_preview_rejects_empty_and_preview_products() {
        let customer = r#""customerData": {
            "name": "Juan", "phone": "1",
            "paymentMethod": "tarjeta", "orderType": "pickup"
        }"#;

        let empty = order(&format!(r#"{{"items": [], {customer}}}"#));
        assert!(matches!(
            build(empty, "LA COMANDA", &DeliveryFees::default()),
            Err(PreviewError::Validation(ValidationError::EmptyCart))
        ));

        let preview_only = order(&format!(r#"{{"items": [{{"productId": "8"}}], {customer}}}"#));
        assert!(matches!(
            build(preview_only, "LA COMANDA", &DeliveryFees::default()),
            Err(PreviewError::Validation(ValidationError::NotOrderable(_)))
        ));
    }

    #[test]
    fn test_preview_delivery_requires_address() {
        let delivery = order(
            r#"{
                "items": [{"productId": "2"}],
                "customerData": {
                    "name": "Juan", "phone": "1",
                    "paymentMethod": "efectivo", "orderType": "delivery"
                }
            }"#,
        );
        assert!(matches!(
            build(delivery, "LA COMANDA", &DeliveryFees::default()),
            Err(PreviewError::Validation(ValidationError::MissingAddress))
        ));
    }
}
