//! Serializable order snapshot for print tickets.
//!
//! A snapshot carries everything a ticket needs, including the totals as they
//! were computed at submission time, so printing never re-prices an order.
//! Snapshots travel either inline in a URL (URL-safe base64 of the JSON) or
//! behind a short reference held by the server.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::cart::{CartItem, CartState};
use crate::pricing::Quote;
use crate::types::{CustomerData, Price};

/// Errors decoding an inline snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PrintDataError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Order snapshot used to render a print ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintData {
    pub customer_data: CustomerData,
    pub cart_items: Vec<CartItem>,
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

impl PrintData {
    /// Capture a snapshot of a submitted order.
    #[must_use]
    pub fn new(customer_data: CustomerData, cart: &CartState, quote: Quote) -> Self {
        Self {
            customer_data,
            cart_items: cart.items().to_vec(),
            subtotal: quote.subtotal,
            delivery_fee: quote.delivery_fee,
            total: quote.total,
        }
    }

    /// Encode for embedding in a URL query parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized.
    pub fn encode(&self) -> Result<String, PrintDataError> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a snapshot produced by [`PrintData::encode`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid base64 or does not hold a
    /// snapshot.
    pub fn decode(encoded: &str) -> Result<Self, PrintDataError> {
        let bytes = URL_SAFE_NO_PAD.decode(encoded.trim().trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartAction;
    use crate::catalog;
    use crate::pricing::DeliveryFees;
    use crate::types::{Address, OrderType, PaymentMethod};

    fn snapshot() -> PrintData {
        let cart = CartState::new()
            .reduce(CartAction::AddItem {
                product: catalog::find("6").unwrap().clone(),
                observations: "sin coleslaw, pan aparte".to_string(),
            })
            .reduce(CartAction::AddItem {
                product: catalog::find("7").unwrap().clone(),
                observations: String::new(),
            });
        let customer = CustomerData {
            name: "Ñandú Pérez".to_string(),
            phone: "3772 40-6996".to_string(),
            payment_method: PaymentMethod::Tarjeta,
            order_type: OrderType::Delivery,
            address: Some(Address {
                street: "Belgrano".to_string(),
                number: "1215".to_string(),
                between: Some("Mitre y España".to_string()),
                neighborhood: None,
            }),
            general_observations: "timbre roto".to_string(),
        };
        let quote = DeliveryFees::default().quote(&cart, customer.order_type, customer.neighborhood());
        PrintData::new(customer, &cart, quote)
    }

    #[test]
    fn test_encode_decode_reproduces_snapshot() {
        let data = snapshot();
        let encoded = data.encode().unwrap();
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(PrintData::decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            PrintData::decode("%%%"),
            Err(PrintDataError::Base64(_))
        ));
        let not_json = URL_SAFE_NO_PAD.encode(b"hola");
        assert!(matches!(
            PrintData::decode(&not_json),
            Err(PrintDataError::Json(_))
        ));
    }

    #[test]
    fn test_snapshot_totals() {
        let data = snapshot();
        assert_eq!(data.subtotal, Price::new(17000));
        assert_eq!(data.delivery_fee, Price::new(2500));
        assert_eq!(data.total, Price::new(19500));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert!(json.get("customerData").is_some());
        assert!(json.get("cartItems").is_some());
        assert_eq!(json["deliveryFee"], 2500);
        assert_eq!(json["customerData"]["orderType"], "delivery");
    }
}
