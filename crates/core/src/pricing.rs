//! Delivery fee schedule and order totals.
//!
//! Fees are configuration, not law: the restaurant has run both a two-tier
//! schedule and no delivery fee at all. Everything here is recomputed on
//! demand; nothing is cached because the neighborhood is free text.

use serde::{Deserialize, Serialize};

use crate::cart::CartState;
use crate::types::{OrderType, Price, customer::non_blank};

/// Two flat delivery tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFees {
    /// Charged when the customer names a neighborhood.
    pub with_neighborhood: Price,
    /// Charged when the neighborhood is missing or blank.
    pub base: Price,
}

impl Default for DeliveryFees {
    fn default() -> Self {
        Self {
            with_neighborhood: Price::new(3000),
            base: Price::new(2500),
        }
    }
}

impl DeliveryFees {
    /// A schedule charging the same amount regardless of neighborhood.
    #[must_use]
    pub const fn flat(amount: Price) -> Self {
        Self {
            with_neighborhood: amount,
            base: amount,
        }
    }

    /// Delivery fee for an order.
    ///
    /// Pickup orders are never charged. Whitespace-only neighborhoods count
    /// as missing.
    ///
    /// ```
    /// use la_comanda_core::{DeliveryFees, OrderType, Price};
    ///
    /// let fees = DeliveryFees::default();
    /// assert_eq!(fees.fee(OrderType::Pickup, Some("Centro")), Price::ZERO);
    /// assert_eq!(fees.fee(OrderType::Delivery, Some("Centro")), Price::new(3000));
    /// assert_eq!(fees.fee(OrderType::Delivery, Some("  ")), Price::new(2500));
    /// assert_eq!(fees.fee(OrderType::Delivery, None), Price::new(2500));
    /// ```
    #[must_use]
    pub fn fee(&self, order_type: OrderType, neighborhood: Option<&str>) -> Price {
        match order_type {
            OrderType::Pickup => Price::ZERO,
            OrderType::Delivery => {
                if non_blank(neighborhood).is_some() {
                    self.with_neighborhood
                } else {
                    self.base
                }
            }
        }
    }

    /// Subtotal, fee and total for a cart.
    ///
    /// An empty delivery cart is still charged the fee; preventing empty
    /// submissions is the order form's job.
    #[must_use]
    pub fn quote(&self, cart: &CartState, order_type: OrderType, neighborhood: Option<&str>) -> Quote {
        let subtotal = cart.subtotal();
        let delivery_fee = self.fee(order_type, neighborhood);
        Quote {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}

/// Price breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartAction;
    use crate::catalog;

    fn cart(ids: &[&str]) -> CartState {
        ids.iter().fold(CartState::new(), |cart, id| {
            cart.reduce(CartAction::AddItem {
                product: catalog::find(id).unwrap().clone(),
                observations: String::new(),
            })
        })
    }

    #[test]
    fn test_pickup_is_always_free() {
        let fees = DeliveryFees::default();
        for neighborhood in [None, Some(""), Some("   "), Some("Centro")] {
            assert_eq!(fees.fee(OrderType::Pickup, neighborhood), Price::ZERO);
        }
    }

    #[test]
    fn test_blank_neighborhood_uses_base_fee() {
        let fees = DeliveryFees::default();
        assert_eq!(
            fees.fee(OrderType::Delivery, Some("")),
            fees.fee(OrderType::Delivery, None)
        );
        assert_eq!(fees.fee(OrderType::Delivery, Some("\t ")), fees.base);
    }

    #[test]
    fn test_flat_schedule() {
        let fees = DeliveryFees::flat(Price::ZERO);
        assert_eq!(fees.fee(OrderType::Delivery, Some("Centro")), Price::ZERO);
        assert_eq!(fees.fee(OrderType::Delivery, None), Price::ZERO);
    }

    #[test]
    fn test_total_is_subtotal_plus_fee() {
        let fees = DeliveryFees::default();
        let carts = [cart(&[]), cart(&["1"]), cart(&["1", "6", "7"])];
        let types = [OrderType::Pickup, OrderType::Delivery];
        let neighborhoods = [None, Some(""), Some("Centro")];

        for cart in &carts {
            for order_type in types {
                for neighborhood in neighborhoods {
                    let quote = fees.quote(cart, order_type, neighborhood);
                    assert_eq!(quote.subtotal, cart.subtotal());
                    assert_eq!(quote.delivery_fee, fees.fee(order_type, neighborhood));
                    assert_eq!(quote.total, quote.subtotal + quote.delivery_fee);
                }
            }
        }
    }

    #[test]
    fn test_empty_delivery_cart_still_charges_fee() {
        let quote = DeliveryFees::default().quote(&cart(&[]), OrderType::Delivery, None);
        assert_eq!(quote.subtotal, Price::ZERO);
        assert_eq!(quote.total, Price::new(2500));
    }
}
