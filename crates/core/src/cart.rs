//! Cart state and its transition function.
//!
//! The cart is an ordered list of items. Items have no identity beyond their
//! position, so removal and updates address items by 0-based index and
//! display numbering is `index + 1`.
//!
//! The only way to change a [`CartState`] is [`CartState::reduce`], which
//! consumes the current state and an action and returns the next state.

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product};

/// One chosen product with free-text observations.
///
/// Observations are stored verbatim; readers trim them before output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    #[serde(default)]
    pub observations: String,
}

impl CartItem {
    /// Observations trimmed, or `None` when blank.
    #[must_use]
    pub fn observations(&self) -> Option<&str> {
        crate::types::customer::non_blank(Some(&self.observations))
    }
}

/// Actions accepted by [`CartState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Append a product. Callers must not add non-orderable products.
    AddItem {
        product: Product,
        observations: String,
    },
    /// Delete the item at a position; later items shift down.
    RemoveItem(usize),
    /// Replace the observations of the item at a position.
    UpdateObservations { index: usize, observations: String },
    /// Empty the cart.
    Clear,
}

/// The list of items in the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Apply one action and return the resulting state.
    ///
    /// Positions that are out of range make `RemoveItem` and
    /// `UpdateObservations` a no-op.
    ///
    /// ```
    /// use la_comanda_core::{CartAction, CartState, catalog};
    ///
    /// let argenta = catalog::find("1").unwrap().clone();
    /// let cart = CartState::new()
    ///     .reduce(CartAction::AddItem { product: argenta.clone(), observations: String::new() })
    ///     .reduce(CartAction::AddItem { product: argenta, observations: String::new() })
    ///     .reduce(CartAction::UpdateObservations { index: 1, observations: "sin cebolla".into() })
    ///     .reduce(CartAction::RemoveItem(0));
    ///
    /// assert_eq!(cart.len(), 1);
    /// assert_eq!(cart.items()[0].observations, "sin cebolla");
    /// ```
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::AddItem {
                product,
                observations,
            } => {
                self.items.push(CartItem {
                    product,
                    observations,
                });
            }
            CartAction::RemoveItem(index) => {
                if index < self.items.len() {
                    self.items.remove(index);
                }
            }
            CartAction::UpdateObservations {
                index,
                observations,
            } => {
                if let Some(item) = self.items.get_mut(index) {
                    item.observations = observations;
                }
            }
            CartAction::Clear => self.items.clear(),
        }
        self
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every item's product price. Observations never affect it.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(|item| item.product.price).sum()
    }

    /// Item counts grouped by product name, in order of first appearance.
    #[must_use]
    pub fn grouped(&self) -> Vec<(&str, usize, Price)> {
        let mut groups: Vec<(&str, usize, Price)> = Vec::new();
        for item in &self.items {
            let name = item.product.name.as_str();
            match groups.iter_mut().find(|(n, _, _)| *n == name) {
                Some(group) => group.1 += 1,
                None => groups.push((name, 1, item.product.price)),
            }
        }
        groups
    }
}

impl FromIterator<CartItem> for CartState {
    /// Rebuild a cart from stored items, going through `AddItem` for each.
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |cart, item| {
            cart.reduce(CartAction::AddItem {
                product: item.product,
                observations: item.observations,
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog;

    fn product(id: &str) -> Product {
        catalog::find(id).unwrap().clone()
    }

    fn add(cart: CartState, id: &str) -> CartState {
        cart.reduce(CartAction::AddItem {
            product: product(id),
            observations: String::new(),
        })
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let cart = add(add(add(CartState::new(), "4"), "1"), "7");
        let names: Vec<&str> = cart.items().iter().map(|i| i.product.name.as_str()).collect();
        assert_eq!(names, ["Rocky", "Argenta", "Papas Cheddar y Bacon LC"]);
    }

    #[test]
    fn test_remove_shifts_later_items() {
        let cart = add(add(add(CartState::new(), "1"), "2"), "3");
        let cart = cart.reduce(CartAction::RemoveItem(1));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[1].product.id, "3");
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let cart = add(CartState::new(), "1");
        let after = cart.clone().reduce(CartAction::RemoveItem(5));
        assert_eq!(after, cart);
    }

    #[test]
    fn test_update_observations_stored_verbatim() {
        let cart = add(CartState::new(), "1").reduce(CartAction::UpdateObservations {
            index: 0,
            observations: "  sin cebolla ".to_string(),
        });
        assert_eq!(cart.items()[0].observations, "  sin cebolla ");
        assert_eq!(cart.items()[0].observations(), Some("sin cebolla"));
    }

    #[test]
    fn test_update_out_of_range_is_noop() {
        let cart = add(CartState::new(), "1");
        let after = cart.clone().reduce(CartAction::UpdateObservations {
            index: 1,
            observations: "extra".to_string(),
        });
        assert_eq!(after, cart);
    }

    #[test]
    fn test_clear() {
        let cart = add(add(CartState::new(), "1"), "2").reduce(CartAction::Clear);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_survivors_keep_relative_order_and_latest_update() {
        let cart = add(add(add(add(CartState::new(), "1"), "2"), "3"), "4")
            .reduce(CartAction::UpdateObservations {
                index: 2,
                observations: "a".to_string(),
            })
            .reduce(CartAction::RemoveItem(0))
            .reduce(CartAction::UpdateObservations {
                index: 1,
                observations: "b".to_string(),
            })
            .reduce(CartAction::RemoveItem(2));

        let survivors: Vec<(&str, &str)> = cart
            .items()
            .iter()
            .map(|i| (i.product.id.as_str(), i.observations.as_str()))
            .collect();
        assert_eq!(survivors, [("2", ""), ("3", "b")]);
    }

    #[test]
    fn test_subtotal_ignores_order_and_observations() {
        let forward = add(add(add(CartState::new(), "1"), "6"), "7");
        let backward = add(add(add(CartState::new(), "7"), "6"), "1");
        assert_eq!(forward.subtotal(), backward.subtotal());

        let annotated = forward.clone().reduce(CartAction::UpdateObservations {
            index: 0,
            observations: "doble cheddar".to_string(),
        });
        assert_eq!(annotated.subtotal(), forward.subtotal());
        assert_eq!(forward.subtotal(), Price::new(25500));
    }

    #[test]
    fn test_grouped_counts_by_name() {
        let cart = add(add(add(CartState::new(), "1"), "4"), "1");
        assert_eq!(
            cart.grouped(),
            vec![("Argenta", 2, Price::new(8500)), ("Rocky", 1, Price::new(8500))]
        );
    }

    #[test]
    fn test_from_iter_round_trips_items() {
        let cart = add(add(CartState::new(), "1"), "2");
        let rebuilt: CartState = cart.items().iter().cloned().collect();
        assert_eq!(rebuilt, cart);
    }
}
