//! Customer data captured by the order form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// The customer collects the order at the restaurant.
    #[default]
    Pickup,
    /// The restaurant delivers to an address.
    Delivery,
}

impl OrderType {
    /// Customer-facing label used in messages and tickets.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pickup => "Retiro en local",
            Self::Delivery => "Envio a domicilio",
        }
    }

    /// Returns true for delivery orders.
    #[must_use]
    pub const fn is_delivery(self) -> bool {
        matches!(self, Self::Delivery)
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Efectivo,
    Transferencia,
    Tarjeta,
}

impl PaymentMethod {
    /// The wire value, which is also what the order message shows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Efectivo => "efectivo",
            Self::Transferencia => "transferencia",
            Self::Tarjeta => "tarjeta",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery address.
///
/// `between` (cross streets) and `neighborhood` are optional. The order form
/// submits empty strings for untouched inputs, so blank values are treated the
/// same as missing ones everywhere they are read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
}

impl Address {
    /// Cross streets, if present and not blank (trimmed).
    #[must_use]
    pub fn between(&self) -> Option<&str> {
        non_blank(self.between.as_deref())
    }

    /// Neighborhood, if present and not blank (trimmed).
    #[must_use]
    pub fn neighborhood(&self) -> Option<&str> {
        non_blank(self.neighborhood.as_deref())
    }
}

/// Customer details for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub name: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub general_observations: String,
}

/// Missing or inconsistent customer fields.
///
/// Validation failures block submission; they are reported to the customer and
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Por favor completá tu nombre")]
    MissingName,
    #[error("Por favor completá tu teléfono")]
    MissingPhone,
    #[error("Para envíos a domicilio completá calle y número")]
    MissingAddress,
    #[error("El pedido está vacío")]
    EmptyCart,
    #[error("Producto desconocido: {0}")]
    UnknownProduct(String),
    #[error("El producto {0} todavía no está disponible")]
    NotOrderable(String),
}

impl CustomerData {
    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the name or phone is blank, or when a
    /// delivery order lacks a street and number.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }
        if self.order_type.is_delivery() {
            let complete = self.address.as_ref().is_some_and(|address| {
                !address.street.trim().is_empty() && !address.number.trim().is_empty()
            });
            if !complete {
                return Err(ValidationError::MissingAddress);
            }
        }
        Ok(())
    }

    /// Drop the address for pickup orders, where it carries no meaning.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.order_type.is_delivery() {
            self.address = None;
        }
        self
    }

    /// The neighborhood used for delivery pricing, if any.
    #[must_use]
    pub fn neighborhood(&self) -> Option<&str> {
        self.address.as_ref().and_then(Address::neighborhood)
    }

    /// General observations, trimmed, if not blank.
    #[must_use]
    pub fn general_observations(&self) -> Option<&str> {
        non_blank(Some(&self.general_observations))
    }
}

/// Trim a value and discard it when nothing is left.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
