//! Receipt layout for kitchen print tickets.
//!
//! A [`Ticket`] is a pure rearrangement of a [`PrintData`] snapshot into the
//! sections of an 80mm receipt. The storefront renders it as HTML; the
//! `Display` impl gives the same content as plain text.

use core::fmt;

use serde::Serialize;

use crate::cart::CartState;
use crate::print::PrintData;

/// Separator line between receipt sections.
pub const SEPARATOR: &str = "-------------------------";

/// A labeled receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// One numbered entry of the detailed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketItem {
    pub heading: String,
    /// Observations split on commas, trimmed, blanks dropped.
    pub observations: Vec<String>,
}

/// Sections of a print ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub title: String,
    pub customer: Vec<Field>,
    /// Address lines, empty unless the order is a delivery with an address.
    pub address: Vec<String>,
    pub summary: Vec<String>,
    pub item_count: usize,
    pub items: Vec<TicketItem>,
    /// Itemized for delivery orders, total only for pickup.
    pub totals: Vec<Field>,
    pub general_observations: Option<String>,
}

impl Ticket {
    /// Lay out a snapshot. Totals are taken from the snapshot as stored.
    #[must_use]
    pub fn from_print_data(business: &str, data: &PrintData) -> Self {
        let customer_data = &data.customer_data;
        let is_delivery = customer_data.order_type.is_delivery();

        let customer = vec![
            Field::new("Cliente", customer_data.name.trim()),
            Field::new("Telefono", customer_data.phone.trim()),
            Field::new("Pago", customer_data.payment_method.as_str()),
            Field::new("Tipo", customer_data.order_type.label()),
        ];

        let mut address = Vec::new();
        if is_delivery && let Some(addr) = &customer_data.address {
            address.push(format!("{} {}", addr.street.trim(), addr.number.trim()));
            if let Some(between) = addr.between() {
                address.push(format!("Entre: {between}"));
            }
            if let Some(neighborhood) = addr.neighborhood() {
                address.push(format!("Barrio: {neighborhood}"));
            }
        }

        let cart: CartState = data.cart_items.iter().cloned().collect();
        let summary = cart
            .grouped()
            .into_iter()
            .map(|(name, count, price)| format!("{count}x {name} - ${price}"))
            .collect();

        let items = cart
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| TicketItem {
                heading: format!("{}. {}", index + 1, item.product.name),
                observations: item
                    .observations()
                    .map(|obs| {
                        obs.split(',')
                            .map(str::trim)
                            .filter(|part| !part.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        let totals = if is_delivery {
            vec![
                Field::new("Subtotal", format!("${}", data.subtotal)),
                Field::new("Envio", format!("${}", data.delivery_fee)),
                Field::new("TOTAL", format!("${}", data.total)),
            ]
        } else {
            vec![Field::new("TOTAL", format!("${}", data.total))]
        };

        Self {
            title: format!("{business} - PEDIDO"),
            customer,
            address,
            summary,
            item_count: cart.len(),
            items,
            totals,
            general_observations: customer_data.general_observations().map(String::from),
        }
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        for field in &self.customer {
            writeln!(f, "{}: {}", field.label, field.value)?;
        }
        if !self.address.is_empty() {
            writeln!(f, "Direccion:")?;
            for line in &self.address {
                writeln!(f, "{line}")?;
            }
        }

        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "RESUMEN")?;
        for line in &self.summary {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "Total ítems: {}", self.item_count)?;

        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "PEDIDO DETALLADO")?;
        for item in &self.items {
            writeln!(f, "{}", item.heading)?;
            for obs in &item.observations {
                writeln!(f, "  - {obs}")?;
            }
        }

        writeln!(f, "{SEPARATOR}")?;
        if self.totals.len() > 1 {
            writeln!(f, "TOTALES")?;
        }
        for field in &self.totals {
            writeln!(f, "{}: {}", field.label, field.value)?;
        }

        if let Some(observations) = &self.general_observations {
            writeln!(f, "{SEPARATOR}")?;
            writeln!(f, "Observaciones: {observations}")?;
        }
        Ok(())
    }
}
