//! Order message sent to the restaurant through the messaging channel.
//!
//! Section order is fixed: header, customer block, address (delivery only),
//! grouped summary, numbered detail, delivery fee, total, observations. The
//! restaurant reads these messages by eye, so the layout is part of the
//! contract and covered by exact-output tests.

use core::fmt::Write as _;

use crate::cart::CartState;
use crate::pricing::DeliveryFees;
use crate::types::CustomerData;

/// Base URL of the messaging channel's click-to-chat links.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Render the plain-text order message.
///
/// The grouped summary deliberately drops observations and prices; the
/// numbered list carries them.
#[must_use]
pub fn render(
    business: &str,
    cart: &CartState,
    customer: &CustomerData,
    fees: &DeliveryFees,
) -> String {
    let mut out = String::new();
    let quote = fees.quote(cart, customer.order_type, customer.neighborhood());

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "*NUEVO PEDIDO - {business}*");
    out.push('\n');

    let _ = writeln!(out, "*Cliente:* {}", customer.name.trim());
    let _ = writeln!(out, "*Telefono:* {}", customer.phone.trim());
    let _ = writeln!(out, "*Pago:* {}", customer.payment_method);
    let _ = writeln!(out, "*Tipo:* {}", customer.order_type.label());
    out.push('\n');

    if customer.order_type.is_delivery()
        && let Some(address) = &customer.address
    {
        out.push_str("*Direccion:*\n");
        let _ = writeln!(out, "{} {}", address.street.trim(), address.number.trim());
        if let Some(between) = address.between() {
            let _ = writeln!(out, "Entre: {between}");
        }
        if let Some(neighborhood) = address.neighborhood() {
            let _ = writeln!(out, "Barrio: {neighborhood}");
        }
        out.push('\n');
    }

    let summary: Vec<String> = cart
        .grouped()
        .into_iter()
        .map(|(name, count, _)| format!("{count}x {name}"))
        .collect();
    let _ = writeln!(out, "*Resumen:* {}", summary.join(", "));
    out.push('\n');

    out.push_str("*PEDIDO:*\n");
    for (index, item) in cart.items().iter().enumerate() {
        let _ = write!(out, "{}. {}", index + 1, item.product.name);
        if let Some(observations) = item.observations() {
            let _ = write!(out, " - {observations}");
        }
        let _ = writeln!(out, " (${})", item.product.price);
    }
    out.push('\n');

    if !quote.delivery_fee.is_zero() {
        let _ = writeln!(out, "*Envio:* ${}", quote.delivery_fee);
    }

    let mut terms: Vec<String> = cart
        .items()
        .iter()
        .map(|item| item.product.price.to_string())
        .collect();
    if !quote.delivery_fee.is_zero() {
        terms.push(quote.delivery_fee.to_string());
    }
    if terms.is_empty() {
        terms.push("0".to_string());
    }
    let _ = writeln!(out, "*Total:* {}={}", terms.join("+"), quote.total);

    if let Some(observations) = customer.general_observations() {
        out.push('\n');
        let _ = write!(out, "*Observaciones:* {observations}");
    }

    out
}

/// Click-to-chat URL embedding the percent-encoded message.
///
/// ```
/// use la_comanda_core::message::whatsapp_url;
///
/// assert_eq!(
///     whatsapp_url("5493772406996", "2x Argenta"),
///     "https://wa.me/5493772406996?text=2x%20Argenta"
/// );
/// ```
#[must_use]
pub fn whatsapp_url(number: &str, text: &str) -> String {
    format!(
        "{WHATSAPP_BASE_URL}/{}?text={}",
        number.trim().trim_start_matches('+'),
        urlencoding::encode(text)
    )
}
