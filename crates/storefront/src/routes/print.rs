//! Printable order tickets (HTML).
//!
//! Tickets are rendered from a snapshot taken at submission time, either
//! carried inline in the URL or looked up by short reference. Failures render
//! an error page rather than JSON, since these URLs are opened in a browser
//! next to the kitchen printer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use la_comanda_core::{PrintData, Ticket, ticket::SEPARATOR};
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;

const NOT_FOUND: &str = "Pedido no encontrado o expirado";
const NO_DATA: &str = "No hay datos para imprimir";
const DECODE_FAILED: &str = "Error al decodificar los datos";

// =============================================================================
// Templates
// =============================================================================

/// Ticket page template.
#[derive(Template, WebTemplate)]
#[template(path = "print/ticket.html")]
pub struct TicketTemplate {
    pub ticket: Ticket,
    pub separator: &'static str,
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "print/error.html")]
pub struct PrintErrorTemplate {
    pub message: &'static str,
}

/// Query parameters of the inline form.
#[derive(Debug, Deserialize)]
pub struct PrintQuery {
    pub data: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Ticket from an inline snapshot.
///
/// GET /print?data=...
#[instrument(skip_all)]
pub async fn inline(State(state): State<AppState>, Query(query): Query<PrintQuery>) -> Response {
    let Some(encoded) = query.data.as_deref().filter(|d| !d.trim().is_empty()) else {
        return error_page(StatusCode::BAD_REQUEST, NO_DATA);
    };

    match PrintData::decode(encoded) {
        Ok(data) => render(&state, &data),
        Err(e) => {
            tracing::debug!(error = %e, "Inline print data rejected");
            error_page(StatusCode::BAD_REQUEST, DECODE_FAILED)
        }
    }
}

/// Ticket from a short reference.
///
/// GET /print/{reference}
#[instrument(skip(state))]
pub async fn by_reference(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Response {
    match state.print_refs().get(&reference).await {
        Some(data) => render(&state, &data),
        None => error_page(StatusCode::NOT_FOUND, NOT_FOUND),
    }
}

fn render(state: &AppState, data: &PrintData) -> Response {
    TicketTemplate {
        ticket: Ticket::from_print_data(&state.config().business.name, data),
        separator: SEPARATOR,
    }
    .into_response()
}

fn error_page(status: StatusCode, message: &'static str) -> Response {
    (status, PrintErrorTemplate { message }).into_response()
}
