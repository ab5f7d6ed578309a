use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use sleeper_domain::{BookingRequest, TicketId};
use sleeper_engine::AllocationEvent;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    backend_ok: bool,
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tickets/health", get(health))
        .route("/api/v1/tickets/available", get(available))
        .route("/api/v1/tickets/booked", get(booked))
        .route("/api/v1/tickets/book", post(book))
        .route("/api/v1/tickets/cancel/:ticket_id", delete(cancel))
        .route("/api/v1/tickets/history/:ticket_id", get(history))
}

/// GET /api/v1/tickets/health
/// Liveness plus a structural self-check of the reservation state
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let violations = state.engine.invariant_violations();
    if violations.is_empty() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                backend_ok: true,
            }),
        )
    } else {
        tracing::error!(?violations, "reservation state failed its self-check");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "unhealthy",
                backend_ok: false,
            }),
        )
    }
}

/// GET /api/v1/tickets/available
async fn available(State(state): State<AppState>) -> Json<sleeper_domain::AvailabilitySnapshot> {
    Json(state.engine.availability())
}

/// GET /api/v1/tickets/booked
async fn booked(State(state): State<AppState>) -> Json<sleeper_domain::BookedSnapshot> {
    Json(state.engine.booked())
}

/// POST /api/v1/tickets/book
async fn book(
    State(state): State<AppState>,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<sleeper_domain::TicketView>), AppError> {
    let request_id = Uuid::new_v4();
    let Json(request) =
        body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    tracing::info!(%request_id, passengers = request.passengers.len(), "booking request received");
    let view = state.engine.book(&request).inspect_err(|err| {
        tracing::warn!(%request_id, error = %err, "booking rejected");
    })?;
    tracing::info!(%request_id, ticket_id = view.ticket_id, "booking confirmed");
    Ok((StatusCode::CREATED, Json(view)))
}

/// DELETE /api/v1/tickets/cancel/:ticket_id
async fn cancel(
    State(state): State<AppState>,
    Path(ticket_id): Path<TicketId>,
) -> Result<Json<CancelResponse>, AppError> {
    state.engine.cancel(ticket_id)?;
    Ok(Json(CancelResponse {
        message: format!("Ticket {} has been cancelled successfully", ticket_id),
    }))
}

/// GET /api/v1/tickets/history/:ticket_id
/// The allocation ledger of one ticket, oldest entry first
async fn history(
    State(state): State<AppState>,
    Path(ticket_id): Path<TicketId>,
) -> Result<Json<Vec<AllocationEvent>>, AppError> {
    Ok(Json(state.engine.history(ticket_id)?))
}
