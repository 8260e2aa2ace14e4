//! SWIFT code routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;

use swiftreg_core::registry::{CountrySwiftCodes, DeleteOutcome, SwiftCodeInput, SwiftCodeView};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ClientId;

/// Creates the SWIFT code routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/swift-codes", post(create_swift_code))
        .route(
            "/swift-codes/{swift_code}",
            get(get_swift_code).delete(delete_swift_code),
        )
        .route(
            "/swift-codes/country/{country_iso2}",
            get(get_country_swift_codes),
        )
}

/// Confirmation body for writes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human readable confirmation.
    pub message: &'static str,
}

/// GET `/swift-codes/{swift_code}`
async fn get_swift_code(
    State(state): State<AppState>,
    client: ClientId,
    Path(swift_code): Path<String>,
) -> Result<Json<SwiftCodeView>, ApiError> {
    state
        .registry
        .lookup_by_code(client.as_str(), &swift_code)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("SWIFT code not found"))
}

/// GET `/swift-codes/country/{country_iso2}`
async fn get_country_swift_codes(
    State(state): State<AppState>,
    client: ClientId,
    Path(country_iso2): Path<String>,
) -> Result<Json<CountrySwiftCodes>, ApiError> {
    let listing = state
        .registry
        .lookup_by_country(client.as_str(), &country_iso2)
        .await?;

    Ok(Json(listing))
}

/// POST `/swift-codes`
async fn create_swift_code(
    State(state): State<AppState>,
    client: ClientId,
    payload: Result<Json<SwiftCodeInput>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(input) = payload?;

    state.registry.insert(client.as_str(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "SWIFT code added successfully",
        }),
    ))
}

/// DELETE `/swift-codes/{swift_code}`
async fn delete_swift_code(
    State(state): State<AppState>,
    client: ClientId,
    Path(swift_code): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.registry.delete(client.as_str(), &swift_code).await? {
        DeleteOutcome::Deleted => Ok(Json(MessageResponse {
            message: "SWIFT code deleted successfully",
        })),
        DeleteOutcome::NotFound => Err(ApiError::not_found("SWIFT code not found")),
    }
}
