//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use super::dto::{HealthResponse, WalletRequest, WalletResponse};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::validation;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e.message()),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Wallet Endpoints
// =============================================================================

/// POST /api/v1/wallet
///
/// Apply a deposit or withdrawal. Responds `200` with an empty body once the
/// operation is committed.
pub async fn process_wallet_operation(
    State(state): State<AppState>,
    payload: Result<Json<WalletRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected wallet request body: {}", rejection.body_text());
        AppError::InvalidJson
    })?;

    let operation = validation::validate_request(&request)?;
    db_services::process_operation(state.repository.as_ref(), &operation).await?;

    Ok(StatusCode::OK)
}

/// GET /api/v1/wallets/{wallet_id}
///
/// Get the current balance of a wallet.
pub async fn get_wallet_balance(
    State(state): State<AppState>,
    Path(raw_wallet_id): Path<String>,
) -> HandlerResult<WalletResponse> {
    let wallet_id = Uuid::parse_str(&raw_wallet_id)
        .map_err(|_| AppError::BadRequest(format!("Invalid wallet ID: {}", raw_wallet_id)))?;

    let wallet = db_services::get_wallet(state.repository.as_ref(), wallet_id).await?;

    Ok(Json(WalletResponse::from(wallet)))
}
