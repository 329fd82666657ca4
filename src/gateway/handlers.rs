use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::ledger::LedgerError;
use crate::ledger::models::{Balance, JournalEntry};
use crate::projections;

use super::state::AppState;
use super::types::{AsOfQuery, ErrorResponse, MessageResponse, TransactionRequest};

/// POST /transaction
pub async fn post_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransactionRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .execute(req.into())
        .await
        .map_err(error_response)?;

    Ok(Json(MessageResponse::new("transfer committed")))
}

/// GET /balance/{user_id}
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Balance>, (StatusCode, Json<ErrorResponse>)> {
    let balance = projections::balance_as_of(&state.store, &user_id, query.as_of)
        .await
        .map_err(error_response)?;

    Ok(Json(balance))
}

/// GET /transaction-history/{user_id}
pub async fn get_transaction_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Vec<JournalEntry>>, (StatusCode, Json<ErrorResponse>)> {
    let entries = projections::history_for(&state.store, &user_id, query.as_of)
        .await
        .map_err(error_response)?;

    Ok(Json(entries))
}

/// GET /health
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("ledger store unavailable")),
        )
    })?;

    Ok(Json(MessageResponse::new("ok")))
}

/// Map the core error taxonomy to a status code and a stable error body.
///
/// Clients key off the status and kind, not the prose.
fn error_response(err: LedgerError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        LedgerError::InvalidRequest(_)
        | LedgerError::SelfTransfer
        | LedgerError::InvalidAmount
        | LedgerError::EffectiveDateInPast => StatusCode::BAD_REQUEST,
        LedgerError::UserMissing(_) => StatusCode::NOT_FOUND,
        LedgerError::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::DuplicateTransfer | LedgerError::TimestampConflict => StatusCode::CONFLICT,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        LedgerError::Database(e) => {
            tracing::error!(error = %e, "ledger store failure");
            "ledger store unavailable".to_string()
        }
        other => other.to_string(),
    };

    (status, Json(ErrorResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: LedgerError) -> StatusCode {
        error_response(err).0
    }

    #[test]
    fn validation_failures_map_to_400() {
        assert_eq!(
            status_of(LedgerError::InvalidRequest("sender_id must not be empty")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(LedgerError::SelfTransfer), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(LedgerError::InvalidAmount), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(LedgerError::EffectiveDateInPast),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_user_maps_to_404() {
        assert_eq!(
            status_of(LedgerError::UserMissing("ghost".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn business_rejections_map_to_422_and_409() {
        assert_eq!(
            status_of(LedgerError::InsufficientFunds),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(LedgerError::DuplicateTransfer), StatusCode::CONFLICT);
        assert_eq!(status_of(LedgerError::TimestampConflict), StatusCode::CONFLICT);
    }

    #[test]
    fn store_failures_map_to_500_with_opaque_body() {
        let (status, Json(body)) = error_response(LedgerError::Database(sqlx::Error::RowNotFound));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "ledger store unavailable");
    }
}
