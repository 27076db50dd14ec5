use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use eco_protocol::ErrorResponse;
use eco_store::StoreError;
use eco_types::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Store(StoreError::Ledger(LedgerError::InsufficientFunds { balance, .. })) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::not_enough_points(*balance))
            }
            Self::Store(StoreError::Ledger(LedgerError::Overflow { balance, .. })) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::points_overflow(*balance))
            }
            Self::InvalidBody(reason) => (StatusCode::BAD_REQUEST, ErrorResponse::new(reason.clone())),
            _ => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(self.to_string()))
            }
        };
        (status, Json(body)).into_response()
    }
}
