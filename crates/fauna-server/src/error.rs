use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use fauna_ledger::LedgerError;
use fauna_reports::ReportError;
use fauna_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No usable credentials were presented.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller is known but lacks the required capability.
    #[error("access denied: {0}")]
    Forbidden(String),

    /// A domain-rule violation from the population ledger.
    #[error(transparent)]
    Domain(#[from] LedgerError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Stable machine-readable code for a ledger violation.
pub fn domain_error_code(err: &LedgerError) -> &'static str {
    match err {
        LedgerError::MissingBaseline => "missing_baseline",
        LedgerError::DuplicateEntry => "duplicate_entry",
        LedgerError::NegativePopulation { .. } => "negative_population",
        LedgerError::InvalidYear(_) => "invalid_year",
        LedgerError::Store(_) => "store_error",
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            // Domain-rule violations are user-correctable and recovered
            // into a structured response, never a fault.
            Self::Domain(err @ (LedgerError::MissingBaseline
            | LedgerError::DuplicateEntry
            | LedgerError::NegativePopulation { .. }
            | LedgerError::InvalidYear(_))) => {
                (StatusCode::UNPROCESSABLE_ENTITY, domain_error_code(err))
            }
            // Unexpected storage failures take the generic failure path.
            Self::Domain(_) | Self::Report(_) | Self::Store(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
            Self::Config(_) | Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = json!({
            "error": code,
            "reason": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
