use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use executor::TradeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Trade(#[from] TradeError),
    #[error("Missing or malformed {0} header")]
    Unauthenticated(&'static str),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Trade(e) => match e {
                TradeError::InvalidInput { .. }
                | TradeError::SymbolNotFound(_)
                | TradeError::InvalidSymbol(_)
                | TradeError::InsufficientFunds { .. }
                | TradeError::InsufficientShares { .. } => StatusCode::BAD_REQUEST,
                TradeError::NotFound(_) => StatusCode::NOT_FOUND,
                TradeError::AccountExists(_) => StatusCode::CONFLICT,
                TradeError::QuoteUnavailable(_) | TradeError::StorageUnavailable(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                TradeError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed.");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => {
                    "The service is temporarily unavailable, please retry".to_string()
                }
                _ => "An internal error occurred".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::UserId;
    use rust_decimal::Decimal;

    fn status_of(e: TradeError) -> StatusCode {
        AppError::from(e).status()
    }

    #[test]
    fn business_rejections_are_bad_requests() {
        assert_eq!(
            status_of(TradeError::InsufficientFunds {
                required: Decimal::from(200),
                available: Decimal::from(100),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(TradeError::InsufficientShares {
                requested: 10,
                held: 5
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(TradeError::InvalidSymbol("GOOG".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(TradeError::SymbolNotFound("ZZZZ".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn account_and_availability_errors() {
        assert_eq!(status_of(TradeError::NotFound(UserId(1))), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(TradeError::AccountExists(UserId(1))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(TradeError::QuoteUnavailable("timeout".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(TradeError::StorageUnavailable("pool closed".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Unauthenticated("x-user-id").status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn response_carries_the_status() {
        let response = AppError::from(TradeError::AccountExists(UserId(7))).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
