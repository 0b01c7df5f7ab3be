use api_client::ApiError;
use core_types::{CoreError, UserId};
use ledger::LedgerError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Symbol does not exist: {0}")]
    SymbolNotFound(String),

    #[error("Symbol has never been held: {0}")]
    InvalidSymbol(String),

    #[error("Not enough cash to complete the purchase. Required: {required}, Available: {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Not enough shares to sell. Requested: {requested}, Held: {held}")]
    InsufficientShares { requested: i64, held: i64 },

    #[error("No account exists for user {0}")]
    NotFound(UserId),

    #[error("An account already exists for user {0}")]
    AccountExists(UserId),

    #[error("The quote provider is unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Storage is unavailable: {0}")]
    StorageUnavailable(String),

    #[error("The ledger rejected an inconsistent write: {0}")]
    Invariant(String),
}

impl TradeError {
    /// Whether the same request may succeed if simply retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TradeError::QuoteUnavailable(_) | TradeError::StorageUnavailable(_)
        )
    }
}

impl From<LedgerError> for TradeError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(user_id) => TradeError::NotFound(user_id),
            LedgerError::AccountExists(user_id) => TradeError::AccountExists(user_id),
            LedgerError::Invariant(msg) => TradeError::Invariant(msg),
            LedgerError::Storage(msg) => TradeError::StorageUnavailable(msg),
        }
    }
}

impl From<CoreError> for TradeError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidInput(field, reason) => TradeError::InvalidInput { field, reason },
            CoreError::UnknownAction(action) => TradeError::InvalidInput {
                field: "action".to_string(),
                reason: format!("unknown action {action}"),
            },
        }
    }
}

impl From<ApiError> for TradeError {
    fn from(e: ApiError) -> Self {
        TradeError::QuoteUnavailable(e.to_string())
    }
}
