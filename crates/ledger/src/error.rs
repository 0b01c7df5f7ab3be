use core_types::UserId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No account exists for user {0}")]
    NotFound(UserId),

    #[error("An account already exists for user {0}")]
    AccountExists(UserId),

    #[error("Ledger invariant violated: {0}")]
    Invariant(String),

    #[error("Storage is unavailable: {0}")]
    Storage(String),
}
