use crate::error::LedgerError;
use async_trait::async_trait;
use core_types::{Action, NewTransaction, Transaction, UserId};
use rust_decimal::Decimal;

/// Durable per-user cash balance. Balances change only through
/// `LedgerUnit::set_balance`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates the account row with its starting balance.
    async fn create_account(&self, user_id: UserId, starting_cash: Decimal)
    -> Result<(), LedgerError>;

    /// Reads the committed balance. Fails with `NotFound` for an unknown user.
    async fn get_balance(&self, user_id: UserId) -> Result<Decimal, LedgerError>;
}

/// The append-only record of every committed trade.
#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Every committed transaction of the user, in insertion order.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError>;

    /// Total shares traded in one direction for one symbol. A symbol with no
    /// matching rows sums to zero.
    async fn sum_shares(
        &self,
        user_id: UserId,
        symbol: &str,
        action: Action,
    ) -> Result<i64, LedgerError>;
}

/// Balance and history of one user read at the same instant.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub cash_balance: Decimal,
    pub transactions: Vec<Transaction>,
}

/// The full storage backend: both relations plus the unit-of-work entry point.
#[async_trait]
pub trait Ledger: AccountStore + TransactionLog {
    /// Opens a unit of work for `user_id`, waiting for any in-flight commit of the
    /// same user to finish. Fails with `NotFound` if the account does not exist.
    async fn begin(&self, user_id: UserId) -> Result<Box<dyn LedgerUnit>, LedgerError>;

    /// Reads balance and history without observing a half-applied commit.
    async fn snapshot(&self, user_id: UserId) -> Result<LedgerSnapshot, LedgerError>;
}

/// A unit of work holding one user's commit lock.
///
/// Reads through the unit see its own staged writes. Nothing becomes visible to
/// other readers until `commit` returns; dropping the unit rolls everything back.
#[async_trait]
pub trait LedgerUnit: Send {
    fn user_id(&self) -> UserId;

    async fn balance(&mut self) -> Result<Decimal, LedgerError>;

    async fn sum_shares(&mut self, symbol: &str, action: Action) -> Result<i64, LedgerError>;

    async fn set_balance(&mut self, new_balance: Decimal) -> Result<(), LedgerError>;

    /// Stages a transaction and returns the id assigned by the store.
    async fn append(&mut self, txn: NewTransaction) -> Result<i64, LedgerError>;

    async fn commit(self: Box<Self>) -> Result<(), LedgerError>;
}

/// Row-level checks shared by every backend before a write is staged.
pub fn check_row(unit_user: UserId, txn: &NewTransaction) -> Result<(), LedgerError> {
    if txn.user_id != unit_user {
        return Err(LedgerError::Invariant(format!(
            "transaction for user {} staged in a unit for user {}",
            txn.user_id, unit_user
        )));
    }
    if txn.shares <= 0 {
        return Err(LedgerError::Invariant(format!(
            "shares must be positive, got {}",
            txn.shares
        )));
    }
    if txn.price_per_share <= Decimal::ZERO {
        return Err(LedgerError::Invariant(format!(
            "price must be positive, got {}",
            txn.price_per_share
        )));
    }
    Ok(())
}

pub fn check_balance(new_balance: Decimal) -> Result<(), LedgerError> {
    if new_balance < Decimal::ZERO {
        return Err(LedgerError::Invariant(format!(
            "cash balance cannot go negative, got {new_balance}"
        )));
    }
    Ok(())
}
