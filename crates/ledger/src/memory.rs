use crate::error::LedgerError;
use crate::store::{
    AccountStore, Ledger, LedgerSnapshot, LedgerUnit, TransactionLog, check_balance, check_row,
};
use async_trait::async_trait;
use core_types::{Action, NewTransaction, Transaction, UserId};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<UserId, Decimal>,
    transactions: HashMap<UserId, Vec<Transaction>>,
}

impl State {
    fn sum_shares(&self, user_id: UserId, symbol: &str, action: Action) -> i64 {
        self.transactions
            .get(&user_id)
            .map(|txns| sum_matching(txns, symbol, action))
            .unwrap_or(0)
    }
}

fn sum_matching(txns: &[Transaction], symbol: &str, action: Action) -> i64 {
    txns.iter()
        .filter(|t| t.symbol == symbol && t.action == action)
        .map(|t| t.shares)
        .sum()
}

#[derive(Debug, Default)]
struct Inner {
    state: RwLock<State>,
    commit_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    next_id: AtomicI64,
}

/// An in-process ledger with the same commit semantics as the database backend.
///
/// Nothing survives a restart. Cloning is cheap and every clone shares the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    inner: Arc<Inner>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    async fn commit_lock(&self, user_id: UserId) -> Arc<Mutex<()>> {
        let mut locks = self.inner.commit_locks.lock().await;
        locks.entry(user_id).or_default().clone()
    }
}

#[async_trait]
impl AccountStore for InMemoryLedger {
    async fn create_account(
        &self,
        user_id: UserId,
        starting_cash: Decimal,
    ) -> Result<(), LedgerError> {
        check_balance(starting_cash)?;
        let mut state = self.inner.state.write().await;
        if state.accounts.contains_key(&user_id) {
            return Err(LedgerError::AccountExists(user_id));
        }
        state.accounts.insert(user_id, starting_cash);
        tracing::debug!(%user_id, %starting_cash, "Opened in-memory account.");
        Ok(())
    }

    async fn get_balance(&self, user_id: UserId) -> Result<Decimal, LedgerError> {
        let state = self.inner.state.read().await;
        state
            .accounts
            .get(&user_id)
            .copied()
            .ok_or(LedgerError::NotFound(user_id))
    }
}

#[async_trait]
impl TransactionLog for InMemoryLedger {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError> {
        let state = self.inner.state.read().await;
        Ok(state.transactions.get(&user_id).cloned().unwrap_or_default())
    }

    async fn sum_shares(
        &self,
        user_id: UserId,
        symbol: &str,
        action: Action,
    ) -> Result<i64, LedgerError> {
        let state = self.inner.state.read().await;
        Ok(state.sum_shares(user_id, symbol, action))
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn begin(&self, user_id: UserId) -> Result<Box<dyn LedgerUnit>, LedgerError> {
        let guard = self.commit_lock(user_id).await.lock_owned().await;
        let balance = self.get_balance(user_id).await?;

        Ok(Box::new(MemoryUnit {
            user_id,
            inner: self.inner.clone(),
            _guard: guard,
            balance,
            balance_dirty: false,
            staged: Vec::new(),
        }))
    }

    async fn snapshot(&self, user_id: UserId) -> Result<LedgerSnapshot, LedgerError> {
        let state = self.inner.state.read().await;
        let cash_balance = state
            .accounts
            .get(&user_id)
            .copied()
            .ok_or(LedgerError::NotFound(user_id))?;

        Ok(LedgerSnapshot {
            cash_balance,
            transactions: state.transactions.get(&user_id).cloned().unwrap_or_default(),
        })
    }
}

/// Unit of work over `InMemoryLedger`. Writes are staged locally and applied under
/// a single write lock on commit.
struct MemoryUnit {
    user_id: UserId,
    inner: Arc<Inner>,
    _guard: OwnedMutexGuard<()>,
    balance: Decimal,
    balance_dirty: bool,
    staged: Vec<Transaction>,
}

#[async_trait]
impl LedgerUnit for MemoryUnit {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    async fn balance(&mut self) -> Result<Decimal, LedgerError> {
        Ok(self.balance)
    }

    async fn sum_shares(&mut self, symbol: &str, action: Action) -> Result<i64, LedgerError> {
        let committed = {
            let state = self.inner.state.read().await;
            state.sum_shares(self.user_id, symbol, action)
        };
        Ok(committed + sum_matching(&self.staged, symbol, action))
    }

    async fn set_balance(&mut self, new_balance: Decimal) -> Result<(), LedgerError> {
        check_balance(new_balance)?;
        self.balance = new_balance;
        self.balance_dirty = true;
        Ok(())
    }

    async fn append(&mut self, txn: NewTransaction) -> Result<i64, LedgerError> {
        check_row(self.user_id, &txn)?;
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.staged.push(txn.with_id(id));
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), LedgerError> {
        let MemoryUnit {
            user_id,
            inner,
            _guard,
            balance,
            balance_dirty,
            staged,
        } = *self;

        let mut state = inner.state.write().await;
        if balance_dirty {
            state.accounts.insert(user_id, balance);
        }
        if !staged.is_empty() {
            state.transactions.entry(user_id).or_default().extend(staged);
        }
        Ok(())
    }
}
