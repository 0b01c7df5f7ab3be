use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Action, NewTransaction, Transaction, UserId};
use ledger::{
    AccountStore, Ledger, LedgerError, LedgerSnapshot, LedgerUnit, TransactionLog, check_balance,
    check_row,
};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, PgConnection};

/// Maps a driver failure onto the ledger's storage error. Every sqlx error is treated
/// as the store being unavailable; callers may retry.
fn storage(e: sqlx::Error) -> LedgerError {
    tracing::error!(error = %e, "Ledger storage error.");
    LedgerError::Storage(e.to_string())
}

/// Database-specific transaction struct that matches the `transactions` table schema.
#[derive(Debug, Clone, FromRow)]
pub struct DbTransaction {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub company_name: String,
    pub shares: i64,
    pub price_per_share: Decimal,
    pub executed_at: DateTime<Utc>,
    pub action: String,
}

impl TryFrom<DbTransaction> for Transaction {
    type Error = LedgerError;

    fn try_from(row: DbTransaction) -> Result<Self, Self::Error> {
        let action: Action = row
            .action
            .parse()
            .map_err(|e: core_types::CoreError| LedgerError::Invariant(e.to_string()))?;

        Ok(Transaction {
            id: row.id,
            user_id: UserId(row.user_id),
            symbol: row.symbol,
            company_name: row.company_name,
            shares: row.shares,
            price_per_share: row.price_per_share,
            timestamp: row.executed_at,
            action,
        })
    }
}

const SELECT_TRANSACTIONS: &str = r#"
    SELECT id, user_id, symbol, company_name, shares, price_per_share, executed_at, action
    FROM transactions
    WHERE user_id = $1
    ORDER BY id ASC
"#;

const SUM_SHARES: &str = r#"
    SELECT COALESCE(SUM(shares), 0)::BIGINT
    FROM transactions
    WHERE user_id = $1 AND symbol = $2 AND action = $3
"#;

async fn fetch_transactions(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<Transaction>, LedgerError> {
    let rows = sqlx::query_as::<_, DbTransaction>(SELECT_TRANSACTIONS)
        .bind(user_id.0)
        .fetch_all(conn)
        .await
        .map_err(storage)?;

    rows.into_iter().map(Transaction::try_from).collect()
}

async fn fetch_sum_shares(
    conn: &mut PgConnection,
    user_id: UserId,
    symbol: &str,
    action: Action,
) -> Result<i64, LedgerError> {
    // COALESCE turns the NULL of an empty SUM into zero.
    sqlx::query_scalar::<_, i64>(SUM_SHARES)
        .bind(user_id.0)
        .bind(symbol)
        .bind(action.as_str())
        .fetch_one(conn)
        .await
        .map_err(storage)
}

/// The `PgLedger` provides the durable `Ledger` implementation. It encapsulates
/// all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    /// Creates a new `PgLedger` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgLedger {
    async fn create_account(
        &self,
        user_id: UserId,
        starting_cash: Decimal,
    ) -> Result<(), LedgerError> {
        check_balance(starting_cash)?;
        let result = sqlx::query(
            "INSERT INTO accounts (user_id, cash) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id.0)
        .bind(starting_cash)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::AccountExists(user_id));
        }
        tracing::info!(%user_id, %starting_cash, "Opened account.");
        Ok(())
    }

    async fn get_balance(&self, user_id: UserId) -> Result<Decimal, LedgerError> {
        sqlx::query_scalar::<_, Decimal>("SELECT cash FROM accounts WHERE user_id = $1")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::NotFound(user_id))
    }
}

#[async_trait]
impl TransactionLog for PgLedger {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        fetch_transactions(&mut conn, user_id).await
    }

    async fn sum_shares(
        &self,
        user_id: UserId,
        symbol: &str,
        action: Action,
    ) -> Result<i64, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        fetch_sum_shares(&mut conn, user_id, symbol, action).await
    }
}

#[async_trait]
impl Ledger for PgLedger {
    async fn begin(&self, user_id: UserId) -> Result<Box<dyn LedgerUnit>, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        // Blocks until any other open unit for this user commits or rolls back.
        let balance = sqlx::query_scalar::<_, Decimal>(
            "SELECT cash FROM accounts WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?
        .ok_or(LedgerError::NotFound(user_id))?;

        Ok(Box::new(PgUnit {
            user_id,
            tx,
            balance,
        }))
    }

    async fn snapshot(&self, user_id: UserId) -> Result<LedgerSnapshot, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        let cash_balance =
            sqlx::query_scalar::<_, Decimal>("SELECT cash FROM accounts WHERE user_id = $1")
                .bind(user_id.0)
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage)?
                .ok_or(LedgerError::NotFound(user_id))?;
        let transactions = fetch_transactions(&mut tx, user_id).await?;

        tx.commit().await.map_err(storage)?;
        Ok(LedgerSnapshot {
            cash_balance,
            transactions,
        })
    }
}

/// A database transaction holding the `FOR UPDATE` lock on one account row.
/// sqlx rolls the transaction back if it is dropped without a commit.
struct PgUnit {
    user_id: UserId,
    tx: sqlx::Transaction<'static, Postgres>,
    balance: Decimal,
}

#[async_trait]
impl LedgerUnit for PgUnit {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    async fn balance(&mut self) -> Result<Decimal, LedgerError> {
        Ok(self.balance)
    }

    async fn sum_shares(&mut self, symbol: &str, action: Action) -> Result<i64, LedgerError> {
        fetch_sum_shares(&mut self.tx, self.user_id, symbol, action).await
    }

    async fn set_balance(&mut self, new_balance: Decimal) -> Result<(), LedgerError> {
        check_balance(new_balance)?;
        sqlx::query("UPDATE accounts SET cash = $1 WHERE user_id = $2")
            .bind(new_balance)
            .bind(self.user_id.0)
            .execute(&mut *self.tx)
            .await
            .map_err(storage)?;
        self.balance = new_balance;
        Ok(())
    }

    async fn append(&mut self, txn: NewTransaction) -> Result<i64, LedgerError> {
        check_row(self.user_id, &txn)?;
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transactions (user_id, symbol, company_name, shares, price_per_share, executed_at, action)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(txn.user_id.0)
        .bind(&txn.symbol)
        .bind(&txn.company_name)
        .bind(txn.shares)
        .bind(txn.price_per_share)
        .bind(txn.timestamp)
        .bind(txn.action.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(storage)
    }

    async fn commit(self: Box<Self>) -> Result<(), LedgerError> {
        self.tx.commit().await.map_err(storage)
    }
}
