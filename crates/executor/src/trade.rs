use crate::error::TradeError;
use crate::portfolio::{Positions, build_portfolio, current_shares, priced_quote};
use api_client::QuoteProvider;
use chrono::Utc;
use core_types::{
    Action, NewTransaction, PortfolioView, Quote, Transaction, UserId, normalize_symbol,
};
use ledger::Ledger;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// What a caller gets back from an accepted trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeReceipt {
    pub transaction: Transaction,
    /// Cash balance immediately after the commit.
    pub cash_balance: Decimal,
}

/// Orchestrates validation, pricing and the atomic commit of single trades.
///
/// The executor holds no per-user state of its own; everything it knows comes from
/// the ledger and the quote provider, so one instance can serve any number of
/// concurrent callers.
#[derive(Clone)]
pub struct TradeExecutor {
    ledger: Arc<dyn Ledger>,
    quotes: Arc<dyn QuoteProvider>,
    starting_cash: Decimal,
}

impl TradeExecutor {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        quotes: Arc<dyn QuoteProvider>,
        starting_cash: Decimal,
    ) -> Self {
        Self {
            ledger,
            quotes,
            starting_cash,
        }
    }

    /// Creates the account with the configured starting balance and returns it.
    pub async fn open_account(&self, user_id: UserId) -> Result<Decimal, TradeError> {
        self.ledger
            .create_account(user_id, self.starting_cash)
            .await?;
        tracing::info!(%user_id, starting_cash = %self.starting_cash, "Account opened.");
        Ok(self.starting_cash)
    }

    /// Looks up a live quote. An unknown symbol is `SymbolNotFound`.
    pub async fn quote(&self, symbol: &str) -> Result<Quote, TradeError> {
        let symbol = normalize_symbol(symbol)?;
        self.resolve(&symbol).await
    }

    pub async fn balance(&self, user_id: UserId) -> Result<Decimal, TradeError> {
        Ok(self.ledger.get_balance(user_id).await?)
    }

    /// Every committed trade of the user, oldest first.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<Transaction>, TradeError> {
        Ok(self.ledger.snapshot(user_id).await?.transactions)
    }

    /// Symbols the user has ever held, the only symbols a sell may name.
    pub async fn sellable_symbols(&self, user_id: UserId) -> Result<Vec<String>, TradeError> {
        let history = self.history(user_id).await?;
        let positions = Positions::from_transactions(&history);
        Ok(positions.ever_held().map(str::to_string).collect())
    }

    pub async fn portfolio(&self, user_id: UserId) -> Result<PortfolioView, TradeError> {
        build_portfolio(self.ledger.as_ref(), self.quotes.as_ref(), user_id).await
    }

    /// Buys `shares` of `symbol` at the current quote.
    pub async fn buy(
        &self,
        user_id: UserId,
        symbol: &str,
        shares: i64,
    ) -> Result<TradeReceipt, TradeError> {
        let shares = validate_shares(shares)?;
        let symbol = normalize_symbol(symbol)?;
        let quote = self.resolve(&symbol).await?;

        let txn = NewTransaction::from_quote(user_id, &quote, shares, Action::Buy);
        let cost = txn.notional();
        let balance = self.ledger.get_balance(user_id).await?;
        if balance < cost {
            tracing::warn!(%user_id, %symbol, shares, %cost, %balance, "Buy rejected: insufficient funds.");
            return Err(TradeError::InsufficientFunds {
                required: cost,
                available: balance,
            });
        }

        self.commit(txn).await
    }

    /// Sells `shares` of a symbol the user has held before, at the current quote.
    pub async fn sell(
        &self,
        user_id: UserId,
        symbol: &str,
        shares: i64,
    ) -> Result<TradeReceipt, TradeError> {
        let shares = validate_shares(shares)?;
        let symbol = normalize_symbol(symbol)?;

        let history = self.ledger.snapshot(user_id).await?.transactions;
        if !Positions::from_transactions(&history).has_traded(&symbol) {
            tracing::warn!(%user_id, %symbol, "Sell rejected: symbol never held.");
            return Err(TradeError::InvalidSymbol(symbol));
        }

        let held = current_shares(self.ledger.as_ref(), user_id, &symbol).await?;
        let quote = self.resolve(&symbol).await?;
        if held < shares {
            tracing::warn!(%user_id, %symbol, shares, held, "Sell rejected: insufficient shares.");
            return Err(TradeError::InsufficientShares {
                requested: shares,
                held,
            });
        }

        let txn = NewTransaction::from_quote(user_id, &quote, shares, Action::Sell);
        self.commit(txn).await
    }

    async fn resolve(&self, symbol: &str) -> Result<Quote, TradeError> {
        priced_quote(self.quotes.as_ref(), symbol).await
    }

    /// Applies a priced trade inside the user's unit of work.
    ///
    /// The funds or shares check is repeated under the lock: the pre-lock check
    /// may have raced with another commit for the same user. Any early return
    /// drops the unit, which discards everything staged so far.
    async fn commit(&self, mut txn: NewTransaction) -> Result<TradeReceipt, TradeError> {
        let user_id = txn.user_id;
        let mut unit = self.ledger.begin(user_id).await?;
        let balance = unit.balance().await?;
        let notional = txn.notional();

        let new_balance = match txn.action {
            Action::Buy => {
                if balance < notional {
                    tracing::warn!(%user_id, symbol = %txn.symbol, %notional, %balance, "Buy rejected at commit: insufficient funds.");
                    return Err(TradeError::InsufficientFunds {
                        required: notional,
                        available: balance,
                    });
                }
                balance - notional
            }
            Action::Sell => {
                let bought = unit.sum_shares(&txn.symbol, Action::Buy).await?;
                let sold = unit.sum_shares(&txn.symbol, Action::Sell).await?;
                let held = bought - sold;
                if held < txn.shares {
                    tracing::warn!(%user_id, symbol = %txn.symbol, shares = txn.shares, held, "Sell rejected at commit: insufficient shares.");
                    return Err(TradeError::InsufficientShares {
                        requested: txn.shares,
                        held,
                    });
                }
                balance + notional
            }
        };

        txn.timestamp = Utc::now();
        unit.set_balance(new_balance).await?;
        let id = unit.append(txn.clone()).await?;
        unit.commit().await?;

        tracing::info!(
            %user_id,
            id,
            action = %txn.action,
            symbol = %txn.symbol,
            shares = txn.shares,
            price = %txn.price_per_share,
            cash_balance = %new_balance,
            "Trade committed."
        );

        Ok(TradeReceipt {
            transaction: txn.with_id(id),
            cash_balance: new_balance,
        })
    }
}

fn validate_shares(shares: i64) -> Result<i64, TradeError> {
    if shares < 1 {
        return Err(TradeError::InvalidInput {
            field: "shares".to_string(),
            reason: format!("{shares} is not a positive number of shares"),
        });
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PRICE_SCALE;
    use api_client::{ApiError, StaticQuoteProvider};
    use async_trait::async_trait;
    use ledger::{
        AccountStore, InMemoryLedger, LedgerError, LedgerSnapshot, LedgerUnit, TransactionLog,
    };
    use rust_decimal_macros::dec;

    const ALICE: UserId = UserId(1);

    struct Harness {
        executor: TradeExecutor,
        ledger: InMemoryLedger,
        quotes: Arc<StaticQuoteProvider>,
    }

    async fn harness(cash: Decimal) -> Harness {
        let ledger = InMemoryLedger::new();
        let quotes = Arc::new(StaticQuoteProvider::new());
        quotes.set_price("AAPL", "Apple Inc", dec!(150)).await;
        quotes.set_price("GOOG", "Alphabet Inc", dec!(2800)).await;

        let executor = TradeExecutor::new(Arc::new(ledger.clone()), quotes.clone(), cash);
        executor.open_account(ALICE).await.unwrap();
        Harness {
            executor,
            ledger,
            quotes,
        }
    }

    async fn snapshot(h: &Harness) -> LedgerSnapshot {
        h.ledger.snapshot(ALICE).await.unwrap()
    }

    async fn held(h: &Harness, symbol: &str) -> i64 {
        current_shares(&h.ledger, ALICE, symbol).await.unwrap()
    }

    struct UnreachableQuotes;

    #[async_trait]
    impl QuoteProvider for UnreachableQuotes {
        async fn lookup(&self, _symbol: &str) -> Result<Option<Quote>, ApiError> {
            Err(ApiError::Status(503))
        }
    }

    /// Echoes every symbol back with an exchange suffix, the way some feeds do.
    struct SuffixedQuotes;

    #[async_trait]
    impl QuoteProvider for SuffixedQuotes {
        async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, ApiError> {
            Ok(Some(Quote {
                symbol: format!("{}.us", symbol.to_lowercase()),
                name: "Echo Corp".to_string(),
                price: dec!(10),
            }))
        }
    }

    /// Delegates to an in-memory ledger but loses the connection at commit time.
    struct FailingCommitLedger {
        inner: InMemoryLedger,
    }

    #[async_trait]
    impl AccountStore for FailingCommitLedger {
        async fn create_account(
            &self,
            user_id: UserId,
            starting_cash: Decimal,
        ) -> Result<(), LedgerError> {
            self.inner.create_account(user_id, starting_cash).await
        }

        async fn get_balance(&self, user_id: UserId) -> Result<Decimal, LedgerError> {
            self.inner.get_balance(user_id).await
        }
    }

    #[async_trait]
    impl TransactionLog for FailingCommitLedger {
        async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError> {
            self.inner.list_by_user(user_id).await
        }

        async fn sum_shares(
            &self,
            user_id: UserId,
            symbol: &str,
            action: Action,
        ) -> Result<i64, LedgerError> {
            self.inner.sum_shares(user_id, symbol, action).await
        }
    }

    #[async_trait]
    impl Ledger for FailingCommitLedger {
        async fn begin(&self, user_id: UserId) -> Result<Box<dyn LedgerUnit>, LedgerError> {
            Ok(Box::new(FailingCommitUnit {
                inner: self.inner.begin(user_id).await?,
            }))
        }

        async fn snapshot(&self, user_id: UserId) -> Result<LedgerSnapshot, LedgerError> {
            self.inner.snapshot(user_id).await
        }
    }

    struct FailingCommitUnit {
        inner: Box<dyn LedgerUnit>,
    }

    #[async_trait]
    impl LedgerUnit for FailingCommitUnit {
        fn user_id(&self) -> UserId {
            self.inner.user_id()
        }

        async fn balance(&mut self) -> Result<Decimal, LedgerError> {
            self.inner.balance().await
        }

        async fn sum_shares(&mut self, symbol: &str, action: Action) -> Result<i64, LedgerError> {
            self.inner.sum_shares(symbol, action).await
        }

        async fn set_balance(&mut self, new_balance: Decimal) -> Result<(), LedgerError> {
            self.inner.set_balance(new_balance).await
        }

        async fn append(&mut self, txn: NewTransaction) -> Result<i64, LedgerError> {
            self.inner.append(txn).await
        }

        async fn commit(self: Box<Self>) -> Result<(), LedgerError> {
            // The inner unit is dropped uncommitted, discarding its staged writes.
            Err(LedgerError::Storage("connection reset by peer".to_string()))
        }
    }

    #[tokio::test]
    async fn buy_then_sell_moves_cash_and_shares() {
        let h = harness(dec!(10000)).await;

        let receipt = h.executor.buy(ALICE, "AAPL", 10).await.unwrap();
        assert_eq!(receipt.cash_balance, dec!(8500));
        assert_eq!(receipt.transaction.action, Action::Buy);
        assert_eq!(receipt.transaction.company_name, "Apple Inc");
        assert_eq!(h.executor.balance(ALICE).await.unwrap(), dec!(8500));
        assert_eq!(held(&h, "AAPL").await, 10);

        h.quotes.set_price("AAPL", "Apple Inc", dec!(160)).await;
        let receipt = h.executor.sell(ALICE, "aapl", 5).await.unwrap();
        assert_eq!(receipt.cash_balance, dec!(9300));
        assert_eq!(receipt.transaction.price_per_share, dec!(160));
        assert_eq!(h.executor.balance(ALICE).await.unwrap(), dec!(9300));
        assert_eq!(held(&h, "AAPL").await, 5);
    }

    #[tokio::test]
    async fn unaffordable_buy_is_rejected() {
        let h = harness(dec!(100)).await;
        h.quotes.set_price("CHEAP", "Cheap Co", dec!(20)).await;

        let err = h.executor.buy(ALICE, "CHEAP", 10).await.unwrap_err();
        assert_eq!(
            err,
            TradeError::InsufficientFunds {
                required: dec!(200),
                available: dec!(100)
            }
        );
        assert_eq!(h.executor.balance(ALICE).await.unwrap(), dec!(100));
        assert!(h.executor.history(ALICE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn overselling_is_rejected() {
        let h = harness(dec!(10000)).await;
        h.executor.buy(ALICE, "AAPL", 5).await.unwrap();
        let before = snapshot(&h).await;

        let err = h.executor.sell(ALICE, "AAPL", 10).await.unwrap_err();
        assert_eq!(
            err,
            TradeError::InsufficientShares {
                requested: 10,
                held: 5
            }
        );
        assert_eq!(held(&h, "AAPL").await, 5);
        assert_eq!(snapshot(&h).await, before);
    }

    #[tokio::test]
    async fn selling_a_never_held_symbol_is_invalid() {
        let h = harness(dec!(10000)).await;

        // Quoted, but never bought.
        let err = h.executor.sell(ALICE, "GOOG", 1).await.unwrap_err();
        assert_eq!(err, TradeError::InvalidSymbol("GOOG".to_string()));

        // Neither quoted nor bought.
        let err = h.executor.sell(ALICE, "NOPE", 1).await.unwrap_err();
        assert_eq!(err, TradeError::InvalidSymbol("NOPE".to_string()));
    }

    #[tokio::test]
    async fn malformed_requests_are_invalid_input() {
        let h = harness(dec!(10000)).await;

        for shares in [0, -3] {
            assert!(matches!(
                h.executor.buy(ALICE, "AAPL", shares).await,
                Err(TradeError::InvalidInput { .. })
            ));
            assert!(matches!(
                h.executor.sell(ALICE, "AAPL", shares).await,
                Err(TradeError::InvalidInput { .. })
            ));
        }
        assert!(matches!(
            h.executor.buy(ALICE, "   ", 1).await,
            Err(TradeError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_symbols_and_accounts() {
        let h = harness(dec!(10000)).await;

        assert_eq!(
            h.executor.buy(ALICE, "ZZZZ", 1).await.unwrap_err(),
            TradeError::SymbolNotFound("ZZZZ".to_string())
        );
        assert_eq!(
            h.executor.buy(UserId(42), "AAPL", 1).await.unwrap_err(),
            TradeError::NotFound(UserId(42))
        );
        assert_eq!(
            h.executor.open_account(ALICE).await.unwrap_err(),
            TradeError::AccountExists(ALICE)
        );
        assert_eq!(
            h.executor.quote("zzzz").await.unwrap_err(),
            TradeError::SymbolNotFound("ZZZZ".to_string())
        );
    }

    #[tokio::test]
    async fn selling_requires_a_live_quote() {
        let h = harness(dec!(10000)).await;
        h.executor.buy(ALICE, "AAPL", 2).await.unwrap();
        h.quotes.remove("AAPL").await;
        let before = snapshot(&h).await;

        let err = h.executor.sell(ALICE, "AAPL", 1).await.unwrap_err();
        assert_eq!(err, TradeError::SymbolNotFound("AAPL".to_string()));
        assert_eq!(snapshot(&h).await, before);
    }

    #[tokio::test]
    async fn quote_outage_is_retryable_and_changes_nothing() {
        let h = harness(dec!(10000)).await;
        let executor = TradeExecutor::new(
            Arc::new(h.ledger.clone()),
            Arc::new(UnreachableQuotes),
            dec!(10000),
        );

        let err = executor.buy(ALICE, "AAPL", 1).await.unwrap_err();
        assert!(matches!(err, TradeError::QuoteUnavailable(_)));
        assert!(err.is_retryable());
        assert_eq!(snapshot(&h).await.cash_balance, dec!(10000));
    }

    #[tokio::test]
    async fn rejections_leave_the_ledger_untouched() {
        let h = harness(dec!(1000)).await;
        h.executor.buy(ALICE, "AAPL", 2).await.unwrap();
        let before = snapshot(&h).await;

        let attempts = vec![
            h.executor.buy(ALICE, "AAPL", 0).await,
            h.executor.buy(ALICE, "AAPL", 100).await,
            h.executor.buy(ALICE, "ZZZZ", 1).await,
            h.executor.sell(ALICE, "AAPL", 3).await,
            h.executor.sell(ALICE, "GOOG", 1).await,
            h.executor.sell(ALICE, "", 1).await,
        ];
        assert!(attempts.iter().all(Result::is_err));
        assert_eq!(snapshot(&h).await, before);
    }

    #[tokio::test]
    async fn balance_is_conserved_across_trades() {
        let starting = dec!(50000);
        let h = harness(starting).await;
        h.quotes.set_price("MSFT", "Microsoft", dec!(310.25)).await;

        h.executor.buy(ALICE, "AAPL", 12).await.unwrap();
        h.executor.buy(ALICE, "MSFT", 7).await.unwrap();
        h.quotes.set_price("AAPL", "Apple Inc", dec!(171.10)).await;
        h.executor.sell(ALICE, "AAPL", 5).await.unwrap();
        h.executor.buy(ALICE, "GOOG", 3).await.unwrap();
        h.quotes.set_price("MSFT", "Microsoft", dec!(299.99)).await;
        h.executor.sell(ALICE, "MSFT", 7).await.unwrap();

        let history = h.executor.history(ALICE).await.unwrap();
        let net_cost: Decimal = history
            .iter()
            .map(|t| match t.action {
                Action::Buy => t.notional(),
                Action::Sell => -t.notional(),
            })
            .sum();
        assert_eq!(h.executor.balance(ALICE).await.unwrap(), starting - net_cost);

        let ids: Vec<i64> = history.iter().map(|t| t.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn portfolio_values_open_positions_only() {
        let h = harness(dec!(10000)).await;
        h.quotes.set_price("TSLA", "Tesla Inc", dec!(200)).await;
        h.executor.buy(ALICE, "AAPL", 10).await.unwrap();
        h.executor.buy(ALICE, "TSLA", 4).await.unwrap();
        h.executor.sell(ALICE, "TSLA", 4).await.unwrap();
        h.quotes.set_price("AAPL", "Apple Inc", dec!(160)).await;

        let view = h.executor.portfolio(ALICE).await.unwrap();
        assert_eq!(view.cash_balance, dec!(8500));
        assert_eq!(view.holdings.len(), 1);
        assert_eq!(view.holdings[0].symbol, "AAPL");
        assert_eq!(view.holdings[0].net_shares, 10);
        assert_eq!(view.holdings[0].market_value, dec!(1600));
        assert_eq!(view.total_net_worth, dec!(10100));

        // Fully sold symbols stay sellable-by-name and in the history.
        assert_eq!(
            h.executor.sellable_symbols(ALICE).await.unwrap(),
            vec!["AAPL".to_string(), "TSLA".to_string()]
        );
        assert_eq!(h.executor.history(ALICE).await.unwrap().len(), 3);

        // Reading twice without a trade in between gives the same view.
        assert_eq!(h.executor.portfolio(ALICE).await.unwrap(), view);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_buys_never_overspend() {
        let h = harness(dec!(1000)).await;
        h.quotes.set_price("BRK", "Berkshire", dec!(300)).await;
        let executor = Arc::new(h.executor.clone());

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let executor = executor.clone();
                tokio::spawn(async move { executor.buy(ALICE, "BRK", 1).await })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(TradeError::InsufficientFunds { .. }) => {}
                Err(other) => panic!("unexpected rejection: {other}"),
            }
        }

        assert_eq!(accepted, 3);
        assert_eq!(h.executor.balance(ALICE).await.unwrap(), dec!(100));
        assert_eq!(held(&h, "BRK").await, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sells_never_go_short() {
        let h = harness(dec!(10000)).await;
        h.executor.buy(ALICE, "AAPL", 5).await.unwrap();
        let executor = Arc::new(h.executor.clone());

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let executor = executor.clone();
                tokio::spawn(async move { executor.sell(ALICE, "AAPL", 2).await })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(TradeError::InsufficientShares { .. }) => {}
                Err(other) => panic!("unexpected rejection: {other}"),
            }
        }

        assert_eq!(accepted, 2);
        assert_eq!(held(&h, "AAPL").await, 1);
        assert_eq!(h.executor.balance(ALICE).await.unwrap(), dec!(9850));
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let h = harness(dec!(1000)).await;
        let bob = UserId(2);
        h.ledger.create_account(bob, dec!(500)).await.unwrap();

        h.executor.buy(ALICE, "AAPL", 2).await.unwrap();
        assert_eq!(
            h.executor.sell(bob, "AAPL", 1).await.unwrap_err(),
            TradeError::InvalidSymbol("AAPL".to_string())
        );
        assert_eq!(h.executor.balance(bob).await.unwrap(), dec!(500));
    }

    #[tokio::test]
    async fn storage_failure_at_commit_changes_nothing() {
        let h = harness(dec!(10000)).await;
        h.executor.buy(ALICE, "AAPL", 4).await.unwrap();
        let before = snapshot(&h).await;

        let executor = TradeExecutor::new(
            Arc::new(FailingCommitLedger {
                inner: h.ledger.clone(),
            }),
            h.quotes.clone(),
            dec!(10000),
        );
        let attempts = [
            executor.buy(ALICE, "AAPL", 1).await,
            executor.sell(ALICE, "AAPL", 1).await,
        ];
        for result in attempts {
            let err = result.unwrap_err();
            assert!(matches!(err, TradeError::StorageUnavailable(_)));
            assert!(err.is_retryable());
        }
        assert_eq!(snapshot(&h).await, before);

        // The failed units released the user's commit lock.
        h.executor.buy(ALICE, "AAPL", 1).await.unwrap();
        assert_eq!(held(&h, "AAPL").await, 5);
    }

    #[tokio::test]
    async fn prices_are_kept_to_ledger_precision() {
        let h = harness(dec!(10000)).await;
        h.quotes.set_price("PENNY", "Penny Co", dec!(0.12346)).await;

        let receipt = h.executor.buy(ALICE, "PENNY", 3).await.unwrap();
        assert_eq!(receipt.transaction.price_per_share, dec!(0.1235));
        assert_eq!(receipt.cash_balance, dec!(9999.6295));
        assert!(receipt.cash_balance.scale() <= PRICE_SCALE);

        // The stored balance agrees with the stored row.
        let history = h.executor.history(ALICE).await.unwrap();
        assert_eq!(
            h.executor.balance(ALICE).await.unwrap(),
            dec!(10000) - Decimal::from(3) * history[0].price_per_share
        );

        h.quotes.set_price("DUST", "Dust Co", dec!(0.00004)).await;
        assert_eq!(
            h.executor.buy(ALICE, "DUST", 1).await.unwrap_err(),
            TradeError::SymbolNotFound("DUST".to_string())
        );
        assert_eq!(
            h.executor.quote("dust").await.unwrap_err(),
            TradeError::SymbolNotFound("DUST".to_string())
        );
    }

    #[tokio::test]
    async fn rows_use_the_requested_symbol() {
        let h = harness(dec!(10000)).await;
        let executor = TradeExecutor::new(
            Arc::new(h.ledger.clone()),
            Arc::new(SuffixedQuotes),
            dec!(10000),
        );

        let bought = executor.buy(ALICE, "ibm", 3).await.unwrap();
        assert_eq!(bought.transaction.symbol, "IBM");
        assert_eq!(bought.transaction.company_name, "Echo Corp");
        assert_eq!(executor.quote("ibm").await.unwrap().symbol, "IBM");

        let sold = executor.sell(ALICE, "IBM", 3).await.unwrap();
        assert_eq!(sold.transaction.symbol, "IBM");
        assert_eq!(held(&h, "IBM").await, 0);
        assert_eq!(
            executor.sellable_symbols(ALICE).await.unwrap(),
            vec!["IBM".to_string()]
        );
    }
}
