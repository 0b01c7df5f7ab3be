use crate::error::TradeError;
use api_client::QuoteProvider;
use core_types::{Action, Holding, PortfolioView, Quote, Transaction, UserId};
use futures::future::try_join_all;
use ledger::{Ledger, LedgerError, TransactionLog};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Decimal places a price is kept to, matching the `NUMERIC(20, 4)` ledger columns.
pub const PRICE_SCALE: u32 = 4;

/// Looks up a normalised symbol and quantises the price to `PRICE_SCALE`.
///
/// The returned quote carries the requested symbol rather than the provider's
/// spelling, so every row for a position nets under one key. A missing quote, or
/// one whose price rounds to zero, is `SymbolNotFound`.
pub async fn priced_quote(quotes: &dyn QuoteProvider, symbol: &str) -> Result<Quote, TradeError> {
    quotes
        .lookup(symbol)
        .await?
        .map(|quote| Quote {
            symbol: symbol.to_string(),
            name: quote.name,
            price: quote.price.round_dp(PRICE_SCALE),
        })
        .filter(|quote| quote.price > Decimal::ZERO)
        .ok_or_else(|| TradeError::SymbolNotFound(symbol.to_string()))
}

/// Net share counts of one user, derived from the transaction log.
///
/// Every symbol that has ever been traded keeps an entry, even once its net count
/// falls back to zero, so the set of ever-held symbols and the set of open
/// positions can both be read from the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Positions {
    net: BTreeMap<String, i64>,
}

impl Positions {
    /// Folds a history into net shares per symbol: `sum(BUY) - sum(SELL)`.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut net = BTreeMap::new();
        for txn in transactions {
            *net.entry(txn.symbol.clone()).or_insert(0) += txn.signed_shares();
        }
        Self { net }
    }

    /// Net shares held in `symbol`; zero for a symbol never traded.
    pub fn shares(&self, symbol: &str) -> i64 {
        self.net.get(symbol).copied().unwrap_or(0)
    }

    /// Symbols with a positive net count, in symbol order.
    pub fn open(&self) -> impl Iterator<Item = (&str, i64)> {
        self.net
            .iter()
            .filter(|(_, shares)| **shares > 0)
            .map(|(symbol, shares)| (symbol.as_str(), *shares))
    }

    /// Every symbol that appears in the history, including fully sold ones.
    pub fn ever_held(&self) -> impl Iterator<Item = &str> {
        self.net.keys().map(String::as_str)
    }

    pub fn has_traded(&self, symbol: &str) -> bool {
        self.net.contains_key(symbol)
    }
}

/// Net shares of a single symbol, from the log's per-action sums.
pub async fn current_shares(
    log: &dyn TransactionLog,
    user_id: UserId,
    symbol: &str,
) -> Result<i64, LedgerError> {
    let bought = log.sum_shares(user_id, symbol, Action::Buy).await?;
    let sold = log.sum_shares(user_id, symbol, Action::Sell).await?;
    Ok(bought - sold)
}

/// Builds the read-only portfolio view: every open position valued at a live quote,
/// plus cash and total net worth.
///
/// Balance and history come from one ledger snapshot, so a concurrent commit is
/// either fully reflected or not at all. A held symbol the quote provider no longer
/// knows fails the whole view with `SymbolNotFound`.
pub async fn build_portfolio(
    ledger: &dyn Ledger,
    quotes: &dyn QuoteProvider,
    user_id: UserId,
) -> Result<PortfolioView, TradeError> {
    let snapshot = ledger.snapshot(user_id).await?;
    let positions = Positions::from_transactions(&snapshot.transactions);

    let lookups = positions.open().map(|(symbol, net_shares)| async move {
        let quote = priced_quote(quotes, symbol).await?;
        let market_value = Decimal::from(net_shares) * quote.price;

        Ok::<_, TradeError>(Holding {
            symbol: symbol.to_string(),
            company_name: quote.name,
            net_shares,
            current_price: quote.price,
            market_value,
        })
    });
    let holdings = try_join_all(lookups).await?;

    let invested: Decimal = holdings.iter().map(|h| h.market_value).sum();
    Ok(PortfolioView {
        total_net_worth: snapshot.cash_balance + invested,
        cash_balance: snapshot.cash_balance,
        holdings,
    })
}
