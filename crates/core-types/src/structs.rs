use crate::enums::Action;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an authenticated user, supplied by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A price snapshot from the quote provider, assumed accurate at the instant of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
}

/// A trade that has passed validation and is about to be appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub symbol: String,
    pub company_name: String,
    pub shares: i64,
    pub price_per_share: Decimal,
    pub timestamp: DateTime<Utc>,
    pub action: Action,
}

impl NewTransaction {
    /// Builds the ledger row for a trade of `shares` at the quoted price.
    pub fn from_quote(user_id: UserId, quote: &Quote, shares: i64, action: Action) -> Self {
        Self {
            user_id,
            symbol: quote.symbol.clone(),
            company_name: quote.name.clone(),
            shares,
            price_per_share: quote.price,
            timestamp: Utc::now(),
            action,
        }
    }

    /// Cash moved by this trade: `shares * price`.
    pub fn notional(&self) -> Decimal {
        Decimal::from(self.shares) * self.price_per_share
    }

    /// Attaches the id assigned by the store.
    pub fn with_id(self, id: i64) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            symbol: self.symbol,
            company_name: self.company_name,
            shares: self.shares,
            price_per_share: self.price_per_share,
            timestamp: self.timestamp,
            action: self.action,
        }
    }
}

/// An immutable, committed ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: UserId,
    pub symbol: String,
    pub company_name: String,
    pub shares: i64,
    pub price_per_share: Decimal,
    pub timestamp: DateTime<Utc>,
    pub action: Action,
}

impl Transaction {
    /// Shares with the sign of the action: positive for BUY, negative for SELL.
    pub fn signed_shares(&self) -> i64 {
        self.action.sign() * self.shares
    }

    pub fn notional(&self) -> Decimal {
        Decimal::from(self.shares) * self.price_per_share
    }
}

/// One line of the portfolio view: a currently held symbol valued at a live quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub company_name: String,
    pub net_shares: i64,
    pub current_price: Decimal,
    pub market_value: Decimal,
}

/// Derived, read-only state of an account at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioView {
    pub holdings: Vec<Holding>,
    pub cash_balance: Decimal,
    pub total_net_worth: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn signed_shares_follow_action() {
        let quote = Quote {
            symbol: "AAPL".into(),
            name: "Apple Inc".into(),
            price: dec!(150),
        };
        let buy = NewTransaction::from_quote(UserId(1), &quote, 10, Action::Buy).with_id(1);
        let sell = NewTransaction::from_quote(UserId(1), &quote, 4, Action::Sell).with_id(2);

        assert_eq!(buy.signed_shares(), 10);
        assert_eq!(sell.signed_shares(), -4);
        assert_eq!(buy.notional(), dec!(1500));
    }
}
