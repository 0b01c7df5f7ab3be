use crate::error::ApiError;
use crate::QuoteProvider;
use async_trait::async_trait;
use configuration::QuotesConfig;
use core_types::Quote;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A price table held in memory, for offline simulation and tests.
///
/// Prices can be moved with `set_price` while the provider is shared.
#[derive(Debug, Default)]
pub struct StaticQuoteProvider {
    quotes: RwLock<HashMap<String, Quote>>,
}

impl StaticQuoteProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from `[quotes.prices]`.
    pub fn from_config(config: &QuotesConfig) -> Self {
        let quotes = config
            .prices
            .iter()
            .map(|(symbol, entry)| {
                let symbol = symbol.to_ascii_uppercase();
                let quote = Quote {
                    symbol: symbol.clone(),
                    name: entry.name.clone(),
                    price: entry.price,
                };
                (symbol, quote)
            })
            .collect();

        Self {
            quotes: RwLock::new(quotes),
        }
    }

    /// Adds a symbol or moves its price.
    pub async fn set_price(&self, symbol: &str, name: &str, price: Decimal) {
        let symbol = symbol.to_ascii_uppercase();
        let quote = Quote {
            symbol: symbol.clone(),
            name: name.to_string(),
            price,
        };
        self.quotes.write().await.insert(symbol, quote);
    }

    /// Withdraws a symbol so later lookups miss.
    pub async fn remove(&self, symbol: &str) {
        self.quotes.write().await.remove(&symbol.to_ascii_uppercase());
    }
}

#[async_trait]
impl QuoteProvider for StaticQuoteProvider {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, ApiError> {
        let quotes = self.quotes.read().await;
        Ok(quotes.get(&symbol.to_ascii_uppercase()).cloned())
    }
}
