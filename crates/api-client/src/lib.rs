//! # Quote Client Crate
//!
//! The quote collaborator: resolves a ticker symbol to `{symbol, name, price}`.
//! A symbol the provider does not know is `Ok(None)`; transport and protocol
//! failures are `Err`, so callers can tell "no such symbol" from "try again".

use async_trait::async_trait;
use core_types::Quote;

pub mod error;
pub mod http;
pub mod responses;
pub mod fixed;

// --- Public API ---
pub use error::ApiError;
pub use fixed::StaticQuoteProvider;
pub use http::HttpQuoteClient;
pub use responses::QuoteResponse;

/// The generic, abstract interface for a price source.
/// The trade executor depends on this trait only, so the live client and the
/// static table can be swapped freely.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Looks up a normalised (upper-case) symbol.
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, ApiError>;
}
