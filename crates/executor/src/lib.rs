//! # Executor Crate
//!
//! This crate provides the trade-execution core: validating a buy or sell request,
//! pricing it through the quote collaborator, and committing the cash movement and
//! the ledger row as one unit. It also derives positions and the portfolio view from
//! the transaction log.
//!
//! ## Architectural Principles
//!
//! - **Validate, Then Mutate:** Every rejection is detected before the ledger is written,
//!   so a failed trade leaves no trace and needs no compensation.
//! - **Serialized Commits:** The balance and share checks are repeated inside the
//!   per-user unit of work, so concurrent trades for one user cannot both spend the
//!   same cash or sell the same shares.
//! - **Derived Positions:** Holdings are never stored. They are recomputed from the
//!   append-only log on every read.
//!
//! ## Public API
//!
//! - `TradeExecutor`: buy, sell, quote, history, portfolio, and account opening.
//! - `Positions`: net shares per symbol derived from a transaction history.
//! - `build_portfolio`: the read-only portfolio view.
//! - `priced_quote`: a quote lookup quantised to the ledger's price scale.
//! - `TradeError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod portfolio;
pub mod trade;

// Re-export the key components to provide a clean, public-facing API.
pub use error::TradeError;
pub use portfolio::{PRICE_SCALE, Positions, build_portfolio, current_shares, priced_quote};
pub use trade::{TradeExecutor, TradeReceipt};
