//! # Ledger Crate
//!
//! This crate defines the storage contracts for the two durable relations of the
//! trading core, the Account Store and the Transaction Log, and ships an in-memory
//! implementation used by tests and offline simulation.
//!
//! ## Architectural Principles
//!
//! - **Append-Only Log:** The `TransactionLog` contract has no update or delete
//!   operation. Positions are always derived from it, never stored.
//! - **Single Writer Path:** Balances are written and transactions appended only
//!   through a `LedgerUnit`, a unit of work scoped to one user. A unit holds that
//!   user's commit lock for its whole life, so commits for the same user are
//!   serialized while different users proceed in parallel.
//! - **All-or-Nothing:** Dropping a unit without calling `commit` discards every
//!   staged change.
//!
//! ## Public API
//!
//! - `AccountStore`, `TransactionLog`, `Ledger`, `LedgerUnit`: the storage traits.
//! - `LedgerSnapshot`: a consistent read of one user's balance and history.
//! - `InMemoryLedger`: the in-process implementation.
//! - `LedgerError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod memory;
pub mod store;

pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use store::{AccountStore, Ledger, LedgerSnapshot, LedgerUnit, TransactionLog, check_balance, check_row};
