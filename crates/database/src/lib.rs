//! # Database Crate
//!
//! This crate acts as the durable backend of the trading ledger on PostgreSQL.
//! It is the system's permanent record of balances and trades.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate implements the `ledger` storage contracts and hides all
//!   SQL from the rest of the application.
//! - **Row-Lock Serialization:** A unit of work is a database transaction whose first
//!   statement locks the user's account row, so commits for one user queue behind each
//!   other while other users are unaffected.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share a `PgPool`.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `PgLedger`: The `Ledger` implementation backed by the pool.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbTransaction, PgLedger};
