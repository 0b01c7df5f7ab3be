pub mod enums;
pub mod error;
pub mod input;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Action;
pub use error::CoreError;
pub use input::{normalize_symbol, parse_shares};
pub use structs::{Holding, NewTransaction, PortfolioView, Quote, Transaction, UserId};
