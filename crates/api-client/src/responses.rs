use rust_decimal::Decimal;
use serde::Deserialize;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The subset of `GET /stock/{symbol}/quote` that the ledger needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub symbol: String,
    pub company_name: String,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub latest_price: Option<Decimal>,
}
