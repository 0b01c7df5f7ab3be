use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use core_types::{PortfolioView, Quote, Transaction, UserId, parse_shares};
use executor::{TradeError, TradeReceipt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The header that carries the caller's identity. Authentication itself happens
/// upstream; this service trusts whatever id arrives here.
pub const USER_HEADER: &str = "x-user-id";

pub fn user_from_headers(headers: &HeaderMap) -> Result<UserId, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(UserId)
        .ok_or(AppError::Unauthenticated(USER_HEADER))
}

/// Share counts arrive either as a JSON number or as the raw text of a form field.
/// Any other JSON value still deserializes, so it is rejected as `InvalidInput`
/// rather than failing body extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShareInput {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl ShareInput {
    pub fn parse(&self) -> Result<i64, TradeError> {
        match self {
            ShareInput::Number(n) => Ok(*n),
            ShareInput::Text(text) => Ok(parse_shares(text)?),
            ShareInput::Other(value) => Err(TradeError::InvalidInput {
                field: "shares".to_string(),
                reason: format!("{value} is not a whole number"),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub shares: ShareInput,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub user_id: UserId,
    pub cash_balance: Decimal,
}

/// # POST /api/accounts
pub async fn open_account(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let user_id = user_from_headers(&headers)?;
    let cash_balance = state.executor.open_account(user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            user_id,
            cash_balance,
        }),
    ))
}

/// # GET /api/portfolio
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PortfolioView>, AppError> {
    let user_id = user_from_headers(&headers)?;
    Ok(Json(state.executor.portfolio(user_id).await?))
}

/// # GET /api/history
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let user_id = user_from_headers(&headers)?;
    Ok(Json(state.executor.history(user_id).await?))
}

/// # GET /api/sellable
/// Symbols the caller may name in a sell request.
pub async fn get_sellable(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, AppError> {
    let user_id = user_from_headers(&headers)?;
    Ok(Json(state.executor.sellable_symbols(user_id).await?))
}

/// # GET /api/quote/:symbol
pub async fn get_quote(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(state.executor.quote(&symbol).await?))
}

/// # POST /api/buy
pub async fn buy(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeReceipt>, AppError> {
    let user_id = user_from_headers(&headers)?;
    let shares = request.shares.parse()?;
    Ok(Json(state.executor.buy(user_id, &request.symbol, shares).await?))
}

/// # POST /api/sell
pub async fn sell(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeReceipt>, AppError> {
    let user_id = user_from_headers(&headers)?;
    let shares = request.shares.parse()?;
    Ok(Json(state.executor.sell(user_id, &request.symbol, shares).await?))
}
