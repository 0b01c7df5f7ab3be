use crate::error::ApiError;
use crate::responses::QuoteResponse;
use crate::QuoteProvider;
use async_trait::async_trait;
use configuration::QuotesConfig;
use core_types::Quote;
use reqwest::{StatusCode, Url};

/// Fetches live quotes from an IEX-style REST API
/// (`{base_url}/stock/{symbol}/quote?token={api_key}`).
#[derive(Clone)]
pub struct HttpQuoteClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpQuoteClient {
    pub fn new(config: &QuotesConfig) -> Result<Self, ApiError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ApiError::InvalidData("an API key is required for live quotes".to_string())
        })?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ApiError::InvalidData(format!("invalid quotes.base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidData(format!(
                "quotes.base_url '{}' cannot hold a path",
                config.base_url
            )));
        }

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(config.timeout())
                .build()?,
            base_url,
            api_key,
        })
    }

    /// `{base_url}/stock/{symbol}/quote`, with the symbol percent-encoded as a single
    /// path segment.
    fn quote_url(&self, symbol: &str) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidData("base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend(["stock", symbol, "quote"]);
        Ok(url)
    }
}

/// Turns a decoded response into a `Quote`. A response without a price is treated
/// as an unknown symbol, matching how the provider reports delisted tickers.
pub(crate) fn into_quote(response: QuoteResponse) -> Option<Quote> {
    let price = response.latest_price.filter(|p| p.is_sign_positive() && !p.is_zero())?;
    Some(Quote {
        symbol: response.symbol.to_ascii_uppercase(),
        name: response.company_name,
        price,
    })
}

#[async_trait]
impl QuoteProvider for HttpQuoteClient {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, ApiError> {
        let url = self.quote_url(symbol)?;

        let response = self
            .client
            .get(url)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(symbol, "Quote provider does not know symbol.");
            return Ok(None);
        }
        if !status.is_success() {
            tracing::warn!(symbol, status = status.as_u16(), "Quote request failed.");
            return Err(ApiError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let body: QuoteResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(into_quote(body))
    }
}
