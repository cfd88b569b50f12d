//! CoinGecko market-data provider implementation

use crate::{
    config::DashboardConfig,
    constants::{COINGECKO_COIN_ENDPOINT, COINGECKO_MARKETS_ENDPOINT, PRICE_CHANGE_WINDOWS},
    error::ProviderError,
    provider::{MarketDataProvider, MarketsQuery},
    types::{Coin, CoinDetail},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Instant;

/// Per-currency values, e.g. `{"usd": 67000.0, "eur": 62000.0}`
type CurrencyMap<T> = HashMap<String, Option<T>>;

/// CoinGecko `/coins/{id}` response (only the fields the dashboard shows)
#[derive(Debug, Deserialize)]
struct CoinResponse {
    id: String,
    symbol: String,
    name: String,
    #[serde(default)]
    image: Option<CoinImages>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    market_data: Option<MarketData>,
}

#[derive(Debug, Deserialize)]
struct CoinImages {
    #[serde(default)]
    large: Option<String>,
    #[serde(default)]
    small: Option<String>,
    #[serde(default)]
    thumb: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarketData {
    current_price: Option<CurrencyMap<f64>>,
    market_cap: Option<CurrencyMap<f64>>,
    total_volume: Option<CurrencyMap<f64>>,
    high_24h: Option<CurrencyMap<f64>>,
    low_24h: Option<CurrencyMap<f64>>,
    ath: Option<CurrencyMap<f64>>,
    ath_date: Option<CurrencyMap<DateTime<Utc>>>,
    atl: Option<CurrencyMap<f64>>,
    atl_date: Option<CurrencyMap<DateTime<Utc>>>,
    price_change_percentage_1h_in_currency: Option<CurrencyMap<f64>>,
    price_change_percentage_24h_in_currency: Option<CurrencyMap<f64>>,
    price_change_percentage_7d_in_currency: Option<CurrencyMap<f64>>,
    price_change_percentage_30d_in_currency: Option<CurrencyMap<f64>>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d: Option<f64>,
    price_change_percentage_30d: Option<f64>,
    market_cap_change_24h_in_currency: Option<CurrencyMap<f64>>,
    market_cap_change_24h: Option<f64>,
    market_cap_change_percentage_24h: Option<f64>,
    circulating_supply: Option<f64>,
    total_supply: Option<f64>,
    max_supply: Option<f64>,
}

/// Picks the value for `currency` out of an optional per-currency map
fn pick<T: Copy>(map: &Option<CurrencyMap<T>>, currency: &str) -> Option<T> {
    map.as_ref().and_then(|m| m.get(currency).copied().flatten())
}

impl CoinResponse {
    /// Flattens the nested per-currency maps into a detail record
    fn into_detail(self, currency: &str) -> CoinDetail {
        let md = self.market_data.unwrap_or_default();
        let image = self
            .image
            .and_then(|images| images.large.or(images.small).or(images.thumb));

        CoinDetail {
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            image,
            market_cap_rank: self.market_cap_rank,
            current_price: pick(&md.current_price, currency),
            price_change_percentage_1h: pick(&md.price_change_percentage_1h_in_currency, currency),
            price_change_percentage_24h: pick(&md.price_change_percentage_24h_in_currency, currency)
                .or(md.price_change_percentage_24h),
            price_change_percentage_7d: pick(&md.price_change_percentage_7d_in_currency, currency)
                .or(md.price_change_percentage_7d),
            price_change_percentage_30d: pick(&md.price_change_percentage_30d_in_currency, currency)
                .or(md.price_change_percentage_30d),
            market_cap: pick(&md.market_cap, currency),
            market_cap_change_24h: pick(&md.market_cap_change_24h_in_currency, currency)
                .or(md.market_cap_change_24h),
            market_cap_change_percentage_24h: md.market_cap_change_percentage_24h,
            total_volume: pick(&md.total_volume, currency),
            high_24h: pick(&md.high_24h, currency),
            low_24h: pick(&md.low_24h, currency),
            circulating_supply: md.circulating_supply,
            total_supply: md.total_supply,
            max_supply: md.max_supply,
            ath: pick(&md.ath, currency),
            ath_date: pick(&md.ath_date, currency),
            atl: pick(&md.atl, currency),
            atl_date: pick(&md.atl_date, currency),
        }
    }
}

/// CoinGecko market-data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::from_config(&DashboardConfig::default())
    }

    /// Creates a provider using the base URL, user agent and timeout from `config`
    pub fn from_config(config: &DashboardConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Builds the URL for the ranked market list
    fn build_markets_url(&self, query: &MarketsQuery) -> Result<Url, ProviderError> {
        let per_page = query.per_page.to_string();
        Url::parse_with_params(
            &format!("{}{}", self.base_url, COINGECKO_MARKETS_ENDPOINT),
            &[
                ("vs_currency", query.vs_currency.as_str()),
                ("order", query.order.as_str()),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
                ("price_change_percentage", PRICE_CHANGE_WINDOWS),
            ],
        )
        .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }

    /// Builds the URL for a single coin, percent-encoding the id as one path segment
    fn build_coin_url(&self, id: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, COINGECKO_COIN_ENDPOINT))
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .push(id);

        url.query_pairs_mut()
            .append_pair("localization", "false")
            .append_pair("tickers", "false")
            .append_pair("market_data", "true")
            .append_pair("community_data", "false")
            .append_pair("developer_data", "false")
            .append_pair("sparkline", "false");

        Ok(url)
    }

    /// Sends a GET request and returns the body of a successful response
    async fn get_text(&self, url: Url) -> Result<(StatusCode, String), ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        let status = response.status();
        let body = response.text().await.map_err(ProviderError::NetworkError)?;
        Ok((status, body))
    }
}

/// Maps a non-success status to the matching error
fn status_error(status: StatusCode, body: &str) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimitExceeded
    } else {
        ProviderError::ApiError(format!("HTTP {}: {}", status, body))
    }
}

/// Parses a `/coins/markets` body
fn parse_markets(body: &str) -> Result<Vec<Coin>, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!(
            "Failed to parse CoinGecko markets response: {}. Response: {}",
            e, body
        ))
    })
}

/// Parses a `/coins/{id}` body into a detail record for `currency`
fn parse_coin(body: &str, currency: &str) -> Result<CoinDetail, ProviderError> {
    let response: CoinResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!(
            "Failed to parse CoinGecko coin response: {}. Response: {}",
            e, body
        ))
    })?;
    Ok(response.into_detail(currency))
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(&self, query: &MarketsQuery) -> Result<Vec<Coin>, ProviderError> {
        let url = self.build_markets_url(query)?;
        tracing::debug!(url = %url, "Fetching market list from CoinGecko");
        let start = Instant::now();

        let (status, body) = self.get_text(url).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let coins = parse_markets(&body)?;
        tracing::debug!(
            count = coins.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched market list from CoinGecko"
        );

        Ok(coins)
    }

    async fn fetch_coin(&self, id: &str, vs_currency: &str) -> Result<CoinDetail, ProviderError> {
        let url = self.build_coin_url(id)?;
        tracing::debug!(url = %url, coin = id, "Fetching coin detail from CoinGecko");

        let (status, body) = self.get_text(url).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        parse_coin(&body, vs_currency)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
