use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    error::{Result, RewardsError},
    network::Network,
};

/// Spot price lookup against the CoinGecko `simple/price` endpoint
pub struct PriceClient {
    http: reqwest::Client,
    base_url: String,
    currency: String,
}

impl PriceClient {
    pub fn new(base_url: &str, currency: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            currency: currency.to_lowercase(),
        })
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Current price of one token of `network`. Any failure is reported as
    /// `PriceUnavailable`; no retry is attempted.
    pub async fn fetch_price(&self, network: Network) -> Result<f64> {
        let token_id = network.coingecko_id();
        let url = format!("{}/simple/price", self.base_url);
        info!("Fetching token price for {} from CoinGecko...", network);

        let response = self
            .http
            .get(&url)
            .query(&[("ids", token_id), ("vs_currencies", self.currency.as_str())])
            .send()
            .await
            .map_err(|e| RewardsError::PriceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RewardsError::PriceUnavailable(format!(
                "CoinGecko returned HTTP {}",
                status
            )));
        }

        let prices: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .map_err(|e| {
                RewardsError::PriceUnavailable(format!("malformed price response: {}", e))
            })?;

        let price = prices
            .get(token_id)
            .and_then(|quotes| quotes.get(&self.currency))
            .copied()
            .ok_or_else(|| {
                RewardsError::PriceUnavailable(format!(
                    "no {} quote for {}",
                    self.currency, token_id
                ))
            })?;

        if !price.is_finite() || price < 0.0 {
            return Err(RewardsError::PriceUnavailable(format!("invalid price {}", price)));
        }

        debug!("Token price for {}: {} {}", network, price, self.currency);
        Ok(price)
    }
}

/// Parse an operator-supplied price, rejecting negative and non-numeric input
pub fn parse_price(input: &str) -> Result<f64> {
    let price: f64 = input
        .trim()
        .parse()
        .map_err(|_| RewardsError::InvalidInput(format!("invalid token price: {}", input)))?;
    if !price.is_finite() || price < 0.0 {
        return Err(RewardsError::InvalidInput(format!("invalid token price: {}", input)));
    }
    Ok(price)
}
