use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::{Result, RewardsError},
    rewards::{Page, RewardSource},
    subscan::types::{ApiResponse, RewardListRequest},
};

/// Application-level code Subscan returns when the caller is throttled
const RATE_LIMIT_CODE: i64 = 20008;

const REWARD_CATEGORY: &str = "Reward";

/// HTTP client for one network's `account/reward_slash` endpoint
#[derive(Clone)]
pub struct SubscanClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    page_size: u32,
}

impl SubscanClient {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, endpoint, api_key, page_size))
    }

    pub fn with_client(
        http: reqwest::Client,
        endpoint: &str,
        api_key: Option<String>,
        page_size: u32,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            page_size,
        }
    }

}

#[async_trait]
impl RewardSource for SubscanClient {
    async fn fetch_page(&self, address: &str, page_index: u32) -> Result<Page> {
        let body = RewardListRequest {
            address,
            category: REWARD_CATEGORY,
            page: page_index,
            row: self.page_size,
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let envelope: ApiResponse = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if status == StatusCode::TOO_MANY_REQUESTS => {
                return Err(RewardsError::RateLimited {
                    code: status.as_u16() as i64,
                });
            }
            Err(e) if status.is_success() => {
                return Err(RewardsError::RequestFailed(format!("malformed response: {}", e)));
            }
            Err(_) => {
                return Err(RewardsError::RequestFailed(format!(
                    "HTTP {}: {}",
                    status,
                    String::from_utf8_lossy(&bytes).chars().take(200).collect::<String>()
                )));
            }
        };

        // The throttling code can arrive with either a 200 or a 429 status
        if envelope.code == RATE_LIMIT_CODE {
            return Err(RewardsError::RateLimited { code: envelope.code });
        }

        if !status.is_success() {
            return Err(RewardsError::RequestFailed(format!(
                "HTTP {}: {}",
                status, envelope.message
            )));
        }

        if envelope.code != 0 {
            return Err(RewardsError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }

        let (count, records) = match envelope.data {
            Some(data) => (data.count, data.list.unwrap_or_default()),
            None => (0, Vec::new()),
        };
        debug!(
            "Subscan page {} for {}: {} records ({} total)",
            page_index,
            address,
            records.len(),
            count
        );

        Ok(Page::new(page_index, records))
    }
}
