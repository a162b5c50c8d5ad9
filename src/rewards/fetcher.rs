use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::{
    error::{Result, RewardsError},
    rewards::types::Page,
};

/// Paged access to an account's reward history, newest records first.
///
/// Implementations issue exactly one request per call and report rate
/// limiting as `RewardsError::RateLimited` without retrying.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardSource: Send + Sync {
    async fn fetch_page(&self, address: &str, page_index: u32) -> Result<Page>;
}

/// Spaces successful page requests at least `page_delay` apart
pub struct RateLimitedFetcher<S> {
    source: S,
    page_delay: Duration,
    last_success: Option<Instant>,
}

impl<S: RewardSource> RateLimitedFetcher<S> {
    pub fn new(source: S, page_delay: Duration) -> Self {
        Self {
            source,
            page_delay,
            last_success: None,
        }
    }

    pub async fn fetch_page(&mut self, address: &str, page_index: u32) -> Result<Page> {
        if address.trim().is_empty() {
            return Err(RewardsError::InvalidInput("wallet address is empty".to_string()));
        }

        if let Some(last) = self.last_success {
            let elapsed = last.elapsed();
            if elapsed < self.page_delay {
                let remaining = self.page_delay - elapsed;
                debug!("Waiting {:?} before requesting page {}", remaining, page_index);
                tokio::time::sleep(remaining).await;
            }
        }

        let page = self.source.fetch_page(address, page_index).await?;
        self.last_success = Some(Instant::now());

        debug!("Page {} returned {} records", page_index, page.len());
        Ok(page)
    }
}
