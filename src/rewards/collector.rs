use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, RewardsError},
    rewards::{
        backoff::RetryState,
        fetcher::{RateLimitedFetcher, RewardSource},
        filter::WindowFilter,
        types::RewardRecord,
        window::TimeWindow,
    },
};

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Minimum spacing between two successful page requests
    pub page_delay: Duration,
    /// Consecutive rate-limited attempts tolerated before giving up
    pub max_retries: u32,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_secs(1),
            max_retries: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub pages_fetched: u32,
    pub requests: u32,
    pub backoff_waits: Vec<Duration>,
}

/// Records gathered by one run, newest first, with paging statistics
#[derive(Debug, Clone)]
pub struct Collection {
    pub records: Vec<RewardRecord>,
    pub stats: CollectionStats,
}

/// Walks an account's reward history page by page until the window is covered
pub struct RewardCollector<S> {
    fetcher: RateLimitedFetcher<S>,
    max_retries: u32,
}

impl<S: RewardSource> RewardCollector<S> {
    pub fn new(source: S, settings: CollectorSettings) -> Self {
        Self {
            fetcher: RateLimitedFetcher::new(source, settings.page_delay),
            max_retries: settings.max_retries,
        }
    }

    /// Collect every reward of `address` inside `window`, in the order served.
    pub async fn collect(
        &mut self,
        address: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RewardRecord>> {
        Ok(self.collect_detailed(address, window).await?.records)
    }

    /// Same as [`collect`](Self::collect) but also reports paging statistics.
    ///
    /// Rate limiting is retried with exponential backoff on the same page; any
    /// other error aborts the run and drops what was gathered so far.
    pub async fn collect_detailed(
        &mut self,
        address: &str,
        window: &TimeWindow,
    ) -> Result<Collection> {
        info!("Collecting rewards for {} from {}", address, window);

        let mut records = Vec::new();
        let mut stats = CollectionStats::default();
        let mut retry = RetryState::new(self.max_retries);
        let mut page_index: u32 = 0;

        loop {
            info!("Fetching rewards from page {}...", page_index + 1);
            stats.requests += 1;

            let page = match self.fetcher.fetch_page(address, page_index).await {
                Ok(page) => {
                    retry.reset();
                    page
                }
                Err(e) if e.is_recoverable() => {
                    let wait = retry.next_backoff()?;
                    warn!(
                        "API rate limit exceeded. Retrying in {} seconds (attempt {})...",
                        wait.as_secs(),
                        retry.attempt()
                    );
                    stats.backoff_waits.push(wait);
                    tokio::time::sleep(wait).await;
                    continue;
                }
                Err(e) => return Err(e),
            };

            stats.pages_fetched += 1;

            if page.is_empty() {
                info!("No more rewards found");
                break;
            }

            let outcome = WindowFilter::apply(&page, window);
            debug!(
                "Page {}: {} of {} records inside window",
                page_index + 1,
                outcome.matches.len(),
                page.len()
            );
            records.extend(outcome.matches);

            if !outcome.continue_paging {
                debug!("Oldest record on page {} predates the window, stopping", page_index + 1);
                break;
            }

            page_index = page_index.checked_add(1).ok_or_else(|| {
                RewardsError::RequestFailed("page index overflowed while paging".to_string())
            })?;
        }

        info!(
            "Collected {} rewards over {} pages ({} requests)",
            records.len(),
            stats.pages_fetched,
            stats.requests
        );

        Ok(Collection { records, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::{fetcher::MockRewardSource, types::Page, window::Quarter};
    use tokio::time::Instant;

    const DAY: i64 = 86_400;

    fn record(ts: i64) -> RewardRecord {
        RewardRecord {
            era: (ts / DAY) as u32,
            block_timestamp: ts,
            event_index: format!("{}-12", ts),
            extrinsic_index: format!("{}-1", ts),
            amount: 1_234_567_890,
        }
    }

    /// Pages of `sizes` records, one record every `step` seconds going back from `newest`.
    fn history(newest: i64, step: i64, sizes: &[usize]) -> Vec<Page> {
        let mut ts = newest;
        sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| {
                let records = (0..size)
                    .map(|_| {
                        let r = record(ts);
                        ts -= step;
                        r
                    })
                    .collect();
                Page::new(index as u32, records)
            })
            .collect()
    }

    fn serving(pages: Vec<Page>) -> MockRewardSource {
        let mut source = MockRewardSource::new();
        source.expect_fetch_page().returning(move |_, index| {
            Ok(pages
                .get(index as usize)
                .cloned()
                .unwrap_or_else(|| Page::new(index, Vec::new())))
        });
        source
    }

    fn settings() -> CollectorSettings {
        CollectorSettings {
            page_delay: Duration::from_secs(1),
            max_retries: 5,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_pages_then_stop() {
        let window = TimeWindow::for_quarter(2024, Quarter::Q1).unwrap();
        // 237 records spaced 8 hours apart, all inside Q1, newest on 2024-03-31
        let newest = window.end() - 3_600;
        let mut pages = history(newest, 8 * 3_600, &[100, 100, 37]);
        // The last record of page 3 falls before the window
        if let Some(last) = pages[2].records.last_mut() {
            last.block_timestamp = window.start() - 1;
        }

        let mut source = MockRewardSource::new();
        source
            .expect_fetch_page()
            .withf(|address, index| address == "X" && *index < 3)
            .times(3)
            .returning(move |_, index| Ok(pages[index as usize].clone()));

        let mut collector = RewardCollector::new(source, settings());
        let collection = collector.collect_detailed("X", &window).await.unwrap();

        assert_eq!(collection.records.len(), 236);
        assert_eq!(collection.stats.pages_fetched, 3);
        assert_eq!(collection.stats.requests, 3);
        assert!(collection.stats.backoff_waits.is_empty());
        assert!(collection.records.iter().all(|r| window.contains(r.block_timestamp)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_pages_inside_window() {
        let window = TimeWindow::for_quarter(2024, Quarter::Q1).unwrap();
        // One record per hour, the oldest exactly on the window start
        let newest = window.start() + 236 * 3_600;
        let pages = history(newest, 3_600, &[100, 100, 37]);
        assert!(pages[2].oldest().unwrap().block_timestamp >= window.start());

        let mut source = MockRewardSource::new();
        source
            .expect_fetch_page()
            .times(4)
            .returning(move |_, index| {
                Ok(pages
                    .get(index as usize)
                    .cloned()
                    .unwrap_or_else(|| Page::new(index, Vec::new())))
            });

        let mut collector = RewardCollector::new(source, settings());
        let records = collector.collect("X", &window).await.unwrap();

        // Oldest record sits exactly on the window start, so paging continues
        // and the empty fourth page ends the run.
        assert_eq!(records.len(), 237);
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_keep_page_order() {
        let window = TimeWindow::new(0, 10_000).unwrap();
        let pages = vec![
            Page::new(0, vec![record(9_000), record(8_000)]),
            Page::new(1, vec![record(7_000), record(6_000)]),
        ];

        let mut collector = RewardCollector::new(serving(pages), settings());
        let records = collector.collect("X", &window).await.unwrap();

        let timestamps: Vec<i64> = records.iter().map(|r| r.block_timestamp).collect();
        assert_eq!(timestamps, vec![9_000, 8_000, 7_000, 6_000]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_then_success() {
        let window = TimeWindow::new(0, 10_000).unwrap();
        let mut source = MockRewardSource::new();
        let mut calls = 0;
        source
            .expect_fetch_page()
            .withf(|_, index| *index == 0)
            .times(2)
            .returning(move |_, index| {
                calls += 1;
                if calls == 1 {
                    Err(RewardsError::RateLimited { code: 20008 })
                } else {
                    Ok(Page::new(index, vec![record(5_000), record(-1)]))
                }
            });

        let mut collector = RewardCollector::new(source, settings());
        let start = Instant::now();
        let collection = collector.collect_detailed("X", &window).await.unwrap();

        assert_eq!(collection.records.len(), 1);
        assert_eq!(collection.stats.pages_fetched, 1);
        assert_eq!(collection.stats.requests, 2);
        assert_eq!(collection.stats.backoff_waits, vec![Duration::from_secs(2)]);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_resets_after_success() {
        let window = TimeWindow::new(0, 10_000).unwrap();
        let mut source = MockRewardSource::new();
        let mut calls = 0;
        // page 0: limited twice, then ok; page 1: limited once, then ok
        source.expect_fetch_page().times(5).returning(move |_, index| {
            calls += 1;
            match calls {
                1 | 2 | 4 => Err(RewardsError::RateLimited { code: 20008 }),
                3 => Ok(Page::new(index, vec![record(9_000)])),
                _ => Ok(Page::new(index, vec![record(8_000), record(-5)])),
            }
        });

        let mut collector = RewardCollector::new(source, settings());
        let collection = collector.collect_detailed("X", &window).await.unwrap();

        assert_eq!(collection.records.len(), 2);
        assert_eq!(
            collection.stats.backoff_waits,
            vec![Duration::from_secs(2), Duration::from_secs(4), Duration::from_secs(2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_cap_is_fatal() {
        let window = TimeWindow::new(0, 10_000).unwrap();
        let mut source = MockRewardSource::new();
        source
            .expect_fetch_page()
            .times(4)
            .returning(|_, _| Err(RewardsError::RateLimited { code: 20008 }));

        let mut collector = RewardCollector::new(
            source,
            CollectorSettings {
                page_delay: Duration::from_secs(1),
                max_retries: 3,
            },
        );
        let result = collector.collect("X", &window).await;

        assert!(matches!(result, Err(RewardsError::RetryLimitExceeded { attempts: 3 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_discards_partial_results() {
        let window = TimeWindow::new(0, 10_000).unwrap();
        let mut source = MockRewardSource::new();
        source.expect_fetch_page().times(2).returning(|_, index| {
            if index == 0 {
                Ok(Page::new(0, vec![record(9_000), record(8_000)]))
            } else {
                Err(RewardsError::RequestFailed("connection reset".to_string()))
            }
        });

        let mut collector = RewardCollector::new(source, settings());
        let result = collector.collect("X", &window).await;

        assert!(matches!(result, Err(RewardsError::RequestFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_rewards_in_window() {
        let window = TimeWindow::new(1_000, 2_000).unwrap();
        let pages = vec![
            Page::new(0, vec![record(9_000), record(5_000)]),
            Page::new(1, vec![record(4_000), record(500)]),
        ];

        let mut collector = RewardCollector::new(serving(pages), settings());
        let collection = collector.collect_detailed("X", &window).await.unwrap();

        assert!(collection.records.is_empty());
        assert_eq!(collection.stats.pages_fetched, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_history() {
        let window = TimeWindow::new(1_000, 2_000).unwrap();
        let mut collector = RewardCollector::new(serving(Vec::new()), settings());

        let records = collector.collect("X", &window).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_runs_are_identical() {
        let window = TimeWindow::new(2_000, 8_500).unwrap();
        let pages = history(9_000, 100, &[30, 30, 30]);

        let mut collector = RewardCollector::new(serving(pages), settings());
        let first = collector.collect("X", &window).await.unwrap();
        let second = collector.collect("X", &window).await.unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pages_are_spaced_by_delay() {
        let window = TimeWindow::new(0, 10_000).unwrap();
        let pages = vec![
            Page::new(0, vec![record(9_000)]),
            Page::new(1, vec![record(8_000)]),
            Page::new(2, vec![record(7_000)]),
        ];

        let mut collector = RewardCollector::new(serving(pages), settings());
        let start = Instant::now();
        collector.collect("X", &window).await.unwrap();

        // Four requests (the last returns an empty page), three delays between them
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }
}
