pub mod types;
pub mod window;
pub mod filter;
pub mod backoff;
pub mod fetcher;
pub mod collector;

pub use types::{Page, RewardRecord};
pub use window::{Quarter, TimeWindow};
pub use filter::{FilterOutcome, WindowFilter};
pub use backoff::RetryState;
pub use fetcher::{RateLimitedFetcher, RewardSource};
pub use collector::{Collection, CollectionStats, CollectorSettings, RewardCollector};
