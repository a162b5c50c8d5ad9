use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewardsError {
    #[error("Reward API rate limit exceeded (code {code})")]
    RateLimited { code: i64 },

    #[error("Reward API still rate limited after {attempts} retries")]
    RetryLimitExceeded { attempts: u32 },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Reward API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Token price unavailable: {0}")]
    PriceUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RewardsError {
    /// Only rate limiting is worth retrying; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RewardsError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, RewardsError>;
