use serde::Deserialize;
use std::time::Duration;

use crate::network::Network;
use crate::rewards::CollectorSettings;

const DEFAULT_CONFIG_PATH: &str = "config/default";
const DEFAULT_POLKADOT_URL: &str =
    "https://polkadot.api.subscan.io/api/v2/scan/account/reward_slash";
const DEFAULT_KUSAMA_URL: &str = "https://kusama.api.subscan.io/api/v2/scan/account/reward_slash";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub subscan: SubscanConfig,
    pub price: PriceConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubscanConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub polkadot_url: String,
    pub kusama_url: String,
    pub page_size: u32,
    pub page_delay_ms: u64,
    pub max_retries: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PriceConfig {
    pub base_url: String,
    pub currency: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub output_dir: String,
}

impl Config {
    /// Load defaults, then the optional config file, then `STAKING_*` environment overrides.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .set_default("subscan.polkadot_url", DEFAULT_POLKADOT_URL)?
            .set_default("subscan.kusama_url", DEFAULT_KUSAMA_URL)?
            .set_default("subscan.page_size", 100)?
            .set_default("subscan.page_delay_ms", 1000)?
            .set_default("subscan.max_retries", 8)?
            .set_default("subscan.request_timeout_secs", 30)?
            .set_default("price.base_url", "https://api.coingecko.com/api/v3")?
            .set_default("price.currency", "eur")?
            .set_default("report.output_dir", ".")?
            .add_source(
                config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH))
                    .required(path.is_some()),
            )
            .add_source(
                config::Environment::with_prefix("STAKING")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.subscan.page_size == 0 || self.subscan.page_size > 100 {
            anyhow::bail!(
                "subscan.page_size must be between 1 and 100, got {}",
                self.subscan.page_size
            );
        }
        if self.price.currency.trim().is_empty() {
            anyhow::bail!("price.currency must not be empty");
        }
        Ok(())
    }

    /// Subscan reward endpoint for the given network
    pub fn endpoint_for(&self, network: Network) -> &str {
        match network {
            Network::Polkadot => &self.subscan.polkadot_url,
            Network::Kusama => &self.subscan.kusama_url,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.subscan.request_timeout_secs)
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            page_delay: Duration::from_millis(self.subscan.page_delay_ms),
            max_retries: self.subscan.max_retries,
        }
    }
}
