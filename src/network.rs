use std::fmt;
use std::str::FromStr;

use crate::error::RewardsError;

/// Relay chains whose staking rewards can be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Polkadot,
    Kusama,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Polkadot, Network::Kusama];

    /// Number of decimals between the raw planck amount and one token
    pub fn decimals(&self) -> u32 {
        match self {
            Network::Polkadot => 10,
            Network::Kusama => 12,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Network::Polkadot => "DOT",
            Network::Kusama => "KSM",
        }
    }

    /// Identifier used by the CoinGecko price API
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Network::Polkadot => "polkadot",
            Network::Kusama => "kusama",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Polkadot => "Polkadot",
            Network::Kusama => "Kusama",
        }
    }

    /// Convert a raw on-chain amount to display units
    pub fn to_tokens(&self, raw: u128) -> f64 {
        raw as f64 / 10f64.powi(self.decimals() as i32)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Polkadot => write!(f, "polkadot"),
            Network::Kusama => write!(f, "kusama"),
        }
    }
}

impl FromStr for Network {
    type Err = RewardsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polkadot" | "dot" => Ok(Network::Polkadot),
            "kusama" | "ksm" => Ok(Network::Kusama),
            other => Err(RewardsError::InvalidInput(format!("Unknown network: {}", other))),
        }
    }
}
