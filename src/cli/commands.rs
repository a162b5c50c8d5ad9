use clap::{Parser, Subcommand};

use staking_rewards_report::{network::Network, rewards::Quarter};

#[derive(Parser)]
#[command(name = "staking-rewards")]
#[command(about = "Quarterly staking reward reports for Polkadot and Kusama accounts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (defaults to config/default.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect rewards for one quarter and write a spreadsheet. Missing values are prompted for.
    Report {
        /// Network (polkadot/dot or kusama/ksm)
        #[arg(short, long)]
        network: Option<Network>,

        /// Year of the rewards
        #[arg(short, long)]
        year: Option<String>,

        /// Quarter (Q1-Q4, q1-q4 or 1-4)
        #[arg(short, long)]
        quarter: Option<Quarter>,

        /// Wallet address
        #[arg(short, long)]
        address: Option<String>,

        /// Token price in the configured currency (fetched from CoinGecko when omitted)
        #[arg(short, long)]
        price: Option<String>,

        /// Directory the spreadsheet is written to
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Show the current token price
    Price {
        /// Network (polkadot/dot or kusama/ksm)
        #[arg(short, long)]
        network: Option<Network>,
    },
}

/// A flag given as an empty string counts as not given
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
