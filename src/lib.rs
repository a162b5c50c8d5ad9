pub mod config;
pub mod error;
pub mod network;
pub mod price;
pub mod report;
pub mod rewards;
pub mod subscan;
pub mod utils;

pub use crate::config::Config;
pub use crate::error::{Result, RewardsError};
