use chrono::DateTime;

use crate::{
    network::Network,
    rewards::{Quarter, RewardRecord},
};

/// Identifies whose rewards a report covers
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub network: Network,
    pub year: i32,
    pub quarter: Quarter,
    pub address: String,
    pub currency: String,
}

impl ReportMeta {
    /// `{year}-{quarter}-{network}-{address}.csv`, with anything in the address
    /// other than ASCII letters, digits, `-` and `_` replaced by `_`
    pub fn file_name(&self) -> String {
        let address: String = self
            .address
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}-{}-{}-{}.csv", self.year, self.quarter, self.network, address)
    }
}

/// One priced reward line
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: String,
    pub era: u32,
    pub block_timestamp: i64,
    pub event_index: String,
    pub extrinsic_index: String,
    pub amount: f64,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct RewardReport {
    pub meta: ReportMeta,
    pub price: f64,
    pub rows: Vec<ReportRow>,
    pub total_amount: f64,
    pub total_value: f64,
}

pub struct ReportBuilder;

impl ReportBuilder {
    /// Convert raw amounts to tokens and price them, keeping record order
    pub fn build(records: &[RewardRecord], price: f64, meta: ReportMeta) -> RewardReport {
        let network = meta.network;

        let rows: Vec<ReportRow> = records
            .iter()
            .map(|record| {
                let amount = network.to_tokens(record.amount);
                ReportRow {
                    date: format_date(record.block_timestamp),
                    era: record.era,
                    block_timestamp: record.block_timestamp,
                    event_index: record.event_index.clone(),
                    extrinsic_index: record.extrinsic_index.clone(),
                    amount,
                    value: amount * price,
                }
            })
            .collect();

        let total_raw = records
            .iter()
            .fold(0u128, |acc, record| acc.saturating_add(record.amount));
        let total_amount = network.to_tokens(total_raw);

        RewardReport {
            meta,
            price,
            rows,
            total_amount,
            total_value: total_amount * price,
        }
    }
}

fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
