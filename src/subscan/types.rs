use serde::{Deserialize, Serialize};

use crate::rewards::RewardRecord;

/// Body of a `reward_slash` list request
#[derive(Debug, Serialize)]
pub struct RewardListRequest<'a> {
    pub address: &'a str,
    pub category: &'a str,
    pub page: u32,
    pub row: u32,
}

/// Envelope shared by every Subscan response
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<RewardListData>,
}

#[derive(Debug, Deserialize)]
pub struct RewardListData {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub list: Option<Vec<RewardRecord>>,
}
