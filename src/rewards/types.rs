use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single staking reward event as reported by the block explorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub era: u32,
    pub block_timestamp: i64,
    pub event_index: String,
    pub extrinsic_index: String,
    /// Raw amount in the chain's smallest unit
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: u128,
}

/// One batch of records from a single paged request, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub index: u32,
    pub records: Vec<RewardRecord>,
}

impl Page {
    pub fn new(index: u32, records: Vec<RewardRecord>) -> Self {
        Self { index, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Last record on the page, which is the oldest one
    pub fn oldest(&self) -> Option<&RewardRecord> {
        self.records.last()
    }
}

/// Subscan returns amounts as decimal strings, older deployments as numbers.
/// Numbers above `u64::MAX` lose precision in JSON and must arrive as strings.
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> de::Visitor<'de> for AmountVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or an integer string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u128, E> {
            Ok(v as u128)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<u128, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u128, E> {
            u128::try_from(v).map_err(|_| E::custom(format!("negative reward amount: {}", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<u128, E> {
            Err(E::custom(format!(
                "reward amount {} is not an exact integer; large amounts must be strings",
                v
            )))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<u128, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                return Err(E::custom("empty reward amount"));
            }
            trimmed
                .parse::<u128>()
                .map_err(|e| E::custom(format!("invalid reward amount {:?}: {}", v, e)))
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}
