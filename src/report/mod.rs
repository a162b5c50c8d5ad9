pub mod builder;
pub mod writer;

pub use builder::{ReportBuilder, ReportMeta, ReportRow, RewardReport};
pub use writer::write_csv;
