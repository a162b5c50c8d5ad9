use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{error::Result, report::builder::RewardReport};

/// Write the report as a CSV spreadsheet inside `output_dir`, returning the file path.
///
/// Rows go to a temporary file that is renamed into place once complete, so a
/// failed write never leaves a truncated report behind.
pub fn write_csv(report: &RewardReport, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report.meta.file_name());
    let tmp_path = path.with_extension("csv.tmp");

    if let Err(e) = write_rows(report, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    fs::rename(&tmp_path, &path)?;

    info!("Report written to {}", path.display());
    Ok(path)
}

fn write_rows(report: &RewardReport, path: &Path) -> Result<()> {
    let currency = report.meta.currency.to_uppercase();
    let value_header = format!("{}_Value", currency);
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "Date",
        "Era",
        "Block_timestamp",
        "Event_index",
        "Event_id",
        "Extrinsic_index",
        "Amount",
        value_header.as_str(),
    ])?;

    for row in &report.rows {
        writer.write_record([
            row.date.clone(),
            row.era.to_string(),
            row.block_timestamp.to_string(),
            row.event_index.clone(),
            row.event_index.clone(),
            row.extrinsic_index.clone(),
            row.amount.to_string(),
            row.value.to_string(),
        ])?;
    }

    writer.write_record([
        "Total".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        format!("{} {} per token", report.price, currency),
        report.total_amount.to_string(),
        report.total_value.to_string(),
    ])?;

    writer.flush()?;
    debug!("Wrote {} reward rows to {}", report.rows.len(), path.display());
    Ok(())
}
