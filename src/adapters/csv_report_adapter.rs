//! CSV export of the per-day backtest table.

use crate::domain::backtest::BacktestReport;
use crate::domain::error::SentitraderError;
use crate::ports::report_port::ReportPort;
use log::info;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Write the table to any writer, one header line then one line per day.
    pub fn write_to<W: std::io::Write>(
        &self,
        report: &BacktestReport,
        writer: W,
    ) -> Result<(), SentitraderError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &report.rows {
            wtr.serialize(row).map_err(|e| SentitraderError::Report {
                reason: format!("failed to serialize row {}: {}", row.date, e),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &BacktestReport, output_path: &Path) -> Result<(), SentitraderError> {
        let file = std::fs::File::create(output_path).map_err(|e| SentitraderError::Report {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;
        self.write_to(report, file)?;
        info!("wrote {} rows to {}", report.rows.len(), output_path.display());
        Ok(())
    }
}
