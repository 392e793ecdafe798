//! Bulk import and export of the asset register as CSV.
//!
//! Import is row-independent: a bad row is reported and skipped, never
//! rolled back with its neighbours, even when its bytes are not UTF-8.
//! Only a missing file or an unusable header row (a required column
//! missing, or one column named twice) stops the batch, and both are
//! checked before any row is written.

use crate::config::TransferConfig;
use crate::domain::{AssetId, MaintenanceStatus, UserId};
use crate::models::{AssetDetails, AssetFilter, AssetPatch};
use crate::services::asset_service::{AssetError, AssetService};
use crate::services::outcome::Outcome;
use crate::services::sheet::{self, REQUIRED_COLUMNS, SheetRow};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::task;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Column appears more than once: {0}")]
    DuplicateColumn(String),

    #[error("Invalid delimiter: {0:?}")]
    InvalidDelimiter(char),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<task::JoinError> for TransferError {
    fn from(err: task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// What happened to one data row of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Created {
        id: AssetId,
        asset_number: String,
        assignments: usize,
        repairs: usize,
        /// History entries that could not be stored. The asset itself was
        /// created.
        warnings: Vec<String>,
    },
    Rejected {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: Vec<RowReport>,
}

impl ImportSummary {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Created { .. }))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.rows.len() - self.succeeded()
    }

    /// `Row n: reason` for every rejected row, in file order.
    pub fn errors(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().filter_map(|r| match &r.outcome {
            RowOutcome::Rejected { reason } => Some(format!("Row {}: {reason}", r.row)),
            RowOutcome::Created { .. } => None,
        })
    }

    /// Counts followed by at most `max_errors` rejection reasons.
    #[must_use]
    pub fn message(&self, max_errors: usize) -> String {
        let mut message = format!(
            "Import finished. Succeeded: {}, failed: {}.",
            self.succeeded(),
            self.failed()
        );
        for error in self.errors().take(max_errors) {
            let _ = write!(message, "\n{error}");
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub assets: usize,
    pub columns: usize,
}

struct Sheet {
    headers: Vec<String>,
    /// One entry per data row; `Err` holds why the row could not be read.
    records: Vec<Result<csv::StringRecord, String>>,
}

pub struct TransferService {
    assets: Arc<dyn AssetService>,
    config: TransferConfig,
}

impl TransferService {
    #[must_use]
    pub fn new(assets: Arc<dyn AssetService>, config: TransferConfig) -> Self {
        Self { assets, config }
    }

    fn delimiter(&self) -> Result<u8, TransferError> {
        u8::try_from(self.config.delimiter)
            .map_err(|_| TransferError::InvalidDelimiter(self.config.delimiter))
    }

    /// Writes every asset matching `filter` with its full history.
    pub async fn export_assets(
        &self,
        path: &Path,
        filter: &AssetFilter,
    ) -> Result<ExportSummary, TransferError> {
        let delimiter = self.delimiter()?;
        let assets = self.assets.list(filter).await?;

        let mut details: Vec<AssetDetails> = Vec::with_capacity(assets.len());
        for asset in assets {
            if let Some(mut d) = self.assets.find_by_id(asset.id).await? {
                d.repairs.sort_by_key(|r| r.id);
                details.push(d);
            }
        }

        let max_assignments = details.iter().map(|d| d.assignments.len()).max().unwrap_or(0);
        let max_repairs = details.iter().map(|d| d.repairs.len()).max().unwrap_or(0);

        let header = sheet::export_header(max_assignments, max_repairs);
        let rows: Vec<Vec<String>> = details
            .iter()
            .map(|d| sheet::export_row(d, max_assignments, max_repairs))
            .collect();

        let summary = ExportSummary {
            path: path.to_path_buf(),
            assets: rows.len(),
            columns: header.len(),
        };

        let target = path.to_path_buf();
        task::spawn_blocking(move || write_sheet(&target, delimiter, &header, &rows)).await??;

        metrics::counter!("export_rows_total").increment(summary.assets as u64);
        info!(
            path = %summary.path.display(),
            assets = summary.assets,
            columns = summary.columns,
            "Exported assets"
        );
        Ok(summary)
    }

    /// Creates one asset per data row, with the row's assignments and
    /// repairs. Rows whose asset number already exists are rejected.
    pub async fn import_assets(
        &self,
        path: &Path,
        created_by: UserId,
    ) -> Result<ImportSummary, TransferError> {
        if !path.exists() {
            return Err(TransferError::FileNotFound(path.to_path_buf()));
        }

        let delimiter = self.delimiter()?;
        let source = path.to_path_buf();
        let sheet = task::spawn_blocking(move || read_sheet(&source, delimiter)).await??;

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|c| !sheet.headers.iter().any(|h| h == *c))
        {
            return Err(TransferError::MissingColumn((*missing).to_string()));
        }

        // A canonical header and its legacy alias name the same column.
        let mut seen = HashSet::new();
        if let Some(repeated) = sheet
            .headers
            .iter()
            .filter(|h| !h.is_empty())
            .find(|h| !seen.insert(h.as_str()))
        {
            return Err(TransferError::DuplicateColumn(repeated.clone()));
        }

        let today = chrono::Local::now().date_naive().to_string();
        let mut summary = ImportSummary::default();

        for (index, record) in sheet.records.iter().enumerate() {
            let outcome = match record {
                Ok(record) => {
                    let row = SheetRow::new(&sheet.headers, record.iter());
                    self.import_row(&row, created_by, &today).await
                }
                Err(reason) => RowOutcome::Rejected {
                    reason: reason.clone(),
                },
            };

            let label = match outcome {
                RowOutcome::Created { .. } => "created",
                RowOutcome::Rejected { .. } => "rejected",
            };
            metrics::counter!("import_rows_total", "outcome" => label).increment(1);

            summary.rows.push(RowReport {
                row: index + 1,
                outcome,
            });
        }

        info!(
            path = %path.display(),
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Import finished"
        );
        Ok(summary)
    }

    async fn import_row(&self, row: &SheetRow, created_by: UserId, today: &str) -> RowOutcome {
        let asset = match row.to_new_asset() {
            Ok(asset) => asset,
            Err(reason) => return RowOutcome::Rejected { reason },
        };
        let asset_number = asset.asset_number.clone();
        let initial_status = asset.maintenance_status;

        let id = match self.assets.create(asset, created_by).await {
            Ok(id) => id,
            Err(AssetError::DuplicateKey(key)) => {
                return RowOutcome::Rejected {
                    reason: format!("asset_id {key} already exists"),
                };
            }
            Err(e) => {
                return RowOutcome::Rejected {
                    reason: e.to_string(),
                };
            }
        };

        let mut warnings = Vec::new();

        let mut assignments = 0;
        for assignment in row.assignments(today) {
            match self.assets.add_assignment(id, assignment).await {
                Ok(_) => assignments += 1,
                Err(e) => {
                    warn!(asset_number = %asset_number, error = %e, "Skipped assignment");
                    warnings.push(e.to_string());
                }
            }
        }

        let mut repairs = 0;
        for repair in row.repairs() {
            match self.assets.record_repair(id, repair, created_by).await {
                Ok(_) => repairs += 1,
                Err(e) => {
                    warn!(asset_number = %asset_number, error = %e, "Skipped repair");
                    warnings.push(e.to_string());
                }
            }
        }

        // Repair replay derives normal/under repair; a decommissioned asset stays so.
        if repairs > 0 && initial_status == MaintenanceStatus::Decommissioned {
            let patch = AssetPatch {
                maintenance_status: Some(MaintenanceStatus::Decommissioned),
                ..AssetPatch::default()
            };
            if let Err(e) = self.assets.update(id, patch).await {
                warn!(asset_number = %asset_number, error = %e, "Could not restore status");
                warnings.push(e.to_string());
            }
        }

        RowOutcome::Created {
            id,
            asset_number,
            assignments,
            repairs,
            warnings,
        }
    }

    /// Import entry point for front ends. Never fails; errors become a
    /// failed [`Outcome`].
    pub async fn import_file(&self, path: &Path, created_by: UserId) -> Outcome {
        match self.import_assets(path, created_by).await {
            Ok(summary) => Outcome::ok(summary.message(self.config.max_reported_errors)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Import aborted");
                Outcome::fail(format!("Import failed: {e}"))
            }
        }
    }

    pub async fn export_file(&self, path: &Path, filter: &AssetFilter) -> Outcome {
        match self.export_assets(path, filter).await {
            Ok(summary) => Outcome::ok(format!(
                "Exported {} assets to {}",
                summary.assets,
                summary.path.display()
            )),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Export failed");
                Outcome::fail(format!("Export failed: {e}"))
            }
        }
    }
}

fn read_sheet(path: &Path, delimiter: u8) -> Result<Sheet, TransferError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(sheet::canonical_header)
        .collect();

    let mut records = Vec::new();
    for result in reader.byte_records() {
        let record = match result {
            Ok(record) => csv::StringRecord::from_byte_record(record)
                .map_err(|e| format!("row is not valid UTF-8 ({})", e.utf8_error())),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => Err(e.to_string()),
        };
        records.push(record);
    }

    Ok(Sheet { headers, records })
}

fn write_sheet(
    path: &Path,
    delimiter: u8,
    header: &[String],
    rows: &[Vec<String>],
) -> Result<(), TransferError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created(row: usize) -> RowReport {
        RowReport {
            row,
            outcome: RowOutcome::Created {
                id: AssetId::new(i32::try_from(row).unwrap()),
                asset_number: format!("A{row}"),
                assignments: 0,
                repairs: 0,
                warnings: Vec::new(),
            },
        }
    }

    fn rejected(row: usize) -> RowReport {
        RowReport {
            row,
            outcome: RowOutcome::Rejected {
                reason: format!("asset_id A{row} already exists"),
            },
        }
    }

    #[test]
    fn summary_counts_and_caps_reasons() {
        let mut summary = ImportSummary::default();
        summary.rows.push(created(1));
        for row in 2..=13 {
            summary.rows.push(rejected(row));
        }

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 12);

        let message = summary.message(10);
        assert!(message.starts_with("Import finished. Succeeded: 1, failed: 12."));
        assert_eq!(message.lines().count(), 11);
        assert!(message.contains("Row 2: asset_id A2 already exists"));
        assert!(!message.contains("Row 12:"));
    }

    #[test]
    fn empty_summary_message() {
        assert_eq!(
            ImportSummary::default().message(10),
            "Import finished. Succeeded: 0, failed: 0."
        );
    }
}
