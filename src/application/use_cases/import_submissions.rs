use serde::Serialize;

use crate::application::use_cases::excel_import::ExcelImporter;
use crate::application::use_cases::reconcile::reconcile;
use crate::domain::error::{AppError, Result};
use crate::domain::submission::SubmissionRecord;
use crate::infrastructure::db::submissions::SubmissionRepository;

/// Outcome of analyzing an uploaded workbook: every parsed row, reconciled
/// down to the rows worth uploading.
#[derive(Debug, Serialize)]
pub struct ImportPreview {
    pub total_rows: usize,
    pub existing_rows: usize,
    pub pending: Vec<SubmissionRecord>,
}

/// The import pipeline: parse the workbook, reconcile against what is already
/// stored, and on an explicit commit upsert the surviving rows.
pub struct ImportUseCase {
    importer: ExcelImporter,
    submissions: SubmissionRepository,
}

impl ImportUseCase {
    pub fn new(submissions: SubmissionRepository) -> Self {
        Self {
            importer: ExcelImporter,
            submissions,
        }
    }

    pub async fn preview(&self, bytes: &[u8]) -> Result<ImportPreview> {
        let candidates = self.importer.parse(bytes)?;
        tracing::info!("Parsed {} rows from uploaded workbook", candidates.len());

        let existing: Vec<SubmissionRecord> = self
            .submissions
            .list(None)
            .await?
            .into_iter()
            .map(|submission| submission.record)
            .collect();

        let pending = reconcile(&candidates, &existing);
        tracing::info!(
            "Reconciled import: {} of {} rows are new or updated",
            pending.len(),
            candidates.len()
        );

        Ok(ImportPreview {
            total_rows: candidates.len(),
            existing_rows: existing.len(),
            pending,
        })
    }

    pub async fn commit(&self, records: &[SubmissionRecord]) -> Result<u64> {
        if records.is_empty() {
            return Err(AppError::ValidationError(
                "No new or updated rows to upload".to_string(),
            ));
        }
        self.submissions.upsert_batch(records).await
    }
}
