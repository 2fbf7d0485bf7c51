use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Kanban board columns, in display order. Status updates must use one of
/// these exact values.
pub const STATUSES: [&str; 5] = [
    "시작 전",
    "견적완료/도면작업",
    "이번주 작업",
    "다음주 작업",
    "제작완료",
];

pub const DEFAULT_STATUS: &str = "시작 전";

pub const SOURCE_EXCEL: &str = "엑셀 리스트";
pub const SOURCE_MANUAL: &str = "직접 입력 리스트";

pub fn validate_status(status: &str) -> Result<()> {
    if STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Unknown status: {}",
            status
        )))
    }
}

pub fn validate_source_type(source_type: &str) -> Result<()> {
    if source_type == SOURCE_EXCEL || source_type == SOURCE_MANUAL {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Unknown source type: {}",
            source_type
        )))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub source_type: String,
    pub source_id: String,
    pub title: String,
    pub status: String,
    pub assigned_to: String,
    pub due_date: Option<String>,
    pub memo: String,
    pub consultation_completed: bool,
    pub quotation_completed: bool,
    pub payment_completed: bool,
    pub in_progress: bool,
    pub tax_invoice_needed: bool,
    pub tax_invoice_completed: bool,
    pub cash_receipt_needed: bool,
    pub cash_receipt_completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewTodoItem {
    pub source_type: String,
    pub source_id: String,
    pub title: String,
    #[serde(default)]
    pub assigned_to: String,
    pub due_date: Option<String>,
    #[serde(default)]
    pub memo: String,
}

/// Partial update for a card. An empty-string `due_date` clears the date.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatch {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub due_date: Option<String>,
    pub memo: Option<String>,
    pub title: Option<String>,
    pub consultation_completed: Option<bool>,
    pub quotation_completed: Option<bool>,
    pub payment_completed: Option<bool>,
    pub in_progress: Option<bool>,
    pub tax_invoice_needed: Option<bool>,
    pub tax_invoice_completed: Option<bool>,
    pub cash_receipt_needed: Option<bool>,
    pub cash_receipt_completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_accepted() {
        for status in STATUSES {
            assert!(validate_status(status).is_ok());
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(validate_status("완료").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn test_source_types() {
        assert!(validate_source_type(SOURCE_EXCEL).is_ok());
        assert!(validate_source_type(SOURCE_MANUAL).is_ok());
        assert!(validate_source_type("기타").is_err());
    }
}
