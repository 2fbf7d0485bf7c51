use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntry {
    pub id: i64,
    pub name_or_company: String,
    pub contact: String,
    pub business_number: String,
    pub memo: String,
    pub images: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewManualEntry {
    #[validate(length(min = 1, message = "name_or_company is required"))]
    pub name_or_company: String,
    #[validate(length(min = 1, message = "contact is required"))]
    pub contact: String,
    #[serde(default)]
    pub business_number: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntryNote {
    pub id: i64,
    pub entry_id: i64,
    pub notes: String,
    pub created_at: String,
}
