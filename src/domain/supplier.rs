use serde::{Deserialize, Serialize};
use validator::Validate;

/// Supplier profile printed on quote documents. Several versions can be
/// stored side by side; at most one is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierSetting {
    pub id: i64,
    pub version_name: String,
    pub is_active: bool,
    pub company_name: String,
    pub representative: String,
    pub business_number: String,
    pub address: String,
    pub contact_number: String,
    pub email: String,
    pub seal_url: Option<String>,
    pub is_corporate: bool,
    pub corporate_name: Option<String>,
}

/// New profiles always start inactive; activation is a separate step.
#[derive(Debug, Deserialize, Validate)]
pub struct NewSupplierSetting {
    #[validate(length(min = 1, message = "version_name is required"))]
    pub version_name: String,
    #[validate(length(min = 1, message = "company_name is required"))]
    pub company_name: String,
    #[serde(default)]
    pub representative: String,
    #[serde(default)]
    pub business_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub email: String,
    pub seal_url: Option<String>,
    #[serde(default)]
    pub is_corporate: bool,
    pub corporate_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupplierSettingPatch {
    pub version_name: Option<String>,
    pub company_name: Option<String>,
    pub representative: Option<String>,
    pub business_number: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub seal_url: Option<String>,
    pub is_corporate: Option<bool>,
    pub corporate_name: Option<String>,
}
