use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One form response as mapped from the spreadsheet. This is the shape the
/// reconciler compares and the upsert writes; the server-assigned fields live
/// on [`Submission`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub response_date: String,
    pub participant_number: i64,
    pub name_or_company: String,
    pub contact: String,
    pub email: Option<String>,
    pub business_registration_file: Option<String>,
    pub privacy_agreement: bool,
    pub first_time_buyer: bool,
    pub product_description: String,
    pub product_size: String,
    pub thickness: String,
    pub material: String,
    pub color: String,
    pub quantity: Option<String>,
    pub desired_delivery: String,
    pub product_image: Option<String>,
    pub product_drawing: Option<String>,
    pub inquiry: String,
    pub referral_source: Option<String>,
}

impl SubmissionRecord {
    /// Identity of the real-world order across repeated imports. The date is
    /// re-normalized here so records fetched back from storage and records
    /// freshly mapped from a spreadsheet key identically.
    pub fn composite_key(&self) -> (String, i64) {
        (normalize_date(&self.response_date), self.participant_number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub is_reviewed: bool,
    #[serde(flatten)]
    pub record: SubmissionRecord,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y. %m. %d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y. %m. %d", "%m/%d/%Y"];

// Form exports write "2024. 3. 14 오후 9:15:47"; chrono only knows AM/PM.
const AMPM_FORMAT: &str = "%Y. %m. %d %p %I:%M:%S";

/// Renders a response timestamp as a `YYYY-MM-DD` calendar date, discarding
/// time-of-day. A value that matches none of the accepted formats is returned
/// unchanged so the row still imports; the mismatch is logged.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.contains("오전") || trimmed.contains("오후") {
        let replaced = trimmed.replace("오전", "AM").replace("오후", "PM");
        if let Ok(dt) = NaiveDateTime::parse_from_str(&replaced, AMPM_FORMAT) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return dt.date().format("%Y-%m-%d").to_string();
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    tracing::warn!("Invalid response date, keeping raw value: {}", raw);
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_iso_datetime() {
        assert_eq!(normalize_date("2024-03-14 09:15:47"), "2024-03-14");
        assert_eq!(normalize_date("2024-03-14T09:15:47"), "2024-03-14");
    }

    #[test]
    fn test_normalize_korean_ampm() {
        assert_eq!(normalize_date("2024. 3. 14 오후 9:15:47"), "2024-03-14");
        assert_eq!(normalize_date("2024. 3. 14 오전 9:15:47"), "2024-03-14");
    }

    #[test]
    fn test_normalize_date_only() {
        assert_eq!(normalize_date("2024/03/14"), "2024-03-14");
        assert_eq!(normalize_date(" 2024-03-14 "), "2024-03-14");
    }

    #[test]
    fn test_invalid_date_passes_through() {
        assert_eq!(normalize_date("not a date"), "not a date");
    }

    #[test]
    fn test_composite_key_discards_time() {
        let mut record = sample();
        record.response_date = "2024-03-14 09:15:47".to_string();
        assert_eq!(record.composite_key(), ("2024-03-14".to_string(), 7));
    }

    fn sample() -> SubmissionRecord {
        SubmissionRecord {
            response_date: "2024-03-14".to_string(),
            participant_number: 7,
            name_or_company: "테스트상사".to_string(),
            contact: "010-0000-0000".to_string(),
            email: None,
            business_registration_file: None,
            privacy_agreement: true,
            first_time_buyer: false,
            product_description: String::new(),
            product_size: String::new(),
            thickness: String::new(),
            material: String::new(),
            color: String::new(),
            quantity: None,
            desired_delivery: String::new(),
            product_image: None,
            product_drawing: None,
            inquiry: String::new(),
            referral_source: None,
        }
    }
}
