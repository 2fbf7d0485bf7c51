use serde::{Deserialize, Serialize};

/// A saved quote draft. Exactly one of `submission_id` / `entry_id` is set,
/// depending on whether the quote belongs to a spreadsheet submission or a
/// manually entered order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub id: i64,
    pub submission_id: Option<i64>,
    pub entry_id: Option<i64>,
    pub title: String,
    pub business_number: String,
    pub remarks: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct NewQuoteDraft {
    pub submission_id: Option<i64>,
    pub entry_id: Option<i64>,
    pub title: Option<String>,
    #[serde(default)]
    pub business_number: String,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteDraftPatch {
    pub title: Option<String>,
    pub business_number: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDraftItem {
    pub id: i64,
    pub quote_draft_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewQuoteItem {
    pub product_name: String,
    pub quantity: i64,
    pub price: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteItemPatch {
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<i64>,
}
