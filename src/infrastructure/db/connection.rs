use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use std::path::Path;
use std::str::FromStr;

use crate::domain::error::{AppError, Result};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS submissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        response_date TEXT NOT NULL,
        participant_number INTEGER NOT NULL,
        name_or_company TEXT NOT NULL DEFAULT '',
        contact TEXT NOT NULL DEFAULT '',
        email TEXT,
        business_registration_file TEXT,
        privacy_agreement INTEGER NOT NULL DEFAULT 0,
        first_time_buyer INTEGER NOT NULL DEFAULT 0,
        product_description TEXT NOT NULL DEFAULT '',
        product_size TEXT NOT NULL DEFAULT '',
        thickness TEXT NOT NULL DEFAULT '',
        material TEXT NOT NULL DEFAULT '',
        color TEXT NOT NULL DEFAULT '',
        quantity TEXT,
        desired_delivery TEXT NOT NULL DEFAULT '',
        product_image TEXT,
        product_drawing TEXT,
        inquiry TEXT NOT NULL DEFAULT '',
        referral_source TEXT,
        is_reviewed INTEGER NOT NULL DEFAULT 0,
        UNIQUE(response_date, participant_number)
    )",
    "CREATE TABLE IF NOT EXISTS manual_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name_or_company TEXT NOT NULL,
        contact TEXT NOT NULL,
        business_number TEXT NOT NULL DEFAULT '',
        memo TEXT NOT NULL DEFAULT '',
        images TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS manual_entry_notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        entry_id INTEGER NOT NULL,
        notes TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS quote_drafts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        submission_id INTEGER,
        entry_id INTEGER,
        title TEXT NOT NULL DEFAULT '',
        business_number TEXT NOT NULL DEFAULT '',
        remarks TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS quote_draft_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        quote_draft_id INTEGER NOT NULL,
        product_name TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 0,
        price INTEGER NOT NULL DEFAULT 0,
        total INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS supplier_settings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        version_name TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 0,
        company_name TEXT NOT NULL,
        representative TEXT NOT NULL DEFAULT '',
        business_number TEXT NOT NULL DEFAULT '',
        address TEXT NOT NULL DEFAULT '',
        contact_number TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        seal_url TEXT,
        is_corporate INTEGER NOT NULL DEFAULT 0,
        corporate_name TEXT
    )",
    "CREATE TABLE IF NOT EXISTS todolist (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_type TEXT NOT NULL,
        source_id TEXT NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT '시작 전',
        assigned_to TEXT NOT NULL DEFAULT '',
        due_date TEXT,
        memo TEXT NOT NULL DEFAULT '',
        consultation_completed INTEGER NOT NULL DEFAULT 0,
        quotation_completed INTEGER NOT NULL DEFAULT 0,
        payment_completed INTEGER NOT NULL DEFAULT 0,
        in_progress INTEGER NOT NULL DEFAULT 0,
        tax_invoice_needed INTEGER NOT NULL DEFAULT 0,
        tax_invoice_completed INTEGER NOT NULL DEFAULT 0,
        cash_receipt_needed INTEGER NOT NULL DEFAULT 0,
        cash_receipt_completed INTEGER NOT NULL DEFAULT 0
    )",
];

pub async fn init_db(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&db_path_to_url(db_path)?)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse DB URL: {e}")))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect DB: {e}")))?;

    apply_schema(&pool).await?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {e}")))?;

    Ok(pool)
}

pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to apply schema: {e}")))?;
    }
    Ok(())
}

fn db_path_to_url(db_path: &Path) -> Result<String> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| AppError::DatabaseError("Database path is not valid UTF-8".to_string()))?;
    Ok(format!("sqlite://{}", db_path_str.replace("\\", "/")))
}

#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // One connection, otherwise every pooled connection gets its own
    // private in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    apply_schema(&pool).await.expect("schema");
    pool
}
