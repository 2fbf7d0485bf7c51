use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::manual_entry::{ManualEntry, ManualEntryNote, NewManualEntry};

#[derive(Clone)]
pub struct ManualEntryRepository {
    pool: SqlitePool,
}

impl ManualEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewManualEntry) -> Result<ManualEntry> {
        let images_json = serde_json::to_string(&input.images)
            .map_err(|e| AppError::Internal(format!("Failed to encode image list: {e}")))?;

        let entity = sqlx::query_as::<_, ManualEntryEntity>(
            "INSERT INTO manual_entries (name_or_company, contact, business_number, memo, images)
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&input.name_or_company)
        .bind(&input.contact)
        .bind(&input.business_number)
        .bind(&input.memo)
        .bind(&images_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create manual entry: {e}")))?;

        Ok(entity.into())
    }

    pub async fn list(&self) -> Result<Vec<ManualEntry>> {
        let entries = sqlx::query_as::<_, ManualEntryEntity>(
            "SELECT * FROM manual_entries ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list manual entries: {e}")))?;

        Ok(entries.into_iter().map(|entry| entry.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<ManualEntry> {
        let entry =
            sqlx::query_as::<_, ManualEntryEntity>("SELECT * FROM manual_entries WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to fetch manual entry: {e}"))
                })?;

        match entry {
            Some(entry) => Ok(entry.into()),
            None => Err(AppError::NotFound(format!(
                "Manual entry not found: {}",
                id
            ))),
        }
    }

    /// Deletes an entry together with its consultation notes and quote
    /// drafts. Dependents go first, as sequential statements without a
    /// wrapping transaction: a failure partway leaves earlier deletes in
    /// place and the entry itself intact.
    pub async fn delete_cascade(&self, id: i64) -> Result<()> {
        self.get(id).await?;

        sqlx::query("DELETE FROM manual_entry_notes WHERE entry_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete entry notes: {e}")))?;

        let draft_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM quote_drafts WHERE entry_id = ?")
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to list entry quote drafts: {e}"))
                })?;

        for draft_id in draft_ids {
            sqlx::query("DELETE FROM quote_draft_items WHERE quote_draft_id = ?")
                .bind(draft_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to delete quote draft items: {e}"))
                })?;
        }

        sqlx::query("DELETE FROM quote_drafts WHERE entry_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete quote drafts: {e}")))?;

        sqlx::query("DELETE FROM manual_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete manual entry: {e}")))?;

        Ok(())
    }

    pub async fn add_note(&self, entry_id: i64, notes: &str) -> Result<ManualEntryNote> {
        self.get(entry_id).await?;

        let note = sqlx::query_as::<_, ManualEntryNoteEntity>(
            "INSERT INTO manual_entry_notes (entry_id, notes) VALUES (?, ?) RETURNING *",
        )
        .bind(entry_id)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to add note: {e}")))?;

        Ok(note.into())
    }

    pub async fn list_notes(&self, entry_id: i64) -> Result<Vec<ManualEntryNote>> {
        let notes = sqlx::query_as::<_, ManualEntryNoteEntity>(
            "SELECT * FROM manual_entry_notes WHERE entry_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list notes: {e}")))?;

        Ok(notes.into_iter().map(|note| note.into()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct ManualEntryEntity {
    id: i64,
    name_or_company: String,
    contact: String,
    business_number: String,
    memo: String,
    images: String,
    created_at: String,
}

impl From<ManualEntryEntity> for ManualEntry {
    fn from(entity: ManualEntryEntity) -> Self {
        Self {
            id: entity.id,
            name_or_company: entity.name_or_company,
            contact: entity.contact,
            business_number: entity.business_number,
            memo: entity.memo,
            images: serde_json::from_str(&entity.images).unwrap_or_default(),
            created_at: entity.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ManualEntryNoteEntity {
    id: i64,
    entry_id: i64,
    notes: String,
    created_at: String,
}

impl From<ManualEntryNoteEntity> for ManualEntryNote {
    fn from(entity: ManualEntryNoteEntity) -> Self {
        Self {
            id: entity.id,
            entry_id: entity.entry_id,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
