use sqlx::{QueryBuilder, SqlitePool};

use crate::domain::error::{AppError, Result};
use crate::domain::submission::{normalize_date, Submission, SubmissionRecord};

const SELECT_COLUMNS: &str = "id, response_date, participant_number, name_or_company, contact, \
     email, business_registration_file, privacy_agreement, first_time_buyer, \
     product_description, product_size, thickness, material, color, quantity, \
     desired_delivery, product_image, product_drawing, inquiry, referral_source, is_reviewed";

// 19 binds per row; 50 rows per statement keeps even the historical 999
// bind-variable limit comfortable.
const UPSERT_CHUNK_ROWS: usize = 50;

#[derive(Clone)]
pub struct SubmissionRepository {
    pool: SqlitePool,
}

impl SubmissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Submission>> {
        let rows = match search {
            Some(term) if !term.is_empty() => {
                let pattern = format!("%{}%", term);
                // lower() on both sides keeps the match case-insensitive even
                // with case_sensitive_like on; folding is ASCII only either way.
                sqlx::query_as::<_, SubmissionEntity>(&format!(
                    "SELECT {SELECT_COLUMNS} FROM submissions
                     WHERE lower(name_or_company) LIKE lower(?1)
                        OR lower(product_description) LIKE lower(?1)
                     ORDER BY response_date ASC"
                ))
                .bind(pattern)
                .fetch_all(&self.pool)
                .await
            }
            _ => {
                sqlx::query_as::<_, SubmissionEntity>(&format!(
                    "SELECT {SELECT_COLUMNS} FROM submissions ORDER BY response_date ASC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::DatabaseError(format!("Failed to list submissions: {e}")))?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Submission> {
        let row = sqlx::query_as::<_, SubmissionEntity>(&format!(
            "SELECT {SELECT_COLUMNS} FROM submissions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch submission: {e}")))?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(AppError::NotFound(format!("Submission not found: {}", id))),
        }
    }

    /// Upserts a batch keyed on the composite
    /// `(response_date, participant_number)`. A conflicting row overwrites in
    /// place rather than being dropped; the reconciler already filtered the
    /// batch, this is the safety net. The review flag is not touched by an
    /// overwrite. Large batches go out as a few multi-row statements to stay
    /// under SQLite's bind-variable limit.
    pub async fn upsert_batch(&self, batch: &[SubmissionRecord]) -> Result<u64> {
        let mut affected = 0;
        for chunk in batch.chunks(UPSERT_CHUNK_ROWS) {
            affected += self.upsert_chunk(chunk).await?;
        }
        Ok(affected)
    }

    async fn upsert_chunk(&self, chunk: &[SubmissionRecord]) -> Result<u64> {
        let mut builder = QueryBuilder::new(
            "INSERT INTO submissions (response_date, participant_number, name_or_company, \
             contact, email, business_registration_file, privacy_agreement, first_time_buyer, \
             product_description, product_size, thickness, material, color, quantity, \
             desired_delivery, product_image, product_drawing, inquiry, referral_source) ",
        );

        builder.push_values(chunk, |mut row, record| {
            row.push_bind(normalize_date(&record.response_date))
                .push_bind(record.participant_number)
                .push_bind(&record.name_or_company)
                .push_bind(&record.contact)
                .push_bind(&record.email)
                .push_bind(&record.business_registration_file)
                .push_bind(record.privacy_agreement)
                .push_bind(record.first_time_buyer)
                .push_bind(&record.product_description)
                .push_bind(&record.product_size)
                .push_bind(&record.thickness)
                .push_bind(&record.material)
                .push_bind(&record.color)
                .push_bind(&record.quantity)
                .push_bind(&record.desired_delivery)
                .push_bind(&record.product_image)
                .push_bind(&record.product_drawing)
                .push_bind(&record.inquiry)
                .push_bind(&record.referral_source);
        });

        builder.push(
            " ON CONFLICT(response_date, participant_number) DO UPDATE SET \
             name_or_company = excluded.name_or_company, \
             contact = excluded.contact, \
             email = excluded.email, \
             business_registration_file = excluded.business_registration_file, \
             privacy_agreement = excluded.privacy_agreement, \
             first_time_buyer = excluded.first_time_buyer, \
             product_description = excluded.product_description, \
             product_size = excluded.product_size, \
             thickness = excluded.thickness, \
             material = excluded.material, \
             color = excluded.color, \
             quantity = excluded.quantity, \
             desired_delivery = excluded.desired_delivery, \
             product_image = excluded.product_image, \
             product_drawing = excluded.product_drawing, \
             inquiry = excluded.inquiry, \
             referral_source = excluded.referral_source",
        );

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to upsert submissions: {e}")))?;

        Ok(result.rows_affected())
    }

    pub async fn set_reviewed(&self, id: i64, is_reviewed: bool) -> Result<Submission> {
        let result = sqlx::query("UPDATE submissions SET is_reviewed = ? WHERE id = ?")
            .bind(is_reviewed)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update review flag: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Submission not found: {}", id)));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete submission: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Submission not found: {}", id)));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SubmissionEntity {
    id: i64,
    response_date: String,
    participant_number: i64,
    name_or_company: String,
    contact: String,
    email: Option<String>,
    business_registration_file: Option<String>,
    privacy_agreement: i64,
    first_time_buyer: i64,
    product_description: String,
    product_size: String,
    thickness: String,
    material: String,
    color: String,
    quantity: Option<String>,
    desired_delivery: String,
    product_image: Option<String>,
    product_drawing: Option<String>,
    inquiry: String,
    referral_source: Option<String>,
    is_reviewed: i64,
}

impl From<SubmissionEntity> for Submission {
    fn from(entity: SubmissionEntity) -> Self {
        Self {
            id: entity.id,
            is_reviewed: entity.is_reviewed != 0,
            record: SubmissionRecord {
                response_date: entity.response_date,
                participant_number: entity.participant_number,
                name_or_company: entity.name_or_company,
                contact: entity.contact,
                email: entity.email,
                business_registration_file: entity.business_registration_file,
                privacy_agreement: entity.privacy_agreement != 0,
                first_time_buyer: entity.first_time_buyer != 0,
                product_description: entity.product_description,
                product_size: entity.product_size,
                thickness: entity.thickness,
                material: entity.material,
                color: entity.color,
                quantity: entity.quantity,
                desired_delivery: entity.desired_delivery,
                product_image: entity.product_image,
                product_drawing: entity.product_drawing,
                inquiry: entity.inquiry,
                referral_source: entity.referral_source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::memory_pool;

    fn record(date: &str, participant: i64, thickness: &str) -> SubmissionRecord {
        SubmissionRecord {
            response_date: date.to_string(),
            participant_number: participant,
            name_or_company: "아크릴 공방".to_string(),
            contact: "010-1234-5678".to_string(),
            email: None,
            business_registration_file: None,
            privacy_agreement: true,
            first_time_buyer: true,
            product_description: "아크릴 명판".to_string(),
            product_size: "200x100".to_string(),
            thickness: thickness.to_string(),
            material: "투명 아크릴".to_string(),
            color: "투명".to_string(),
            quantity: Some("10".to_string()),
            desired_delivery: "다음주".to_string(),
            product_image: None,
            product_drawing: None,
            inquiry: String::new(),
            referral_source: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_overwrites() {
        let repo = SubmissionRepository::new(memory_pool().await);

        repo.upsert_batch(&[record("2024-03-14", 1, "3mm")])
            .await
            .unwrap();
        let stored = repo.list(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].record.thickness, "3mm");

        // Same composite key overwrites in place instead of inserting.
        repo.upsert_batch(&[record("2024-03-14", 1, "5mm")])
            .await
            .unwrap();
        let stored = repo.list(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].record.thickness, "5mm");
    }

    #[tokio::test]
    async fn test_upsert_normalizes_date_for_conflict_key() {
        let repo = SubmissionRepository::new(memory_pool().await);

        repo.upsert_batch(&[record("2024-03-14", 1, "3mm")])
            .await
            .unwrap();
        repo.upsert_batch(&[record("2024-03-14 09:15:47", 1, "5mm")])
            .await
            .unwrap();

        let stored = repo.list(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].record.response_date, "2024-03-14");
    }

    #[tokio::test]
    async fn test_overwrite_preserves_review_flag() {
        let repo = SubmissionRepository::new(memory_pool().await);

        repo.upsert_batch(&[record("2024-03-14", 1, "3mm")])
            .await
            .unwrap();
        let id = repo.list(None).await.unwrap()[0].id;
        repo.set_reviewed(id, true).await.unwrap();

        repo.upsert_batch(&[record("2024-03-14", 1, "5mm")])
            .await
            .unwrap();
        let submission = repo.get(id).await.unwrap();
        assert!(submission.is_reviewed);
        assert_eq!(submission.record.thickness, "5mm");
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let repo = SubmissionRepository::new(memory_pool().await);
        assert_eq!(repo.upsert_batch(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_filters_by_name_and_description() {
        let repo = SubmissionRepository::new(memory_pool().await);

        let mut other = record("2024-03-15", 2, "3mm");
        other.name_or_company = "다른 업체".to_string();
        other.product_description = "트로피".to_string();
        repo.upsert_batch(&[record("2024-03-14", 1, "3mm"), other])
            .await
            .unwrap();

        let hits = repo.list(Some("명판")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.participant_number, 1);

        let hits = repo.list(Some("다른")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.participant_number, 2);
    }

    #[tokio::test]
    async fn test_search_ignores_ascii_case() {
        let repo = SubmissionRepository::new(memory_pool().await);

        let mut latin = record("2024-03-14", 1, "3mm");
        latin.name_or_company = "Acryl House".to_string();
        repo.upsert_batch(&[latin]).await.unwrap();

        let hits = repo.list(Some("acryl")).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = repo.list(Some("ACRYL")).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_batch_larger_than_one_chunk() {
        let repo = SubmissionRepository::new(memory_pool().await);

        let batch: Vec<SubmissionRecord> = (1..=120)
            .map(|participant| record("2024-03-14", participant, "3mm"))
            .collect();
        repo.upsert_batch(&batch).await.unwrap();
        assert_eq!(repo.list(None).await.unwrap().len(), 120);

        // Re-import across chunk boundaries still overwrites, never duplicates.
        let batch: Vec<SubmissionRecord> = (1..=120)
            .map(|participant| record("2024-03-14", participant, "5mm"))
            .collect();
        repo.upsert_batch(&batch).await.unwrap();

        let stored = repo.list(None).await.unwrap();
        assert_eq!(stored.len(), 120);
        assert!(stored.iter().all(|s| s.record.thickness == "5mm"));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = SubmissionRepository::new(memory_pool().await);
        assert!(matches!(repo.get(99).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            repo.set_reviewed(99, true).await,
            Err(AppError::NotFound(_))
        ));
    }
}
