use chrono::Local;
use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::quote::{
    NewQuoteDraft, NewQuoteItem, QuoteDraft, QuoteDraftItem, QuoteDraftPatch, QuoteItemPatch,
};

#[derive(Clone)]
pub struct QuoteDraftRepository {
    pool: SqlitePool,
}

impl QuoteDraftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &NewQuoteDraft) -> Result<QuoteDraft> {
        match (input.submission_id, input.entry_id) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                return Err(AppError::ValidationError(
                    "A quote draft belongs to exactly one submission or manual entry".to_string(),
                ))
            }
        }

        let title = match &input.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("{} 새 견적", Local::now().format("%Y-%m-%d")),
        };

        let draft = sqlx::query_as::<_, QuoteDraftEntity>(
            "INSERT INTO quote_drafts (submission_id, entry_id, title, business_number, remarks)
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(input.submission_id)
        .bind(input.entry_id)
        .bind(&title)
        .bind(&input.business_number)
        .bind(&input.remarks)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create quote draft: {e}")))?;

        Ok(draft.into())
    }

    pub async fn list(
        &self,
        submission_id: Option<i64>,
        entry_id: Option<i64>,
    ) -> Result<Vec<QuoteDraft>> {
        let drafts = match (submission_id, entry_id) {
            (Some(id), None) => {
                sqlx::query_as::<_, QuoteDraftEntity>(
                    "SELECT * FROM quote_drafts WHERE submission_id = ? ORDER BY id ASC",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(id)) => {
                sqlx::query_as::<_, QuoteDraftEntity>(
                    "SELECT * FROM quote_drafts WHERE entry_id = ? ORDER BY id ASC",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await
            }
            _ => {
                return Err(AppError::ValidationError(
                    "Pass either submission_id or entry_id".to_string(),
                ))
            }
        }
        .map_err(|e| AppError::DatabaseError(format!("Failed to list quote drafts: {e}")))?;

        Ok(drafts.into_iter().map(|draft| draft.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<QuoteDraft> {
        let draft = sqlx::query_as::<_, QuoteDraftEntity>("SELECT * FROM quote_drafts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch quote draft: {e}")))?;

        match draft {
            Some(draft) => Ok(draft.into()),
            None => Err(AppError::NotFound(format!("Quote draft not found: {}", id))),
        }
    }

    pub async fn update(&self, id: i64, patch: &QuoteDraftPatch) -> Result<QuoteDraft> {
        let result = sqlx::query(
            "UPDATE quote_drafts SET
                title = COALESCE(?, title),
                business_number = COALESCE(?, business_number),
                remarks = COALESCE(?, remarks)
             WHERE id = ?",
        )
        .bind(&patch.title)
        .bind(&patch.business_number)
        .bind(&patch.remarks)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update quote draft: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Quote draft not found: {}", id)));
        }
        self.get(id).await
    }

    pub async fn add_item(&self, draft_id: i64, input: &NewQuoteItem) -> Result<QuoteDraftItem> {
        self.get(draft_id).await?;

        let total = input.quantity * input.price;
        let item = sqlx::query_as::<_, QuoteDraftItemEntity>(
            "INSERT INTO quote_draft_items (quote_draft_id, product_name, quantity, price, total)
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(draft_id)
        .bind(&input.product_name)
        .bind(input.quantity)
        .bind(input.price)
        .bind(total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to add quote item: {e}")))?;

        Ok(item.into())
    }

    pub async fn update_item(&self, id: i64, patch: &QuoteItemPatch) -> Result<QuoteDraftItem> {
        let current = self.get_item(id).await?;

        let product_name = patch
            .product_name
            .clone()
            .unwrap_or(current.product_name);
        let quantity = patch.quantity.unwrap_or(current.quantity);
        let price = patch.price.unwrap_or(current.price);
        let total = quantity * price;

        let item = sqlx::query_as::<_, QuoteDraftItemEntity>(
            "UPDATE quote_draft_items
             SET product_name = ?, quantity = ?, price = ?, total = ?
             WHERE id = ? RETURNING *",
        )
        .bind(&product_name)
        .bind(quantity)
        .bind(price)
        .bind(total)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update quote item: {e}")))?;

        Ok(item.into())
    }

    pub async fn delete_item(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM quote_draft_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete quote item: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Quote item not found: {}", id)));
        }
        Ok(())
    }

    pub async fn list_items(&self, draft_id: i64) -> Result<Vec<QuoteDraftItem>> {
        let items = sqlx::query_as::<_, QuoteDraftItemEntity>(
            "SELECT * FROM quote_draft_items WHERE quote_draft_id = ? ORDER BY id ASC",
        )
        .bind(draft_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list quote items: {e}")))?;

        Ok(items.into_iter().map(|item| item.into()).collect())
    }

    async fn get_item(&self, id: i64) -> Result<QuoteDraftItem> {
        let item = sqlx::query_as::<_, QuoteDraftItemEntity>(
            "SELECT * FROM quote_draft_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch quote item: {e}")))?;

        match item {
            Some(item) => Ok(item.into()),
            None => Err(AppError::NotFound(format!("Quote item not found: {}", id))),
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuoteDraftEntity {
    id: i64,
    submission_id: Option<i64>,
    entry_id: Option<i64>,
    title: String,
    business_number: String,
    remarks: String,
    created_at: String,
}

impl From<QuoteDraftEntity> for QuoteDraft {
    fn from(entity: QuoteDraftEntity) -> Self {
        Self {
            id: entity.id,
            submission_id: entity.submission_id,
            entry_id: entity.entry_id,
            title: entity.title,
            business_number: entity.business_number,
            remarks: entity.remarks,
            created_at: entity.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuoteDraftItemEntity {
    id: i64,
    quote_draft_id: i64,
    product_name: String,
    quantity: i64,
    price: i64,
    total: i64,
}

impl From<QuoteDraftItemEntity> for QuoteDraftItem {
    fn from(entity: QuoteDraftItemEntity) -> Self {
        Self {
            id: entity.id,
            quote_draft_id: entity.quote_draft_id,
            product_name: entity.product_name,
            quantity: entity.quantity,
            price: entity.price,
            total: entity.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::memory_pool;

    fn draft_for_submission(submission_id: i64) -> NewQuoteDraft {
        NewQuoteDraft {
            submission_id: Some(submission_id),
            entry_id: None,
            title: Some("3월 견적".to_string()),
            business_number: String::new(),
            remarks: String::new(),
        }
    }

    #[tokio::test]
    async fn test_requires_exactly_one_source() {
        let repo = QuoteDraftRepository::new(memory_pool().await);

        let both = NewQuoteDraft {
            submission_id: Some(1),
            entry_id: Some(1),
            title: None,
            business_number: String::new(),
            remarks: String::new(),
        };
        assert!(matches!(
            repo.create(&both).await,
            Err(AppError::ValidationError(_))
        ));

        let neither = NewQuoteDraft {
            submission_id: None,
            entry_id: None,
            title: None,
            business_number: String::new(),
            remarks: String::new(),
        };
        assert!(matches!(
            repo.create(&neither).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_item_total_is_recomputed() {
        let repo = QuoteDraftRepository::new(memory_pool().await);
        let draft = repo.create(&draft_for_submission(1)).await.unwrap();

        let item = repo
            .add_item(
                draft.id,
                &NewQuoteItem {
                    product_name: "명판".to_string(),
                    quantity: 3,
                    price: 10000,
                },
            )
            .await
            .unwrap();
        assert_eq!(item.total, 30000);

        let updated = repo
            .update_item(
                item.id,
                &QuoteItemPatch {
                    quantity: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total, 50000);
        assert_eq!(updated.product_name, "명판");
    }

    #[tokio::test]
    async fn test_default_title_is_dated() {
        let repo = QuoteDraftRepository::new(memory_pool().await);
        let draft = repo
            .create(&NewQuoteDraft {
                submission_id: Some(1),
                entry_id: None,
                title: None,
                business_number: String::new(),
                remarks: String::new(),
            })
            .await
            .unwrap();
        assert!(draft.title.ends_with("새 견적"));
    }
}
