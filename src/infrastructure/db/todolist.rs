use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::todo::{
    validate_source_type, validate_status, NewTodoItem, TodoItem, TodoPatch, DEFAULT_STATUS,
};

#[derive(Clone)]
pub struct TodoRepository {
    pool: SqlitePool,
}

impl TodoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<TodoItem>> {
        let items = sqlx::query_as::<_, TodoItemEntity>("SELECT * FROM todolist ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list todo items: {e}")))?;

        Ok(items.into_iter().map(|item| item.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<TodoItem> {
        let item = sqlx::query_as::<_, TodoItemEntity>("SELECT * FROM todolist WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch todo item: {e}")))?;

        match item {
            Some(item) => Ok(item.into()),
            None => Err(AppError::NotFound(format!("Todo item not found: {}", id))),
        }
    }

    pub async fn create(&self, input: &NewTodoItem) -> Result<TodoItem> {
        validate_source_type(&input.source_type)?;

        let item = sqlx::query_as::<_, TodoItemEntity>(
            "INSERT INTO todolist (source_type, source_id, title, status, assigned_to, due_date, memo)
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&input.source_type)
        .bind(&input.source_id)
        .bind(&input.title)
        .bind(DEFAULT_STATUS)
        .bind(&input.assigned_to)
        .bind(&input.due_date)
        .bind(&input.memo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create todo item: {e}")))?;

        Ok(item.into())
    }

    /// Applies a partial update. Fetch-merge-write, matching how the board
    /// edits one field at a time.
    pub async fn update(&self, id: i64, patch: &TodoPatch) -> Result<TodoItem> {
        if let Some(status) = &patch.status {
            validate_status(status)?;
        }

        let current = self.get(id).await?;

        let status = patch.status.clone().unwrap_or(current.status);
        let assigned_to = patch.assigned_to.clone().unwrap_or(current.assigned_to);
        let title = patch.title.clone().unwrap_or(current.title);
        let memo = patch.memo.clone().unwrap_or(current.memo);
        // Empty string clears the due date.
        let due_date = match &patch.due_date {
            Some(date) if date.is_empty() => None,
            Some(date) => Some(date.clone()),
            None => current.due_date,
        };

        let consultation_completed = patch
            .consultation_completed
            .unwrap_or(current.consultation_completed);
        let quotation_completed = patch
            .quotation_completed
            .unwrap_or(current.quotation_completed);
        let payment_completed = patch.payment_completed.unwrap_or(current.payment_completed);
        let in_progress = patch.in_progress.unwrap_or(current.in_progress);
        let tax_invoice_needed = patch
            .tax_invoice_needed
            .unwrap_or(current.tax_invoice_needed);
        let tax_invoice_completed = patch
            .tax_invoice_completed
            .unwrap_or(current.tax_invoice_completed);
        let cash_receipt_needed = patch
            .cash_receipt_needed
            .unwrap_or(current.cash_receipt_needed);
        let cash_receipt_completed = patch
            .cash_receipt_completed
            .unwrap_or(current.cash_receipt_completed);

        let item = sqlx::query_as::<_, TodoItemEntity>(
            "UPDATE todolist SET
                status = ?, assigned_to = ?, title = ?, memo = ?, due_date = ?,
                consultation_completed = ?, quotation_completed = ?, payment_completed = ?,
                in_progress = ?, tax_invoice_needed = ?, tax_invoice_completed = ?,
                cash_receipt_needed = ?, cash_receipt_completed = ?
             WHERE id = ? RETURNING *",
        )
        .bind(&status)
        .bind(&assigned_to)
        .bind(&title)
        .bind(&memo)
        .bind(&due_date)
        .bind(consultation_completed)
        .bind(quotation_completed)
        .bind(payment_completed)
        .bind(in_progress)
        .bind(tax_invoice_needed)
        .bind(tax_invoice_completed)
        .bind(cash_receipt_needed)
        .bind(cash_receipt_completed)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update todo item: {e}")))?;

        Ok(item.into())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM todolist WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete todo item: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Todo item not found: {}", id)));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TodoItemEntity {
    id: i64,
    source_type: String,
    source_id: String,
    title: String,
    status: String,
    assigned_to: String,
    due_date: Option<String>,
    memo: String,
    consultation_completed: i64,
    quotation_completed: i64,
    payment_completed: i64,
    in_progress: i64,
    tax_invoice_needed: i64,
    tax_invoice_completed: i64,
    cash_receipt_needed: i64,
    cash_receipt_completed: i64,
}

impl From<TodoItemEntity> for TodoItem {
    fn from(entity: TodoItemEntity) -> Self {
        Self {
            id: entity.id,
            source_type: entity.source_type,
            source_id: entity.source_id,
            title: entity.title,
            status: entity.status,
            assigned_to: entity.assigned_to,
            due_date: entity.due_date,
            memo: entity.memo,
            consultation_completed: entity.consultation_completed != 0,
            quotation_completed: entity.quotation_completed != 0,
            payment_completed: entity.payment_completed != 0,
            in_progress: entity.in_progress != 0,
            tax_invoice_needed: entity.tax_invoice_needed != 0,
            tax_invoice_completed: entity.tax_invoice_completed != 0,
            cash_receipt_needed: entity.cash_receipt_needed != 0,
            cash_receipt_completed: entity.cash_receipt_completed != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::todo::SOURCE_MANUAL;
    use crate::infrastructure::db::connection::memory_pool;

    fn new_item() -> NewTodoItem {
        NewTodoItem {
            source_type: SOURCE_MANUAL.to_string(),
            source_id: "7".to_string(),
            title: "아크릴 공방".to_string(),
            assigned_to: String::new(),
            due_date: None,
            memo: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_first_column() {
        let repo = TodoRepository::new(memory_pool().await);
        let item = repo.create(&new_item()).await.unwrap();
        assert_eq!(item.status, DEFAULT_STATUS);
        assert!(!item.consultation_completed);
    }

    #[tokio::test]
    async fn test_status_update_is_validated() {
        let repo = TodoRepository::new(memory_pool().await);
        let item = repo.create(&new_item()).await.unwrap();

        let bad = TodoPatch {
            status: Some("done".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            repo.update(item.id, &bad).await,
            Err(AppError::ValidationError(_))
        ));

        let good = TodoPatch {
            status: Some("제작완료".to_string()),
            ..Default::default()
        };
        let updated = repo.update(item.id, &good).await.unwrap();
        assert_eq!(updated.status, "제작완료");
    }

    #[tokio::test]
    async fn test_empty_due_date_clears() {
        let repo = TodoRepository::new(memory_pool().await);
        let item = repo.create(&new_item()).await.unwrap();

        let set = TodoPatch {
            due_date: Some("2024-04-01".to_string()),
            ..Default::default()
        };
        let updated = repo.update(item.id, &set).await.unwrap();
        assert_eq!(updated.due_date, Some("2024-04-01".to_string()));

        let clear = TodoPatch {
            due_date: Some(String::new()),
            ..Default::default()
        };
        let updated = repo.update(item.id, &clear).await.unwrap();
        assert_eq!(updated.due_date, None);
    }

    #[tokio::test]
    async fn test_patch_touches_only_named_fields() {
        let repo = TodoRepository::new(memory_pool().await);
        let item = repo.create(&new_item()).await.unwrap();

        let patch = TodoPatch {
            payment_completed: Some(true),
            ..Default::default()
        };
        let updated = repo.update(item.id, &patch).await.unwrap();
        assert!(updated.payment_completed);
        assert_eq!(updated.title, item.title);
        assert_eq!(updated.status, item.status);
    }
}
