use sqlx::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::supplier::{NewSupplierSetting, SupplierSetting, SupplierSettingPatch};

#[derive(Clone)]
pub struct SupplierSettingRepository {
    pool: SqlitePool,
}

impl SupplierSettingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<SupplierSetting>> {
        let settings = sqlx::query_as::<_, SupplierSettingEntity>(
            "SELECT * FROM supplier_settings ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list supplier settings: {e}")))?;

        Ok(settings.into_iter().map(|setting| setting.into()).collect())
    }

    pub async fn get(&self, id: i64) -> Result<SupplierSetting> {
        let setting = sqlx::query_as::<_, SupplierSettingEntity>(
            "SELECT * FROM supplier_settings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch supplier setting: {e}")))?;

        match setting {
            Some(setting) => Ok(setting.into()),
            None => Err(AppError::NotFound(format!(
                "Supplier setting not found: {}",
                id
            ))),
        }
    }

    pub async fn create(&self, input: &NewSupplierSetting) -> Result<SupplierSetting> {
        let setting = sqlx::query_as::<_, SupplierSettingEntity>(
            "INSERT INTO supplier_settings (version_name, company_name, representative, \
             business_number, address, contact_number, email, seal_url, is_corporate, \
             corporate_name)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&input.version_name)
        .bind(&input.company_name)
        .bind(&input.representative)
        .bind(&input.business_number)
        .bind(&input.address)
        .bind(&input.contact_number)
        .bind(&input.email)
        .bind(&input.seal_url)
        .bind(input.is_corporate)
        .bind(&input.corporate_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create supplier setting: {e}")))?;

        Ok(setting.into())
    }

    pub async fn update(&self, id: i64, patch: &SupplierSettingPatch) -> Result<SupplierSetting> {
        let result = sqlx::query(
            "UPDATE supplier_settings SET
                version_name = COALESCE(?, version_name),
                company_name = COALESCE(?, company_name),
                representative = COALESCE(?, representative),
                business_number = COALESCE(?, business_number),
                address = COALESCE(?, address),
                contact_number = COALESCE(?, contact_number),
                email = COALESCE(?, email),
                seal_url = COALESCE(?, seal_url),
                is_corporate = COALESCE(?, is_corporate),
                corporate_name = COALESCE(?, corporate_name)
             WHERE id = ?",
        )
        .bind(&patch.version_name)
        .bind(&patch.company_name)
        .bind(&patch.representative)
        .bind(&patch.business_number)
        .bind(&patch.address)
        .bind(&patch.contact_number)
        .bind(&patch.email)
        .bind(&patch.seal_url)
        .bind(patch.is_corporate)
        .bind(&patch.corporate_name)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update supplier setting: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Supplier setting not found: {}",
                id
            )));
        }
        self.get(id).await
    }

    /// Makes one profile the active one. Every other profile is deactivated
    /// first, so at most one row ever carries the flag.
    pub async fn activate(&self, id: i64) -> Result<SupplierSetting> {
        self.get(id).await?;

        sqlx::query("UPDATE supplier_settings SET is_active = 0 WHERE id != ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to deactivate supplier settings: {e}"))
            })?;

        sqlx::query("UPDATE supplier_settings SET is_active = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to activate supplier setting: {e}"))
            })?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM supplier_settings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to delete supplier setting: {e}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Supplier setting not found: {}",
                id
            )));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SupplierSettingEntity {
    id: i64,
    version_name: String,
    is_active: i64,
    company_name: String,
    representative: String,
    business_number: String,
    address: String,
    contact_number: String,
    email: String,
    seal_url: Option<String>,
    is_corporate: i64,
    corporate_name: Option<String>,
}

impl From<SupplierSettingEntity> for SupplierSetting {
    fn from(entity: SupplierSettingEntity) -> Self {
        Self {
            id: entity.id,
            version_name: entity.version_name,
            is_active: entity.is_active != 0,
            company_name: entity.company_name,
            representative: entity.representative,
            business_number: entity.business_number,
            address: entity.address,
            contact_number: entity.contact_number,
            email: entity.email,
            seal_url: entity.seal_url,
            is_corporate: entity.is_corporate != 0,
            corporate_name: entity.corporate_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::memory_pool;

    fn new_setting(version: &str) -> NewSupplierSetting {
        NewSupplierSetting {
            version_name: version.to_string(),
            company_name: "아크릴 맛집".to_string(),
            representative: "김대표".to_string(),
            business_number: "123-45-67890".to_string(),
            address: "서울시".to_string(),
            contact_number: "02-1234-5678".to_string(),
            email: "shop@example.com".to_string(),
            seal_url: None,
            is_corporate: false,
            corporate_name: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_inactive() {
        let repo = SupplierSettingRepository::new(memory_pool().await);
        let setting = repo.create(&new_setting("v1")).await.unwrap();
        assert!(!setting.is_active);
        assert_eq!(setting.company_name, "아크릴 맛집");
    }

    #[tokio::test]
    async fn test_activate_deactivates_all_others() {
        let repo = SupplierSettingRepository::new(memory_pool().await);
        let first = repo.create(&new_setting("v1")).await.unwrap();
        let second = repo.create(&new_setting("v2")).await.unwrap();

        let activated = repo.activate(first.id).await.unwrap();
        assert!(activated.is_active);

        let activated = repo.activate(second.id).await.unwrap();
        assert!(activated.is_active);

        let settings = repo.list().await.unwrap();
        let active: Vec<i64> = settings
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.id)
            .collect();
        assert_eq!(active, vec![second.id]);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = SupplierSettingRepository::new(memory_pool().await);
        repo.create(&new_setting("v1")).await.unwrap();
        repo.create(&new_setting("v2")).await.unwrap();

        let versions: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.version_name)
            .collect();
        assert_eq!(versions, vec!["v1", "v2"]);
    }

    #[tokio::test]
    async fn test_patch_touches_only_named_fields() {
        let repo = SupplierSettingRepository::new(memory_pool().await);
        let setting = repo.create(&new_setting("v1")).await.unwrap();

        let patch = SupplierSettingPatch {
            seal_url: Some("https://files.example.com/seal.png".to_string()),
            ..Default::default()
        };
        let updated = repo.update(setting.id, &patch).await.unwrap();
        assert_eq!(
            updated.seal_url,
            Some("https://files.example.com/seal.png".to_string())
        );
        assert_eq!(updated.version_name, "v1");
        assert_eq!(updated.representative, "김대표");
    }

    #[tokio::test]
    async fn test_missing_setting_is_not_found() {
        let repo = SupplierSettingRepository::new(memory_pool().await);
        assert!(matches!(repo.get(99).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            repo.activate(99).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(repo.delete(99).await, Err(AppError::NotFound(_))));
    }
}
