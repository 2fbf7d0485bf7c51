use std::path::Path;

use crate::application::ImportUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::Settings;
use crate::infrastructure::db::connection::init_db;
use crate::infrastructure::db::manual_entries::ManualEntryRepository;
use crate::infrastructure::db::quote_drafts::QuoteDraftRepository;
use crate::infrastructure::db::submissions::SubmissionRepository;
use crate::infrastructure::db::supplier_settings::SupplierSettingRepository;
use crate::infrastructure::db::todolist::TodoRepository;

/// Everything the HTTP layer needs, wired once at startup.
pub struct AppState {
    pub submissions: SubmissionRepository,
    pub manual_entries: ManualEntryRepository,
    pub quotes: QuoteDraftRepository,
    pub todos: TodoRepository,
    pub suppliers: SupplierSettingRepository,
    pub import: ImportUseCase,
}

pub async fn setup(settings: &Settings) -> Result<AppState> {
    let pool = init_db(Path::new(&settings.database_path)).await?;
    tracing::info!("Database ready at {}", settings.database_path);

    let submissions = SubmissionRepository::new(pool.clone());
    let import = ImportUseCase::new(submissions.clone());

    Ok(AppState {
        submissions,
        manual_entries: ManualEntryRepository::new(pool.clone()),
        quotes: QuoteDraftRepository::new(pool.clone()),
        todos: TodoRepository::new(pool.clone()),
        suppliers: SupplierSettingRepository::new(pool),
        import,
    })
}
