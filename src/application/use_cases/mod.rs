pub mod excel_import;
pub mod import_submissions;
pub mod reconcile;
