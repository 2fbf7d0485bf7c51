pub mod connection;
pub mod manual_entries;
pub mod quote_drafts;
pub mod submissions;
pub mod supplier_settings;
pub mod todolist;
