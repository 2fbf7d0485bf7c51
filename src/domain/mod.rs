pub mod error;
pub mod manual_entry;
pub mod quote;
pub mod submission;
pub mod supplier;
pub mod todo;
