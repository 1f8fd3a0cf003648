pub mod attendance;
pub mod batches;
pub mod edit_report;
pub mod help;
pub mod login;
pub mod main;
pub mod reports;
pub mod students;
pub mod teachers;
pub mod transfer;
