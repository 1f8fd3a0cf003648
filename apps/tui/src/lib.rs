// Export our modules for use in binaries and tests
pub mod attendance;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod roster;
pub mod spreadsheet;
pub mod store;
pub mod sync;

pub use attendance::AttendanceStats;
pub use domain::{AttendanceStatus, BatchType, Table};
pub use error::BridgeError;
pub use store::Store;
