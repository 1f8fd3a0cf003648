pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

pub use migrations::{create_database_pool, create_database_pool_with_url};
pub use seed::{seed_sample_data, SeedSummary};
