pub mod health;
pub mod manager;
pub mod models;
pub mod query;

pub use health::{HealthCheck, PgHealthCheck};
pub use manager::{DatabaseError, DatabaseManager};
