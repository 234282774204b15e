use sqlx::SqlitePool;

use crate::config::Config;

pub mod customer;
pub mod product;

pub use customer::*;
pub use product::*;

/// Application state shared across all handlers
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}
