//! Database layer for Rota
//!
//! Provides SQLite persistence for teams, users and pull requests behind the
//! [`rota_core::Store`] trait.

pub mod connection;
pub mod error;
pub mod models;
pub mod store;

pub use connection::{Database, DatabaseConfig};
pub use error::{DbError, Result};
pub use store::SqliteStore;

use rota_core::StoreConfig;

/// Connect to the configured database, apply migrations and wrap it in a store
pub async fn open_store(config: &StoreConfig) -> rota_core::Result<SqliteStore> {
    let db_config = DatabaseConfig::from_store_config(config)?;
    let path = db_config.path.clone();

    let db = Database::connect(db_config).await?;
    db.migrate().await?;

    tracing::info!(path = %path.display(), "Opened SQLite store");
    Ok(SqliteStore::new(&db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_core::Store;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_store_creates_schema() {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig {
            path: Some(temp_dir.path().join("rota.db")),
            ..Default::default()
        };

        let store = open_store(&config).await.unwrap();
        assert!(!store.team_exists("core").await.unwrap());
        assert!(store.list_pull_requests().await.unwrap().is_empty());

        // reopening an existing database is fine
        open_store(&config).await.unwrap();
    }
}
