use harvest_core::error::AppError;
use harvest_core::models::Listing;
use harvest_core::traits::ListingSink;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Repository for listing persistence in SQLite.
///
/// The table is created up front with `CREATE TABLE IF NOT EXISTS`; there is
/// no migration machinery. Rows are append-only — one row per harvested
/// record, repeated runs included.
#[derive(Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Open (and create if missing) the database file, then ensure the
    /// listings table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to open {}: {e}", config.path)))?;

        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    /// In-memory database, for tests.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                id         TEXT NOT NULL,
                make       TEXT NOT NULL,
                model      TEXT NOT NULL,
                year       TEXT NOT NULL,
                link       TEXT NOT NULL,
                price      TEXT NOT NULL,
                scraped_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create table: {e}")))?;
        Ok(())
    }

    /// Append one listing row.
    pub async fn insert(&self, listing: &Listing) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO listings (id, make, model, year, link, price, scraped_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.make)
        .bind(&listing.model)
        .bind(&listing.year)
        .bind(&listing.link)
        .bind(&listing.price)
        .bind(listing.scraped_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Number of rows in the listings table.
    pub async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

impl ListingSink for ListingRepository {
    async fn write(&mut self, listing: &Listing) -> Result<(), AppError> {
        self.insert(listing).await
    }

    async fn close(&mut self) -> Result<(), AppError> {
        tracing::debug!("Closing database pool");
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::models::ListingStub;

    fn listing(id: &str, price: &str) -> Listing {
        Listing::from_stub(
            ListingStub {
                id: id.into(),
                make: "Audi".into(),
                model: "A4".into(),
                year: "2018".into(),
                link: format!("/auto_audi_a4_{id}.html"),
            },
            Some(price.into()),
        )
    }

    #[tokio::test]
    async fn insert_and_count() {
        let repo = ListingRepository::in_memory().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.insert(&listing("1", "10 000 $")).await.unwrap();
        repo.insert(&listing("2", "N/A")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn inserted_row_round_trips() {
        let repo = ListingRepository::in_memory().await.unwrap();
        repo.insert(&listing("42", "22 500 $")).await.unwrap();

        let row: (String, String, String, String, String, String) = sqlx::query_as(
            "SELECT id, make, model, year, link, price FROM listings WHERE id = ?1",
        )
        .bind("42")
        .fetch_one(&repo.pool)
        .await
        .unwrap();

        assert_eq!(row.0, "42");
        assert_eq!(row.1, "Audi");
        assert_eq!(row.2, "A4");
        assert_eq!(row.3, "2018");
        assert_eq!(row.4, "/auto_audi_a4_42.html");
        assert_eq!(row.5, "22 500 $");
    }

    #[tokio::test]
    async fn duplicate_ids_append_new_rows() {
        // Deduplication is out of scope: each harvest appends.
        let repo = ListingRepository::in_memory().await.unwrap();
        repo.insert(&listing("1", "10 000 $")).await.unwrap();
        repo.insert(&listing("1", "9 500 $")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let repo = ListingRepository::in_memory().await.unwrap();
        repo.init_schema().await.unwrap();
        repo.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn sink_write_and_close() {
        let mut repo = ListingRepository::in_memory().await.unwrap();
        repo.write(&listing("7", "N/A")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        repo.close().await.unwrap();
    }

    #[tokio::test]
    async fn connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.db");
        let config = DatabaseConfig::new(path.to_string_lossy());
        let repo = ListingRepository::connect(&config).await.unwrap();
        repo.insert(&listing("1", "100")).await.unwrap();
        assert!(path.exists());
    }
}
