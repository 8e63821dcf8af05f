use crate::types::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Persistent subscriber set: a single SQLite table keyed by email address.
/// Connections are scoped per operation via the pool; no connection is held
/// across operations.
#[derive(Clone)]
pub struct SubscriberStore {
    pool: SqlitePool,
}

impl SubscriberStore {
    /// Open (creating if needed) the store at the given file path.
    pub async fn open(path: &str) -> Result<Self> {
        let url = format!("sqlite:{}?mode=rwc", path);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!(path, "Subscriber store ready");
        Ok(store)
    }

    /// In-memory store for tests. Single connection, since every SQLite
    /// `:memory:` connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS subscribers (email TEXT PRIMARY KEY)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert a subscriber if absent. Duplicate emails are absorbed
    /// silently: the caller sees the same success path either way.
    pub async fn add(&self, email: &str) -> Result<()> {
        sqlx::query("INSERT INTO subscribers (email) VALUES (?) ON CONFLICT(email) DO NOTHING")
            .bind(email)
            .execute(&self.pool)
            .await?;

        debug!(email, "Subscriber stored");
        Ok(())
    }

    /// Full current membership, in storage order.
    pub async fn list_all(&self) -> Result<Vec<String>> {
        let emails: Vec<String> = sqlx::query_scalar("SELECT email FROM subscribers ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        Ok(emails)
    }
}
