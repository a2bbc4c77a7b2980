use anyhow::{Context, Result};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

use super::repositories::{AccountingRepository, LeadRepository, SessionRepository};
use super::traits::Connection;

/// DbConnection owns the pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database {}", url);
            Sqlite::create_database(url)
                .await
                .with_context(|| format!("Failed to create database {}", url))?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Self::from_pool(pool).await
    }

    /// In-memory database for tests.
    ///
    /// Every SQLite connection to `:memory:` is its own database, so the pool
    /// is pinned to a single connection that never expires.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        use sqlx::sqlite::SqlitePoolOptions;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Links between tables are plain ids without foreign keys: an entry may
        // outlive the lead it was recorded against.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                instrument TEXT,
                status TEXT NOT NULL,
                fixed_price TEXT,
                closer TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);")
            .execute(pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at DESC);")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounting_entries (
                id TEXT PRIMARY KEY,
                lead_id TEXT,
                client_name TEXT NOT NULL,
                entry_type TEXT NOT NULL,
                amount TEXT NOT NULL,
                remaining_amount TEXT,
                commission_closer TEXT NOT NULL,
                commission_formateur TEXT NOT NULL,
                payment_method TEXT,
                payment_date TEXT NOT NULL,
                notes TEXT,
                version INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_accounting_entries_lead_id ON accounting_entries(lead_id);",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_accounting_entries_payment_date ON accounting_entries(payment_date DESC);",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS training_sessions (
                id TEXT PRIMARY KEY,
                lead_id TEXT,
                student_name TEXT NOT NULL,
                format TEXT NOT NULL,
                weekday TEXT,
                start_at TEXT NOT NULL,
                end_at TEXT NOT NULL,
                dates TEXT NOT NULL,
                location TEXT,
                notes TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_training_sessions_start_at ON training_sessions(start_at);",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type LeadRepository = LeadRepository;
    type AccountingRepository = AccountingRepository;
    type SessionRepository = SessionRepository;

    fn create_lead_repository(&self) -> Self::LeadRepository {
        LeadRepository::new(self.clone())
    }

    fn create_accounting_repository(&self) -> Self::AccountingRepository {
        AccountingRepository::new(self.clone())
    }

    fn create_session_repository(&self) -> Self::SessionRepository {
        SessionRepository::new(self.clone())
    }
}
