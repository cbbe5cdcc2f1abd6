//! Persistence for flags.
//!
//! # Responsibilities
//! - Count, page and insert flags in the `Flags` / `Colors` tables
//! - Write a flag and all of its colors in one transaction
//!
//! # Design Decisions
//! - Page parameters are bound as text; SQLite coerces or rejects them
//! - Schema is owned by the deployment; `bootstrap_schema` only creates
//!   missing tables and never alters existing ones

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::flags::model::{ColorEntry, NewFlag, PageParams};

const CREATE_FLAGS: &str =
    "CREATE TABLE IF NOT EXISTS Flags (FlagID TEXT PRIMARY KEY, IP TEXT, Timestamp INTEGER);";
const CREATE_COLORS: &str =
    "CREATE TABLE IF NOT EXISTS Colors (FlagID TEXT, Color TEXT, N INTEGER);";

const COUNT_FLAGS: &str = "SELECT count(*) AS count FROM Flags;";

const SELECT_PAGE: &str = r#"
    SELECT Color.FlagID AS flag_id, Color.Color AS color, Color.N AS position
    FROM (
        SELECT FlagID, Timestamp FROM Flags
        ORDER BY Timestamp DESC, FlagID ASC
        LIMIT ?1 OFFSET ?2
    ) AS Flag
    INNER JOIN Colors AS Color ON Flag.FlagID = Color.FlagID
    ORDER BY Flag.Timestamp DESC, Color.FlagID ASC, Color.N ASC;
"#;

const INSERT_FLAG: &str = "INSERT INTO Flags (FlagID, IP, Timestamp) VALUES (?1, ?2, ?3);";
const INSERT_COLOR: &str = "INSERT INTO Colors (FlagID, Color, N) VALUES (?1, ?2, ?3);";

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid database url: {0}")]
    Url(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The persistence seam used by the HTTP handlers.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Number of flags ever stored.
    async fn count_flags(&self) -> Result<i64, StoreError>;

    /// Color rows for one page of flags, newest flag first, colors in
    /// submission order.
    async fn list_page(&self, params: &PageParams) -> Result<Vec<ColorEntry>, StoreError>;

    /// Store a flag and its colors atomically.
    async fn insert_flag(&self, new_flag: &NewFlag) -> Result<(), StoreError>;
}

/// [`FlagStore`] backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteFlagStore {
    pool: SqlitePool,
}

impl SqliteFlagStore {
    /// Open a pool for the configured database.
    ///
    /// In-memory databases live per connection, so they get a single
    /// connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(StoreError::Url)?
            .create_if_missing(config.create_if_missing);

        let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        tracing::info!(
            url = %config.url,
            in_memory,
            "Connected to flag store"
        );
        Ok(Self { pool })
    }

    /// Create the `Flags` and `Colors` tables when they are missing.
    pub async fn bootstrap_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_FLAGS).execute(&self.pool).await?;
        sqlx::query(CREATE_COLORS).execute(&self.pool).await?;
        tracing::debug!("Flag store schema ensured");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl FlagStore for SqliteFlagStore {
    async fn count_flags(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(COUNT_FLAGS)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_page(&self, params: &PageParams) -> Result<Vec<ColorEntry>, StoreError> {
        let rows = sqlx::query_as::<_, ColorEntry>(SELECT_PAGE)
            .bind(&params.limit)
            .bind(&params.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_flag(&self, new_flag: &NewFlag) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(INSERT_FLAG)
            .bind(new_flag.flag.id.to_string())
            .bind(new_flag.flag.submitter_ip.as_deref())
            .bind(new_flag.flag.timestamp)
            .execute(&mut *tx)
            .await?;

        for entry in new_flag.entries() {
            sqlx::query(INSERT_COLOR)
                .bind(&entry.flag_id)
                .bind(&entry.color)
                .bind(entry.position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
