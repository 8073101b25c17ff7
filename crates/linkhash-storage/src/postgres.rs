use async_trait::async_trait;
use linkhash_core::store::Result;
use linkhash_core::{Insertion, KeyStore, ReadKeyStore, ShortKey, StorageError};
use sqlx::{PgPool, Row};
use tracing::{debug, warn};

/// Default name of the table holding the key to URL mapping.
pub const DEFAULT_TABLE_NAME: &str = "short_keys";

/// Postgres identifiers are truncated past this length.
const MAX_TABLE_NAME_LENGTH: usize = 63;

/// Rounds of insert-then-read in `put_if_absent` before giving up. A round
/// only repeats when the conflicting row disappears between the two
/// statements.
const MAX_INSERT_ROUNDS: usize = 3;

/// Postgres implementation of the key store contract.
///
/// Each mapping is one row of a two-column table keyed by a fixed-width
/// identifier:
///
/// ```sql
/// CREATE TABLE "short_keys" (
///     id  CHAR(10) PRIMARY KEY,
///     url TEXT NOT NULL
/// );
/// ```
///
/// The table name is configurable so several deployments can share a
/// database. `put_if_absent` relies on the primary key: the insert uses
/// `ON CONFLICT DO NOTHING`, and a losing writer reads back the row that won.
#[derive(Debug, Clone)]
pub struct PostgresKeyStore {
    pool: PgPool,
    table: String,
}

impl PostgresKeyStore {
    /// Creates a store over an existing pool. The table is not created.
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self { pool, table })
    }

    /// Opens a new pool and creates the table if it does not exist yet.
    pub async fn connect(database_url: &str, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;

        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        let store = Self { pool, table };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the backing table if it is missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{}" (
                id  CHAR(10) PRIMARY KEY,
                url TEXT NOT NULL
            )
            "#,
            self.table
        );

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(table = %self.table, "key store schema ready");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Closes every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn insert_if_free(&self, key: &ShortKey, url: &str) -> Result<bool> {
        let sql = format!(
            r#"
            INSERT INTO "{}" (id, url)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(key.as_str())
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}

/// Accepts plain SQL identifiers only, since the name is spliced into
/// statements.
fn validate_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !starts_well || !rest_ok || table.len() > MAX_TABLE_NAME_LENGTH {
        return Err(StorageError::InvalidData(format!(
            "invalid table name '{table}': expected [A-Za-z_][A-Za-z0-9_]{{0,62}}"
        )));
    }
    Ok(())
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadKeyStore for PostgresKeyStore {
    async fn get(&self, key: &ShortKey) -> Result<Option<String>> {
        let sql = format!(
            r#"
            SELECT url
            FROM "{}"
            WHERE id = $1
            "#,
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let url: String = row.try_get("url").map_err(map_sqlx_error)?;
        Ok(Some(url))
    }
}

#[async_trait]
impl KeyStore for PostgresKeyStore {
    async fn put(&self, key: &ShortKey, url: &str) -> Result<()> {
        let sql = format!(
            r#"
            INSERT INTO "{}" (id, url)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET url = EXCLUDED.url
            "#,
            self.table
        );

        sqlx::query(&sql)
            .bind(key.as_str())
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn put_if_absent(&self, key: &ShortKey, url: &str) -> Result<Insertion> {
        for _ in 0..MAX_INSERT_ROUNDS {
            if self.insert_if_free(key, url).await? {
                return Ok(Insertion::Inserted);
            }
            if let Some(existing) = self.get(key).await? {
                return Ok(Insertion::Occupied(existing));
            }
            debug!(key = %key, "conflicting row vanished before read-back, retrying insert");
        }

        warn!(key = %key, "conditional insert did not settle");
        Err(StorageError::Operation(format!(
            "conditional insert for key '{key}' did not settle after {MAX_INSERT_ROUNDS} rounds"
        )))
    }
}
