use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use veritrail_application::{LedgerStore, WriteSet};
use veritrail_core::{AppError, AppResult, ChannelName};

/// PostgreSQL-backed world state.
#[derive(Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn get_state(&self, channel: &ChannelName, key: &str) -> AppResult<Option<Vec<u8>>> {
        let value = sqlx::query_scalar::<_, Vec<u8>>(
            r#"
            SELECT value
            FROM ledger_state
            WHERE channel = $1 AND key = $2
            "#,
        )
        .bind(channel.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to read ledger key '{key}' on channel '{channel}': {error}"
            ))
        })?;

        Ok(value)
    }

    async fn apply_write_set(&self, channel: &ChannelName, write_set: &WriteSet) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Storage(format!("failed to start ledger transaction: {error}"))
        })?;

        for (key, value) in write_set.iter() {
            sqlx::query(
                r#"
                INSERT INTO ledger_state (channel, key, value)
                VALUES ($1, $2, $3)
                ON CONFLICT (channel, key)
                DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
                "#,
            )
            .bind(channel.as_str())
            .bind(key)
            .bind(value)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Storage(format!("failed to write ledger key '{key}': {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Storage(format!("failed to commit ledger transaction: {error}"))
        })?;

        debug!(channel = %channel, writes = write_set.len(), "applied write set");
        Ok(())
    }
}
