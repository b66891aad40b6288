//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//! - Row-level locking for balance updates
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{info, warn};
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, WalletRepository};
use crate::models::{Wallet, WalletOperation};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Extra attempts after a retryable failure
    pub max_retries: u32,
    /// First pause between attempts; doubles after each retry
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Read the variables listed in the module documentation.
    pub fn from_env() -> Result<Self, String> {
        let url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let mut config = Self::with_url(url);
        override_from_env("PG_POOL_MAX", &mut config.max_pool_size);
        override_from_env("PG_POOL_MIN", &mut config.min_pool_size);
        override_from_env("PG_CONN_TIMEOUT_SEC", &mut config.connection_timeout_sec);
        override_from_env("PG_IDLE_TIMEOUT_SEC", &mut config.idle_timeout_sec);
        override_from_env("PG_MAX_RETRIES", &mut config.max_retries);
        override_from_env("PG_RETRY_DELAY_MS", &mut config.retry_delay_ms);
        Ok(config)
    }

    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, target: &mut T) {
    match std::env::var(key).map(|raw| raw.parse::<T>()) {
        Ok(Ok(value)) => *target = value,
        Ok(Err(_)) => warn!("Ignoring unparseable {}", key),
        Err(_) => {}
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Connect and bring the schema up to date.
    ///
    /// This blocks while the pool connects; call it from a blocking context.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| RepositoryError::from(e).with_operation("create_pool"))?;

        let mut conn = pool
            .get()
            .map_err(|e| RepositoryError::from(e).with_operation("run_migrations"))?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        for version in applied {
            info!("Applied migration {}", version);
        }
        drop(conn);

        Ok(Self { pool, config })
    }

    /// Run `work` on a pooled connection on the blocking thread pool.
    ///
    /// A retryable failure re-runs `work` from the start after a pause that
    /// doubles each time, so `work` must be a whole unit of work with its own
    /// transaction.
    async fn with_conn<T, F>(&self, operation: &'static str, work: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: Fn(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let first_delay = Duration::from_millis(self.config.retry_delay_ms);

        task::spawn_blocking(move || {
            let mut delay = first_delay;
            let mut attempt = 0;
            loop {
                let result = pool
                    .get()
                    .map_err(RepositoryError::from)
                    .and_then(|mut conn| work(&mut conn));

                match result {
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        attempt += 1;
                        warn!(
                            "{} failed (retry {}/{} in {:?}): {}",
                            operation, attempt, max_retries, delay, e
                        );
                        std::thread::sleep(delay);
                        delay *= 2;
                    }
                    other => return other.map_err(|e| e.with_operation(operation)),
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(
                format!("Blocking task failed: {}", e),
                ErrorContext::new(operation),
            )
        })?
    }
}

/// Lock, mutate and persist one wallet inside a single transaction.
///
/// A zero row is inserted first so that the `FOR UPDATE` always has a row to
/// lock, even for the very first operation on a wallet. If the operation is
/// rejected the transaction rolls back and the placeholder disappears with it.
fn apply_in_transaction(
    conn: &mut PgConnection,
    operation: &WalletOperation,
) -> RepositoryResult<Wallet> {
    conn.transaction::<_, RepositoryError, _>(|conn| {
        diesel::insert_into(wallets::table)
            .values(&NewWalletRow::empty(operation.wallet_id))
            .on_conflict(wallets::id)
            .do_nothing()
            .execute(conn)?;

        let current: Wallet = wallets::table
            .find(operation.wallet_id)
            .select(WalletRow::as_select())
            .for_update()
            .get_result::<WalletRow>(conn)?
            .into();

        let updated = current.apply(operation.operation_type, &operation.amount)?;

        diesel::update(wallets::table.find(operation.wallet_id))
            .set((
                wallets::balance.eq(&updated.balance),
                wallets::version.eq(updated.version),
                wallets::updated_at.eq(updated.updated_at),
            ))
            .execute(conn)?;

        Ok(updated)
    })
}

#[async_trait]
impl WalletRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn find_wallet(&self, wallet_id: Uuid) -> RepositoryResult<Option<Wallet>> {
        self.with_conn("find_wallet", move |conn| {
            let row = wallets::table
                .find(wallet_id)
                .select(WalletRow::as_select())
                .first::<WalletRow>(conn)
                .optional()?;
            Ok(row.map(Wallet::from))
        })
        .await
    }

    async fn apply_operation(&self, operation: &WalletOperation) -> RepositoryResult<Wallet> {
        let operation = operation.clone();
        self.with_conn("apply_operation", move |conn| {
            apply_in_transaction(conn, &operation)
        })
        .await
    }

    async fn count_wallets(&self) -> RepositoryResult<u64> {
        self.with_conn("count_wallets", |conn| {
            let count: i64 = wallets::table.count().get_result(conn)?;
            Ok(count.unsigned_abs())
        })
        .await
    }
}
