//! Repository selection and construction.
//!
//! The server picks its backend once at startup, either from the environment
//! or from a `repository.toml` file, and shares the result as
//! `Arc<dyn WalletRepository>`.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
#[cfg(feature = "postgres-repo")]
use super::repository::ErrorContext;
use super::repository::{RepositoryError, RepositoryResult, WalletRepository};
use super::PostgresConfig;

/// Storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("postgres", "pg", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl TryFrom<String> for RepositoryType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl RepositoryType {
    /// Backend selected by the environment.
    ///
    /// An explicit `REPOSITORY_TYPE` wins and must name a known backend: a
    /// typo must not silently swap a database for process memory. Without
    /// it, a configured `DATABASE_URL`/`PG_DATABASE_URL` selects Postgres.
    pub fn from_env() -> RepositoryResult<Self> {
        if let Ok(value) = std::env::var("REPOSITORY_TYPE") {
            return value
                .parse()
                .map_err(|e| RepositoryError::configuration(format!("REPOSITORY_TYPE: {}", e)));
        }

        let has_database_url = ["DATABASE_URL", "PG_DATABASE_URL"]
            .iter()
            .any(|key| std::env::var_os(key).is_some());

        Ok(if has_database_url {
            Self::Postgres
        } else {
            Self::Local
        })
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```no_run
/// use wallet_service::db::{RepositoryFactory, WalletRepository};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = RepositoryFactory::from_env().await?;
///     assert!(repo.health_check().await?);
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `postgres_config` is required for [`RepositoryType::Postgres`].
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn WalletRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            #[cfg(feature = "postgres-repo")]
            RepositoryType::Postgres => {
                let config = postgres_config.ok_or_else(|| {
                    RepositoryError::configuration("Postgres repository requires PostgresConfig")
                })?;
                let pg = Self::create_postgres(config).await?;
                Ok(pg as Arc<dyn WalletRepository>)
            }
            #[cfg(not(feature = "postgres-repo"))]
            RepositoryType::Postgres => {
                let _ = postgres_config;
                Err(RepositoryError::configuration(
                    "Postgres repository feature not enabled",
                ))
            }
        }
    }

    /// Create a Postgres repository.
    ///
    /// Pool construction and migrations block, so they run on the blocking
    /// thread pool.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| {
                RepositoryError::internal(
                    format!("Task join error: {}", e),
                    ErrorContext::new("create_postgres"),
                )
            })??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn WalletRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create the repository [`RepositoryType::from_env`] selects.
    pub async fn from_env() -> RepositoryResult<Arc<dyn WalletRepository>> {
        match RepositoryType::from_env()? {
            RepositoryType::Local => Ok(Self::create_local()),
            #[cfg(feature = "postgres-repo")]
            RepositoryType::Postgres => {
                let config = PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
                Self::create(RepositoryType::Postgres, Some(&config)).await
            }
            #[cfg(not(feature = "postgres-repo"))]
            RepositoryType::Postgres => Self::create(RepositoryType::Postgres, None).await,
        }
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn WalletRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        let postgres = config.to_postgres_config()?;
        Self::create(config.repository_type(), postgres.as_ref()).await
    }
}
