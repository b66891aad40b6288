//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`WalletRepository`]
//! suitable for unit testing and local development. All data is stored in a
//! `HashMap` behind a single lock, providing fast, deterministic, and isolated
//! execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::repository::*;
use crate::models::{Wallet, WalletOperation};

/// In-memory local repository.
///
/// Operations on any wallet take the write lock for the whole
/// read-compute-store sequence, so concurrent callers are serialized.
///
/// # Example
/// ```
/// use wallet_service::db::repositories::LocalRepository;
/// use wallet_service::db::WalletRepository;
/// use wallet_service::models::WalletOperation;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// let id = uuid::Uuid::new_v4();
/// repo.apply_operation(&WalletOperation::deposit(id, 100)).await.unwrap();
/// assert_eq!(repo.wallet_count(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    wallets: HashMap<Uuid, Wallet>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            wallets: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Store a wallet as-is, replacing any existing one with the same ID.
    ///
    /// This is a helper method for setting up data.
    pub fn insert_wallet(&self, wallet: Wallet) {
        self.data.write().wallets.insert(wallet.id, wallet);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of wallets stored.
    pub fn wallet_count(&self) -> usize {
        self.data.read().wallets.len()
    }

    /// Check if a wallet exists.
    pub fn has_wallet(&self, wallet_id: Uuid) -> bool {
        self.data.read().wallets.contains_key(&wallet_id)
    }

    /// Helper to check health and return error if unhealthy.
    fn ensure_healthy(data: &LocalData, operation: &'static str) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn find_wallet(&self, wallet_id: Uuid) -> RepositoryResult<Option<Wallet>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "find_wallet")?;
        Ok(data.wallets.get(&wallet_id).cloned())
    }

    async fn apply_operation(&self, operation: &WalletOperation) -> RepositoryResult<Wallet> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "apply_operation")?;

        let current = data
            .wallets
            .get(&operation.wallet_id)
            .cloned()
            .unwrap_or_else(|| Wallet::empty(operation.wallet_id));

        let updated = current.apply(operation.operation_type, &operation.amount)?;
        data.wallets.insert(updated.id, updated.clone());

        Ok(updated)
    }

    async fn count_wallets(&self) -> RepositoryResult<u64> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "count_wallets")?;
        Ok(data.wallets.len() as u64)
    }
}
