//! Wallet repository trait.
//!
//! This trait defines the storage operations the service layer needs. The
//! important one is [`WalletRepository::apply_operation`], which every backend
//! must implement as a single atomic read-modify-write.

use async_trait::async_trait;
use uuid::Uuid;

use super::error::RepositoryResult;
use crate::models::{Wallet, WalletOperation};

/// Repository trait for wallet persistence.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Wallet Operations ====================

    /// Load a wallet by ID.
    ///
    /// # Returns
    /// * `Ok(Some(Wallet))` - The stored wallet
    /// * `Ok(None)` - If no operation was ever applied to this ID
    /// * `Err(RepositoryError)` - If the operation fails
    async fn find_wallet(&self, wallet_id: Uuid) -> RepositoryResult<Option<Wallet>>;

    /// Apply a deposit or withdrawal atomically.
    ///
    /// The current state is read, passed through [`Wallet::apply`] and
    /// written back without any other operation on the same wallet
    /// interleaving. A deposit to an unknown wallet creates it.
    ///
    /// # Returns
    /// * `Ok(Wallet)` - The wallet after the operation
    /// * `Err(RepositoryError::Rejected)` - If the balance would go negative;
    ///   no state is changed and no wallet is created
    /// * `Err(RepositoryError)` - If the operation fails
    async fn apply_operation(&self, operation: &WalletOperation) -> RepositoryResult<Wallet>;

    /// Number of stored wallets.
    async fn count_wallets(&self) -> RepositoryResult<u64>;
}
