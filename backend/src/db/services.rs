//! High-level database service layer.
//!
//! Repository-agnostic wallet operations. HTTP handlers and the binary call
//! these rather than the repository directly so that lookups, logging and
//! not-found semantics are the same for every backend.
//!
//! # Usage
//!
//! ```no_run
//! use wallet_service::db::{services, repositories::LocalRepository};
//! use wallet_service::models::WalletOperation;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let wallet_id = uuid::Uuid::new_v4();
//!
//!     services::process_operation(&repo, &WalletOperation::deposit(wallet_id, 250)).await?;
//!     let wallet = services::get_wallet(&repo, wallet_id).await?;
//!     println!("Balance: {}", wallet.balance);
//!
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};
use uuid::Uuid;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, WalletRepository};
use crate::models::{Wallet, WalletOperation};

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: WalletRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Wallet Operations ====================

/// Apply a validated deposit or withdrawal.
///
/// # Returns
/// * `Ok(Wallet)` - The wallet state after the operation
/// * `Err(RepositoryError::Rejected)` - If a withdrawal exceeds the balance
/// * `Err(RepositoryError)` - If storage fails
pub async fn process_operation<R: WalletRepository + ?Sized>(
    repo: &R,
    operation: &WalletOperation,
) -> RepositoryResult<Wallet> {
    debug!(
        "Applying {} of {} to wallet {}",
        operation.operation_type, operation.amount, operation.wallet_id
    );

    match repo.apply_operation(operation).await {
        Ok(wallet) => {
            info!(
                "Wallet {} {} {} -> balance {} (version {})",
                wallet.id,
                operation.operation_type,
                operation.amount,
                wallet.balance,
                wallet.version
            );
            Ok(wallet)
        }
        Err(e @ RepositoryError::Rejected { .. }) => {
            info!("Rejected {} for wallet {}: {}", operation.operation_type, operation.wallet_id, e);
            Err(e)
        }
        Err(e) => {
            warn!(
                "Failed to apply {} to wallet {}: {}",
                operation.operation_type, operation.wallet_id, e
            );
            Err(e)
        }
    }
}

/// Retrieve a wallet by ID.
///
/// # Returns
/// * `Ok(Wallet)` - The stored wallet
/// * `Err(RepositoryError::NotFound)` - With message `Wallet not found: <id>`
pub async fn get_wallet<R: WalletRepository + ?Sized>(
    repo: &R,
    wallet_id: Uuid,
) -> RepositoryResult<Wallet> {
    repo.find_wallet(wallet_id).await?.ok_or_else(|| {
        RepositoryError::not_found(
            format!("Wallet not found: {}", wallet_id),
            ErrorContext::new("get_wallet").for_wallet(wallet_id),
        )
    })
}

/// Number of wallets currently stored.
pub async fn count_wallets<R: WalletRepository + ?Sized>(repo: &R) -> RepositoryResult<u64> {
    repo.count_wallets().await
}
