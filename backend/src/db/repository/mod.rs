//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`wallet`]: Wallet lookups and atomic balance mutations
//!
//! Implementations live in [`crate::db::repositories`].

pub mod error;
pub mod wallet;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use wallet::WalletRepository;
