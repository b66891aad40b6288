//! Data Transfer Objects for the HTTP API.
//!
//! Wallet DTOs are re-exported from [`crate::api`]; only HTTP-specific
//! payloads are defined here.

use serde::{Deserialize, Serialize};

pub use crate::api::{WalletRequest, WalletResponse};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
