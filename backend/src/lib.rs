//! # Wallet Service
//!
//! Wallet balance service with deposit/withdraw operations and balance
//! lookups over a REST API.
//!
//! ## Features
//!
//! - **Atomic balance mutations**: every operation is a locked
//!   read-modify-write, balances never go negative
//! - **Exact arithmetic**: amounts are arbitrary-precision decimals
//! - **Pluggable storage**: PostgreSQL (Diesel, embedded migrations) or in-memory
//! - **HTTP API**: axum-based REST endpoints
//!
//! ## Architecture
//!
//! - [`api`]: wire DTOs for requests and responses
//! - [`models`]: wallet domain types and balance rules
//! - [`validation`]: request validation into typed operations
//! - [`db`]: repository pattern, storage backends and service layer
//! - [`http`]: axum router, handlers and error mapping

pub mod api;

pub mod db;
pub mod models;

pub mod validation;

#[cfg(feature = "http-server")]
pub mod http;
