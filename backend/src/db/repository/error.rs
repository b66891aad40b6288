//! Error types for wallet storage.
//!
//! Every storage failure carries an [`ErrorContext`] naming the operation and,
//! where known, the wallet involved. The context also records whether
//! replaying the unit of work may succeed, which drives both the Postgres
//! retry loop and the HTTP status.

use std::fmt;

use uuid::Uuid;

use crate::models::WalletError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where and how a repository error happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Repository operation, e.g. `apply_operation`
    pub operation: Option<&'static str>,
    pub wallet_id: Option<Uuid>,
    /// Free-form detail such as the database error kind
    pub details: Option<String>,
    /// Replaying the failed unit of work may succeed
    pub retryable: bool,
}

impl ErrorContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation: Some(operation),
            ..Default::default()
        }
    }

    pub fn for_wallet(mut self, wallet_id: Uuid) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        f.write_str("[")?;
        if let Some(operation) = self.operation {
            write!(f, "operation={}", operation)?;
            sep = ", ";
        }
        if let Some(wallet_id) = self.wallet_id {
            write!(f, "{}wallet={}", sep, wallet_id)?;
            sep = ", ";
        }
        if let Some(details) = &self.details {
            write!(f, "{}{}", sep, details)?;
            sep = ", ";
        }
        if self.retryable {
            write!(f, "{}retryable", sep)?;
        }
        f.write_str("]")
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The database could not be reached or no pooled connection was free.
    #[error("Connection error: {message} {context}")]
    Connection {
        message: String,
        context: ErrorContext,
    },

    /// A statement failed inside the database.
    #[error("Query error: {message} {context}")]
    Query {
        message: String,
        context: ErrorContext,
    },

    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Backend selection or connection settings are unusable.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },

    /// The operation was refused by a wallet invariant. Nothing was written.
    #[error("{source}")]
    Rejected {
        source: WalletError,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Connection failures are always retryable.
    pub fn connection(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Connection {
            message: message.into(),
            context: context.retryable(),
        }
    }

    pub fn query(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Query {
            message: message.into(),
            context,
        }
    }

    pub fn not_found(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.context().retryable
    }

    /// The message without the context suffix, suitable for clients.
    pub fn message(&self) -> String {
        match self {
            Self::Connection { message, .. }
            | Self::Query { message, .. }
            | Self::NotFound { message, .. }
            | Self::Configuration { message, .. }
            | Self::Internal { message, .. } => message.clone(),
            Self::Rejected { source, .. } => source.to_string(),
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Connection { context, .. }
            | Self::Query { context, .. }
            | Self::NotFound { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. }
            | Self::Rejected { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Connection { context, .. }
            | Self::Query { context, .. }
            | Self::NotFound { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. }
            | Self::Rejected { context, .. } => context,
        }
    }

    /// Record the repository operation, keeping one set closer to the failure.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        let context = self.context_mut();
        if context.operation.is_none() {
            context.operation = Some(operation);
        }
        self
    }
}

impl From<WalletError> for RepositoryError {
    fn from(err: WalletError) -> Self {
        let context = match &err {
            WalletError::InsufficientFunds { wallet_id } => {
                ErrorContext::default().for_wallet(*wallet_id)
            }
        };
        RepositoryError::Rejected {
            source: err,
            context,
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::DatabaseError(kind, info) => {
                let context = ErrorContext::default().with_details(format!("kind={:?}", kind));
                // Postgres aborts one side of a write conflict; the loser can replay.
                let context = match kind {
                    DatabaseErrorKind::SerializationFailure
                    | DatabaseErrorKind::ClosedConnection => context.retryable(),
                    _ => context,
                };
                RepositoryError::query(info.message(), context)
            }
            Error::NotFound => RepositoryError::not_found("Row not found", ErrorContext::default()),
            Error::DeserializationError(e) | Error::SerializationError(e) => {
                RepositoryError::internal(
                    format!("Row conversion failed: {}", e),
                    ErrorContext::default(),
                )
            }
            other => RepositoryError::query(other.to_string(), ErrorContext::default()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection(err.to_string(), ErrorContext::default())
    }
}
