//! Request validation.
//!
//! Turns the loosely-typed [`WalletRequest`] into a [`WalletOperation`] the
//! repositories can trust. Checks run in field order and stop at the first
//! failure, so clients always get a single, stable message.

use bigdecimal::{BigDecimal, Zero};

use crate::api::WalletRequest;
use crate::models::WalletOperation;

/// A rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// JSON name of the offending field
    pub field: &'static str,
    /// Human-readable reason
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validate a wallet request and build the operation it describes.
pub fn validate_request(request: &WalletRequest) -> Result<WalletOperation, ValidationError> {
    let wallet_id = request
        .wallet_id
        .ok_or_else(|| ValidationError::new("walletId", "Wallet ID cannot be null"))?;

    let operation_type = request
        .operation_type
        .ok_or_else(|| ValidationError::new("operationType", "Operation type cannot be null"))?;

    let amount = request
        .amount
        .clone()
        .ok_or_else(|| ValidationError::new("amount", "Amount cannot be null"))?;

    if amount <= BigDecimal::zero() {
        return Err(ValidationError::new(
            "amount",
            "Amount must be greater than zero",
        ));
    }

    Ok(WalletOperation {
        wallet_id,
        operation_type,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationType;
    use std::str::FromStr;
    use uuid::Uuid;

    fn full_request() -> WalletRequest {
        WalletRequest {
            wallet_id: Some(Uuid::new_v4()),
            operation_type: Some(OperationType::Withdraw),
            amount: Some(BigDecimal::from_str("25.75").unwrap()),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = full_request();
        let op = validate_request(&request).unwrap();

        assert_eq!(Some(op.wallet_id), request.wallet_id);
        assert_eq!(op.operation_type, OperationType::Withdraw);
        assert_eq!(op.amount, BigDecimal::from_str("25.75").unwrap());
    }

    #[test]
    fn test_missing_wallet_id() {
        let request = WalletRequest {
            wallet_id: None,
            ..full_request()
        };
        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.field, "walletId");
        assert_eq!(err.to_string(), "Wallet ID cannot be null");
    }

    #[test]
    fn test_missing_operation_type() {
        let request = WalletRequest {
            operation_type: None,
            ..full_request()
        };
        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.message, "Operation type cannot be null");
    }

    #[test]
    fn test_missing_amount() {
        let request = WalletRequest {
            amount: None,
            ..full_request()
        };
        let err = validate_request(&request).unwrap_err();
        assert_eq!(err.message, "Amount cannot be null");
    }

    #[test]
    fn test_first_missing_field_wins() {
        let err = validate_request(&WalletRequest::default()).unwrap_err();
        assert_eq!(err.field, "walletId");
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        for raw in ["0", "-1", "-0.01"] {
            let request = WalletRequest {
                amount: Some(BigDecimal::from_str(raw).unwrap()),
                ..full_request()
            };
            let err = validate_request(&request).unwrap_err();
            assert_eq!(err.message, "Amount must be greater than zero", "amount {}", raw);
        }
    }
}
