//! Wallet domain types and the balance mutation rules.
//!
//! Both repository backends load a [`Wallet`], call [`Wallet::apply`] while
//! holding their lock (row lock in Postgres, write lock in memory) and persist
//! the returned value. Keeping the arithmetic here means the two backends can
//! not disagree about what a deposit or withdrawal does.

use std::fmt;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of balance mutation requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Deposit => write!(f, "DEPOSIT"),
            OperationType::Withdraw => write!(f, "WITHDRAW"),
        }
    }
}

/// Errors raised when an operation would break a wallet invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// The withdrawal is larger than the current balance.
    #[error("Insufficient funds for wallet: {wallet_id}")]
    InsufficientFunds { wallet_id: Uuid },
}

/// A validated balance mutation.
///
/// Instances are produced by [`crate::validation::validate_request`], so the
/// amount is always strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletOperation {
    pub wallet_id: Uuid,
    pub operation_type: OperationType,
    pub amount: BigDecimal,
}

impl WalletOperation {
    pub fn deposit(wallet_id: Uuid, amount: impl Into<BigDecimal>) -> Self {
        Self {
            wallet_id,
            operation_type: OperationType::Deposit,
            amount: amount.into(),
        }
    }

    pub fn withdraw(wallet_id: Uuid, amount: impl Into<BigDecimal>) -> Self {
        Self {
            wallet_id,
            operation_type: OperationType::Withdraw,
            amount: amount.into(),
        }
    }
}

/// Persisted wallet state.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    pub id: Uuid,
    pub balance: BigDecimal,
    /// Number of operations applied so far.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// State of a wallet that has never received an operation.
    pub fn empty(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            balance: BigDecimal::zero(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Compute the wallet state after applying `operation_type` with `amount`.
    ///
    /// The receiver is left untouched; on rejection the caller simply drops
    /// the error and nothing has changed.
    pub fn apply(
        &self,
        operation_type: OperationType,
        amount: &BigDecimal,
    ) -> Result<Wallet, WalletError> {
        let balance = match operation_type {
            OperationType::Deposit => &self.balance + amount,
            OperationType::Withdraw => {
                let remaining = &self.balance - amount;
                if remaining < BigDecimal::zero() {
                    return Err(WalletError::InsufficientFunds { wallet_id: self.id });
                }
                remaining
            }
        };

        Ok(Wallet {
            id: self.id,
            balance,
            version: self.version + 1,
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn test_deposit_on_empty_wallet() {
        let id = Uuid::new_v4();
        let wallet = Wallet::empty(id)
            .apply(OperationType::Deposit, &BigDecimal::from(1000))
            .unwrap();

        assert_eq!(wallet.id, id);
        assert_eq!(wallet.balance, BigDecimal::from(1000));
        assert_eq!(wallet.version, 1);
    }

    #[test]
    fn test_withdraw_exact_balance() {
        let wallet = Wallet::empty(Uuid::new_v4())
            .apply(OperationType::Deposit, &BigDecimal::from(50))
            .unwrap()
            .apply(OperationType::Withdraw, &BigDecimal::from(50))
            .unwrap();

        assert!(wallet.balance.is_zero());
        assert_eq!(wallet.version, 2);
    }

    #[test]
    fn test_withdraw_insufficient_funds() {
        let id = Uuid::new_v4();
        let wallet = Wallet::empty(id);
        let err = wallet
            .apply(OperationType::Withdraw, &BigDecimal::from(1))
            .unwrap_err();

        assert_eq!(err, WalletError::InsufficientFunds { wallet_id: id });
        assert_eq!(
            err.to_string(),
            format!("Insufficient funds for wallet: {}", id)
        );
        assert_eq!(wallet.version, 0);
    }

    #[test]
    fn test_fractional_amounts_are_exact() {
        let wallet = Wallet::empty(Uuid::new_v4())
            .apply(OperationType::Deposit, &BigDecimal::from_str("0.1").unwrap())
            .unwrap()
            .apply(OperationType::Deposit, &BigDecimal::from_str("0.2").unwrap())
            .unwrap();

        assert_eq!(wallet.balance, BigDecimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_operation_type_serde() {
        assert_eq!(
            serde_json::to_string(&OperationType::Withdraw).unwrap(),
            "\"WITHDRAW\""
        );
        let parsed: OperationType = serde_json::from_str("\"DEPOSIT\"").unwrap();
        assert_eq!(parsed, OperationType::Deposit);
        assert!(serde_json::from_str::<OperationType>("\"deposit\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_balance_never_negative(ops in prop::collection::vec((any::<bool>(), 1u32..10_000), 0..64)) {
            let mut wallet = Wallet::empty(Uuid::new_v4());
            let mut applied = 0i64;

            for (is_deposit, amount) in ops {
                let op = if is_deposit { OperationType::Deposit } else { OperationType::Withdraw };
                match wallet.apply(op, &BigDecimal::from(amount)) {
                    Ok(next) => {
                        wallet = next;
                        applied += 1;
                    }
                    Err(WalletError::InsufficientFunds { .. }) => {
                        prop_assert_eq!(op, OperationType::Withdraw);
                    }
                }
                prop_assert!(wallet.balance >= BigDecimal::zero());
            }

            prop_assert_eq!(wallet.version, applied);
        }
    }
}
