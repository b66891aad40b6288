//! Public API surface for the wallet service.
//!
//! This file consolidates the wire DTOs for the HTTP API. Field names follow
//! the camelCase JSON contract clients already use.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::models::OperationType;
use crate::models::Wallet;

/// Request body for `POST /api/v1/wallet`.
///
/// Every field is optional at the wire level so that a missing field reaches
/// validation and produces a field-specific message instead of a generic
/// parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRequest {
    #[serde(default)]
    pub wallet_id: Option<Uuid>,
    #[serde(default)]
    pub operation_type: Option<OperationType>,
    #[serde(
        default,
        deserialize_with = "amount::deserialize_optional",
        serialize_with = "amount::serialize_optional"
    )]
    pub amount: Option<BigDecimal>,
}

/// Response body for `GET /api/v1/wallets/{walletId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub wallet_id: Uuid,
    #[serde(with = "amount")]
    pub balance: BigDecimal,
}

impl From<Wallet> for WalletResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            wallet_id: wallet.id,
            balance: wallet.balance,
        }
    }
}

/// Decimal amounts on the wire.
///
/// Amounts are written as JSON numbers in plain (non-exponent) notation. They
/// are read from either numbers or strings. `serde_json` is built with
/// `arbitrary_precision`, so a number reaches [`BigDecimal`] as the exact
/// literal text and never passes through `f64`.
pub mod amount {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::Serializer;
    use serde_json::Value;

    pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = value.to_plain_string();
        match serde_json::Number::from_str(&text) {
            Ok(number) => serde::Serialize::serialize(&number, serializer),
            Err(_) => serializer.serialize_str(&text),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_optional(deserializer)?.ok_or_else(|| de::Error::custom("amount is null"))
    }

    pub fn serialize_optional<S>(
        value: &Option<BigDecimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Number(n) => parse(&n.to_string()).map(Some),
            Value::String(s) => parse(s.trim()).map(Some),
            other => Err(de::Error::custom(format!(
                "expected a decimal amount, found {}",
                other
            ))),
        }
    }

    fn parse<E: de::Error>(text: &str) -> Result<BigDecimal, E> {
        BigDecimal::from_str(text)
            .map_err(|e| E::custom(format!("invalid decimal amount '{}': {}", text, e)))
    }
}
