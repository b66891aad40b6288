use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::wallets;
use crate::models::Wallet;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wallets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WalletRow {
    pub id: Uuid,
    pub balance: BigDecimal,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WalletRow> for Wallet {
    fn from(row: WalletRow) -> Self {
        Wallet {
            id: row.id,
            balance: row.balance,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Zero-balance placeholder inserted before locking a wallet row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = wallets)]
pub struct NewWalletRow {
    pub id: Uuid,
    pub balance: BigDecimal,
    pub version: i64,
}

impl NewWalletRow {
    pub fn empty(id: Uuid) -> Self {
        Self {
            id,
            balance: BigDecimal::from(0),
            version: 0,
        }
    }
}
