//! # Cash Register Repository
//!
//! Database operations for the cash-register log. Each row is one drawer
//! movement (opening float, deposit, withdrawal, closing count); the drawer
//! balance itself is never stored; it is folded from the day's rows by
//! [`dukkan_core::cash_balance`].

use chrono::{Days, NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use dukkan_core::{CashTransaction, CashTransactionKind, Money};

/// Repository for cash register database operations.
#[derive(Debug, Clone)]
pub struct RegisterRepository {
    pool: SqlitePool,
}

impl RegisterRepository {
    /// Creates a new RegisterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegisterRepository { pool }
    }

    /// Logs a drawer movement.
    pub async fn insert(
        &self,
        kind: CashTransactionKind,
        amount: Money,
        description: &str,
    ) -> DbResult<CashTransaction> {
        debug!(kind = ?kind, amount = %amount, "Logging register transaction");

        let transaction = CashTransaction {
            id: Uuid::new_v4().to_string(),
            kind,
            amount_cents: amount.cents(),
            description: description.to_string(),
            created_at: chrono::Utc::now(),
        };

        sqlx::query(
            "INSERT INTO cash_register_transactions ( \
                 id, kind, amount_cents, description, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&transaction.id)
        .bind(transaction.kind)
        .bind(transaction.amount_cents)
        .bind(&transaction.description)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Lists one calendar day's movements, newest first.
    ///
    /// The day window is [midnight, next midnight) in UTC, matching how
    /// timestamps are written.
    pub async fn list_for_day(&self, day: NaiveDate) -> DbResult<Vec<CashTransaction>> {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let end = (day + Days::new(1)).and_time(NaiveTime::MIN).and_utc();

        let transactions = sqlx::query_as::<_, CashTransaction>(
            "SELECT id, kind, amount_cents, description, created_at \
             FROM cash_register_transactions \
             WHERE created_at >= ?1 AND created_at < ?2 \
             ORDER BY created_at DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
