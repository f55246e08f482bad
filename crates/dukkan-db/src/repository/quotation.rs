//! # Quotation Repository
//!
//! Database operations for quotations. A quotation is a priced snapshot of
//! a cart with a validity date; it moves no stock and no money, and starts
//! life in `pending` status.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukkan_core::{Quotation, QuotationItem, QuotationStatus};

const QUOTATION_COLUMNS: &str = "id, quotation_number, customer_id, subtotal_cents, tax_cents, \
     total_cents, valid_until, notes, status, created_at";

/// Repository for quotation database operations.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
}

impl QuotationRepository {
    /// Creates a new QuotationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuotationRepository { pool }
    }

    /// Inserts a quotation header.
    pub async fn insert_quotation(&self, quotation: &Quotation) -> DbResult<()> {
        debug!(
            id = %quotation.id,
            quotation_number = %quotation.quotation_number,
            "Inserting quotation"
        );

        sqlx::query(
            "INSERT INTO quotations ( \
                 id, quotation_number, customer_id, subtotal_cents, tax_cents, \
                 total_cents, valid_until, notes, status, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&quotation.id)
        .bind(&quotation.quotation_number)
        .bind(&quotation.customer_id)
        .bind(quotation.subtotal_cents)
        .bind(quotation.tax_cents)
        .bind(quotation.total_cents)
        .bind(quotation.valid_until)
        .bind(&quotation.notes)
        .bind(quotation.status)
        .bind(quotation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts the item rows for a quotation, one per cart line.
    pub async fn insert_items(&self, items: &[QuotationItem]) -> DbResult<()> {
        for item in items {
            sqlx::query(
                "INSERT INTO quotation_items ( \
                     id, quotation_id, product_id, quantity, \
                     unit_price_cents, total_cents, created_at \
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&item.id)
            .bind(&item.quotation_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_cents)
            .bind(item.created_at)
            .execute(&self.pool)
            .await?;
        }

        debug!(count = items.len(), "Inserted quotation items");
        Ok(())
    }

    /// Gets a quotation by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quotation>> {
        let sql = format!("SELECT {QUOTATION_COLUMNS} FROM quotations WHERE id = ?1");
        let quotation = sqlx::query_as::<_, Quotation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(quotation)
    }

    /// Gets all items for a quotation in insertion order.
    pub async fn get_items(&self, quotation_id: &str) -> DbResult<Vec<QuotationItem>> {
        let items = sqlx::query_as::<_, QuotationItem>(
            "SELECT id, quotation_id, product_id, quantity, \
                    unit_price_cents, total_cents, created_at \
             FROM quotation_items \
             WHERE quotation_id = ?1 \
             ORDER BY created_at",
        )
        .bind(quotation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Updates a quotation's status (accepted, rejected, expired).
    pub async fn set_status(&self, id: &str, status: QuotationStatus) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Updating quotation status");

        let result = sqlx::query("UPDATE quotations SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        Ok(())
    }

    /// Marks pending quotations past their validity date as expired.
    ///
    /// Returns the number of quotations expired.
    pub async fn expire_overdue(&self, today: chrono::NaiveDate) -> DbResult<u64> {
        let result = sqlx::query(
            "UPDATE quotations SET status = 'expired' \
             WHERE status = 'pending' AND valid_until < ?1",
        )
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Generates a new quotation ID.
pub fn generate_quotation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new quotation item ID.
pub fn generate_quotation_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_product};
    use chrono::{Days, Utc};
    use dukkan_core::Quotation;

    fn quotation(number: &str, valid_until: chrono::NaiveDate) -> Quotation {
        Quotation {
            id: generate_quotation_id(),
            quotation_number: number.to_string(),
            customer_id: None,
            subtotal_cents: 20000,
            tax_cents: 3000,
            total_cents: 23000,
            valid_until,
            notes: None,
            status: QuotationStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_with_items() {
        let db = test_db().await;
        let product = test_product("TEA-100", 10000, 10);
        db.products().insert(&product).await.unwrap();

        let valid_until = Utc::now().date_naive() + Days::new(30);
        let header = quotation("QUO-1", valid_until);
        db.quotations().insert_quotation(&header).await.unwrap();
        db.quotations()
            .insert_items(&[QuotationItem {
                id: generate_quotation_item_id(),
                quotation_id: header.id.clone(),
                product_id: product.id,
                quantity: 2,
                unit_price_cents: 10000,
                total_cents: 20000,
                created_at: Utc::now(),
            }])
            .await
            .unwrap();

        let loaded = db.quotations().get_by_id(&header.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, QuotationStatus::Pending);
        assert_eq!(loaded.valid_until, valid_until);

        let items = db.quotations().get_items(&header.id).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_expire_overdue() {
        let db = test_db().await;
        let today = Utc::now().date_naive();

        let stale = quotation("QUO-OLD", today - Days::new(1));
        let fresh = quotation("QUO-NEW", today + Days::new(10));
        db.quotations().insert_quotation(&stale).await.unwrap();
        db.quotations().insert_quotation(&fresh).await.unwrap();

        let expired = db.quotations().expire_overdue(today).await.unwrap();
        assert_eq!(expired, 1);

        let loaded = db.quotations().get_by_id(&stale.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, QuotationStatus::Expired);
        let loaded = db.quotations().get_by_id(&fresh.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, QuotationStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_status() {
        let db = test_db().await;
        let header = quotation("QUO-2", Utc::now().date_naive() + Days::new(5));
        db.quotations().insert_quotation(&header).await.unwrap();

        db.quotations()
            .set_status(&header.id, QuotationStatus::Accepted)
            .await
            .unwrap();

        let loaded = db.quotations().get_by_id(&header.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, QuotationStatus::Accepted);
    }
}
