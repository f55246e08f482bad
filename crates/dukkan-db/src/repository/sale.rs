//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! Sales are written exactly once at checkout and never updated: the header
//! and its items are immutable snapshots of the cart at that moment. There
//! is no draft phase; the checkout orchestrator computes everything first
//! and then persists.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use dukkan_core::{Sale, SaleItem};

const SALE_COLUMNS: &str = "id, invoice_number, customer_id, subtotal_cents, discount_cents, \
     discount_bps, tax_cents, total_cents, paid_cents, payment_method, \
     payment_status, notes, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale header.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the invoice number already exists.
    pub async fn insert_sale(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, invoice_number = %sale.invoice_number, "Inserting sale");

        sqlx::query(
            "INSERT INTO sales ( \
                 id, invoice_number, customer_id, subtotal_cents, discount_cents, \
                 discount_bps, tax_cents, total_cents, paid_cents, payment_method, \
                 payment_status, notes, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&sale.id)
        .bind(&sale.invoice_number)
        .bind(&sale.customer_id)
        .bind(sale.subtotal_cents)
        .bind(sale.discount_cents)
        .bind(sale.discount_bps)
        .bind(sale.tax_cents)
        .bind(sale.total_cents)
        .bind(sale.paid_cents)
        .bind(sale.payment_method)
        .bind(sale.payment_status)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts the item rows for a sale, one per cart line.
    ///
    /// ## Snapshot Pattern
    /// Each row freezes quantity, unit price, line discount and line total
    /// at checkout time. Later catalog edits don't touch sale history.
    pub async fn insert_items(&self, items: &[SaleItem]) -> DbResult<()> {
        for item in items {
            sqlx::query(
                "INSERT INTO sale_items ( \
                     id, sale_id, product_id, quantity, unit_price_cents, \
                     discount_cents, total_cents, created_at \
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.discount_cents)
            .bind(item.total_cents)
            .bind(item.created_at)
            .execute(&self.pool)
            .await?;
        }

        debug!(count = items.len(), "Inserted sale items");
        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets a sale by invoice number.
    pub async fn get_by_invoice_number(&self, invoice_number: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE invoice_number = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(invoice_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all items for a sale in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT id, sale_id, product_id, quantity, unit_price_cents, \
                    discount_cents, total_cents, created_at \
             FROM sale_items \
             WHERE sale_id = ?1 \
             ORDER BY created_at",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new sale item ID.
pub fn generate_sale_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_product};
    use crate::DbError;
    use chrono::Utc;
    use dukkan_core::{PaymentKind, PaymentStatus, Sale, SaleItem};

    fn sale(invoice_number: &str) -> Sale {
        Sale {
            id: generate_sale_id(),
            invoice_number: invoice_number.to_string(),
            customer_id: None,
            subtotal_cents: 20000,
            discount_cents: 2000,
            discount_bps: 1000,
            tax_cents: 2700,
            total_cents: 20700,
            paid_cents: 20700,
            payment_method: PaymentKind::Cash,
            payment_status: PaymentStatus::Paid,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_sale() {
        let db = test_db().await;
        let sale = sale("INV-20260807-abcdef0123");
        db.sales().insert_sale(&sale).await.unwrap();

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.invoice_number, sale.invoice_number);
        assert_eq!(loaded.total_cents, 20700);
        assert_eq!(loaded.payment_status, PaymentStatus::Paid);

        let by_number = db
            .sales()
            .get_by_invoice_number(&sale.invoice_number)
            .await
            .unwrap();
        assert!(by_number.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_invoice_number_rejected() {
        let db = test_db().await;
        db.sales().insert_sale(&sale("INV-1")).await.unwrap();
        let err = db.sales().insert_sale(&sale("INV-1")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_items_snapshot() {
        let db = test_db().await;
        let product = test_product("TEA-100", 10000, 10);
        db.products().insert(&product).await.unwrap();

        let header = sale("INV-2");
        db.sales().insert_sale(&header).await.unwrap();

        let items = vec![SaleItem {
            id: generate_sale_item_id(),
            sale_id: header.id.clone(),
            product_id: product.id.clone(),
            quantity: 2,
            unit_price_cents: 10000,
            discount_cents: 0,
            total_cents: 20000,
            created_at: Utc::now(),
        }];
        db.sales().insert_items(&items).await.unwrap();

        let loaded = db.sales().get_items(&header.id).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].quantity, 2);
        assert_eq!(loaded[0].total_cents, 20000);
    }

    #[tokio::test]
    async fn test_item_requires_existing_sale() {
        let db = test_db().await;
        let product = test_product("TEA-100", 10000, 10);
        db.products().insert(&product).await.unwrap();

        let orphan = SaleItem {
            id: generate_sale_item_id(),
            sale_id: "no-such-sale".to_string(),
            product_id: product.id,
            quantity: 1,
            unit_price_cents: 10000,
            discount_cents: 0,
            total_cents: 10000,
            created_at: Utc::now(),
        };
        let err = db.sales().insert_items(&[orphan]).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
