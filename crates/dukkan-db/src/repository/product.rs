//! # Product Repository
//!
//! Database operations for products and stock.
//!
//! ## Stock Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Sale line:    UPDATE products                                      │
//! │                SET stock_quantity = stock_quantity - ?qty           │
//! │                WHERE id = ? AND stock_quantity >= ?qty              │
//! │                                                                     │
//! │  Zero rows affected = insufficient stock at commit time. The row    │
//! │  itself is the arbiter; a client-held snapshot is never trusted,    │
//! │  so two terminals selling the same product serialize on the UPDATE  │
//! │  instead of overwriting each other's write.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukkan_core::{AdjustmentKind, Product, StockAdjustment};

const PRODUCT_COLUMNS: &str = "id, sku, barcode, name, name_ar, description, unit, \
     cost_cents, selling_cents, stock_quantity, min_stock_level, \
     is_active, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products ordered by name.
    ///
    /// This is the catalog query behind the product grid.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 ORDER BY name LIMIT ?1"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed active products");
        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the SKU already exists.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                 id, sku, barcode, name, name_ar, description, unit, \
                 cost_cents, selling_cents, stock_quantity, min_stock_level, \
                 is_active, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.name_ar)
        .bind(&product.description)
        .bind(&product.unit)
        .bind(product.cost_cents)
        .bind(product.selling_cents)
        .bind(product.stock_quantity)
        .bind(product.min_stock_level)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's catalog fields.
    ///
    /// Stock is NOT written here; stock changes go through [`sell_stock`]
    /// or [`apply_adjustment`] so the non-negative invariant holds.
    ///
    /// [`sell_stock`]: ProductRepository::sell_stock
    /// [`apply_adjustment`]: ProductRepository::apply_adjustment
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                 sku = ?2, barcode = ?3, name = ?4, name_ar = ?5, \
                 description = ?6, unit = ?7, cost_cents = ?8, \
                 selling_cents = ?9, min_stock_level = ?10, is_active = ?11, \
                 updated_at = ?12 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.name_ar)
        .bind(&product.description)
        .bind(&product.unit)
        .bind(product.cost_cents)
        .bind(product.selling_cents)
        .bind(product.min_stock_level)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Atomically sells stock: decrements by `quantity` only if that many
    /// units remain.
    ///
    /// ## Errors
    /// - `DbError::InsufficientStock` when fewer than `quantity` units remain
    /// - `DbError::NotFound` when the product doesn't exist
    pub async fn sell_stock(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Selling stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products \
             SET stock_quantity = stock_quantity - ?2, updated_at = ?3 \
             WHERE id = ?1 AND stock_quantity >= ?2",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Zero rows: either the product is gone or the stock ran out.
            return match self.get_by_id(id).await? {
                None => Err(DbError::not_found("Product", id)),
                Some(p) => Err(DbError::InsufficientStock {
                    sku: p.sku,
                    available: p.stock_quantity,
                    requested: quantity,
                }),
            };
        }

        Ok(())
    }

    /// Restocks: increments stock by `quantity` (returns, deliveries).
    pub async fn restock(&self, id: &str, quantity: i64) -> DbResult<()> {
        debug!(id = %id, quantity = %quantity, "Restocking");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products \
             SET stock_quantity = stock_quantity + ?2, updated_at = ?3 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Applies a manual stock correction and writes the audit row.
    ///
    /// Additions always succeed; subtractions use the same conditional
    /// guard as [`sell_stock`](ProductRepository::sell_stock). The audit
    /// row's old/new quantities come from the pre-update snapshot.
    pub async fn apply_adjustment(
        &self,
        product_id: &str,
        kind: AdjustmentKind,
        quantity: i64,
        reason: &str,
    ) -> DbResult<StockAdjustment> {
        let product = self
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        match kind {
            AdjustmentKind::Add => self.restock(product_id, quantity).await?,
            AdjustmentKind::Subtract => self.sell_stock(product_id, quantity).await?,
        }

        let new_quantity = match kind {
            AdjustmentKind::Add => product.stock_quantity + quantity,
            AdjustmentKind::Subtract => product.stock_quantity - quantity,
        };

        let adjustment = StockAdjustment {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            kind,
            quantity,
            reason: reason.to_string(),
            old_quantity: product.stock_quantity,
            new_quantity,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO stock_adjustments ( \
                 id, product_id, kind, quantity, reason, \
                 old_quantity, new_quantity, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&adjustment.id)
        .bind(&adjustment.product_id)
        .bind(adjustment.kind)
        .bind(adjustment.quantity)
        .bind(&adjustment.reason)
        .bind(adjustment.old_quantity)
        .bind(adjustment.new_quantity)
        .bind(adjustment.created_at)
        .execute(&self.pool)
        .await?;

        debug!(
            product_id = %product_id,
            old = adjustment.old_quantity,
            new = adjustment.new_quantity,
            "Stock adjusted"
        );

        Ok(adjustment)
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical sale items still reference the row, so it is never
    /// physically deleted.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_support::{test_db, test_product};
    use crate::DbError;
    use dukkan_core::AdjustmentKind;

    #[tokio::test]
    async fn test_insert_and_list_active_ordered_by_name() {
        let db = test_db().await;

        let mut b = test_product("B-SKU", 500, 10);
        b.name = "Bread".to_string();
        let mut a = test_product("A-SKU", 300, 10);
        a.name = "Apples".to_string();
        let mut hidden = test_product("C-SKU", 100, 10);
        hidden.name = "Candles".to_string();
        hidden.is_active = false;

        db.products().insert(&b).await.unwrap();
        db.products().insert(&a).await.unwrap();
        db.products().insert(&hidden).await.unwrap();

        let listed = db.products().list_active(50).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apples", "Bread"]);
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = test_db().await;

        db.products()
            .insert(&test_product("RICE-5KG", 4500, 10))
            .await
            .unwrap();
        let err = db
            .products()
            .insert(&test_product("RICE-5KG", 4600, 5))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_sell_stock_decrements() {
        let db = test_db().await;
        let product = test_product("TEA-100", 1200, 8);
        db.products().insert(&product).await.unwrap();

        db.products().sell_stock(&product.id, 3).await.unwrap();

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_quantity, 5);
    }

    #[tokio::test]
    async fn test_sell_stock_rejects_insufficient() {
        let db = test_db().await;
        let product = test_product("TEA-100", 1200, 2);
        db.products().insert(&product).await.unwrap();

        let err = db.products().sell_stock(&product.id, 3).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));

        // Nothing was decremented
        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock_quantity, 2);
    }

    #[tokio::test]
    async fn test_sell_stock_missing_product() {
        let db = test_db().await;
        let err = db.products().sell_stock("ghost", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_apply_adjustment_add_and_subtract() {
        let db = test_db().await;
        let product = test_product("SOAP-01", 700, 10);
        db.products().insert(&product).await.unwrap();

        let adj = db
            .products()
            .apply_adjustment(&product.id, AdjustmentKind::Add, 5, "delivery")
            .await
            .unwrap();
        assert_eq!(adj.old_quantity, 10);
        assert_eq!(adj.new_quantity, 15);

        let adj = db
            .products()
            .apply_adjustment(&product.id, AdjustmentKind::Subtract, 4, "damaged")
            .await
            .unwrap();
        assert_eq!(adj.old_quantity, 15);
        assert_eq!(adj.new_quantity, 11);

        // Subtracting below zero is rejected
        let err = db
            .products()
            .apply_adjustment(&product.id, AdjustmentKind::Subtract, 999, "bad count")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_listing() {
        let db = test_db().await;
        let product = test_product("OIL-1L", 2200, 4);
        db.products().insert(&product).await.unwrap();

        db.products().soft_delete(&product.id).await.unwrap();

        assert_eq!(db.products().count().await.unwrap(), 0);
        // Still reachable by id for sale history
        assert!(db.products().get_by_id(&product.id).await.unwrap().is_some());
    }
}
