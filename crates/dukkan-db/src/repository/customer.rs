//! # Customer Repository
//!
//! Database operations for customers and their credit balances.
//!
//! ## Balance Discipline
//! Balances are only ever moved by delta updates
//! (`balance_cents = balance_cents + ?`), never by writing an absolute
//! value computed from a client-held snapshot. Credit sales add the unpaid
//! remainder; recorded payments subtract.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukkan_core::{Customer, CustomerPayment, Money, PaymentKind};

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, address, tax_number, customer_type, \
     credit_limit_cents, balance_cents, created_at, updated_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name");
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(name = %customer.name, "Inserting customer");

        sqlx::query(
            "INSERT INTO customers ( \
                 id, name, phone, email, address, tax_number, customer_type, \
                 credit_limit_cents, balance_cents, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.tax_number)
        .bind(customer.customer_type)
        .bind(customer.credit_limit_cents)
        .bind(customer.balance_cents)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a customer's contact and classification fields.
    ///
    /// The balance is NOT written here; it only moves through
    /// [`adjust_balance`](CustomerRepository::adjust_balance).
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers SET \
                 name = ?2, phone = ?3, email = ?4, address = ?5, \
                 tax_number = ?6, customer_type = ?7, credit_limit_cents = ?8, \
                 updated_at = ?9 \
             WHERE id = ?1",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(&customer.tax_number)
        .bind(customer.customer_type)
        .bind(customer.credit_limit_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Moves a customer's balance by a delta (positive = owes more).
    ///
    /// The credit limit is deliberately NOT consulted here: checkout may
    /// push a balance past `credit_limit_cents`, which stays advisory.
    pub async fn adjust_balance(&self, id: &str, delta: Money) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting customer balance");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers \
             SET balance_cents = balance_cents + ?2, updated_at = ?3 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(delta.cents())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Records a payment against a customer's outstanding balance.
    ///
    /// Inserts the `customer_payments` row, then decrements the balance by
    /// the same amount. The two writes are sequential, not transactional;
    /// consistent with the rest of the system's multi-write posture.
    pub async fn record_payment(
        &self,
        customer_id: &str,
        amount: Money,
        kind: PaymentKind,
        description: Option<&str>,
        reference: Option<&str>,
    ) -> DbResult<CustomerPayment> {
        debug!(customer_id = %customer_id, amount = %amount, "Recording customer payment");

        let payment = CustomerPayment {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            amount_cents: amount.cents(),
            kind,
            description: description.map(|s| s.to_string()),
            reference: reference.map(|s| s.to_string()),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO customer_payments ( \
                 id, customer_id, amount_cents, kind, description, reference, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&payment.id)
        .bind(&payment.customer_id)
        .bind(payment.amount_cents)
        .bind(payment.kind)
        .bind(&payment.description)
        .bind(&payment.reference)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        self.adjust_balance(customer_id, -amount).await?;

        Ok(payment)
    }

    /// Lists recorded payments for a customer, newest first.
    pub async fn list_payments(&self, customer_id: &str) -> DbResult<Vec<CustomerPayment>> {
        let payments = sqlx::query_as::<_, CustomerPayment>(
            "SELECT id, customer_id, amount_cents, kind, description, reference, created_at \
             FROM customer_payments \
             WHERE customer_id = ?1 \
             ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}

/// Helper to generate a new customer ID.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_support::{test_customer, test_db};
    use crate::DbError;
    use dukkan_core::{Money, PaymentKind};

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let customer = test_customer("Abu Khalid", 0);
        db.customers().insert(&customer).await.unwrap();

        let loaded = db
            .customers()
            .get_by_id(&customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.name, "Abu Khalid");
        assert_eq!(loaded.balance_cents, 0);
    }

    #[tokio::test]
    async fn test_adjust_balance_delta() {
        let db = test_db().await;
        let customer = test_customer("Umm Sara", 5000);
        db.customers().insert(&customer).await.unwrap();

        db.customers()
            .adjust_balance(&customer.id, Money::from_cents(10700))
            .await
            .unwrap();

        let loaded = db
            .customers()
            .get_by_id(&customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.balance_cents, 15700);
    }

    #[tokio::test]
    async fn test_adjust_balance_missing_customer() {
        let db = test_db().await;
        let err = db
            .customers()
            .adjust_balance("ghost", Money::from_cents(100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_record_payment_decrements_balance() {
        let db = test_db().await;
        let customer = test_customer("Umm Sara", 20000);
        db.customers().insert(&customer).await.unwrap();

        let payment = db
            .customers()
            .record_payment(
                &customer.id,
                Money::from_cents(7500),
                PaymentKind::Cash,
                Some("partial settlement"),
                None,
            )
            .await
            .unwrap();
        assert_eq!(payment.amount_cents, 7500);

        let loaded = db
            .customers()
            .get_by_id(&customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.balance_cents, 12500);

        let payments = db.customers().list_payments(&customer.id).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].kind, PaymentKind::Cash);
    }

    #[tokio::test]
    async fn test_balance_can_exceed_credit_limit() {
        // The limit is advisory: nothing stops the balance passing it.
        let db = test_db().await;
        let customer = test_customer("Big Spender", 0);
        let limit = customer.credit_limit_cents;
        db.customers().insert(&customer).await.unwrap();

        db.customers()
            .adjust_balance(&customer.id, Money::from_cents(limit + 50_000))
            .await
            .unwrap();

        let loaded = db
            .customers()
            .get_by_id(&customer.id)
            .await
            .unwrap()
            .unwrap();
        assert!(loaded.balance_cents > loaded.credit_limit_cents);
    }
}
