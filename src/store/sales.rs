use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Database;
use crate::models::{generate_order_ref, NewSale, SaleRecord, SaleStatus};
use crate::store::cache::ListCache;
use crate::store::{ChangeEvent, ChangeFeed, StoreError};

/// One month of the dashboard sales series.
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyTotal {
    pub month: String,
    pub orders: i64,
    pub total: Decimal,
}

pub struct SalesStore {
    db: Database,
    cache: ListCache<SaleRecord>,
    feed: ChangeFeed,
}

impl SalesStore {
    pub(crate) fn new(db: Database, feed: ChangeFeed) -> Self {
        Self {
            db,
            cache: ListCache::new(),
            feed,
        }
    }

    pub async fn list(&self) -> Result<Arc<Vec<SaleRecord>>, StoreError> {
        let (cached, generation) = self.cache.get().await;
        if let Some(rows) = cached {
            return Ok(rows);
        }
        let rows = sqlx::query_as::<_, SaleRecord>("SELECT * FROM sales ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;
        Ok(self.cache.fill(rows, generation).await)
    }

    /// Records a sale with a freshly generated order reference.
    pub async fn create(
        &self,
        created_by: Option<Uuid>,
        sale: NewSale,
    ) -> Result<SaleRecord, StoreError> {
        let user_id = created_by.ok_or(StoreError::NotAuthenticated)?;

        let row = sqlx::query_as::<_, SaleRecord>(
            r#"
            INSERT INTO sales (user_id, order_id, customer, items, total, status, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(generate_order_ref())
        .bind(&sale.customer)
        .bind(sale.items)
        .bind(sale.total)
        .bind(sale.status)
        .bind(sale.payment_method)
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate().await;
        self.feed.publish(ChangeEvent::Sales);
        Ok(row)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: SaleStatus,
    ) -> Result<SaleRecord, StoreError> {
        let row = sqlx::query_as::<_, SaleRecord>(
            "UPDATE sales SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.cache.invalidate().await;
        self.feed.publish(ChangeEvent::Sales);
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.cache.invalidate().await;
        self.feed.publish(ChangeEvent::Sales);
        Ok(())
    }

    pub async fn sale_count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    /// Revenue across completed sales.
    pub async fn completed_revenue(&self) -> Result<Decimal, StoreError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total), 0) FROM sales WHERE status = 'completed'",
        )
        .fetch_one(&self.db)
        .await?;
        Ok(total)
    }

    /// The last twelve months of order counts and totals, newest first.
    pub async fn monthly_totals(&self) -> Result<Vec<MonthlyTotal>, StoreError> {
        let rows = sqlx::query_as::<_, MonthlyTotal>(
            r#"
            SELECT
                to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
                COUNT(*) AS orders,
                COALESCE(SUM(total), 0) AS total
            FROM sales
            GROUP BY 1
            ORDER BY 1 DESC
            LIMIT 12
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn create_without_a_principal_is_rejected() {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/supplyflow_test")
            .expect("lazy pool");
        let store = SalesStore::new(db, ChangeFeed::new());

        let result = store
            .create(
                None,
                NewSale {
                    customer: "Test".into(),
                    items: 2,
                    total: Decimal::new(5000, 2),
                    payment_method: PaymentMethod::Cash,
                    status: SaleStatus::Pending,
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotAuthenticated)));
    }
}
