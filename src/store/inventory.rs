use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::Database;
use crate::models::{InventoryItem, ItemPatch, NewItem};
use crate::store::cache::ListCache;
use crate::store::{ChangeEvent, ChangeFeed, StoreError};

pub struct InventoryStore {
    db: Database,
    cache: ListCache<InventoryItem>,
    feed: ChangeFeed,
}

impl InventoryStore {
    pub(crate) fn new(db: Database, feed: ChangeFeed) -> Self {
        Self {
            db,
            cache: ListCache::new(),
            feed,
        }
    }

    /// All items, creation-descending, served from cache until invalidated.
    pub async fn list(&self) -> Result<Arc<Vec<InventoryItem>>, StoreError> {
        let (cached, generation) = self.cache.get().await;
        if let Some(rows) = cached {
            return Ok(rows);
        }
        let rows = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(self.cache.fill(rows, generation).await)
    }

    pub async fn create(
        &self,
        created_by: Option<Uuid>,
        item: NewItem,
    ) -> Result<InventoryItem, StoreError> {
        let user_id = created_by.ok_or(StoreError::NotAuthenticated)?;

        let row = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (user_id, name, sku, category, price, stock, threshold, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&item.name)
        .bind(&item.sku)
        .bind(&item.category)
        .bind(item.price)
        .bind(item.stock)
        .bind(item.threshold)
        .bind(Utc::now().date_naive())
        .fetch_one(&self.db)
        .await?;

        self.cache.invalidate().await;
        self.feed.publish(ChangeEvent::Inventory);
        Ok(row)
    }

    /// Partial patch; untouched fields keep their stored value. The
    /// last-updated date is stamped at submission time.
    pub async fn update(&self, id: Uuid, patch: ItemPatch) -> Result<InventoryItem, StoreError> {
        let row = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items SET
                name = COALESCE($2, name),
                sku = COALESCE($3, sku),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                stock = COALESCE($6, stock),
                threshold = COALESCE($7, threshold),
                last_updated = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.sku)
        .bind(patch.category)
        .bind(patch.price)
        .bind(patch.stock)
        .bind(patch.threshold)
        .bind(Utc::now().date_naive())
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.cache.invalidate().await;
        self.feed.publish(ChangeEvent::Inventory);
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.cache.invalidate().await;
        self.feed.publish(ChangeEvent::Inventory);
        Ok(())
    }

    pub async fn item_count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    pub async fn low_stock_count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_items WHERE stock <= threshold",
        )
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sqlx::postgres::PgPoolOptions;

    fn offline_store() -> InventoryStore {
        // connect_lazy never dials out, so paths that fail before touching
        // the pool are testable without a database.
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/supplyflow_test")
            .expect("lazy pool");
        InventoryStore::new(db, ChangeFeed::new())
    }

    #[tokio::test]
    async fn create_without_a_principal_is_rejected() {
        let store = offline_store();
        let result = store
            .create(
                None,
                NewItem {
                    name: "Desk Lamp".into(),
                    sku: "HOME-001".into(),
                    category: "Home & Living".into(),
                    price: Decimal::new(4999, 2),
                    stock: 78,
                    threshold: 30,
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotAuthenticated)));
    }
}
