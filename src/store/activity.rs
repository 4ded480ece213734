use crate::database::Database;
use crate::models::{Activity, ActivityKind};
use crate::store::StoreError;

pub struct ActivityStore {
    db: Database,
}

impl ActivityStore {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn record(&self, kind: ActivityKind, description: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO recent_activities (kind, description) VALUES ($1, $2)")
            .bind(kind)
            .bind(description)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Activity>, StoreError> {
        let rows = sqlx::query_as::<_, Activity>(
            "SELECT * FROM recent_activities ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
