use uuid::Uuid;

use crate::database::Database;
use crate::models::Role;
use crate::store::StoreError;

pub struct RoleStore {
    db: Database,
}

impl RoleStore {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolves the principal's role. A missing row is not an error; it
    /// resolves to the least-privileged default.
    pub async fn role_for(&self, user_id: Uuid) -> Result<Role, StoreError> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(stored
            .as_deref()
            .map(Role::parse)
            .unwrap_or(Role::StoreEmployee))
    }

    /// Stores the role chosen at sign-up. One role per user.
    pub async fn assign(&self, user_id: Uuid, role: Role) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
