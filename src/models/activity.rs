use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ActivityKind {
    Sale,
    Inventory,
    User,
    Report,
}

impl ActivityKind {
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Sale => "Sale",
            ActivityKind::Inventory => "Inventory",
            ActivityKind::User => "User",
            ActivityKind::Report => "Report",
        }
    }
}

/// One line of the dashboard's recent-activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
