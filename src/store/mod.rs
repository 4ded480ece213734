//! Data access facade: per-entity stores around the shared pool, a
//! read-through list cache per collection, and a change feed that turns
//! backend notifications into cache invalidation.

pub mod activity;
pub mod cache;
pub mod inventory;
pub mod listener;
pub mod roles;
pub mod sales;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::database::Database;

pub use activity::ActivityStore;
pub use inventory::InventoryStore;
pub use roles::RoleStore;
pub use sales::SalesStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("record not found")]
    NotFound,
    #[error("backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Which collection changed. Emitted after local mutations and relayed from
/// the Postgres notification channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    Inventory,
    Sales,
}

/// Broadcast channel for collection changes. Subscribers drop their receiver
/// to release the channel; publishing with no subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// The explicitly constructed store bundle handed to the router state; no
/// module-level client handles.
pub struct Stores {
    pub inventory: InventoryStore,
    pub sales: SalesStore,
    pub activities: ActivityStore,
    pub roles: RoleStore,
    feed: ChangeFeed,
}

impl Stores {
    pub fn new(db: Database) -> Self {
        let feed = ChangeFeed::new();
        Self {
            inventory: InventoryStore::new(db.clone(), feed.clone()),
            sales: SalesStore::new(db.clone(), feed.clone()),
            activities: ActivityStore::new(db.clone()),
            roles: RoleStore::new(db),
            feed,
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    /// "Notify me whenever a collection changes."
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn published_events_reach_subscribers() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();
        feed.publish(ChangeEvent::Inventory);
        feed.publish(ChangeEvent::Sales);
        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::Inventory);
        assert_eq!(rx.recv().await.unwrap(), ChangeEvent::Sales);
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        let feed = ChangeFeed::new();
        feed.publish(ChangeEvent::Inventory);
    }
}
