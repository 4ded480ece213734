use std::sync::Arc;

use sqlx::postgres::PgListener;
use tokio::sync::broadcast::error::RecvError;

use crate::database::Database;
use crate::store::{ChangeEvent, ChangeFeed, Stores};

const INVENTORY_CHANNEL: &str = "inventory_changed";
const SALES_CHANNEL: &str = "sales_changed";

/// Relays Postgres NOTIFY traffic onto the in-process change feed, so
/// out-of-band writes (triggers, other processes) invalidate caches the same
/// way local mutations do.
pub async fn run(db: Database, feed: ChangeFeed) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(&db).await?;
    listener.listen_all([INVENTORY_CHANNEL, SALES_CHANNEL]).await?;
    log::info!("listening for collection change notifications");

    loop {
        let notification = listener.recv().await?;
        match notification.channel() {
            INVENTORY_CHANNEL => feed.publish(ChangeEvent::Inventory),
            SALES_CHANNEL => feed.publish(ChangeEvent::Sales),
            other => log::debug!("ignoring notification on channel {}", other),
        }
    }
}

/// Treats change events as cache-invalidation signals; the normal read path
/// refetches on the next `list()`.
pub async fn invalidate_on_change(stores: Arc<Stores>) {
    let mut rx = stores.subscribe();
    loop {
        match rx.recv().await {
            Ok(ChangeEvent::Inventory) => stores.inventory.invalidate().await,
            Ok(ChangeEvent::Sales) => stores.sales.invalidate().await,
            Err(RecvError::Lagged(skipped)) => {
                // Events were dropped; we no longer know which collection
                // they touched, so drop both caches.
                log::warn!("change feed lagged, {} events skipped", skipped);
                stores.inventory.invalidate().await;
                stores.sales.invalidate().await;
            }
            Err(RecvError::Closed) => break,
        }
    }
}
