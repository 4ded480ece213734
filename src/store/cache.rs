use std::sync::Arc;

use tokio::sync::RwLock;

#[derive(Debug)]
struct Slot<T> {
    rows: Option<Arc<Vec<T>>>,
    generation: u64,
}

/// Read-through cache for one collection's `list()` result. `invalidate`
/// marks it stale so the next read refetches from the source of truth.
///
/// The generation counter closes the refetch race: a reader that missed,
/// fetched, and comes back to store its rows must present the generation it
/// observed at miss time. If an `invalidate` landed in between, the
/// generation has moved on and the now-stale rows are not cached.
#[derive(Debug)]
pub struct ListCache<T> {
    slot: RwLock<Slot<T>>,
}

impl<T> ListCache<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot {
                rows: None,
                generation: 0,
            }),
        }
    }

    /// The cached snapshot, if any, plus the generation it was observed at.
    pub async fn get(&self) -> (Option<Arc<Vec<T>>>, u64) {
        let slot = self.slot.read().await;
        (slot.rows.clone(), slot.generation)
    }

    /// Stores `rows` unless the cache was invalidated after `observed` was
    /// read. The rows are returned either way; they are fresh enough for
    /// the request that fetched them.
    pub async fn fill(&self, rows: Vec<T>, observed: u64) -> Arc<Vec<T>> {
        let rows = Arc::new(rows);
        let mut slot = self.slot.write().await;
        if slot.generation == observed {
            slot.rows = Some(rows.clone());
        }
        rows
    }

    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.rows = None;
        slot.generation += 1;
    }
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty_and_serves_filled_rows() {
        let cache = ListCache::new();
        let (cached, generation) = cache.get().await;
        assert!(cached.is_none());

        cache.fill(vec![1, 2, 3], generation).await;
        let (cached, _) = cache.get().await;
        assert_eq!(*cached.expect("filled"), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn invalidate_forces_the_next_read_to_miss() {
        let cache = ListCache::new();
        let (_, generation) = cache.get().await;
        cache.fill(vec!["a"], generation).await;
        cache.invalidate().await;
        let (cached, _) = cache.get().await;
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn readers_share_the_same_snapshot() {
        let cache = ListCache::new();
        let (_, generation) = cache.get().await;
        cache.fill(vec![7], generation).await;
        let (a, _) = cache.get().await;
        let (b, _) = cache.get().await;
        assert!(Arc::ptr_eq(&a.expect("filled"), &b.expect("filled")));
    }

    #[tokio::test]
    async fn fill_racing_an_invalidate_does_not_reinstate_stale_rows() {
        let cache = ListCache::new();

        // A reader misses and goes off to fetch.
        let (cached, generation) = cache.get().await;
        assert!(cached.is_none());

        // A mutation invalidates while the fetch is in flight.
        cache.invalidate().await;

        // The reader's rows predate the mutation and must not be cached.
        let rows = cache.fill(vec![1], generation).await;
        assert_eq!(*rows, vec![1]);
        let (cached, _) = cache.get().await;
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn fill_with_the_current_generation_is_stored() {
        let cache = ListCache::new();
        cache.invalidate().await;
        let (_, generation) = cache.get().await;
        cache.fill(vec![9], generation).await;
        let (cached, _) = cache.get().await;
        assert_eq!(*cached.expect("filled"), vec![9]);
    }
}
