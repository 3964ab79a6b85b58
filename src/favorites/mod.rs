//! The set of starred post ids, shared by every consumer and kept in
//! durable storage under the `"favorites"` key.
//!
//! The store hands out immutable `Arc` snapshots. Each effective mutation
//! swaps in a fresh snapshot and notifies subscribers exactly once, so
//! consumers can detect changes with `Arc::ptr_eq`. Writes to storage are
//! best effort: a failure is logged and the in-memory state still moves on.

pub mod storage;

use crate::models::PostId;
use indexmap::IndexSet;
use serde::Serialize;
use std::sync::Arc;
use storage::KeyValueStorage;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub const STORAGE_KEY: &str = "favorites";

/// Starred ids in the order they were starred.
pub type FavoriteSet = IndexSet<PostId>;

/// Outcome of reading the persisted set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    Restored(FavoriteSet),
    Missing,
    Corrupt,
}

impl Hydration {
    pub fn kind(&self) -> HydrationKind {
        match self {
            Hydration::Restored(_) => HydrationKind::Restored,
            Hydration::Missing => HydrationKind::Missing,
            Hydration::Corrupt => HydrationKind::Corrupt,
        }
    }

    pub fn into_set(self) -> FavoriteSet {
        match self {
            Hydration::Restored(set) => set,
            Hydration::Missing | Hydration::Corrupt => FavoriteSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationKind {
    Restored,
    Missing,
    Corrupt,
}

/// Reads and parses the persisted array. Never fails: unreadable or
/// malformed data degrades to [`Hydration::Corrupt`]. A single element that
/// is not a non-negative integer empties the whole set.
///
/// Storage is not written here, so a corrupt value stays on disk until the
/// first mutation replaces it.
pub fn load_favorites(storage: &dyn KeyValueStorage) -> Hydration {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Hydration::Missing,
        Err(e) => {
            warn!("Failed to read favorites, starting empty: {}", e);
            return Hydration::Corrupt;
        }
    };

    match serde_json::from_str::<Vec<PostId>>(&raw) {
        Ok(ids) => Hydration::Restored(ids.into_iter().collect()),
        Err(e) => {
            warn!("Discarding malformed favorites: {}", e);
            Hydration::Corrupt
        }
    }
}

/// Serializes the set as a JSON array in star order.
pub fn encode_favorites(set: &FavoriteSet) -> serde_json::Result<String> {
    let ids: Vec<PostId> = set.iter().copied().collect();
    serde_json::to_string(&ids)
}

pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    state: watch::Sender<Arc<FavoriteSet>>,
    hydration: HydrationKind,
}

impl FavoritesStore {
    /// Hydrates the store from `storage`. Call once per process.
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let hydration = load_favorites(storage.as_ref());
        let kind = hydration.kind();
        let set = hydration.into_set();

        info!("Favorites hydrated ({:?}, {} starred)", kind, set.len());

        Self {
            storage,
            state: watch::Sender::new(Arc::new(set)),
            hydration: kind,
        }
    }

    pub fn hydration(&self) -> HydrationKind {
        self.hydration
    }

    pub fn add(&self, post_id: PostId) {
        if self.mutate(|set| set.insert(post_id)) {
            info!("Post {} starred", post_id);
        }
    }

    pub fn remove(&self, post_id: PostId) {
        if self.mutate(|set| set.shift_remove(&post_id)) {
            info!("Post {} unstarred", post_id);
        }
    }

    /// Flips membership and returns whether the post is now starred.
    pub fn toggle(&self, post_id: PostId) -> bool {
        let mut starred = false;
        self.mutate(|set| {
            starred = !set.shift_remove(&post_id);
            if starred {
                set.insert(post_id);
            }
            true
        });
        info!("Post {} toggled (starred: {})", post_id, starred);
        starred
    }

    pub fn is_favorite(&self, post_id: PostId) -> bool {
        self.state.borrow().contains(&post_id)
    }

    pub fn snapshot(&self) -> Arc<FavoriteSet> {
        Arc::clone(&self.state.borrow())
    }

    /// Receives every new snapshot, once per effective mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<FavoriteSet>> {
        self.state.subscribe()
    }

    /// Applies `op` to a copy of the current set. When `op` reports a change,
    /// the copy is persisted and published as the new snapshot. The watch
    /// lock is held throughout, so mutations never interleave.
    fn mutate(&self, op: impl FnOnce(&mut FavoriteSet) -> bool) -> bool {
        self.state.send_if_modified(|current| {
            let mut next = FavoriteSet::clone(current);
            if !op(&mut next) {
                return false;
            }
            self.write(&next);
            *current = Arc::new(next);
            true
        })
    }

    fn write(&self, set: &FavoriteSet) {
        let encoded = match encode_favorites(set) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("Failed to encode favorites: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(STORAGE_KEY, &encoded) {
            error!("Failed to save favorites: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::storage::{MemoryStorage, StorageError, StorageResult};
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::io;

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Io(io::Error::other("disk gone")))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(io::Error::other("disk gone")))
        }
    }

    fn memory_store() -> (Arc<MemoryStorage>, FavoritesStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = FavoritesStore::open(storage.clone());
        (storage, store)
    }

    #[test]
    fn missing_key_starts_empty() {
        let (_, store) = memory_store();
        assert_eq!(store.hydration(), HydrationKind::Missing);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn corrupt_value_starts_empty() {
        for raw in ["not json", "{\"a\":1}", "[1, \"two\"]", "[-4]", "[1, 2.5]", "[3, null]"] {
            let store = FavoritesStore::open(Arc::new(MemoryStorage::with_entry(STORAGE_KEY, raw)));
            assert_eq!(store.hydration(), HydrationKind::Corrupt, "{raw}");
            assert!(store.snapshot().is_empty());
        }
    }

    #[test]
    fn unreadable_storage_starts_empty() {
        let store = FavoritesStore::open(Arc::new(BrokenStorage));
        assert_eq!(store.hydration(), HydrationKind::Corrupt);
        assert!(!store.is_favorite(1));
    }

    #[test]
    fn write_failure_is_swallowed() {
        let store = FavoritesStore::open(Arc::new(BrokenStorage));
        store.add(5);
        assert!(store.is_favorite(5));
        store.remove(5);
        assert!(!store.is_favorite(5));
    }

    #[test]
    fn every_mutation_is_flushed() {
        let (storage, store) = memory_store();
        store.add(9);
        store.add(2);
        assert_eq!(storage.get(STORAGE_KEY).unwrap().as_deref(), Some("[9,2]"));
        store.remove(9);
        assert_eq!(storage.get(STORAGE_KEY).unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn star_order_is_kept_across_reload() {
        let (storage, store) = memory_store();
        for id in [7, 3, 12, 5] {
            store.add(id);
        }
        store.remove(3);
        store.add(3);
        assert_eq!(storage.get(STORAGE_KEY).unwrap().as_deref(), Some("[7,12,5,3]"));

        let reloaded = FavoritesStore::open(storage);
        let ids: Vec<PostId> = reloaded.snapshot().iter().copied().collect();
        assert_eq!(ids, vec![7, 12, 5, 3]);
    }

    #[test]
    fn opening_never_rewrites_a_corrupt_value() {
        let storage = Arc::new(MemoryStorage::with_entry(STORAGE_KEY, "[1, 2.5]"));
        let store = FavoritesStore::open(storage.clone());
        assert_eq!(store.hydration(), HydrationKind::Corrupt);
        drop(store);

        assert_eq!(storage.get(STORAGE_KEY).unwrap().as_deref(), Some("[1, 2.5]"));
    }

    #[test]
    fn favorite_survives_reload() {
        let (storage, store) = memory_store();
        store.add(7);
        drop(store);

        let reloaded = FavoritesStore::open(storage);
        assert_eq!(reloaded.hydration(), HydrationKind::Restored);
        assert!(reloaded.is_favorite(7));
    }

    #[test]
    fn old_snapshots_are_never_mutated() {
        let (_, store) = memory_store();
        let before = store.snapshot();
        store.add(1);
        let after = store.snapshot();

        assert!(before.is_empty());
        assert!(after.contains(&1));
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn noop_mutation_keeps_snapshot_identity() {
        let (_, store) = memory_store();
        store.add(1);
        let first = store.snapshot();
        store.add(1);
        store.remove(2);
        assert!(Arc::ptr_eq(&first, &store.snapshot()));
    }

    #[test]
    fn toggle_flips_membership() {
        let (_, store) = memory_store();
        assert!(store.toggle(4));
        assert!(store.is_favorite(4));
        assert!(!store.toggle(4));
        assert!(!store.is_favorite(4));
    }

    #[test]
    fn subscribers_see_each_change_once() {
        let (_, store) = memory_store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add(3);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().contains(&3));

        store.add(3);
        assert!(!rx.has_changed().unwrap());
    }

    proptest! {
        #[test]
        fn membership_follows_last_operation(ops in prop::collection::vec((any::<bool>(), 0u64..8), 0..64)) {
            let (_, store) = memory_store();
            let mut expected: HashMap<PostId, bool> = HashMap::new();

            for (add, id) in ops {
                if add {
                    store.add(id);
                } else {
                    store.remove(id);
                }
                expected.insert(id, add);
            }

            for id in 0u64..8 {
                prop_assert_eq!(store.is_favorite(id), expected.get(&id).copied().unwrap_or(false));
            }
        }

        #[test]
        fn encoded_set_reloads_equal(ids in prop::collection::vec(any::<u64>(), 0..32)) {
            let set: FavoriteSet = ids.into_iter().collect();
            let encoded = encode_favorites(&set).unwrap();
            let storage = MemoryStorage::with_entry(STORAGE_KEY, &encoded);

            let reloaded = load_favorites(&storage).into_set();
            prop_assert_eq!(
                reloaded.iter().collect::<Vec<_>>(),
                set.iter().collect::<Vec<_>>()
            );
        }
    }
}
