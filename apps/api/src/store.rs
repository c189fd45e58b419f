use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::result::ExtractionResult;

/// Storage for processed documents, most recent first.
///
/// Carried in `AppState` as `Arc<dyn ResultStore>` so each test can use its
/// own isolated instance.
pub trait ResultStore: Send + Sync {
    /// Inserts at the front and returns the stored handle.
    fn append(&self, result: ExtractionResult) -> Arc<ExtractionResult>;

    /// Snapshot of every stored result, newest first, taken under the read lock.
    ///
    /// Entries are the stored `Arc`s, never re-created, so a snapshot agrees
    /// with the store on every result it holds. Appends made after the call are
    /// not in it; call again for a fresh view.
    fn list_all(&self) -> Vec<Arc<ExtractionResult>>;
}

/// Process-lifetime store. Unbounded, no eviction, lost on restart.
#[derive(Default)]
pub struct InMemoryResultStore {
    results: RwLock<VecDeque<Arc<ExtractionResult>>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for InMemoryResultStore {
    fn append(&self, result: ExtractionResult) -> Arc<ExtractionResult> {
        let result = Arc::new(result);
        // Results are immutable, so a poisoned lock still guards consistent data.
        self.results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push_front(Arc::clone(&result));
        result
    }

    fn list_all(&self) -> Vec<Arc<ExtractionResult>> {
        self.results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::grouper::EntityGroup;

    fn result(name: &str) -> ExtractionResult {
        ExtractionResult {
            original_filename: name.to_string(),
            stored_filename: format!("0123456789abcdef0123456789abcdef_{name}"),
            groups: EntityGroup::default(),
            processed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        assert!(InMemoryResultStore::new().list_all().is_empty());
    }

    #[test]
    fn test_most_recent_first() {
        let store = InMemoryResultStore::new();
        store.append(result("r1.txt"));
        store.append(result("r2.txt"));
        store.append(result("r3.txt"));
        let names: Vec<_> = store
            .list_all()
            .iter()
            .map(|r| r.original_filename.clone())
            .collect();
        assert_eq!(names, vec!["r3.txt", "r2.txt", "r1.txt"]);
    }

    #[test]
    fn test_listed_entries_are_the_stored_ones() {
        let store = InMemoryResultStore::new();
        let stored = store.append(result("r1.txt"));
        let listed = store.list_all();
        assert!(Arc::ptr_eq(&stored, &listed[0]));
    }

    #[test]
    fn test_snapshot_is_the_tail_of_later_reads() {
        let store = InMemoryResultStore::new();
        store.append(result("r1.txt"));
        let before = store.list_all();
        store.append(result("r2.txt"));
        let after = store.list_all();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert!(Arc::ptr_eq(&before[0], &after[1]));
    }

    #[test]
    fn test_concurrent_appends_are_all_kept() {
        let store = Arc::new(InMemoryResultStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        store.append(result(&format!("{i}-{j}.txt")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.list_all().len(), 200);
    }
}
