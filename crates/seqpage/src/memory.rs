use crate::{Error, PageDraft, Result, SequenceStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-process [`SequenceStore`].
///
/// Unknown databases behave as empty. Used by the server's dry-run mode and
/// by tests, which can also inject a failure after a fixed number of
/// successful creates.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Mutex<HashMap<String, Vec<PageDraft>>>,
    fail_after: Mutex<HashMap<String, usize>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an existing page with the given sequence value.
    pub fn seed(&self, database_id: &str, sequence: i64) {
        self.pages
            .lock()
            .entry(database_id.to_string())
            .or_default()
            .push(PageDraft {
                title_property: String::new(),
                sequence_property: String::new(),
                sequence,
            });
    }

    /// Makes `create_page` fail once `successes` more pages have been
    /// created in `database_id`.
    pub fn fail_after(&self, database_id: &str, successes: usize) {
        self.fail_after
            .lock()
            .insert(database_id.to_string(), successes);
    }

    /// Sequence values of every page in the database, in insertion order.
    pub fn sequences(&self, database_id: &str) -> Vec<i64> {
        self.pages
            .lock()
            .get(database_id)
            .map(|pages| pages.iter().map(|p| p.sequence).collect())
            .unwrap_or_default()
    }

    /// Pages created through [`SequenceStore::create_page`].
    pub fn created(&self, database_id: &str) -> Vec<PageDraft> {
        self.pages
            .lock()
            .get(database_id)
            .map(|pages| {
                pages
                    .iter()
                    .filter(|p| !p.sequence_property.is_empty())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of store calls served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SequenceStore for MemoryStore {
    async fn highest_sequence(
        &self,
        database_id: &str,
        _sequence_property: &str,
    ) -> Result<Option<i64>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .pages
            .lock()
            .get(database_id)
            .and_then(|pages| pages.iter().map(|p| p.sequence).max()))
    }

    async fn create_page(&self, database_id: &str, draft: &PageDraft) -> Result<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(remaining) = self.fail_after.lock().get_mut(database_id) {
            if *remaining == 0 {
                return Err(Error::Api {
                    status: 503,
                    code: "service_unavailable".to_string(),
                    message: "injected failure".to_string(),
                });
            }
            *remaining -= 1;
        }
        self.pages
            .lock()
            .entry(database_id.to_string())
            .or_default()
            .push(draft.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(sequence: i64) -> PageDraft {
        PageDraft {
            title_property: "Name".to_string(),
            sequence_property: "Seq".to_string(),
            sequence,
        }
    }

    #[tokio::test]
    async fn highest_tracks_seeded_and_created_pages() {
        let store = MemoryStore::new();
        assert_eq!(store.highest_sequence("db", "Seq").await.unwrap(), None);

        store.seed("db", 4);
        store.seed("db", 2);
        assert_eq!(store.highest_sequence("db", "Seq").await.unwrap(), Some(4));

        store.create_page("db", &draft(9)).await.unwrap();
        assert_eq!(store.highest_sequence("db", "Seq").await.unwrap(), Some(9));
        assert_eq!(store.sequences("db"), vec![4, 2, 9]);
        assert_eq!(store.created("db"), vec![draft(9)]);
        assert_eq!(store.calls(), 4);
    }

    #[tokio::test]
    async fn injected_failure_triggers_after_budget() {
        let store = MemoryStore::new();
        store.fail_after("db", 1);

        store.create_page("db", &draft(1)).await.unwrap();
        let err = store.create_page("db", &draft(2)).await.unwrap_err();
        assert!(err.to_string().contains("injected failure"));
        assert_eq!(store.sequences("db"), vec![1]);
    }
}
