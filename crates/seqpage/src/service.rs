//! Page-creation service.
//!
//! [`PageCreator`] turns a [`CreatePages`] request into one read and `count`
//! writes against a [`SequenceStore`]:
//!
//! 1. Read the highest sequence value in the database.
//! 2. Start at that value plus one, or at 1 for an empty database.
//! 3. Create `count` pages with consecutive sequence values.
//!
//! All numbers in a batch come from the single initial read. A failed write
//! aborts the rest of the batch; pages already created stay in place.
//!
//! ## Concurrency
//!
//! Two concurrent requests against the same database can read the same
//! maximum and hand out duplicate numbers. With [`PageCreator::serialized`]
//! enabled, the read-then-write round trip runs under an async mutex keyed by
//! database id, which rules this out for requests served by one process.
//! Other processes writing to the same database are not covered.

use crate::{CreatePages, CreationResult, Error, PageDraft, Result, SequenceStore};
use crate::types::DEFAULT_SEQUENCE_PROPERTY;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Clone)]
pub struct PageCreator {
    store: Arc<dyn SequenceStore>,
    sequence_property: String,
    locks: Option<Arc<DatabaseLocks>>,
}

/// One async mutex per database id, created on first use.
#[derive(Default)]
struct DatabaseLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl DatabaseLocks {
    async fn acquire(&self, database_id: &str) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(
            self.inner
                .lock()
                .entry(database_id.to_string())
                .or_default(),
        );
        lock.lock_owned().await
    }
}

impl PageCreator {
    pub fn new(store: Arc<dyn SequenceStore>) -> Self {
        Self {
            store,
            sequence_property: DEFAULT_SEQUENCE_PROPERTY.to_string(),
            locks: None,
        }
    }

    /// Sets the name of the numeric property holding the sequence.
    pub fn with_sequence_property(mut self, sequence_property: impl Into<String>) -> Self {
        self.sequence_property = sequence_property.into();
        self
    }

    /// Serializes creation per database within this process.
    pub fn serialized(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(|| Arc::new(DatabaseLocks::default()));
        self
    }

    pub fn sequence_property(&self) -> &str {
        &self.sequence_property
    }

    /// Appends `request.count` pages and reports the outcome.
    ///
    /// Store failures never escape as `Err`; they are folded into a failure
    /// [`CreationResult`] carrying the error text.
    #[tracing::instrument(
        skip_all,
        fields(database_id = %request.database_id, count = request.count)
    )]
    pub async fn create_pages(&self, request: &CreatePages) -> CreationResult {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(&request.database_id).await),
            None => None,
        };

        match self.append(request).await {
            Ok(start) => {
                tracing::info!(start, "Created pages");
                CreationResult::created(start, request.count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Page creation failed");
                CreationResult::failed(format!("Failed to create pages: {e}"))
            }
        }
    }

    async fn append(&self, request: &CreatePages) -> Result<i64> {
        let start = match self
            .store
            .highest_sequence(&request.database_id, &self.sequence_property)
            .await?
        {
            Some(max) => max.checked_add(1).ok_or_else(|| Error::InvalidSequence {
                reason: format!("highest sequence {max} cannot be incremented"),
            })?,
            None => 1,
        };
        if start
            .checked_add(i64::from(request.count.saturating_sub(1)))
            .is_none()
        {
            return Err(Error::InvalidSequence {
                reason: format!(
                    "{} pages starting at {start} exceed the sequence range",
                    request.count
                ),
            });
        }

        for offset in 0..i64::from(request.count) {
            let draft = PageDraft {
                title_property: request.title_property.clone(),
                sequence_property: self.sequence_property.clone(),
                sequence: start + offset,
            };
            self.store.create_page(&request.database_id, &draft).await?;
        }

        Ok(start)
    }
}

impl core::fmt::Debug for PageCreator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageCreator")
            .field("sequence_property", &self.sequence_property)
            .field("serialized", &self.locks.is_some())
            .finish_non_exhaustive()
    }
}
