use crate::{PageDraft, Result};
use async_trait::async_trait;

/// A database of records carrying a numeric sequence property.
///
/// Implementations only need to answer "what is the largest sequence value"
/// and "append one record". Sequence assignment itself lives in
/// [`PageCreator`](crate::PageCreator).
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Returns the largest value of `sequence_property` in the database, or
    /// `None` if the database holds no records.
    async fn highest_sequence(&self, database_id: &str, sequence_property: &str)
    -> Result<Option<i64>>;

    /// Creates one record in the database.
    async fn create_page(&self, database_id: &str, draft: &PageDraft) -> Result<()>;
}
