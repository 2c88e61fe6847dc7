use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::contract::model::{JournalEntry, JournalEntryPatch, ListQuery};
use crate::domain::stats::MoodSample;

/// Port for the domain layer: persistence operations the domain needs.
///
/// Every lookup is scoped by `user_id`; an entry owned by another user is
/// reported exactly like a missing one.
#[async_trait]
pub trait JournalEntryRepository: Send + Sync {
    /// Insert a fully-formed entry.
    ///
    /// Service computes id/timestamps/validation; repo persists.
    async fn insert(&self, entry: JournalEntry) -> anyhow::Result<()>;

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<JournalEntry>>;

    /// Ordered by `entry_date DESC, created_at DESC, id ASC`. `query.limit` is ignored;
    /// the already resolved `limit` is used instead.
    async fn list(
        &self,
        user_id: Uuid,
        query: &ListQuery,
        limit: u64,
    ) -> anyhow::Result<Vec<JournalEntry>>;

    /// Lookup and write in one transaction. `updated_at` becomes `now`
    /// (never earlier than its stored value). `None` when nothing matched.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: JournalEntryPatch,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<JournalEntry>>;

    /// Returns true if a row was deleted.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;

    /// Number of entries, optionally only those dated on or after `since`.
    async fn count(&self, user_id: Uuid, since: Option<NaiveDate>) -> anyhow::Result<u64>;

    /// Date and ratings of every entry dated on or after `since`.
    async fn samples_since(&self, user_id: Uuid, since: NaiveDate)
        -> anyhow::Result<Vec<MoodSample>>;
}
