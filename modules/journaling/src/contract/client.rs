use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::contract::{
    error::JournalingError,
    model::{JournalEntry, JournalEntryPatch, JournalStats, ListQuery, NewJournalEntry},
};

/// Public API of the journaling module for in-process consumers.
///
/// Every call carries the acting user's id; entries of other users are
/// indistinguishable from missing ones.
#[async_trait]
pub trait JournalingApi: Send + Sync {
    async fn create_entry(
        &self,
        user_id: Uuid,
        new_entry: NewJournalEntry,
    ) -> Result<JournalEntry, JournalingError>;

    async fn get_entry(&self, user_id: Uuid, id: Uuid) -> Result<JournalEntry, JournalingError>;

    async fn list_entries(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Vec<JournalEntry>, JournalingError>;

    async fn update_entry(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: JournalEntryPatch,
    ) -> Result<JournalEntry, JournalingError>;

    async fn delete_entry(&self, user_id: Uuid, id: Uuid) -> Result<(), JournalingError>;

    /// Statistics relative to `as_of` (today when `None`).
    async fn stats(
        &self,
        user_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<JournalStats, JournalingError>;
}
