use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::JournalingApi,
    error::JournalingError,
    model::{JournalEntry, JournalEntryPatch, JournalStats, ListQuery, NewJournalEntry},
};
use crate::domain::service::Service;

/// In-process implementation of [`JournalingApi`] that delegates to the domain service.
pub struct JournalingLocalClient {
    service: Arc<Service>,
}

impl JournalingLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JournalingApi for JournalingLocalClient {
    async fn create_entry(
        &self,
        user_id: Uuid,
        new_entry: NewJournalEntry,
    ) -> Result<JournalEntry, JournalingError> {
        self.service
            .create_entry(user_id, new_entry)
            .await
            .map_err(Into::into)
    }

    async fn get_entry(&self, user_id: Uuid, id: Uuid) -> Result<JournalEntry, JournalingError> {
        self.service.get_entry(user_id, id).await.map_err(Into::into)
    }

    async fn list_entries(
        &self,
        user_id: Uuid,
        query: ListQuery,
    ) -> Result<Vec<JournalEntry>, JournalingError> {
        self.service
            .list_entries(user_id, query)
            .await
            .map_err(Into::into)
    }

    async fn update_entry(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: JournalEntryPatch,
    ) -> Result<JournalEntry, JournalingError> {
        self.service
            .update_entry(user_id, id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_entry(&self, user_id: Uuid, id: Uuid) -> Result<(), JournalingError> {
        self.service
            .delete_entry(user_id, id)
            .await
            .map_err(Into::into)
    }

    async fn stats(
        &self,
        user_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<JournalStats, JournalingError> {
        self.service.stats(user_id, as_of).await.map_err(Into::into)
    }
}
