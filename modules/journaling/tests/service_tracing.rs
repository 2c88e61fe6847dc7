//! Tests to verify that the service layer emits the expected tracing spans.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tracing_test::traced_test;
use uuid::Uuid;

use journaling::contract::model::{JournalEntry, JournalEntryPatch, ListQuery, NewJournalEntry};
use journaling::domain::repo::JournalEntryRepository;
use journaling::domain::service::{Service, ServiceConfig};
use journaling::domain::stats::MoodSample;

/// Vec-backed repository; enough to drive every service operation.
#[derive(Default)]
struct MemoryRepo {
    entries: Mutex<Vec<JournalEntry>>,
}

impl MemoryRepo {
    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<JournalEntry>> {
        self.entries.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl JournalEntryRepository for MemoryRepo {
    async fn insert(&self, entry: JournalEntry) -> Result<()> {
        self.rows().push(entry);
        Ok(())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<JournalEntry>> {
        Ok(self
            .rows()
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: Uuid, query: &ListQuery, limit: u64) -> Result<Vec<JournalEntry>> {
        Ok(self
            .rows()
            .iter()
            .filter(|e| e.user_id == user_id)
            .skip(query.skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: JournalEntryPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<JournalEntry>> {
        let mut rows = self.rows();
        let Some(e) = rows.iter_mut().find(|e| e.id == id && e.user_id == user_id) else {
            return Ok(None);
        };
        patch.apply_to(e);
        e.updated_at = now.max(e.updated_at);
        Ok(Some(e.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(rows.len() < before)
    }

    async fn count(&self, user_id: Uuid, since: Option<NaiveDate>) -> Result<u64> {
        Ok(self
            .rows()
            .iter()
            .filter(|e| e.user_id == user_id && since.map_or(true, |s| e.entry_date >= s))
            .count() as u64)
    }

    async fn samples_since(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<MoodSample>> {
        Ok(self
            .rows()
            .iter()
            .filter(|e| e.user_id == user_id && e.entry_date >= since)
            .map(|e| MoodSample {
                entry_date: e.entry_date,
                mood_rating: e.mood_rating,
                energy_level: e.energy_level,
            })
            .collect())
    }
}

fn service() -> Service {
    Service::new(Arc::new(MemoryRepo::default()), ServiceConfig::default())
}

fn new_entry() -> NewJournalEntry {
    NewJournalEntry {
        title: "Traced".into(),
        content: "Span check".into(),
        entry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        mood_rating: Some(7),
        energy_level: None,
        tags: None,
    }
}

#[traced_test]
#[tokio::test]
async fn create_entry_emits_span_with_user_id() {
    let user = Uuid::new_v4();
    let created = service().create_entry(user, new_entry()).await.unwrap();

    assert!(logs_contain("journaling.service.create_entry"));
    assert!(logs_contain(&user.to_string()));
    assert!(logs_contain(&format!("Created journal entry entry_id={}", created.id)));
}

#[traced_test]
#[tokio::test]
async fn get_entry_span_carries_entry_id() {
    let svc = service();
    let user = Uuid::new_v4();
    let created = svc.create_entry(user, new_entry()).await.unwrap();

    svc.get_entry(user, created.id).await.unwrap();

    assert!(logs_contain("journaling.service.get_entry"));
    assert!(logs_contain(&format!("entry_id={}", created.id)));
}

#[traced_test]
#[tokio::test]
async fn every_operation_has_its_own_span() {
    let svc = service();
    let user = Uuid::new_v4();
    let created = svc.create_entry(user, new_entry()).await.unwrap();

    svc.list_entries(user, ListQuery::default()).await.unwrap();
    svc.update_entry(
        user,
        created.id,
        JournalEntryPatch {
            mood_rating: Some(Some(3)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    svc.stats(user, NaiveDate::from_ymd_opt(2024, 1, 31))
        .await
        .unwrap();
    svc.delete_entry(user, created.id).await.unwrap();

    for span in [
        "journaling.service.list_entries",
        "journaling.service.update_entry",
        "journaling.service.stats",
        "journaling.service.delete_entry",
    ] {
        assert!(logs_contain(span), "missing span {span}");
    }
}

#[traced_test]
#[tokio::test]
async fn failed_lookup_is_still_traced() {
    let missing = Uuid::new_v4();
    let res = service().get_entry(Uuid::new_v4(), missing).await;

    assert!(res.is_err());
    assert!(logs_contain("journaling.service.get_entry"));
    assert!(logs_contain(&missing.to_string()));
}
