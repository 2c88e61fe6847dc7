use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::contract::model::{
    JournalEntry, JournalEntryPatch, JournalStats, ListQuery, NewJournalEntry,
};
use crate::domain::error::DomainError;
use crate::domain::repo::JournalEntryRepository;
use crate::domain::stats::{self, StatsWindow};

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 10;
// OFFSET is bound as a signed 64-bit integer
const MAX_SKIP: u64 = i64::MAX as u64;

/// Domain service with the journaling rules.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn JournalEntryRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub max_title_length: usize,
    pub max_tags_length: usize,
    pub trend_window_days: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 100,
            max_page_size: 1000,
            max_title_length: 255,
            max_tags_length: 500,
            trend_window_days: 30,
        }
    }
}

// Storage keeps microseconds; keep returned values equal to what a later read yields.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Keep the whole context chain; the outermost context alone hides the driver error.
fn storage_error(e: anyhow::Error) -> DomainError {
    error!(error = ?e, "Journal storage operation failed");
    DomainError::database(format!("{e:#}"))
}

impl Service {
    pub fn new(repo: Arc<dyn JournalEntryRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(
        name = "journaling.service.create_entry",
        skip(self, new_entry),
        fields(user_id = %user_id, entry_date = %new_entry.entry_date)
    )]
    pub async fn create_entry(
        &self,
        user_id: Uuid,
        new_entry: NewJournalEntry,
    ) -> Result<JournalEntry, DomainError> {
        info!("Creating journal entry");

        self.validate_new_entry(&new_entry)?;

        let now = now();
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            user_id,
            title: new_entry.title,
            content: new_entry.content,
            entry_date: new_entry.entry_date,
            mood_rating: new_entry.mood_rating,
            energy_level: new_entry.energy_level,
            tags: new_entry.tags,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(entry.clone())
            .await
            .map_err(storage_error)?;

        info!(entry_id = %entry.id, "Created journal entry");
        Ok(entry)
    }

    #[instrument(
        name = "journaling.service.get_entry",
        skip(self),
        fields(user_id = %user_id, entry_id = %id)
    )]
    pub async fn get_entry(&self, user_id: Uuid, id: Uuid) -> Result<JournalEntry, DomainError> {
        debug!("Getting journal entry");

        let entry = self
            .repo
            .find(user_id, id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::entry_not_found(id))?;

        debug!("Successfully retrieved journal entry");
        Ok(entry)
    }

    #[instrument(
        name = "journaling.service.list_entries",
        skip(self, query),
        fields(user_id = %user_id, skip = query.skip, limit = ?query.limit)
    )]
    pub async fn list_entries(
        &self,
        user_id: Uuid,
        mut query: ListQuery,
    ) -> Result<Vec<JournalEntry>, DomainError> {
        debug!("Listing journal entries");

        let limit = self.resolve_limit(query.limit)?;
        check_skip(query.skip)?;
        // an empty tag filter means no filter
        query.tag = query.tag.filter(|t| !t.is_empty());

        let entries = self
            .repo
            .list(user_id, &query, limit)
            .await
            .map_err(storage_error)?;

        debug!("Successfully listed {} journal entries", entries.len());
        Ok(entries)
    }

    #[instrument(
        name = "journaling.service.update_entry",
        skip(self, patch),
        fields(user_id = %user_id, entry_id = %id)
    )]
    pub async fn update_entry(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: JournalEntryPatch,
    ) -> Result<JournalEntry, DomainError> {
        info!("Updating journal entry");

        self.validate_patch(&patch)?;

        let updated = self
            .repo
            .update(user_id, id, patch, now())
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::entry_not_found(id))?;

        info!("Successfully updated journal entry");
        Ok(updated)
    }

    #[instrument(
        name = "journaling.service.delete_entry",
        skip(self),
        fields(user_id = %user_id, entry_id = %id)
    )]
    pub async fn delete_entry(&self, user_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting journal entry");

        let deleted = self
            .repo
            .delete(user_id, id)
            .await
            .map_err(storage_error)?;

        if !deleted {
            return Err(DomainError::entry_not_found(id));
        }

        info!("Successfully deleted journal entry");
        Ok(())
    }

    /// Statistics relative to `as_of`, today (UTC) when absent.
    ///
    /// The count and sample queries run separately and are not mutually consistent
    /// under concurrent writes.
    #[instrument(
        name = "journaling.service.stats",
        skip(self),
        fields(user_id = %user_id, as_of = ?as_of)
    )]
    pub async fn stats(
        &self,
        user_id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<JournalStats, DomainError> {
        let window = StatsWindow::new(
            as_of.unwrap_or_else(|| Utc::now().date_naive()),
            self.config.trend_window_days,
        );
        debug!(month_start = %window.month_start, trend_start = %window.trend_start, "Computing journal stats");

        let total_entries = self
            .repo
            .count(user_id, None)
            .await
            .map_err(storage_error)?;
        let entries_this_month = self
            .repo
            .count(user_id, Some(window.month_start))
            .await
            .map_err(storage_error)?;
        let samples = self
            .repo
            .samples_since(user_id, window.earliest())
            .await
            .map_err(storage_error)?;

        let stats = JournalStats {
            total_entries,
            entries_this_month,
            average_mood_this_month: stats::average_mood_this_month(&samples, &window),
            average_energy_this_month: stats::average_energy_this_month(&samples, &window),
            most_used_tags: Vec::new(),
            mood_trend: stats::mood_trend(&samples, &window),
        };

        debug!(
            total = stats.total_entries,
            this_month = stats.entries_this_month,
            trend_points = stats.mood_trend.len(),
            "Computed journal stats"
        );
        Ok(stats)
    }

    fn resolve_limit(&self, limit: Option<u64>) -> Result<u64, DomainError> {
        let limit = limit.unwrap_or(self.config.default_page_size);
        if limit == 0 || limit > self.config.max_page_size {
            return Err(DomainError::validation(
                "limit",
                format!("must be between 1 and {}", self.config.max_page_size),
            ));
        }
        Ok(limit)
    }

    fn validate_new_entry(&self, new_entry: &NewJournalEntry) -> Result<(), DomainError> {
        self.validate_title(&new_entry.title)?;
        validate_content(&new_entry.content)?;
        if let Some(mood) = new_entry.mood_rating {
            validate_rating("mood_rating", mood)?;
        }
        if let Some(energy) = new_entry.energy_level {
            validate_rating("energy_level", energy)?;
        }
        if let Some(tags) = &new_entry.tags {
            self.validate_tags(tags)?;
        }
        Ok(())
    }

    fn validate_patch(&self, patch: &JournalEntryPatch) -> Result<(), DomainError> {
        if let Some(title) = &patch.title {
            self.validate_title(title)?;
        }
        if let Some(content) = &patch.content {
            validate_content(content)?;
        }
        if let Some(Some(mood)) = patch.mood_rating {
            validate_rating("mood_rating", mood)?;
        }
        if let Some(Some(energy)) = patch.energy_level {
            validate_rating("energy_level", energy)?;
        }
        if let Some(Some(tags)) = &patch.tags {
            self.validate_tags(tags)?;
        }
        Ok(())
    }

    fn validate_title(&self, title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "must not be empty"));
        }
        let len = title.chars().count();
        if len > self.config.max_title_length {
            return Err(DomainError::validation(
                "title",
                format!(
                    "too long: {} characters (max: {})",
                    len, self.config.max_title_length
                ),
            ));
        }
        Ok(())
    }

    fn validate_tags(&self, tags: &str) -> Result<(), DomainError> {
        let len = tags.chars().count();
        if len > self.config.max_tags_length {
            return Err(DomainError::validation(
                "tags",
                format!(
                    "too long: {} characters (max: {})",
                    len, self.config.max_tags_length
                ),
            ));
        }
        Ok(())
    }
}

fn check_skip(skip: u64) -> Result<(), DomainError> {
    if skip > MAX_SKIP {
        return Err(DomainError::validation(
            "skip",
            format!("must be at most {MAX_SKIP}"),
        ));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("content", "must not be empty"));
    }
    Ok(())
}

fn validate_rating(field: &str, value: i32) -> Result<(), DomainError> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(DomainError::validation(
            field,
            format!("must be between {MIN_RATING} and {MAX_RATING}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::MoodSample;
    use async_trait::async_trait;

    /// Repository that must never be reached.
    struct Unreachable;

    #[async_trait]
    impl JournalEntryRepository for Unreachable {
        async fn insert(&self, _entry: JournalEntry) -> anyhow::Result<()> {
            anyhow::bail!("insert must not be called")
        }
        async fn find(&self, _u: Uuid, _id: Uuid) -> anyhow::Result<Option<JournalEntry>> {
            anyhow::bail!("find must not be called")
        }
        async fn list(
            &self,
            _u: Uuid,
            _q: &ListQuery,
            _limit: u64,
        ) -> anyhow::Result<Vec<JournalEntry>> {
            anyhow::bail!("list must not be called")
        }
        async fn update(
            &self,
            _u: Uuid,
            _id: Uuid,
            _p: JournalEntryPatch,
            _now: DateTime<Utc>,
        ) -> anyhow::Result<Option<JournalEntry>> {
            anyhow::bail!("update must not be called")
        }
        async fn delete(&self, _u: Uuid, _id: Uuid) -> anyhow::Result<bool> {
            anyhow::bail!("delete must not be called")
        }
        async fn count(&self, _u: Uuid, _since: Option<NaiveDate>) -> anyhow::Result<u64> {
            anyhow::bail!("count must not be called")
        }
        async fn samples_since(
            &self,
            _u: Uuid,
            _since: NaiveDate,
        ) -> anyhow::Result<Vec<MoodSample>> {
            anyhow::bail!("samples_since must not be called")
        }
    }

    fn service() -> Service {
        Service::new(Arc::new(Unreachable), ServiceConfig::default())
    }

    fn valid_entry() -> NewJournalEntry {
        NewJournalEntry {
            title: "Morning pages".into(),
            content: "Slept well.".into(),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            mood_rating: Some(7),
            energy_level: Some(6),
            tags: Some("sleep,morning".into()),
        }
    }

    #[test]
    fn accepts_a_valid_entry() {
        assert!(service().validate_new_entry(&valid_entry()).is_ok());
    }

    #[test]
    fn whitespace_title_and_content_are_empty() {
        let svc = service();
        let e = NewJournalEntry {
            title: "   ".into(),
            ..valid_entry()
        };
        assert_eq!(svc.validate_new_entry(&e).unwrap_err().field(), Some("title"));

        let e = NewJournalEntry {
            content: "\n\t".into(),
            ..valid_entry()
        };
        assert_eq!(svc.validate_new_entry(&e).unwrap_err().field(), Some("content"));
    }

    #[test]
    fn title_length_counts_characters() {
        let svc = service();
        let e = NewJournalEntry {
            title: "é".repeat(255),
            ..valid_entry()
        };
        assert!(svc.validate_new_entry(&e).is_ok());

        let e = NewJournalEntry {
            title: "é".repeat(256),
            ..valid_entry()
        };
        assert_eq!(svc.validate_new_entry(&e).unwrap_err().field(), Some("title"));
    }

    #[test]
    fn ratings_must_be_in_range() {
        let svc = service();
        for bad in [0, 11, -3] {
            let e = NewJournalEntry {
                mood_rating: Some(bad),
                ..valid_entry()
            };
            assert_eq!(
                svc.validate_new_entry(&e).unwrap_err().field(),
                Some("mood_rating")
            );
        }
        let e = NewJournalEntry {
            energy_level: Some(11),
            ..valid_entry()
        };
        assert_eq!(
            svc.validate_new_entry(&e).unwrap_err().field(),
            Some("energy_level")
        );
    }

    #[test]
    fn tags_length_is_limited() {
        let e = NewJournalEntry {
            tags: Some("x".repeat(501)),
            ..valid_entry()
        };
        assert_eq!(service().validate_new_entry(&e).unwrap_err().field(), Some("tags"));
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        let svc = service();
        assert!(svc.validate_patch(&JournalEntryPatch::default()).is_ok());
        assert!(svc
            .validate_patch(&JournalEntryPatch {
                mood_rating: Some(None),
                tags: Some(None),
                ..Default::default()
            })
            .is_ok());
        let err = svc
            .validate_patch(&JournalEntryPatch {
                content: Some(" ".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.field(), Some("content"));
    }

    #[test]
    fn limit_defaults_and_bounds() {
        let svc = service();
        assert_eq!(svc.resolve_limit(None).unwrap(), 100);
        assert_eq!(svc.resolve_limit(Some(1)).unwrap(), 1);
        assert_eq!(svc.resolve_limit(Some(1000)).unwrap(), 1000);
        assert_eq!(svc.resolve_limit(Some(0)).unwrap_err().field(), Some("limit"));
        assert_eq!(svc.resolve_limit(Some(1001)).unwrap_err().field(), Some("limit"));
    }

    #[test]
    fn skip_must_fit_a_signed_offset() {
        assert!(check_skip(0).is_ok());
        assert!(check_skip(i64::MAX as u64).is_ok());
        assert_eq!(check_skip(i64::MAX as u64 + 1).unwrap_err().field(), Some("skip"));
        assert_eq!(check_skip(u64::MAX).unwrap_err().field(), Some("skip"));
    }

    #[tokio::test]
    async fn invalid_create_never_reaches_storage() {
        let e = NewJournalEntry {
            title: String::new(),
            ..valid_entry()
        };
        let err = service().create_entry(Uuid::new_v4(), e).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn out_of_range_limit_never_reaches_storage() {
        let q = ListQuery {
            limit: Some(5000),
            ..Default::default()
        };
        let err = service().list_entries(Uuid::new_v4(), q).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn storage_failures_become_database_errors() {
        let err = service()
            .get_entry(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Database { .. }));
    }

    #[test]
    fn storage_error_keeps_the_cause() {
        let e = anyhow::anyhow!("no such table: journal_entries").context("find failed");
        match storage_error(e) {
            DomainError::Database { message } => {
                assert!(message.contains("find failed"), "{message}");
                assert!(message.contains("no such table"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
