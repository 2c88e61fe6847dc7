use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Pure journal entry model for inter-module communication (no serde/utoipa).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    /// Day the entry is about; unrelated to `created_at`.
    pub entry_date: NaiveDate,
    pub mood_rating: Option<i32>,
    pub energy_level: Option<i32>,
    /// Free-text, comma separated.
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new entry; id, owner and timestamps are assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    pub title: String,
    pub content: String,
    pub entry_date: NaiveDate,
    pub mood_rating: Option<i32>,
    pub energy_level: Option<i32>,
    pub tags: Option<String>,
}

/// Partial update. `None` leaves a field untouched.
///
/// Nullable fields use `Option<Option<_>>`: `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JournalEntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub mood_rating: Option<Option<i32>>,
    pub energy_level: Option<Option<i32>>,
    pub tags: Option<Option<String>>,
}

impl JournalEntryPatch {
    /// Names of the fields this patch touches, for logging without the values.
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        [
            ("title", self.title.is_some()),
            ("content", self.content.is_some()),
            ("entry_date", self.entry_date.is_some()),
            ("mood_rating", self.mood_rating.is_some()),
            ("energy_level", self.energy_level.is_some()),
            ("tags", self.tags.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Apply the supplied fields to `entry`. Timestamps are left to the caller.
    pub fn apply_to(self, entry: &mut JournalEntry) {
        if let Some(title) = self.title {
            entry.title = title;
        }
        if let Some(content) = self.content {
            entry.content = content;
        }
        if let Some(entry_date) = self.entry_date {
            entry.entry_date = entry_date;
        }
        if let Some(mood) = self.mood_rating {
            entry.mood_rating = mood;
        }
        if let Some(energy) = self.energy_level {
            entry.energy_level = energy;
        }
        if let Some(tags) = self.tags {
            entry.tags = tags;
        }
    }
}

/// Filters and pagination for listing a user's entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub skip: u64,
    /// `None` means the configured default page size.
    pub limit: Option<u64>,
    /// Inclusive lower bound on `entry_date`.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on `entry_date`.
    pub to_date: Option<NaiveDate>,
    /// Substring matched against `tags`.
    pub tag: Option<String>,
}

/// Aggregates over one user's entries, relative to an `as_of` day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JournalStats {
    pub total_entries: u64,
    pub entries_this_month: u64,
    pub average_mood_this_month: Option<f64>,
    pub average_energy_this_month: Option<f64>,
    /// Always empty; tag ranking is not computed.
    pub most_used_tags: Vec<String>,
    pub mood_trend: Vec<MoodTrendPoint>,
}

/// Mean mood of all rated entries on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodTrendPoint {
    pub date: NaiveDate,
    pub mood: f64,
}
