use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{
    JournalEntry, JournalEntryPatch, JournalStats, ListQuery, MoodTrendPoint, NewJournalEntry,
};

/// REST DTO for a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JournalEntryDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    /// Day the entry is about (YYYY-MM-DD).
    pub entry_date: NaiveDate,
    /// 1 (very bad) to 10 (excellent).
    pub mood_rating: Option<i32>,
    /// 1 (very low) to 10 (very high).
    pub energy_level: Option<i32>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating an entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEntryReq {
    #[schema(min_length = 1, max_length = 255)]
    pub title: String,
    #[schema(min_length = 1)]
    pub content: String,
    pub entry_date: NaiveDate,
    #[serde(default)]
    #[schema(minimum = 1, maximum = 10)]
    pub mood_rating: Option<i32>,
    #[serde(default)]
    #[schema(minimum = 1, maximum = 10)]
    pub energy_level: Option<i32>,
    #[serde(default)]
    #[schema(max_length = 500)]
    pub tags: Option<String>,
}

/// REST DTO for a partial update.
///
/// Omitted fields stay as they are; an explicit `null` clears
/// `mood_rating`, `energy_level` or `tags`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEntryReq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>)]
    pub mood_rating: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>)]
    pub energy_level: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub tags: Option<Option<String>>,
}

/// A field that is present in the body, possibly as `null`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Query parameters of the list endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEntriesQuery {
    /// Number of entries to skip.
    pub skip: Option<u64>,
    /// Maximum entries to return (1-1000, default 100).
    pub limit: Option<u64>,
    /// Only entries dated on or after this day.
    pub from_date: Option<NaiveDate>,
    /// Only entries dated on or before this day.
    pub to_date: Option<NaiveDate>,
    /// Substring match on tags.
    pub tags: Option<String>,
}

/// Query parameters of the stats endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Reference day; defaults to today (UTC).
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MoodTrendPointDto {
    pub date: NaiveDate,
    pub mood: f64,
}

/// REST DTO for journal statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JournalStatsDto {
    pub total_entries: u64,
    pub entries_this_month: u64,
    pub average_mood_this_month: Option<f64>,
    pub average_energy_this_month: Option<f64>,
    pub most_used_tags: Vec<String>,
    pub mood_trend: Vec<MoodTrendPointDto>,
}

// Conversion implementations between REST DTOs and contract models

impl From<JournalEntry> for JournalEntryDto {
    fn from(e: JournalEntry) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            title: e.title,
            content: e.content,
            entry_date: e.entry_date,
            mood_rating: e.mood_rating,
            energy_level: e.energy_level,
            tags: e.tags,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<CreateEntryReq> for NewJournalEntry {
    fn from(req: CreateEntryReq) -> Self {
        Self {
            title: req.title,
            content: req.content,
            entry_date: req.entry_date,
            mood_rating: req.mood_rating,
            energy_level: req.energy_level,
            tags: req.tags,
        }
    }
}

impl From<UpdateEntryReq> for JournalEntryPatch {
    fn from(req: UpdateEntryReq) -> Self {
        Self {
            title: req.title,
            content: req.content,
            entry_date: req.entry_date,
            mood_rating: req.mood_rating,
            energy_level: req.energy_level,
            tags: req.tags,
        }
    }
}

impl From<ListEntriesQuery> for ListQuery {
    fn from(q: ListEntriesQuery) -> Self {
        Self {
            skip: q.skip.unwrap_or(0),
            limit: q.limit,
            from_date: q.from_date,
            to_date: q.to_date,
            tag: q.tags,
        }
    }
}

impl From<MoodTrendPoint> for MoodTrendPointDto {
    fn from(p: MoodTrendPoint) -> Self {
        Self {
            date: p.date,
            mood: p.mood,
        }
    }
}

impl From<JournalStats> for JournalStatsDto {
    fn from(s: JournalStats) -> Self {
        Self {
            total_entries: s.total_entries,
            entries_this_month: s.entries_this_month,
            average_mood_this_month: s.average_mood_this_month,
            average_energy_this_month: s.average_energy_this_month,
            most_used_tags: s.most_used_tags,
            mood_trend: s.mood_trend.into_iter().map(Into::into).collect(),
        }
    }
}
