use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::contract::model::JournalEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub entry_date: NaiveDate,
    pub mood_rating: Option<i32>,
    pub energy_level: Option<i32>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for JournalEntry {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            title: m.title,
            content: m.content,
            entry_date: m.entry_date,
            mood_rating: m.mood_rating,
            energy_level: m.energy_level,
            tags: m.tags,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<JournalEntry> for ActiveModel {
    fn from(e: JournalEntry) -> Self {
        Self {
            id: Set(e.id),
            user_id: Set(e.user_id),
            title: Set(e.title),
            content: Set(e.content),
            entry_date: Set(e.entry_date),
            mood_rating: Set(e.mood_rating),
            energy_level: Set(e.energy_level),
            tags: Set(e.tags),
            created_at: Set(e.created_at),
            updated_at: Set(e.updated_at),
        }
    }
}
