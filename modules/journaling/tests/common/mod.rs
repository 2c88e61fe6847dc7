#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use modkit_db::{ConnectOpts, DbHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use journaling::contract::model::NewJournalEntry;
use journaling::domain::service::{Service, ServiceConfig};
use journaling::infra::storage::{migrations::Migrator, SeaOrmJournalRepository};

/// Fresh in-memory SQLite database with migrations applied.
pub async fn test_db() -> Arc<DbHandle> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db.sea(), None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

pub fn service_on(conn: DatabaseConnection, config: ServiceConfig) -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(SeaOrmJournalRepository::new(conn)),
        config,
    ))
}

/// Domain service over a SeaORM repository on a fresh database.
pub async fn test_service() -> Arc<Service> {
    let db = test_db().await;
    service_on(db.sea(), ServiceConfig::default())
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn entry(title: &str, day: &str) -> NewJournalEntry {
    NewJournalEntry {
        title: title.to_string(),
        content: format!("{title} body"),
        entry_date: date(day),
        mood_rating: None,
        energy_level: None,
        tags: None,
    }
}

pub fn rated(title: &str, day: &str, mood: i32, energy: Option<i32>) -> NewJournalEntry {
    NewJournalEntry {
        mood_rating: Some(mood),
        energy_level: energy,
        ..entry(title, day)
    }
}

pub fn tagged(title: &str, day: &str, tags: &str) -> NewJournalEntry {
    NewJournalEntry {
        tags: Some(tags.to_string()),
        ..entry(title, day)
    }
}
