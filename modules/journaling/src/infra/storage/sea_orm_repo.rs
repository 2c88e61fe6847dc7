//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it works with a
//! `DatabaseConnection` or inside an outer transaction.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{JournalEntry, JournalEntryPatch, ListQuery};
use crate::domain::repo::JournalEntryRepository;
use crate::domain::stats::MoodSample;
use crate::infra::storage::entity::journal_entry::{
    ActiveModel as EntryAM, Column, Entity as EntryEntity,
};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmJournalRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmJournalRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Base scope of every query: rows owned by `user_id`.
fn owned_by(user_id: Uuid) -> Select<EntryEntity> {
    EntryEntity::find().filter(Column::UserId.eq(user_id))
}

#[async_trait::async_trait]
impl<C> JournalEntryRepository for SeaOrmJournalRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn insert(&self, entry: JournalEntry) -> anyhow::Result<()> {
        let m: EntryAM = entry.into();
        let _ = m.insert(&self.conn).await.context("insert failed")?;
        Ok(())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<JournalEntry>> {
        let found = owned_by(user_id)
            .filter(Column::Id.eq(id))
            .one(&self.conn)
            .await
            .context("find failed")?;
        Ok(found.map(Into::into))
    }

    async fn list(
        &self,
        user_id: Uuid,
        query: &ListQuery,
        limit: u64,
    ) -> anyhow::Result<Vec<JournalEntry>> {
        let mut select = owned_by(user_id);
        if let Some(from) = query.from_date {
            select = select.filter(Column::EntryDate.gte(from));
        }
        if let Some(to) = query.to_date {
            select = select.filter(Column::EntryDate.lte(to));
        }
        if let Some(tag) = &query.tag {
            // LIKE '%tag%'; case sensitivity follows the backend collation
            select = select.filter(Column::Tags.contains(tag.as_str()));
        }

        let rows = select
            .order_by_desc(Column::EntryDate)
            .order_by_desc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .offset(query.skip)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: JournalEntryPatch,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<JournalEntry>> {
        let txn = self.conn.begin().await.context("begin failed")?;

        // SELECT ... FOR UPDATE on Postgres; SQLite already serializes writers
        // and sea-query omits the clause there.
        let found = owned_by(user_id)
            .filter(Column::Id.eq(id))
            .lock_exclusive()
            .one(&txn)
            .await
            .context("update lookup failed")?;
        let Some(found) = found else {
            txn.rollback().await.context("rollback failed")?;
            return Ok(None);
        };

        let mut entry: JournalEntry = found.into();
        patch.apply_to(&mut entry);
        entry.updated_at = now.max(entry.updated_at);

        let m: EntryAM = entry.clone().into();
        match m.update(&txn).await {
            Ok(_) => {}
            // row deleted between lookup and write
            Err(DbErr::RecordNotUpdated) => {
                txn.rollback().await.context("rollback failed")?;
                return Ok(None);
            }
            Err(e) => return Err(anyhow::Error::new(e).context("update failed")),
        }
        txn.commit().await.context("commit failed")?;
        Ok(Some(entry))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = EntryEntity::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn count(&self, user_id: Uuid, since: Option<NaiveDate>) -> anyhow::Result<u64> {
        let mut select = owned_by(user_id);
        if let Some(since) = since {
            select = select.filter(Column::EntryDate.gte(since));
        }
        select.count(&self.conn).await.context("count failed")
    }

    async fn samples_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> anyhow::Result<Vec<MoodSample>> {
        let rows: Vec<(NaiveDate, Option<i32>, Option<i32>)> = owned_by(user_id)
            .filter(Column::EntryDate.gte(since))
            .select_only()
            .column(Column::EntryDate)
            .column(Column::MoodRating)
            .column(Column::EnergyLevel)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("samples_since failed")?;
        Ok(rows
            .into_iter()
            .map(|(entry_date, mood_rating, energy_level)| MoodSample {
                entry_date,
                mood_rating,
                energy_level,
            })
            .collect())
    }
}
