use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use time::OffsetDateTime;
use tower_sessions::{session::Id, session::Record, session_store, ExpiredDeletion, SessionStore};

use crate::entity::session::{self, ActiveModel as SessionActiveModel, Entity as SessionEntity};

/// Sea-ORM-backed session store for `tower-sessions`.
///
/// Persists session records in the `session` table (see
/// [`crate::entity::session`]), serialized with MessagePack. Expired rows are
/// filtered out at the query level on load and bulk-deleted by
/// [`ExpiredDeletion::delete_expired`].
///
/// The store is a thin dispatch object over a [`DatabaseConnection`]; cloning
/// it is cheap and clones are safe to share across in-flight requests.
///
/// # Error mapping
///
/// - database errors → `session_store::Error::Backend`
/// - serialization errors → `session_store::Error::Encode`
/// - deserialization errors → `session_store::Error::Decode`
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    conn: DatabaseConnection,
}

impl SeaOrmStore {
    /// Creates a store over an established database connection.
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for SeaOrmStore {
    /// Inserts a new session record.
    ///
    /// Runs inside a transaction and regenerates the record ID until it does
    /// not collide with an existing row, so concurrent creates cannot adopt
    /// each other's IDs.
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?;

        while SessionEntity::find_by_id(record.id.to_string())
            .one(&txn)
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?
            .is_some()
        {
            record.id = Id::default();
        }

        let data =
            rmp_serde::to_vec(record).map_err(|e| session_store::Error::Encode(e.to_string()))?;

        let session_model = SessionActiveModel {
            id: Set(record.id.to_string()),
            data: Set(data),
            expiry_date: Set(to_db_timestamp(record.expiry_date)),
        };

        session_model
            .insert(&txn)
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?;

        Ok(())
    }

    /// Upserts a session record by ID.
    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let data =
            rmp_serde::to_vec(record).map_err(|e| session_store::Error::Encode(e.to_string()))?;
        let expiry_date = to_db_timestamp(record.expiry_date);

        match SessionEntity::find_by_id(record.id.to_string())
            .one(&self.conn)
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?
        {
            Some(existing) => {
                let mut active_model = existing.into_active_model();
                active_model.data = Set(data);
                active_model.expiry_date = Set(expiry_date);
                active_model
                    .update(&self.conn)
                    .await
                    .map_err(|e| session_store::Error::Backend(e.to_string()))?;
            }
            None => {
                let session_model = SessionActiveModel {
                    id: Set(record.id.to_string()),
                    data: Set(data),
                    expiry_date: Set(expiry_date),
                };

                session_model
                    .insert(&self.conn)
                    .await
                    .map_err(|e| session_store::Error::Backend(e.to_string()))?;
            }
        }

        Ok(())
    }

    /// Loads a session record by ID, treating expired rows as absent.
    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = to_db_timestamp(OffsetDateTime::now_utc());

        let session = SessionEntity::find_by_id(session_id.to_string())
            .filter(session::Column::ExpiryDate.gt(now))
            .one(&self.conn)
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?;

        match session {
            Some(model) => {
                let record = rmp_serde::from_slice(&model.data)
                    .map_err(|e| session_store::Error::Decode(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Deletes a session record by ID; deleting an absent row is not an error.
    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        SessionEntity::delete_by_id(session_id.to_string())
            .exec(&self.conn)
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for SeaOrmStore {
    /// Bulk-deletes every session row whose expiry is in the past.
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = to_db_timestamp(OffsetDateTime::now_utc());

        SessionEntity::delete_many()
            .filter(session::Column::ExpiryDate.lt(now))
            .exec(&self.conn)
            .await
            .map_err(|e| session_store::Error::Backend(e.to_string()))?;

        Ok(())
    }
}

// tower-sessions hands out time::OffsetDateTime; Sea-ORM stores chrono-based
// DateTimeWithTimeZone.
fn to_db_timestamp(time: OffsetDateTime) -> DateTimeWithTimeZone {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    if let Some(datetime) = DateTime::from_timestamp(time.unix_timestamp(), time.nanosecond()) {
        return datetime.into();
    }

    // Out-of-range timestamps fall back to component-wise construction.
    let naive = NaiveDateTime::new(
        chrono::NaiveDate::from_ymd_opt(time.year(), time.month() as u32, time.day() as u32)
            .unwrap_or_default(),
        chrono::NaiveTime::from_hms_nano_opt(
            time.hour() as u32,
            time.minute() as u32,
            time.second() as u32,
            time.nanosecond(),
        )
        .unwrap_or_default(),
    );

    Utc.from_utc_datetime(&naive).into()
}
