//! Session record entity.
//!
//! Backing table for the tower-sessions store. Session data is opaque to the
//! rest of the application; only [`SeaOrmStore`](crate::session_store::SeaOrmStore)
//! reads or writes these rows.

use sea_orm::entity::prelude::*;

/// One serialized session record.
///
/// | Column      | Type               | Notes                            |
/// |-------------|--------------------|----------------------------------|
/// | id          | TEXT (Primary Key) | tower-sessions session ID        |
/// | data        | BLOB               | MessagePack-serialized record    |
/// | expiry_date | TIMESTAMPTZ        | rows past this are never loaded  |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    pub data: Vec<u8>,

    pub expiry_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
