//! User account entity.

use sea_orm::entity::prelude::*;

/// One registered account. The `id` is a UUID stored as text; guestbook
/// messages reference it and are deleted along with the account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    pub name: String,

    /// Unique login identifier.
    #[sea_orm(unique)]
    pub email: String,

    /// Bcrypt hash, never the plaintext password.
    pub password_hash: String,

    /// UTC timestamp as text (`YYYY-MM-DD HH:MM:SS`).
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guestbook_message::Entity")]
    GuestbookMessage,
}

impl Related<super::guestbook_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuestbookMessage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
