//! Guestbook message entity.

use sea_orm::entity::prelude::*;

/// One guestbook entry: the message text plus its metadata (country of
/// origin, optional uploaded-image reference, creation timestamp, owner).
///
/// | Column     | Type                 | Notes                                |
/// |------------|----------------------|--------------------------------------|
/// | id         | INTEGER (pk, auto)   |                                      |
/// | message    | TEXT                 | required, never empty                |
/// | country    | TEXT (null)          | ISO country code or "Unknown"        |
/// | image      | TEXT (null)          | upstream image reference             |
/// | created_at | TEXT                 | UTC, `YYYY-MM-DD HH:MM:SS`           |
/// | user_id    | TEXT                 | FK to `user.id`, ON DELETE CASCADE   |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guestbook_message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub message: String,

    pub country: Option<String>,

    pub image: Option<String>,

    pub created_at: String,

    #[sea_orm(column_type = "Text")]
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
