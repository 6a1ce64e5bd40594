use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuestbookMessage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuestbookMessage::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GuestbookMessage::Message).text().not_null())
                    .col(ColumnDef::new(GuestbookMessage::Country).text())
                    .col(ColumnDef::new(GuestbookMessage::Image).text())
                    .col(
                        ColumnDef::new(GuestbookMessage::CreatedAt)
                            .text()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(GuestbookMessage::UserId).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guestbook_message_user")
                            .from(GuestbookMessage::Table, GuestbookMessage::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuestbookMessage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GuestbookMessage {
    Table,
    Id,
    Message,
    Country,
    Image,
    CreatedAt,
    UserId,
}
