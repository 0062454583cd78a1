//! Create order_documents table.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_create_orders::Order;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderDocument::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderDocument::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderDocument::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(OrderDocument::FileName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDocument::FilePath)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDocument::FileSize)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrderDocument::MimeType)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderDocument::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_documents_order")
                            .from(OrderDocument::Table, OrderDocument::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_documents_order")
                    .table(OrderDocument::Table)
                    .col(OrderDocument::OrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderDocument::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrderDocument {
    #[sea_orm(iden = "order_documents")]
    Table,
    Id,
    OrderId,
    FileName,
    FilePath,
    FileSize,
    MimeType,
    CreatedAt,
}
