use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncCheckpoint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncCheckpoint::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SyncCheckpoint::LastSyncMillis)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SyncCheckpoint::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncCheckpoint::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SyncCheckpoint {
    Table,
    Name,
    LastSyncMillis,
    UpdatedAt,
}
