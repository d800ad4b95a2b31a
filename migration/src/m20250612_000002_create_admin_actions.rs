use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only admin action log
        manager
            .create_table(
                Table::create()
                    .table(AdminActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminActions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminActions::ActorId).string().not_null())
                    .col(ColumnDef::new(AdminActions::Action).string().not_null())
                    .col(ColumnDef::new(AdminActions::TargetKind).string().not_null())
                    .col(ColumnDef::new(AdminActions::TargetId).string().not_null())
                    .col(ColumnDef::new(AdminActions::Reason).string())
                    .col(ColumnDef::new(AdminActions::PreviousState).string())
                    .col(ColumnDef::new(AdminActions::NewState).string())
                    .col(ColumnDef::new(AdminActions::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_actions_target_id")
                    .table(AdminActions::Table)
                    .col(AdminActions::TargetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_actions_created_at")
                    .table(AdminActions::Table)
                    .col(AdminActions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminActions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AdminActions {
    Table,
    Id,
    ActorId,
    Action,
    TargetKind,
    TargetId,
    Reason,
    PreviousState,
    NewState,
    CreatedAt,
}
