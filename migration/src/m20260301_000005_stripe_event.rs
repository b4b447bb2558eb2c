use sea_orm_migration::{prelude::*, schema::*};

static IDX_STRIPE_EVENT_PROCESSED_AT: &str = "idx-stripe_event-processed_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StripeEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(StripeEvent::Id))
                    .col(string_uniq(StripeEvent::EventId))
                    .col(string(StripeEvent::EventType))
                    .col(timestamp(StripeEvent::ProcessedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_STRIPE_EVENT_PROCESSED_AT)
                    .table(StripeEvent::Table)
                    .col(StripeEvent::ProcessedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_STRIPE_EVENT_PROCESSED_AT)
                    .table(StripeEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(StripeEvent::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum StripeEvent {
    Table,
    Id,
    EventId,
    EventType,
    ProcessedAt,
}
