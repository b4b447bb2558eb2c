use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260301_000001_profile::Profile, m20260301_000003_listing::Listing};

static IDX_SUBSCRIPTION_PROFILE_ID: &str = "idx-subscription-profile_id";
static IDX_SUBSCRIPTION_LISTING_ID: &str = "idx-subscription-listing_id";
static FK_SUBSCRIPTION_PROFILE_ID: &str = "fk-subscription-profile_id";
static FK_SUBSCRIPTION_LISTING_ID: &str = "fk-subscription-listing_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(pk_auto(Subscription::Id))
                    .col(string_uniq(Subscription::StripeSubscriptionId))
                    .col(string(Subscription::StripeCustomerId))
                    .col(integer(Subscription::ProfileId))
                    .col(integer_null(Subscription::ListingId))
                    .col(string(Subscription::PriceId))
                    .col(string_len(Subscription::Plan, 16))
                    .col(string_len(Subscription::Status, 32))
                    .col(timestamp(Subscription::CurrentPeriodEnd))
                    .col(boolean(Subscription::CancelAtPeriodEnd).default(false))
                    .col(timestamp(Subscription::CreatedAt))
                    .col(timestamp(Subscription::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SUBSCRIPTION_PROFILE_ID)
                    .table(Subscription::Table)
                    .col(Subscription::ProfileId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SUBSCRIPTION_LISTING_ID)
                    .table(Subscription::Table)
                    .col(Subscription::ListingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_SUBSCRIPTION_PROFILE_ID)
                    .from_tbl(Subscription::Table)
                    .from_col(Subscription::ProfileId)
                    .to_tbl(Profile::Table)
                    .to_col(Profile::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_SUBSCRIPTION_LISTING_ID)
                    .from_tbl(Subscription::Table)
                    .from_col(Subscription::ListingId)
                    .to_tbl(Listing::Table)
                    .to_col(Listing::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SUBSCRIPTION_LISTING_ID)
                    .table(Subscription::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_SUBSCRIPTION_PROFILE_ID)
                    .table(Subscription::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SUBSCRIPTION_LISTING_ID)
                    .table(Subscription::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_SUBSCRIPTION_PROFILE_ID)
                    .table(Subscription::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Subscription::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    Id,
    StripeSubscriptionId,
    StripeCustomerId,
    ProfileId,
    ListingId,
    PriceId,
    Plan,
    Status,
    CurrentPeriodEnd,
    CancelAtPeriodEnd,
    CreatedAt,
    UpdatedAt,
}
