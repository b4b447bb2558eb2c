use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260301_000001_profile::Profile, m20260301_000002_category::Category};

static IDX_LISTING_OWNER_ID: &str = "idx-listing-owner_id";
static IDX_LISTING_CATEGORY_ID: &str = "idx-listing-category_id";
static IDX_LISTING_STATUS: &str = "idx-listing-status";
static FK_LISTING_OWNER_ID: &str = "fk-listing-owner_id";
static FK_LISTING_CATEGORY_ID: &str = "fk-listing-category_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(pk_auto(Listing::Id))
                    .col(integer(Listing::OwnerId))
                    .col(integer_null(Listing::CategoryId))
                    .col(string(Listing::Name))
                    .col(string_uniq(Listing::Url))
                    .col(string_uniq(Listing::Slug))
                    .col(text(Listing::Description))
                    .col(string(Listing::Tags).default(""))
                    .col(string_len(Listing::Status, 16))
                    .col(string_len(Listing::Plan, 16))
                    .col(boolean(Listing::Featured).default(false))
                    .col(timestamp_null(Listing::VisibleUntil))
                    .col(text_null(Listing::RejectionReason))
                    .col(timestamp_null(Listing::ApprovedAt))
                    .col(timestamp_null(Listing::ReminderSentAt))
                    .col(timestamp(Listing::CreatedAt))
                    .col(timestamp(Listing::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            (IDX_LISTING_OWNER_ID, Listing::OwnerId),
            (IDX_LISTING_CATEGORY_ID, Listing::CategoryId),
            (IDX_LISTING_STATUS, Listing::Status),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Listing::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_LISTING_OWNER_ID)
                    .from_tbl(Listing::Table)
                    .from_col(Listing::OwnerId)
                    .to_tbl(Profile::Table)
                    .to_col(Profile::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_LISTING_CATEGORY_ID)
                    .from_tbl(Listing::Table)
                    .from_col(Listing::CategoryId)
                    .to_tbl(Category::Table)
                    .to_col(Category::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [FK_LISTING_CATEGORY_ID, FK_LISTING_OWNER_ID] {
            manager
                .drop_foreign_key(
                    ForeignKey::drop()
                        .name(name)
                        .table(Listing::Table)
                        .to_owned(),
                )
                .await?;
        }

        for name in [IDX_LISTING_STATUS, IDX_LISTING_CATEGORY_ID, IDX_LISTING_OWNER_ID] {
            manager
                .drop_index(Index::drop().name(name).table(Listing::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Listing::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Listing {
    Table,
    Id,
    OwnerId,
    CategoryId,
    Name,
    Url,
    Slug,
    Description,
    Tags,
    Status,
    Plan,
    Featured,
    VisibleUntil,
    RejectionReason,
    ApprovedAt,
    ReminderSentAt,
    CreatedAt,
    UpdatedAt,
}
