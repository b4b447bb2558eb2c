//! Listing persistence.

use chrono::{NaiveDateTime, Utc};
use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};
use sea_orm::{
    sea_query::{Expr, ExprTrait, Func, LikeExpr},
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::model::listing::ListingSort;

/// Fields of a newly submitted listing.
pub struct NewListing {
    /// Submitting user
    pub owner_id: i32,
    /// Optional category
    pub category_id: Option<i32>,
    /// Display name
    pub name: String,
    /// Normalized website URL
    pub url: String,
    /// Unique slug derived from the name
    pub slug: String,
    /// Plain text description
    pub description: String,
    /// Comma-joined tags
    pub tags: String,
}

/// Owner-editable fields of a listing.
pub struct ListingContent {
    /// Optional category
    pub category_id: Option<i32>,
    /// Display name
    pub name: String,
    /// Normalized website URL
    pub url: String,
    /// Plain text description
    pub description: String,
    /// Comma-joined tags
    pub tags: String,
}

/// Filters for the public listing index.
#[derive(Default)]
pub struct PublicListingFilter {
    /// Only listings in this category
    pub category_id: Option<i32>,
    /// Case-insensitive match against name, description and tags
    pub search: Option<String>,
    /// Result order
    pub sort: ListingSort,
}

/// Billing-derived listing fields.
pub struct PlanUpdate {
    /// Plan the listing is on
    pub plan: ListingPlan,
    /// Whether the listing is pinned to the top
    pub featured: bool,
    /// End of public visibility, never when `None`
    pub visible_until: Option<NaiveDateTime>,
    /// Whether to reset the sent expiry reminder
    pub clear_reminder: bool,
}

/// Persistence for listings.
pub struct ListingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// Condition matching publicly visible listings at `now`.
fn visible_at(now: NaiveDateTime) -> Condition {
    Condition::all()
        .add(entity::listing::Column::Status.eq(ListingStatus::Approved))
        .add(
            Condition::any()
                .add(entity::listing::Column::VisibleUntil.is_null())
                .add(entity::listing::Column::VisibleUntil.gt(now)),
        )
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn sorted(
    query: Select<entity::listing::Entity>,
    sort: ListingSort,
) -> Select<entity::listing::Entity> {
    match sort {
        ListingSort::Featured => query
            .order_by_desc(entity::listing::Column::Featured)
            .order_by_desc(entity::listing::Column::ApprovedAt)
            .order_by_desc(entity::listing::Column::Id),
        ListingSort::Newest => query
            .order_by_desc(entity::listing::Column::ApprovedAt)
            .order_by_desc(entity::listing::Column::Id),
        ListingSort::Name => query
            .order_by_asc(entity::listing::Column::Name)
            .order_by_asc(entity::listing::Column::Id),
    }
}

impl<'a, C: ConnectionTrait> ListingRepository<'a, C> {
    /// Creates a new instance of [`ListingRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a pending listing on the free plan
    pub async fn create(&self, listing: NewListing) -> Result<entity::listing::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let listing = entity::listing::ActiveModel {
            owner_id: ActiveValue::Set(listing.owner_id),
            category_id: ActiveValue::Set(listing.category_id),
            name: ActiveValue::Set(listing.name),
            url: ActiveValue::Set(listing.url),
            slug: ActiveValue::Set(listing.slug),
            description: ActiveValue::Set(listing.description),
            tags: ActiveValue::Set(listing.tags),
            status: ActiveValue::Set(ListingStatus::Pending),
            plan: ActiveValue::Set(ListingPlan::Free),
            featured: ActiveValue::Set(false),
            visible_until: ActiveValue::Set(None),
            rejection_reason: ActiveValue::Set(None),
            approved_at: ActiveValue::Set(None),
            reminder_sent_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        listing.insert(self.db).await
    }

    /// Listing by ID.
    pub async fn find_by_id(&self, listing_id: i32) -> Result<Option<entity::listing::Model>, DbErr> {
        entity::prelude::Listing::find_by_id(listing_id)
            .one(self.db)
            .await
    }

    /// Listing by slug, regardless of status.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<entity::listing::Model>, DbErr> {
        entity::prelude::Listing::find()
            .filter(entity::listing::Column::Slug.eq(slug))
            .one(self.db)
            .await
    }

    /// Listing by normalized URL, regardless of status.
    pub async fn find_by_url(&self, url: &str) -> Result<Option<entity::listing::Model>, DbErr> {
        entity::prelude::Listing::find()
            .filter(entity::listing::Column::Url.eq(url))
            .one(self.db)
            .await
    }

    /// Whether any listing already uses `slug`.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::Listing::find()
            .filter(entity::listing::Column::Slug.eq(slug))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Replaces the owner-editable fields and sends the listing back to moderation.
    ///
    /// Returns `Ok(None)` if the listing does not exist.
    pub async fn update_content(
        &self,
        listing_id: i32,
        content: ListingContent,
    ) -> Result<Option<entity::listing::Model>, DbErr> {
        let Some(listing) = self.find_by_id(listing_id).await? else {
            return Ok(None);
        };

        let mut listing_am = listing.into_active_model();
        listing_am.category_id = ActiveValue::Set(content.category_id);
        listing_am.name = ActiveValue::Set(content.name);
        listing_am.url = ActiveValue::Set(content.url);
        listing_am.description = ActiveValue::Set(content.description);
        listing_am.tags = ActiveValue::Set(content.tags);
        listing_am.status = ActiveValue::Set(ListingStatus::Pending);
        listing_am.rejection_reason = ActiveValue::Set(None);
        listing_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(listing_am.update(self.db).await?))
    }

    /// Marks a listing approved at `now` with the given visibility end.
    ///
    /// A changed visibility end clears `reminder_sent_at` so the owner is reminded again.
    pub async fn approve(
        &self,
        listing: entity::listing::Model,
        now: NaiveDateTime,
        visible_until: Option<NaiveDateTime>,
    ) -> Result<entity::listing::Model, DbErr> {
        let visibility_moved = listing.visible_until != visible_until;

        let mut listing_am = listing.into_active_model();
        if visibility_moved {
            listing_am.reminder_sent_at = ActiveValue::Set(None);
        }
        listing_am.status = ActiveValue::Set(ListingStatus::Approved);
        listing_am.approved_at = ActiveValue::Set(Some(now));
        listing_am.rejection_reason = ActiveValue::Set(None);
        listing_am.visible_until = ActiveValue::Set(visible_until);
        listing_am.updated_at = ActiveValue::Set(now);

        listing_am.update(self.db).await
    }

    /// Marks the listing rejected with a reason shown to the owner.
    pub async fn reject(
        &self,
        listing: entity::listing::Model,
        reason: &str,
    ) -> Result<entity::listing::Model, DbErr> {
        let mut listing_am = listing.into_active_model();
        listing_am.status = ActiveValue::Set(ListingStatus::Rejected);
        listing_am.rejection_reason = ActiveValue::Set(Some(reason.to_string()));
        listing_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        listing_am.update(self.db).await
    }

    /// Applies billing-derived plan, featured flag and visibility.
    ///
    /// Returns `Ok(None)` if the listing does not exist.
    pub async fn apply_plan(
        &self,
        listing_id: i32,
        update: PlanUpdate,
    ) -> Result<Option<entity::listing::Model>, DbErr> {
        let Some(listing) = self.find_by_id(listing_id).await? else {
            return Ok(None);
        };

        let mut listing_am = listing.into_active_model();
        listing_am.plan = ActiveValue::Set(update.plan);
        listing_am.featured = ActiveValue::Set(update.featured);
        listing_am.visible_until = ActiveValue::Set(update.visible_until);
        if update.clear_reminder {
            listing_am.reminder_sent_at = ActiveValue::Set(None);
        }
        listing_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(listing_am.update(self.db).await?))
    }

    /// Records that the expiry reminder for the current visibility window was sent.
    pub async fn mark_reminder_sent(
        &self,
        listing: entity::listing::Model,
        now: NaiveDateTime,
    ) -> Result<entity::listing::Model, DbErr> {
        let mut listing_am = listing.into_active_model();
        listing_am.reminder_sent_at = ActiveValue::Set(Some(now));

        listing_am.update(self.db).await
    }

    /// Deletes a listing
    ///
    /// Returns OK regardless of the listing existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, listing_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Listing::delete_by_id(listing_id)
            .exec(self.db)
            .await
    }

    /// Every listing owned by a profile, newest first
    pub async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<entity::listing::Model>, DbErr> {
        entity::prelude::Listing::find()
            .filter(entity::listing::Column::OwnerId.eq(owner_id))
            .order_by_desc(entity::listing::Column::CreatedAt)
            .order_by_desc(entity::listing::Column::Id)
            .all(self.db)
            .await
    }

    /// Page of listings in `status`, oldest first, with the total count.
    pub async fn list_by_status(
        &self,
        status: ListingStatus,
        page_index: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::listing::Model>, u64), DbErr> {
        let paginator = entity::prelude::Listing::find()
            .filter(entity::listing::Column::Status.eq(status))
            .order_by_asc(entity::listing::Column::CreatedAt)
            .order_by_asc(entity::listing::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let listings = paginator.fetch_page(page_index).await?;

        Ok((listings, total))
    }

    /// Page of listings visible at `now` matching `filter`, with the total count.
    pub async fn list_public(
        &self,
        filter: PublicListingFilter,
        now: NaiveDateTime,
        page_index: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::listing::Model>, u64), DbErr> {
        let mut condition = visible_at(now);

        if let Some(category_id) = filter.category_id {
            condition = condition.add(entity::listing::Column::CategoryId.eq(category_id));
        }

        if let Some(search) = filter.search {
            let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
            condition = condition.add(
                Condition::any()
                    .add(
                        Func::lower(Expr::col(entity::listing::Column::Name))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Func::lower(Expr::col(entity::listing::Column::Description))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }

        let query = entity::prelude::Listing::find().filter(condition);
        let paginator = sorted(query, filter.sort).paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let listings = paginator.fetch_page(page_index).await?;

        Ok((listings, total))
    }

    /// Listings visible at `now`, most recently approved first.
    pub async fn list_visible(
        &self,
        now: NaiveDateTime,
        limit: Option<u64>,
    ) -> Result<Vec<entity::listing::Model>, DbErr> {
        let mut query = sorted(
            entity::prelude::Listing::find().filter(visible_at(now)),
            ListingSort::Newest,
        );

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.all(self.db).await
    }

    /// Approved listings whose visibility ends in `(now, until]` and whose owner has not
    /// been reminded yet.
    pub async fn list_due_reminders(
        &self,
        now: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<entity::listing::Model>, DbErr> {
        entity::prelude::Listing::find()
            .filter(entity::listing::Column::Status.eq(ListingStatus::Approved))
            .filter(entity::listing::Column::ReminderSentAt.is_null())
            .filter(entity::listing::Column::VisibleUntil.gt(now))
            .filter(entity::listing::Column::VisibleUntil.lte(until))
            .order_by_asc(entity::listing::Column::VisibleUntil)
            .all(self.db)
            .await
    }
}
