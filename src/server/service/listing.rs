//! Listing submission, editing and browsing.

use std::collections::HashMap;

use chrono::Utc;
use entity::sea_orm_active_enums::AdminLevel;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{
    model::{
        api::{PageDto, PageParams},
        listing::{ListingDto, ListingInputDto, ListingQuery, ManagedListingDto},
    },
    server::{
        data::{
            category::CategoryRepository,
            listing::{ListingContent, ListingRepository, NewListing, PublicListingFilter},
        },
        error::{listing::ListingError, Error},
        model::db::{ListingModel, ProfileModel},
        service::notification::Notifier,
        util::{
            slug::{numbered_slug, slugify},
            time::is_publicly_visible,
            url::normalize_url,
        },
    },
};

/// Minimum listing name length in characters.
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum listing name length in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Minimum description length in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 20;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Maximum number of tags per listing.
pub const MAX_TAGS: usize = 5;
/// Maximum tag length in characters.
pub const TAG_MAX_CHARS: usize = 30;

/// Listing input after validation and normalization.
struct ValidatedListing {
    category_id: Option<i32>,
    name: String,
    url: String,
    description: String,
    tags: Vec<String>,
}

/// Trims, lowercases and de-duplicates tags, dropping empty ones. Order is kept.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());

    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }

    normalized
}

/// Tags of a stored listing.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn char_count_between(value: &str, field: &str, min: usize, max: usize) -> Result<(), Error> {
    let count = value.chars().count();
    if count < min || count > max {
        return Err(ListingError::Validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        ))
        .into());
    }

    Ok(())
}

/// Public view of a listing.
pub fn to_listing_dto(listing: ListingModel, category: Option<String>) -> ListingDto {
    ListingDto {
        id: listing.id,
        tags: split_tags(&listing.tags),
        slug: listing.slug,
        name: listing.name,
        url: listing.url,
        description: listing.description,
        category,
        plan: listing.plan.into(),
        featured: listing.featured,
        approved_at: listing.approved_at,
    }
}

/// Owner view of a listing, including moderation state.
pub fn to_managed_listing_dto(listing: ListingModel, category: Option<String>) -> ManagedListingDto {
    ManagedListingDto {
        id: listing.id,
        owner_id: listing.owner_id,
        tags: split_tags(&listing.tags),
        slug: listing.slug,
        name: listing.name,
        url: listing.url,
        description: listing.description,
        category,
        status: listing.status.into(),
        plan: listing.plan.into(),
        featured: listing.featured,
        visible_until: listing.visible_until,
        rejection_reason: listing.rejection_reason,
        approved_at: listing.approved_at,
        created_at: listing.created_at,
        updated_at: listing.updated_at,
    }
}

/// Category slugs keyed by category ID.
pub async fn category_slugs(db: &DatabaseConnection) -> Result<HashMap<i32, String>, Error> {
    let categories = CategoryRepository::new(db).list().await?;

    Ok(categories
        .into_iter()
        .map(|category| (category.id, category.slug))
        .collect())
}

fn slug_of(slugs: &HashMap<i32, String>, category_id: Option<i32>) -> Option<String> {
    category_id.and_then(|id| slugs.get(&id).cloned())
}

/// Inserts that lose a slug race to a concurrent submission are retried this many times.
const SLUG_ATTEMPTS: u32 = 3;

/// Unique column of the listing table named by a constraint violation.
#[derive(Debug, PartialEq, Eq)]
enum UniqueColumn {
    Slug,
    Url,
}

/// Both SQLite (`listing.slug`) and Postgres (`listing_slug_key`) name the column in the message.
fn violated_column(err: &DbErr) -> Option<UniqueColumn> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("slug") => {
            Some(UniqueColumn::Slug)
        }
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("url") => {
            Some(UniqueColumn::Url)
        }
        _ => None,
    }
}

fn map_unique_violation(err: DbErr) -> Error {
    match violated_column(&err) {
        Some(UniqueColumn::Url) => ListingError::DuplicateUrl.into(),
        _ => err.into(),
    }
}

/// Listing submission, editing and public browsing.
pub struct ListingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ListingService<'a> {
    /// Creates a new instance of [`ListingService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Page of publicly visible listings.
    ///
    /// An unknown category slug yields an empty page rather than an error.
    pub async fn list_public(&self, query: ListingQuery) -> Result<PageDto<ListingDto>, Error> {
        let params = PageParams {
            page: query.page,
            per_page: query.per_page,
        };
        let page_index = params.page_index();
        let per_page = params.per_page();

        let category_id = match query.category.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => {
                match CategoryRepository::new(self.db).find_by_slug(slug).await? {
                    Some(category) => Some(category.id),
                    None => return Ok(PageDto::new(Vec::new(), page_index, per_page, 0)),
                }
            }
            _ => None,
        };

        let search = query
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let filter = PublicListingFilter {
            category_id,
            search,
            sort: query.sort,
        };

        let (listings, total) = ListingRepository::new(self.db)
            .list_public(filter, Utc::now().naive_utc(), page_index, per_page)
            .await?;

        let slugs = category_slugs(self.db).await?;

        Ok(
            PageDto::new(listings, page_index, per_page, total).map(|listing| {
                let category = slug_of(&slugs, listing.category_id);
                to_listing_dto(listing, category)
            }),
        )
    }

    /// A publicly visible listing by slug.
    ///
    /// # Returns
    /// - `Ok(ListingDto)` - Listing is visible
    /// - `Err(Error::ListingError(ListingError::NotFound))` - Listing missing or not visible
    pub async fn get_public(&self, slug: &str) -> Result<ListingDto, Error> {
        let listing = ListingRepository::new(self.db)
            .find_by_slug(slug)
            .await?
            .filter(|listing| is_publicly_visible(listing, Utc::now().naive_utc()))
            .ok_or(ListingError::NotFound)?;

        let category = match listing.category_id {
            Some(category_id) => CategoryRepository::new(self.db)
                .find_by_id(category_id)
                .await?
                .map(|category| category.slug),
            None => None,
        };

        Ok(to_listing_dto(listing, category))
    }

    /// Submits a new listing for moderation and notifies the owner and admin.
    ///
    /// # Returns
    /// - `Ok(ManagedListingDto)` - Pending listing
    /// - `Err(Error::ListingError(ListingError::Validation))` - Input is invalid
    /// - `Err(Error::ListingError(ListingError::CategoryNotFound))` - Category slug unknown
    /// - `Err(Error::ListingError(ListingError::DuplicateUrl))` - URL already listed
    pub async fn submit(
        &self,
        owner: &ProfileModel,
        input: ListingInputDto,
        notifier: &Notifier<'_>,
    ) -> Result<ManagedListingDto, Error> {
        let input = self.validate(input).await?;
        let listing_repo = ListingRepository::new(self.db);

        if listing_repo.find_by_url(&input.url).await?.is_some() {
            return Err(ListingError::DuplicateUrl.into());
        }

        let tags = input.tags.join(",");
        let mut attempt = 1;
        let listing = loop {
            let slug = self.unique_slug(&input.name).await?;

            let created = listing_repo
                .create(NewListing {
                    owner_id: owner.id,
                    category_id: input.category_id,
                    name: input.name.clone(),
                    url: input.url.clone(),
                    slug: slug.clone(),
                    description: input.description.clone(),
                    tags: tags.clone(),
                })
                .await;

            match created {
                Ok(listing) => break listing,
                Err(err)
                    if attempt < SLUG_ATTEMPTS
                        && violated_column(&err) == Some(UniqueColumn::Slug) =>
                {
                    tracing::debug!(slug = %slug, "Slug taken by a concurrent submission, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(map_unique_violation(err)),
            }
        };

        tracing::info!(
            user_id = %owner.id,
            listing_id = %listing.id,
            "Listing submitted for moderation"
        );

        notifier.submission_received(owner, &listing).await;
        notifier.new_submission(owner, &listing).await;

        let category = self.category_slug(listing.category_id).await?;

        Ok(to_managed_listing_dto(listing, category))
    }

    /// Every listing owned by `owner`, newest first.
    pub async fn list_own(&self, owner: &ProfileModel) -> Result<Vec<ManagedListingDto>, Error> {
        let listings = ListingRepository::new(self.db)
            .list_by_owner(owner.id)
            .await?;
        let slugs = category_slugs(self.db).await?;

        Ok(listings
            .into_iter()
            .map(|listing| {
                let category = slug_of(&slugs, listing.category_id);
                to_managed_listing_dto(listing, category)
            })
            .collect())
    }

    /// Replaces a listing's content on behalf of its owner and resubmits it for moderation.
    ///
    /// # Returns
    /// - `Ok(ManagedListingDto)` - Updated pending listing
    /// - `Err(Error::ListingError(ListingError::NotFound))` - Listing does not exist
    /// - `Err(Error::ListingError(ListingError::NotOwner))` - User does not own the listing
    /// - `Err(Error::ListingError(_))` - Input is invalid or the URL is taken
    pub async fn update(
        &self,
        user: &ProfileModel,
        listing_id: i32,
        input: ListingInputDto,
    ) -> Result<ManagedListingDto, Error> {
        let listing_repo = ListingRepository::new(self.db);

        let listing = listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or(ListingError::NotFound)?;

        if listing.owner_id != user.id {
            return Err(ListingError::NotOwner {
                user_id: user.id,
                listing_id,
            }
            .into());
        }

        let input = self.validate(input).await?;

        if let Some(existing) = listing_repo.find_by_url(&input.url).await? {
            if existing.id != listing.id {
                return Err(ListingError::DuplicateUrl.into());
            }
        }

        let listing = listing_repo
            .update_content(
                listing_id,
                ListingContent {
                    category_id: input.category_id,
                    name: input.name,
                    url: input.url,
                    description: input.description,
                    tags: input.tags.join(","),
                },
            )
            .await
            .map_err(map_unique_violation)?
            .ok_or(ListingError::NotFound)?;

        tracing::info!(
            user_id = %user.id,
            listing_id = %listing.id,
            "Listing edited and returned to moderation"
        );

        let category = self.category_slug(listing.category_id).await?;

        Ok(to_managed_listing_dto(listing, category))
    }

    /// Deletes a listing owned by `user`, or any listing when `user` is a super admin.
    pub async fn delete(&self, user: &ProfileModel, listing_id: i32) -> Result<(), Error> {
        let listing_repo = ListingRepository::new(self.db);

        let listing = listing_repo
            .find_by_id(listing_id)
            .await?
            .ok_or(ListingError::NotFound)?;

        if listing.owner_id != user.id && user.admin_level < AdminLevel::Super {
            return Err(ListingError::NotOwner {
                user_id: user.id,
                listing_id,
            }
            .into());
        }

        listing_repo.delete(listing_id).await?;

        tracing::info!(user_id = %user.id, listing_id = %listing_id, "Deleted listing");

        Ok(())
    }

    async fn validate(&self, input: ListingInputDto) -> Result<ValidatedListing, Error> {
        let name = input.name.trim().to_string();
        char_count_between(&name, "Name", NAME_MIN_CHARS, NAME_MAX_CHARS)?;

        let url = normalize_url(&input.url).map_err(ListingError::Validation)?;

        let description = input.description.trim().to_string();
        char_count_between(
            &description,
            "Description",
            DESCRIPTION_MIN_CHARS,
            DESCRIPTION_MAX_CHARS,
        )?;

        let tags = normalize_tags(&input.tags);
        if tags.len() > MAX_TAGS {
            return Err(
                ListingError::Validation(format!("At most {} tags are allowed", MAX_TAGS)).into(),
            );
        }
        if tags.iter().any(|tag| tag.chars().count() > TAG_MAX_CHARS) {
            return Err(ListingError::Validation(format!(
                "Tags must be at most {} characters",
                TAG_MAX_CHARS
            ))
            .into());
        }

        let category_id = match input.category.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => Some(
                CategoryRepository::new(self.db)
                    .find_by_slug(slug)
                    .await?
                    .ok_or(ListingError::CategoryNotFound)?
                    .id,
            ),
            _ => None,
        };

        Ok(ValidatedListing {
            category_id,
            name,
            url,
            description,
            tags,
        })
    }

    /// First free slug among `base`, `base-2`, `base-3`, ...
    async fn unique_slug(&self, name: &str) -> Result<String, Error> {
        let base = slugify(name);
        let listing_repo = ListingRepository::new(self.db);

        let mut attempt = 1;
        loop {
            let candidate = numbered_slug(&base, attempt);
            if !listing_repo.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }

    async fn category_slug(&self, category_id: Option<i32>) -> Result<Option<String>, Error> {
        let Some(category_id) = category_id else {
            return Ok(None);
        };

        Ok(CategoryRepository::new(self.db)
            .find_by_id(category_id)
            .await?
            .map(|category| category.slug))
    }
}
