//! Category management.

use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{
    model::category::{CategoryDto, CategoryInputDto},
    server::{
        data::category::CategoryRepository,
        error::{listing::ListingError, Error},
        model::db::CategoryModel,
        util::slug::slugify,
    },
};

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX_CHARS: usize = 60;

impl From<CategoryModel> for CategoryDto {
    fn from(category: CategoryModel) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            name: category.name,
            description: category.description,
        }
    }
}

/// Validated `(slug, name, description)` of a category input.
fn validate(input: CategoryInputDto) -> Result<(String, String, Option<String>), Error> {
    let name = input.name.trim().to_string();
    let name_chars = name.chars().count();
    if name_chars == 0 || name_chars > CATEGORY_NAME_MAX_CHARS {
        return Err(ListingError::Validation(format!(
            "Category name must be between 1 and {} characters",
            CATEGORY_NAME_MAX_CHARS
        ))
        .into());
    }

    let slug = match input.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slugify(slug),
        _ => slugify(&name),
    };

    let description = input
        .description
        .map(|description| description.trim().to_string())
        .filter(|description| !description.is_empty());

    Ok((slug, name, description))
}

fn map_duplicate(err: DbErr, slug: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ListingError::DuplicateCategory(slug.to_string()).into()
        }
        _ => err.into(),
    }
}

/// Category listing and management.
pub struct CategoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CategoryService<'a> {
    /// Creates a new instance of [`CategoryService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All categories ordered by name.
    pub async fn list(&self) -> Result<Vec<CategoryDto>, Error> {
        let categories = CategoryRepository::new(self.db).list().await?;

        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    /// Creates a category, deriving the slug from the name when none is given.
    ///
    /// # Returns
    /// - `Ok(CategoryDto)` - Created category
    /// - `Err(Error::ListingError(ListingError::DuplicateCategory))` - Slug already in use
    /// - `Err(Error::ListingError(ListingError::Validation))` - Name is empty or too long
    pub async fn create(&self, input: CategoryInputDto) -> Result<CategoryDto, Error> {
        let (slug, name, description) = validate(input)?;
        let category_repo = CategoryRepository::new(self.db);

        if category_repo.find_by_slug(&slug).await?.is_some() {
            return Err(ListingError::DuplicateCategory(slug).into());
        }

        let category = category_repo
            .create(&slug, &name, description)
            .await
            .map_err(|e| map_duplicate(e, &slug))?;

        tracing::info!(category_id = %category.id, "Created category {:?}", category.slug);

        Ok(category.into())
    }

    /// Replaces a category's slug, name and description.
    ///
    /// # Returns
    /// - `Ok(CategoryDto)` - Updated category
    /// - `Err(Error::ListingError(ListingError::CategoryNotFound))` - Category does not exist
    /// - `Err(Error::ListingError(ListingError::DuplicateCategory))` - Slug used by another category
    pub async fn update(
        &self,
        category_id: i32,
        input: CategoryInputDto,
    ) -> Result<CategoryDto, Error> {
        let (slug, name, description) = validate(input)?;
        let category_repo = CategoryRepository::new(self.db);

        if let Some(existing) = category_repo.find_by_slug(&slug).await? {
            if existing.id != category_id {
                return Err(ListingError::DuplicateCategory(slug).into());
            }
        }

        let category = category_repo
            .update(category_id, &slug, &name, description)
            .await
            .map_err(|e| map_duplicate(e, &slug))?
            .ok_or(ListingError::CategoryNotFound)?;

        Ok(category.into())
    }

    /// Deletes a category, leaving its listings uncategorized.
    pub async fn delete(&self, category_id: i32) -> Result<(), Error> {
        let result = CategoryRepository::new(self.db).delete(category_id).await?;

        if result.rows_affected == 0 {
            return Err(ListingError::CategoryNotFound.into());
        }

        tracing::info!(category_id = %category_id, "Deleted category");

        Ok(())
    }
}
