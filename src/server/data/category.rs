//! Category persistence.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    DeleteResult, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

/// Persistence for categories.
pub struct CategoryRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CategoryRepository<'a, C> {
    /// Creates a new instance of [`CategoryRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a category.
    pub async fn create(
        &self,
        slug: &str,
        name: &str,
        description: Option<String>,
    ) -> Result<entity::category::Model, DbErr> {
        let category = entity::category::ActiveModel {
            slug: ActiveValue::Set(slug.to_string()),
            name: ActiveValue::Set(name.to_string()),
            description: ActiveValue::Set(description),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        category.insert(self.db).await
    }

    /// All categories ordered by name
    pub async fn list(&self) -> Result<Vec<entity::category::Model>, DbErr> {
        entity::prelude::Category::find()
            .order_by_asc(entity::category::Column::Name)
            .all(self.db)
            .await
    }

    /// Category by ID.
    pub async fn find_by_id(
        &self,
        category_id: i32,
    ) -> Result<Option<entity::category::Model>, DbErr> {
        entity::prelude::Category::find_by_id(category_id)
            .one(self.db)
            .await
    }

    /// Category by slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<entity::category::Model>, DbErr> {
        entity::prelude::Category::find()
            .filter(entity::category::Column::Slug.eq(slug))
            .one(self.db)
            .await
    }

    /// Returns `Ok(None)` if the category does not exist.
    pub async fn update(
        &self,
        category_id: i32,
        slug: &str,
        name: &str,
        description: Option<String>,
    ) -> Result<Option<entity::category::Model>, DbErr> {
        let Some(category) = self.find_by_id(category_id).await? else {
            return Ok(None);
        };

        let mut category_am = category.into_active_model();
        category_am.slug = ActiveValue::Set(slug.to_string());
        category_am.name = ActiveValue::Set(name.to_string());
        category_am.description = ActiveValue::Set(description);

        Ok(Some(category_am.update(self.db).await?))
    }

    /// Deletes a category after detaching its listings
    ///
    /// Returns OK regardless of the category existing, to confirm the deletion result
    /// check the [`DeleteResult::rows_affected`] field.
    pub async fn delete(&self, category_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Listing::update_many()
            .col_expr(
                entity::listing::Column::CategoryId,
                Expr::value(Option::<i32>::None),
            )
            .filter(entity::listing::Column::CategoryId.eq(category_id))
            .exec(self.db)
            .await?;

        entity::prelude::Category::delete_by_id(category_id)
            .exec(self.db)
            .await
    }
}
