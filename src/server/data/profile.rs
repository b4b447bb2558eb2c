//! Profile persistence.

use chrono::Utc;
use entity::sea_orm_active_enums::AdminLevel;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

/// Persistence for user profiles.
pub struct ProfileRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProfileRepository<'a, C> {
    /// Creates a new instance of [`ProfileRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a profile for a first-time login.
    pub async fn create(
        &self,
        auth_subject: &str,
        email: &str,
        admin_level: AdminLevel,
    ) -> Result<entity::profile::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let profile = entity::profile::ActiveModel {
            auth_subject: ActiveValue::Set(auth_subject.to_string()),
            email: ActiveValue::Set(email.to_string()),
            display_name: ActiveValue::Set(None),
            admin_level: ActiveValue::Set(admin_level),
            stripe_customer_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        profile.insert(self.db).await
    }

    /// Profile by ID.
    pub async fn find_by_id(&self, profile_id: i32) -> Result<Option<entity::profile::Model>, DbErr> {
        entity::prelude::Profile::find_by_id(profile_id)
            .one(self.db)
            .await
    }

    /// Profile by auth provider subject.
    pub async fn find_by_subject(
        &self,
        auth_subject: &str,
    ) -> Result<Option<entity::profile::Model>, DbErr> {
        entity::prelude::Profile::find()
            .filter(entity::profile::Column::AuthSubject.eq(auth_subject))
            .one(self.db)
            .await
    }

    /// Profile by payment customer ID.
    pub async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<entity::profile::Model>, DbErr> {
        entity::prelude::Profile::find()
            .filter(entity::profile::Column::StripeCustomerId.eq(customer_id))
            .one(self.db)
            .await
    }

    /// Updates email and admin level from a fresh login.
    pub async fn update_login(
        &self,
        profile: entity::profile::Model,
        email: &str,
        admin_level: AdminLevel,
    ) -> Result<entity::profile::Model, DbErr> {
        let mut profile_am = profile.into_active_model();
        profile_am.email = ActiveValue::Set(email.to_string());
        profile_am.admin_level = ActiveValue::Set(admin_level);
        profile_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        profile_am.update(self.db).await
    }

    /// Returns `Ok(None)` if the profile does not exist.
    pub async fn set_admin_level(
        &self,
        profile_id: i32,
        admin_level: AdminLevel,
    ) -> Result<Option<entity::profile::Model>, DbErr> {
        let Some(profile) = self.find_by_id(profile_id).await? else {
            return Ok(None);
        };

        let mut profile_am = profile.into_active_model();
        profile_am.admin_level = ActiveValue::Set(admin_level);
        profile_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(profile_am.update(self.db).await?))
    }

    /// Returns `Ok(None)` if the profile does not exist.
    pub async fn set_stripe_customer_id(
        &self,
        profile_id: i32,
        customer_id: &str,
    ) -> Result<Option<entity::profile::Model>, DbErr> {
        let Some(profile) = self.find_by_id(profile_id).await? else {
            return Ok(None);
        };

        let mut profile_am = profile.into_active_model();
        profile_am.stripe_customer_id = ActiveValue::Set(Some(customer_id.to_string()));
        profile_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(profile_am.update(self.db).await?))
    }

    /// Page of profiles ordered by ID, with the total profile count.
    pub async fn list(
        &self,
        page_index: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::profile::Model>, u64), DbErr> {
        let paginator = entity::prelude::Profile::find()
            .order_by_asc(entity::profile::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let profiles = paginator.fetch_page(page_index).await?;

        Ok((profiles, total))
    }
}
