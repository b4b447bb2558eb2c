//! Profile record fixtures.

use chrono::Utc;
use entity::sea_orm_active_enums::AdminLevel;
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn user<'a>(&'a mut self) -> UserFixtures<'a> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a mut TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Insert a profile without admin access.
    ///
    /// The auth subject is derived from the email so the same email always maps to
    /// the same subject.
    pub async fn insert_profile(
        &mut self,
        email: &str,
    ) -> Result<entity::profile::Model, TestError> {
        self.insert_profile_with_level(email, AdminLevel::None).await
    }

    /// Insert a profile with the provided admin level.
    pub async fn insert_profile_with_level(
        &mut self,
        email: &str,
        admin_level: AdminLevel,
    ) -> Result<entity::profile::Model, TestError> {
        let now = Utc::now().naive_utc();

        let profile = entity::profile::ActiveModel {
            auth_subject: ActiveValue::Set(subject_for_email(email)),
            email: ActiveValue::Set(email.to_string()),
            display_name: ActiveValue::Set(None),
            admin_level: ActiveValue::Set(admin_level),
            stripe_customer_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(profile.insert(&self.setup.db).await?)
    }

    /// Attach a payment customer ID to an existing profile.
    pub async fn set_stripe_customer(
        &mut self,
        profile_id: i32,
        customer_id: &str,
    ) -> Result<entity::profile::Model, TestError> {
        let profile = entity::prelude::Profile::find_by_id(profile_id)
            .one(&self.setup.db)
            .await?
            .ok_or_else(|| {
                sea_orm::DbErr::RecordNotFound(format!("profile {} not found", profile_id))
            })?;

        let mut profile_am = profile.into_active_model();
        profile_am.stripe_customer_id = ActiveValue::Set(Some(customer_id.to_string()));

        Ok(profile_am.update(&self.setup.db).await?)
    }
}

/// Auth subject used for profiles created from `email`.
pub fn subject_for_email(email: &str) -> String {
    format!("subject-{}", email)
}
