//! User administration.

use entity::sea_orm_active_enums::AdminLevel;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::{PageDto, PageParams},
        user::UserDto,
    },
    server::{
        data::profile::ProfileRepository,
        error::{auth::AuthError, Error},
        model::db::ProfileModel,
        service::retry::RetryContext,
    },
};

impl From<ProfileModel> for UserDto {
    fn from(profile: ProfileModel) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            display_name: profile.display_name,
            admin_level: profile.admin_level.into(),
            created_at: profile.created_at,
        }
    }
}

/// Service for user accounts and admin levels.
pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of UserService.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Retrieves a user's profile, retrying transient database failures.
    ///
    /// # Returns
    /// - `Ok(Some(ProfileModel))` - User found
    /// - `Ok(None)` - User not found in database
    /// - `Err(Error::DbErr)` - Database operation failed after retries
    pub async fn get_user(&self, user_id: i32) -> Result<Option<ProfileModel>, Error> {
        let mut ctx: RetryContext<()> = RetryContext::new();

        let db = self.db.clone();

        ctx.execute_with_retry(&format!("get user ID {}", user_id), |_| {
            let db = db.clone();

            Box::pin(async move { Ok(ProfileRepository::new(&db).find_by_id(user_id).await?) })
        })
        .await
    }

    /// Page of users ordered by ID.
    pub async fn list_users(&self, params: &PageParams) -> Result<PageDto<UserDto>, Error> {
        let page_index = params.page_index();
        let per_page = params.per_page();

        let (profiles, total) = ProfileRepository::new(self.db)
            .list(page_index, per_page)
            .await?;

        Ok(PageDto::new(profiles, page_index, per_page, total).map(UserDto::from))
    }

    /// Changes a user's admin level on behalf of a super admin.
    ///
    /// # Returns
    /// - `Ok(UserDto)` - Updated user
    /// - `Err(Error::AuthError(AuthError::InsufficientPermissions))` - Actor is not a super admin
    /// - `Err(Error::AuthError(AuthError::SelfAdminLevelChange))` - Actor targeted themselves
    /// - `Err(Error::AuthError(AuthError::UserNotInDatabase))` - Target does not exist
    pub async fn set_admin_level(
        &self,
        actor: &ProfileModel,
        target_id: i32,
        admin_level: AdminLevel,
    ) -> Result<UserDto, Error> {
        if actor.admin_level < AdminLevel::Super {
            return Err(AuthError::InsufficientPermissions {
                user_id: actor.id,
                required: "super".to_string(),
            }
            .into());
        }

        if actor.id == target_id {
            return Err(AuthError::SelfAdminLevelChange(actor.id).into());
        }

        let profile = ProfileRepository::new(self.db)
            .set_admin_level(target_id, admin_level)
            .await?
            .ok_or(AuthError::UserNotInDatabase(target_id))?;

        tracing::info!(
            actor_id = %actor.id,
            target_id = %target_id,
            "Changed admin level to {:?}",
            admin_level
        );

        Ok(profile.into())
    }
}
