//! OAuth2 callback handling.

use entity::sea_orm_active_enums::AdminLevel;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::profile::ProfileRepository,
    error::{auth::AuthError, Error},
    model::{app::SiteSettings, db::ProfileModel},
    provider::auth::AuthProvider,
};

/// Exchanges an authorization code and resolves the matching profile.
///
/// Creates the profile on first login and refreshes its email afterwards. Emails listed
/// as super admins are promoted to `super`; other levels are left as stored.
///
/// # Returns
/// - `Ok(ProfileModel)` - Profile of the logged in user
/// - `Err(Error::AuthError)` - Code exchange failed or token invalid or missing an email
/// - `Err(Error::DbErr)` - Database operation failed
pub async fn callback_service(
    db: &DatabaseConnection,
    auth: &AuthProvider,
    settings: &SiteSettings,
    code: &str,
) -> Result<ProfileModel, Error> {
    let claims = auth.exchange_code(code).await?;

    let email = claims
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AuthError::InvalidAccessToken("token has no email claim".to_string()))?;

    let is_super_admin = settings.is_super_admin_email(email);
    let profile_repo = ProfileRepository::new(db);

    match profile_repo.find_by_subject(&claims.sub).await? {
        None => {
            let admin_level = if is_super_admin {
                AdminLevel::Super
            } else {
                AdminLevel::None
            };

            let profile = profile_repo.create(&claims.sub, email, admin_level).await?;
            tracing::info!(user_id = %profile.id, "Created profile on first login");

            Ok(profile)
        }
        Some(profile) => {
            let admin_level = if is_super_admin {
                AdminLevel::Super
            } else {
                profile.admin_level
            };

            if profile.email == email && profile.admin_level == admin_level {
                return Ok(profile);
            }

            Ok(profile_repo.update_login(profile, email, admin_level).await?)
        }
    }
}
