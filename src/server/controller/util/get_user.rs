//! Resolves the session user for handlers.

use entity::sea_orm_active_enums::AdminLevel;
use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::{app::AppState, db::ProfileModel, session::user::SessionUserId},
    service::user::UserService,
};

/// Retrieves the logged in user from session and then from database
///
/// # Returns
/// - `Ok(ProfileModel)`: User found
/// - `Err(Error::AuthError(AuthError::UserNotInSession))`: User ID not present in session
/// - `Err(Error::AuthError(AuthError::UserNotInDatabase))`: User ID exists in session but not
///   found in database (session is cleared)
/// - `Err(Error)`: Internal errors (database query failures, session errors, etc.)
pub async fn get_user_from_session(
    state: &AppState,
    session: &Session,
) -> Result<ProfileModel, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = UserService::new(&state.db).get_user(user_id).await? else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but was not found in database",
            user_id
        );

        return Err(Error::AuthError(AuthError::UserNotInDatabase(user_id)));
    };

    Ok(user)
}

/// Checks that `user` holds at least the `required` admin level.
pub fn require_admin(user: &ProfileModel, required: AdminLevel) -> Result<(), Error> {
    if user.admin_level.permits(required) {
        return Ok(());
    }

    Err(AuthError::InsufficientPermissions {
        user_id: user.id,
        required: format!("{:?}", required).to_lowercase(),
    }
    .into())
}

/// Retrieves the logged in user and checks their admin level.
pub async fn get_admin_from_session(
    state: &AppState,
    session: &Session,
    required: AdminLevel,
) -> Result<ProfileModel, Error> {
    let user = get_user_from_session(state, session).await?;
    require_admin(&user, required)?;

    Ok(user)
}
