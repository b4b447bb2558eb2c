//! User bodies.

use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::AdminLevel;
use serde::{Deserialize, Serialize};

/// Moderation permission tier of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminLevelDto {
    /// Regular user
    None,
    /// Moderates listings
    Basic,
    /// Also manages categories and admin levels
    Super,
}

impl From<AdminLevel> for AdminLevelDto {
    fn from(level: AdminLevel) -> Self {
        match level {
            AdminLevel::None => Self::None,
            AdminLevel::Basic => Self::Basic,
            AdminLevel::Super => Self::Super,
        }
    }
}

impl From<AdminLevelDto> for AdminLevel {
    fn from(level: AdminLevelDto) -> Self {
        match level {
            AdminLevelDto::None => Self::None,
            AdminLevelDto::Basic => Self::Basic,
            AdminLevelDto::Super => Self::Super,
        }
    }
}

/// A user as shown to admins
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserDto {
    /// Profile ID
    pub id: i32,
    /// Login email
    pub email: String,
    /// Name shown instead of the email, if set
    pub display_name: Option<String>,
    /// Moderation permission tier
    pub admin_level: AdminLevelDto,
    /// First login
    pub created_at: NaiveDateTime,
}

/// Body for changing a user's admin level
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SetAdminLevelDto {
    /// New admin level
    pub admin_level: AdminLevelDto,
}
