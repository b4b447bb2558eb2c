//! Category bodies.

use serde::{Deserialize, Serialize};

/// A category listings can be filed under
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryDto {
    /// Category ID
    pub id: i32,
    /// URL slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Optional blurb
    pub description: Option<String>,
}

/// Body for creating or updating a category
///
/// When `slug` is omitted it is derived from `name`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryInputDto {
    /// URL slug
    pub slug: Option<String>,
    /// Display name
    pub name: String,
    /// Optional blurb
    pub description: Option<String>,
}
