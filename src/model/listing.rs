//! Listing bodies and query parameters.

use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};
use serde::{Deserialize, Serialize};

/// Moderation status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatusDto {
    /// Awaiting moderation
    Pending,
    /// Public while visible
    Approved,
    /// Rejected with a reason
    Rejected,
}

impl From<ListingStatus> for ListingStatusDto {
    fn from(status: ListingStatus) -> Self {
        match status {
            ListingStatus::Pending => Self::Pending,
            ListingStatus::Approved => Self::Approved,
            ListingStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ListingStatusDto> for ListingStatus {
    fn from(status: ListingStatusDto) -> Self {
        match status {
            ListingStatusDto::Pending => Self::Pending,
            ListingStatusDto::Approved => Self::Approved,
            ListingStatusDto::Rejected => Self::Rejected,
        }
    }
}

/// Plan a listing is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingPlanDto {
    /// Free plan, visible for a configured number of days
    Free,
    /// Paid plan
    Pro,
    /// Paid plan, also featured
    Sponsor,
}

impl From<ListingPlan> for ListingPlanDto {
    fn from(plan: ListingPlan) -> Self {
        match plan {
            ListingPlan::Free => Self::Free,
            ListingPlan::Pro => Self::Pro,
            ListingPlan::Sponsor => Self::Sponsor,
        }
    }
}

impl From<ListingPlanDto> for ListingPlan {
    fn from(plan: ListingPlanDto) -> Self {
        match plan {
            ListingPlanDto::Free => Self::Free,
            ListingPlanDto::Pro => Self::Pro,
            ListingPlanDto::Sponsor => Self::Sponsor,
        }
    }
}

/// Listing as shown to the public
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListingDto {
    /// Listing ID
    pub id: i32,
    /// URL slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Website URL
    pub url: String,
    /// Plain text description
    pub description: String,
    /// Lowercased tags
    pub tags: Vec<String>,
    /// Category slug
    pub category: Option<String>,
    /// Plan the listing is on
    pub plan: ListingPlanDto,
    /// Pinned to the top of the index
    pub featured: bool,
    /// First approval
    pub approved_at: Option<NaiveDateTime>,
}

/// Listing as shown to its owner and to admins
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ManagedListingDto {
    /// Listing ID
    pub id: i32,
    /// Profile ID of the owner
    pub owner_id: i32,
    /// URL slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Website URL
    pub url: String,
    /// Plain text description
    pub description: String,
    /// Lowercased tags
    pub tags: Vec<String>,
    /// Category slug
    pub category: Option<String>,
    /// Moderation status
    pub status: ListingStatusDto,
    /// Plan the listing is on
    pub plan: ListingPlanDto,
    /// Pinned to the top of the index
    pub featured: bool,
    /// End of public visibility, never when unset
    pub visible_until: Option<NaiveDateTime>,
    /// Reason given on rejection
    pub rejection_reason: Option<String>,
    /// First approval
    pub approved_at: Option<NaiveDateTime>,
    /// Submission time
    pub created_at: NaiveDateTime,
    /// Last change
    pub updated_at: NaiveDateTime,
}

/// Body for submitting or editing a listing
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListingInputDto {
    /// Display name
    pub name: String,
    /// Website URL
    pub url: String,
    /// Plain text description
    pub description: String,
    /// Category slug
    pub category: Option<String>,
    /// Tags, lowercased and de-duplicated on save
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Order of the public listing index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingSort {
    /// Featured listings first, then most recently approved
    #[default]
    Featured,
    /// Most recently approved
    Newest,
    /// Alphabetical by name
    Name,
}

/// Filters for the public listing index
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ListingQuery {
    /// 1-based page number
    pub page: Option<u64>,
    /// Entries per page
    pub per_page: Option<u64>,
    /// Category slug
    pub category: Option<String>,
    /// Case-insensitive search over name and description
    pub q: Option<String>,
    /// Result order
    #[serde(default)]
    pub sort: ListingSort,
}

/// Filters for the admin moderation queue
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct ModerationQuery {
    /// Only listings in this status, pending when unset
    pub status: Option<ListingStatusDto>,
    /// 1-based page number
    pub page: Option<u64>,
    /// Entries per page
    pub per_page: Option<u64>,
}

/// Body for rejecting a listing
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RejectListingDto {
    /// Reason shown to the owner
    pub reason: String,
}
