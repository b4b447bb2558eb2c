use sea_orm::entity::prelude::*;

/// Tiered moderation permission stored per profile.
///
/// Variants are declared lowest to highest so the derived ordering can be used
/// for permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AdminLevel {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "basic")]
    Basic,
    #[sea_orm(string_value = "super")]
    Super,
}

impl AdminLevel {
    /// Whether this level grants everything `required` does.
    pub fn permits(self, required: AdminLevel) -> bool {
        self >= required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ListingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ListingPlan {
    #[sea_orm(string_value = "free")]
    Free,
    #[sea_orm(string_value = "pro")]
    Pro,
    #[sea_orm(string_value = "sponsor")]
    Sponsor,
}
