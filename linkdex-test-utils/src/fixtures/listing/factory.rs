//! Active model factories with standard test values.
//!
//! These build unsaved active models; callers override the fields they care about
//! and insert them through the listing fixtures.

use chrono::Utc;
use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};
use sea_orm::ActiveValue;

/// Lowercased, dash separated form of `name` used for slugs and hostnames.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Category active model named after `slug`.
pub fn mock_category(slug: &str) -> entity::category::ActiveModel {
    let mut name = slug.replace('-', " ");
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    entity::category::ActiveModel {
        slug: ActiveValue::Set(slug.to_string()),
        name: ActiveValue::Set(name),
        description: ActiveValue::Set(Some(format!("Everything about {}", slug))),
        created_at: ActiveValue::Set(Utc::now().naive_utc()),
        ..Default::default()
    }
}

/// Pending free listing owned by `owner_id`.
///
/// URL and slug are derived from `name`, so names must be unique within a test.
pub fn mock_listing(owner_id: i32, name: &str) -> entity::listing::ActiveModel {
    let now = Utc::now().naive_utc();
    let slug = slugify(name);

    entity::listing::ActiveModel {
        owner_id: ActiveValue::Set(owner_id),
        category_id: ActiveValue::Set(None),
        name: ActiveValue::Set(name.to_string()),
        url: ActiveValue::Set(format!("https://{}.example.com/", slug)),
        slug: ActiveValue::Set(slug),
        description: ActiveValue::Set(format!("{} is a website used in tests.", name)),
        tags: ActiveValue::Set("testing".to_string()),
        status: ActiveValue::Set(ListingStatus::Pending),
        plan: ActiveValue::Set(ListingPlan::Free),
        featured: ActiveValue::Set(false),
        visible_until: ActiveValue::Set(None),
        rejection_reason: ActiveValue::Set(None),
        approved_at: ActiveValue::Set(None),
        reminder_sent_at: ActiveValue::Set(None),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
}
