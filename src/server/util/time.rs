//! Listing visibility time calculations.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::server::{
    config::{MAX_FREE_LISTING_DAYS, MAX_REMINDER_DAYS},
    error::Error,
    model::db::ListingModel,
};

/// Visibility end for a free listing approved or downgraded at `now`.
///
/// `None` when free listings never expire. Day counts are clamped to
/// `0..=MAX_FREE_LISTING_DAYS`.
pub fn free_visible_until(
    now: DateTime<Utc>,
    free_listing_days: Option<i64>,
) -> Option<NaiveDateTime> {
    free_listing_days
        .map(|days| (now + Duration::days(days.clamp(0, MAX_FREE_LISTING_DAYS))).naive_utc())
}

/// End of the expiry reminder window opening at `now`.
///
/// Day counts are clamped to `0..=MAX_REMINDER_DAYS`.
pub fn reminder_window_end(now: NaiveDateTime, reminder_days: i64) -> NaiveDateTime {
    now + Duration::days(reminder_days.clamp(0, MAX_REMINDER_DAYS))
}

/// Whether `listing` is publicly visible at `now`.
pub fn is_publicly_visible(listing: &ListingModel, now: NaiveDateTime) -> bool {
    listing.status == entity::sea_orm_active_enums::ListingStatus::Approved
        && listing.visible_until.map_or(true, |until| until > now)
}

/// Converts a vendor unix timestamp into a naive UTC datetime.
pub fn from_unix(timestamp: i64) -> Result<NaiveDateTime, Error> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|datetime| datetime.naive_utc())
        .ok_or_else(|| Error::ParseError(format!("Unix timestamp {} is out of range", timestamp)))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use entity::sea_orm_active_enums::{ListingPlan, ListingStatus};

    use super::*;

    fn listing(status: ListingStatus, visible_until: Option<NaiveDateTime>) -> ListingModel {
        let now = Utc::now().naive_utc();
        ListingModel {
            id: 1,
            owner_id: 1,
            category_id: None,
            name: "Example".to_string(),
            url: "https://example.com/".to_string(),
            slug: "example".to_string(),
            description: "An example listing used in tests.".to_string(),
            tags: String::new(),
            status,
            plan: ListingPlan::Free,
            featured: false,
            visible_until,
            approved_at: None,
            reminder_sent_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn free_listings_without_limit_never_expire() {
        assert_eq!(free_visible_until(Utc::now(), None), None);
    }

    #[test]
    fn clamps_oversized_day_counts() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

        assert_eq!(
            free_visible_until(now, Some(200_000_000)),
            free_visible_until(now, Some(MAX_FREE_LISTING_DAYS))
        );
        assert_eq!(
            reminder_window_end(now.naive_utc(), i64::MAX),
            reminder_window_end(now.naive_utc(), MAX_REMINDER_DAYS)
        );
        assert_eq!(reminder_window_end(now.naive_utc(), -5), now.naive_utc());
    }

    #[test]
    fn free_listings_expire_after_configured_days() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 1, 31, 12, 0, 0).unwrap().naive_utc();

        assert_eq!(free_visible_until(now, Some(30)), Some(expected));
    }

    #[test]
    fn visibility_requires_approval_and_future_expiry() {
        let now = Utc::now().naive_utc();

        assert!(is_publicly_visible(&listing(ListingStatus::Approved, None), now));
        assert!(is_publicly_visible(
            &listing(ListingStatus::Approved, Some(now + Duration::days(1))),
            now
        ));
        assert!(!is_publicly_visible(
            &listing(ListingStatus::Approved, Some(now - Duration::days(1))),
            now
        ));
        assert!(!is_publicly_visible(&listing(ListingStatus::Pending, None), now));
        assert!(!is_publicly_visible(&listing(ListingStatus::Rejected, None), now));
    }

    #[test]
    fn converts_unix_timestamps() {
        let expected = Utc.with_ymd_and_hms(2030, 3, 17, 17, 46, 40).unwrap().naive_utc();

        assert_eq!(from_unix(1_900_000_000).unwrap(), expected);
        assert!(from_unix(i64::MAX).is_err());
    }
}
