//! Public page paths shared by emails and feeds.

/// Path of a listing's public page.
pub fn listing_path(slug: &str) -> String {
    format!("/listing/{}", slug)
}

/// Path of a category's public page.
pub fn category_path(slug: &str) -> String {
    format!("/category/{}", slug)
}
