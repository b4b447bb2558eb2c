//! Sitemap, RSS and llms.txt feeds.

use chrono::{NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{category::CategoryRepository, listing::ListingRepository},
    error::Error,
    model::app::SiteSettings,
    util::{
        escape::escape,
        i18n::{DEFAULT_LOCALE, SUPPORTED_LOCALES},
        path::{category_path, listing_path},
    },
};

/// Listings included in the RSS channel.
pub const RSS_ITEM_LIMIT: u64 = 50;

/// Localized static pages, relative to the locale prefix.
const STATIC_PAGES: [&str; 3] = ["", "submit", "pricing"];

const SITE_DESCRIPTION: &str = "A curated directory of websites, reviewed by hand.";

fn locale_path(locale: &str, page: &str) -> String {
    match (locale == DEFAULT_LOCALE, page.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", page),
        (false, true) => format!("/{}", locale),
        (false, false) => format!("/{}/{}", locale, page),
    }
}

fn w3c_date(datetime: NaiveDateTime) -> String {
    datetime.and_utc().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn rfc2822(datetime: NaiveDateTime) -> String {
    datetime.and_utc().to_rfc2822()
}

fn sitemap_entry(loc: &str, lastmod: Option<NaiveDateTime>) -> String {
    match lastmod {
        Some(lastmod) => format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
            escape(loc),
            w3c_date(lastmod)
        ),
        None => format!("  <url>\n    <loc>{}</loc>\n  </url>\n", escape(loc)),
    }
}

/// Sitemap, RSS and llms.txt generation.
pub struct FeedService<'a> {
    db: &'a DatabaseConnection,
    settings: &'a SiteSettings,
}

impl<'a> FeedService<'a> {
    /// Creates a new instance of [`FeedService`]
    pub fn new(db: &'a DatabaseConnection, settings: &'a SiteSettings) -> Self {
        Self { db, settings }
    }

    /// XML sitemap of localized static pages, categories and visible listings.
    pub async fn sitemap(&self) -> Result<String, Error> {
        let categories = CategoryRepository::new(self.db).list().await?;
        let listings = ListingRepository::new(self.db)
            .list_visible(Utc::now().naive_utc(), None)
            .await?;

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );

        for locale in SUPPORTED_LOCALES {
            for page in STATIC_PAGES {
                xml.push_str(&sitemap_entry(
                    &self.settings.url(&locale_path(locale, page)),
                    None,
                ));
            }
        }

        for category in &categories {
            xml.push_str(&sitemap_entry(
                &self.settings.url(&category_path(&category.slug)),
                None,
            ));
        }

        for listing in &listings {
            xml.push_str(&sitemap_entry(
                &self.settings.url(&listing_path(&listing.slug)),
                Some(listing.updated_at),
            ));
        }

        xml.push_str("</urlset>\n");

        Ok(xml)
    }

    /// RSS 2.0 channel of the most recently approved visible listings.
    pub async fn rss(&self) -> Result<String, Error> {
        let listings = ListingRepository::new(self.db)
            .list_visible(Utc::now().naive_utc(), Some(RSS_ITEM_LIMIT))
            .await?;

        let mut xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <rss version=\"2.0\">\n<channel>\n\
             <title>{}</title>\n<link>{}</link>\n<description>{}</description>\n",
            escape(&self.settings.site_name),
            escape(&self.settings.url("/")),
            escape(SITE_DESCRIPTION)
        );

        for listing in &listings {
            let link = self.settings.url(&listing_path(&listing.slug));

            xml.push_str("<item>\n");
            xml.push_str(&format!("<title>{}</title>\n", escape(&listing.name)));
            xml.push_str(&format!("<link>{}</link>\n", escape(&link)));
            xml.push_str(&format!(
                "<guid isPermaLink=\"true\">{}</guid>\n",
                escape(&link)
            ));
            xml.push_str(&format!(
                "<description>{}</description>\n",
                escape(&listing.description)
            ));
            if let Some(approved_at) = listing.approved_at {
                xml.push_str(&format!("<pubDate>{}</pubDate>\n", rfc2822(approved_at)));
            }
            xml.push_str("</item>\n");
        }

        xml.push_str("</channel>\n</rss>\n");

        Ok(xml)
    }

    /// Markdown summary of the site for language models.
    pub async fn llms_txt(&self) -> Result<String, Error> {
        let categories = CategoryRepository::new(self.db).list().await?;
        let listings = ListingRepository::new(self.db)
            .list_visible(Utc::now().naive_utc(), None)
            .await?;

        let mut text = format!(
            "# {}\n\n> {}\n\n",
            self.settings.site_name, SITE_DESCRIPTION
        );

        text.push_str("## Categories\n\n");
        if categories.is_empty() {
            text.push_str("No categories yet.\n");
        }
        for category in &categories {
            let line = match &category.description {
                Some(description) => format!(
                    "- [{}]({}): {}\n",
                    category.name,
                    self.settings.url(&category_path(&category.slug)),
                    description
                ),
                None => format!(
                    "- [{}]({})\n",
                    category.name,
                    self.settings.url(&category_path(&category.slug))
                ),
            };
            text.push_str(&line);
        }

        text.push_str("\n## Listings\n\n");
        if listings.is_empty() {
            text.push_str("No listings yet.\n");
        }
        for listing in &listings {
            text.push_str(&format!(
                "- [{}]({}): {}\n",
                listing.name, listing.url, listing.description
            ));
        }

        Ok(text)
    }
}
