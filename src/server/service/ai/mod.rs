//! AI text helpers: listing suggestions, moderation analysis and translation.

pub mod extract;

use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::{
    model::ai::{ContentAnalysisDto, ListingSuggestionDto, TranslationDto},
    server::{
        data::{category::CategoryRepository, listing::ListingRepository},
        error::{ai::AiError, listing::ListingError, Error},
        provider::ai::AiClient,
        service::{
            ai::extract::{extract_json, page_meta, truncate_chars},
            listing::{
                normalize_tags, DESCRIPTION_MAX_CHARS, MAX_TAGS, NAME_MAX_CHARS, TAG_MAX_CHARS,
            },
        },
        util::{i18n, url::normalize_url},
    },
};

/// Maximum characters of text accepted for translation.
pub const TRANSLATE_MAX_CHARS: usize = 5000;

const SUGGEST_SYSTEM_PROMPT: &str = "You write entries for a curated website directory. \
Reply with a single JSON object with the keys \"name\" (short site name), \
\"description\" (one or two neutral sentences, at most 500 characters), \
\"category\" (one of the provided category slugs, or null) and \"tags\" \
(up to 5 short lowercase keywords). Reply with JSON only.";

const ANALYZE_SYSTEM_PROMPT: &str = "You help moderators review website directory \
submissions. Reply with a single JSON object with the keys \"summary\" (one sentence), \
\"spam_score\" (number from 0 to 1, where 1 is certainly spam) and \"flags\" (list of \
short strings naming problems such as misleading description, adult content or \
keyword stuffing; empty when none). Reply with JSON only.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SuggestionReply {
    name: String,
    description: String,
    category: Option<String>,
    tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalysisReply {
    summary: String,
    spam_score: f64,
    flags: Vec<String>,
}

/// Submission suggestions, listing analysis and translation.
pub struct AiService<'a> {
    db: &'a DatabaseConnection,
    ai: &'a AiClient,
}

impl<'a> AiService<'a> {
    /// Creates a new instance of [`AiService`]
    pub fn new(db: &'a DatabaseConnection, ai: &'a AiClient) -> Self {
        Self { db, ai }
    }

    fn ensure_enabled(&self) -> Result<(), Error> {
        if self.ai.is_enabled() {
            Ok(())
        } else {
            Err(AiError::Disabled.into())
        }
    }

    /// Suggests listing metadata for the page at `url`.
    ///
    /// # Returns
    /// - `Ok(ListingSuggestionDto)` - Cleaned suggestion
    /// - `Err(Error::AiError(AiError::Disabled))` - No AI key configured
    /// - `Err(Error::AiError(AiError::PageFetchFailed))` - Page could not be fetched
    /// - `Err(Error::AiError(AiError::UnparsableReply))` - Reply contained no usable JSON
    pub async fn suggest(&self, url: &str) -> Result<ListingSuggestionDto, Error> {
        self.ensure_enabled()?;

        let url = normalize_url(url).map_err(ListingError::Validation)?;
        let html = self.ai.fetch_page(&url).await?;
        let meta = page_meta(&html);

        let categories = CategoryRepository::new(self.db).list().await?;
        let category_slugs: Vec<&str> = categories
            .iter()
            .map(|category| category.slug.as_str())
            .collect();

        let prompt = format!(
            "URL: {}\nPage title: {}\nMeta description: {}\nCategory slugs: {}",
            url,
            meta.title.as_deref().unwrap_or("(none)"),
            meta.description.as_deref().unwrap_or("(none)"),
            if category_slugs.is_empty() {
                "(none)".to_string()
            } else {
                category_slugs.join(", ")
            }
        );

        let reply = self.ai.complete(SUGGEST_SYSTEM_PROMPT, &prompt).await?;
        let suggestion: SuggestionReply = extract_json(&reply)?;

        let category = suggestion
            .category
            .map(|slug| slug.trim().to_lowercase())
            .filter(|slug| category_slugs.contains(&slug.as_str()));

        let tags = normalize_tags(&suggestion.tags)
            .into_iter()
            .filter(|tag| tag.chars().count() <= TAG_MAX_CHARS)
            .take(MAX_TAGS)
            .collect();

        Ok(ListingSuggestionDto {
            name: truncate_chars(suggestion.name.trim(), NAME_MAX_CHARS),
            description: truncate_chars(suggestion.description.trim(), DESCRIPTION_MAX_CHARS),
            category,
            tags,
        })
    }

    /// Asks the AI provider to assess a listing for moderators.
    ///
    /// # Returns
    /// - `Ok(ContentAnalysisDto)` - Analysis with the spam score clamped to 0..=1
    /// - `Err(Error::ListingError(ListingError::NotFound))` - Listing does not exist
    /// - `Err(Error::AiError(_))` - AI disabled or reply unusable
    pub async fn analyze(&self, listing_id: i32) -> Result<ContentAnalysisDto, Error> {
        self.ensure_enabled()?;

        let listing = ListingRepository::new(self.db)
            .find_by_id(listing_id)
            .await?
            .ok_or(ListingError::NotFound)?;

        let prompt = format!(
            "Name: {}\nURL: {}\nDescription: {}\nTags: {}",
            listing.name, listing.url, listing.description, listing.tags
        );

        let reply = self.ai.complete(ANALYZE_SYSTEM_PROMPT, &prompt).await?;
        let analysis: AnalysisReply = extract_json(&reply)?;

        let spam_score = if analysis.spam_score.is_finite() {
            analysis.spam_score.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(ContentAnalysisDto {
            summary: analysis.summary.trim().to_string(),
            spam_score,
            flags: analysis
                .flags
                .into_iter()
                .map(|flag| flag.trim().to_string())
                .filter(|flag| !flag.is_empty())
                .collect(),
        })
    }

    /// Translates `text` into a supported locale.
    ///
    /// # Returns
    /// - `Ok(TranslationDto)` - Trimmed translation
    /// - `Err(Error::AiError(AiError::UnsupportedLocale))` - Target locale not supported
    /// - `Err(Error::ListingError(ListingError::Validation))` - Text empty or too long
    pub async fn translate(&self, text: &str, locale: &str) -> Result<TranslationDto, Error> {
        self.ensure_enabled()?;

        let locale = i18n::supported_locale(locale)
            .ok_or_else(|| AiError::UnsupportedLocale(locale.to_string()))?;
        let language = i18n::language_name(locale)
            .ok_or_else(|| AiError::UnsupportedLocale(locale.to_string()))?;

        let text = text.trim();
        let text_chars = text.chars().count();
        if text_chars == 0 || text_chars > TRANSLATE_MAX_CHARS {
            return Err(ListingError::Validation(format!(
                "Text must be between 1 and {} characters",
                TRANSLATE_MAX_CHARS
            ))
            .into());
        }

        let system = format!(
            "Translate the user's text into {}. Keep the meaning, tone and formatting. \
             Reply with the translation only.",
            language
        );

        let reply = self.ai.complete(&system, text).await?;
        let translation = reply.trim();
        if translation.is_empty() {
            return Err(AiError::UnparsableReply("empty translation".to_string()).into());
        }

        Ok(TranslationDto {
            locale: locale.to_string(),
            text: translation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    mod suggest {
        use linkdex_test_utils::prelude::*;

        use crate::server::{
            error::{ai::AiError, Error},
            service::ai::AiService,
            util::test::TestContextExt,
        };

        const PAGE: &str = r#"<html><head><title>Crate Finder</title>
            <meta name="description" content="Search every Rust crate."></head></html>"#;

        /// Expect a cleaned suggestion keeping only known categories
        #[tokio::test]
        async fn suggests_listing_metadata() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_tables()
                .with_category("tools")
                .build()
                .await?;
            let (url, page_endpoint) = test.ai().create_page_endpoint("/site", PAGE, 1);
            let completion_endpoint = test.ai().create_completion_endpoint(
                "```json\n{\"name\":\" Crate Finder \",\"description\":\"Search Rust crates.\",\"category\":\"Tools\",\"tags\":[\"Rust\",\"search\",\"rust\"]}\n```",
                1,
            );
            let state = test.app_state();

            let suggestion = AiService::new(&test.db, &state.ai)
                .suggest(&url)
                .await
                .unwrap();

            assert_eq!(suggestion.name, "Crate Finder");
            assert_eq!(suggestion.category.as_deref(), Some("tools"));
            assert_eq!(suggestion.tags, vec!["rust", "search"]);
            page_endpoint.assert();
            completion_endpoint.assert();

            Ok(())
        }

        /// Expect unknown categories to be dropped
        #[tokio::test]
        async fn drops_unknown_category() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let (url, _page_endpoint) = test.ai().create_page_endpoint("/site", PAGE, 1);
            let _completion_endpoint = test.ai().create_completion_endpoint(
                r#"{"name":"Crate Finder","description":"Search.","category":"invented","tags":[]}"#,
                1,
            );
            let state = test.app_state();

            let suggestion = AiService::new(&test.db, &state.ai)
                .suggest(&url)
                .await
                .unwrap();

            assert_eq!(suggestion.category, None);

            Ok(())
        }

        /// Expect PageFetchFailed when the page errors
        #[tokio::test]
        async fn fails_when_page_unavailable() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let url = format!("{}/missing", test.server_url());
            let state = test.app_state();

            let result = AiService::new(&test.db, &state.ai).suggest(&url).await;

            assert!(matches!(
                result,
                Err(Error::AiError(AiError::PageFetchFailed { .. }))
            ));

            Ok(())
        }

        /// Expect Disabled without an API key
        #[tokio::test]
        async fn fails_when_disabled() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let state = test.app_state_with(|config| config.ai_api_key = None);

            let result = AiService::new(&test.db, &state.ai)
                .suggest("https://example.com")
                .await;

            assert!(matches!(result, Err(Error::AiError(AiError::Disabled))));

            Ok(())
        }
    }

    mod analyze {
        use entity::sea_orm_active_enums::ListingStatus;
        use linkdex_test_utils::prelude::*;

        use crate::server::{
            error::{ai::AiError, Error},
            service::ai::AiService,
            util::test::TestContextExt,
        };

        /// Expect the spam score to be clamped
        #[tokio::test]
        async fn clamps_spam_score() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test
                .listing()
                .insert_listing(owner.id, "Suspicious", ListingStatus::Pending)
                .await?;
            let _completion_endpoint = test.ai().create_completion_endpoint(
                r#"Analysis: {"summary":"Looks spammy.","spam_score":1.7,"flags":["keyword stuffing"," "]}"#,
                1,
            );
            let state = test.app_state();

            let analysis = AiService::new(&test.db, &state.ai)
                .analyze(listing.id)
                .await
                .unwrap();

            assert_eq!(analysis.spam_score, 1.0);
            assert_eq!(analysis.flags, vec!["keyword stuffing"]);

            Ok(())
        }

        /// Expect UnparsableReply for a reply without JSON
        #[tokio::test]
        async fn fails_for_prose_reply() -> Result<(), TestError> {
            let mut test = TestBuilder::new().with_tables().build().await?;
            let owner = test.user().insert_profile("owner@example.org").await?;
            let listing = test
                .listing()
                .insert_listing(owner.id, "Suspicious", ListingStatus::Pending)
                .await?;
            let _completion_endpoint = test
                .ai()
                .create_completion_endpoint("This listing seems fine.", 1);
            let state = test.app_state();

            let result = AiService::new(&test.db, &state.ai).analyze(listing.id).await;

            assert!(matches!(
                result,
                Err(Error::AiError(AiError::UnparsableReply(_)))
            ));

            Ok(())
        }
    }

    mod translate {
        use linkdex_test_utils::prelude::*;

        use crate::server::{
            error::{ai::AiError, Error},
            service::ai::AiService,
            util::test::TestContextExt,
        };

        /// Expect the trimmed translation
        #[tokio::test]
        async fn translates_text() -> Result<(), TestError> {
            let mut test = TestBuilder::new().build().await?;
            let _completion_endpoint = test
                .ai()
                .create_completion_endpoint("  Hola mundo \n", 1);
            let state = test.app_state();

            let translation = AiService::new(&test.db, &state.ai)
                .translate("Hello world", "ES")
                .await
                .unwrap();

            assert_eq!(translation.locale, "es");
            assert_eq!(translation.text, "Hola mundo");

            Ok(())
        }

        /// Expect UnsupportedLocale for an unknown locale
        #[tokio::test]
        async fn rejects_unsupported_locale() -> Result<(), TestError> {
            let test = TestBuilder::new().build().await?;
            let state = test.app_state();

            let result = AiService::new(&test.db, &state.ai)
                .translate("Hello", "fr")
                .await;

            assert!(matches!(
                result,
                Err(Error::AiError(AiError::UnsupportedLocale(_)))
            ));

            Ok(())
        }
    }
}
