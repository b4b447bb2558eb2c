//! Bodies of the AI helper endpoints.

use serde::{Deserialize, Serialize};

/// Body for requesting listing suggestions
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SuggestRequestDto {
    /// Website to describe
    pub url: String,
}

/// Metadata suggested for a listing by the AI provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListingSuggestionDto {
    /// Suggested listing name
    pub name: String,
    /// Suggested description
    pub description: String,
    /// Existing category slug, if the suggestion matched one
    pub category: Option<String>,
    /// Suggested tags
    pub tags: Vec<String>,
}

/// Moderation assistance for a submitted listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContentAnalysisDto {
    /// Short summary for the moderator
    pub summary: String,
    /// Likelihood the listing is spam, from 0.0 to 1.0
    pub spam_score: f64,
    /// Problems spotted, such as adult content or a parked domain
    pub flags: Vec<String>,
}

/// Body for translating text
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TranslateRequestDto {
    /// Text to translate
    pub text: String,
    /// Target locale
    pub locale: String,
}

/// Translated text
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TranslationDto {
    /// Target locale
    pub locale: String,
    /// Translated text
    pub text: String,
}
