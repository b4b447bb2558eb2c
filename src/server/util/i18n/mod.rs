//! Message catalogs and locale negotiation.
//!
//! Catalogs are flat JSON maps embedded at compile time. English is complete; other
//! locales are overlaid on it so missing keys fall back to English.

use std::{collections::BTreeMap, sync::LazyLock};

/// Locale used when nothing else matches.
pub const DEFAULT_LOCALE: &str = "en";

/// Supported locales, default first.
pub const SUPPORTED_LOCALES: [&str; 3] = ["en", "es", "de"];

type Catalog = BTreeMap<String, String>;

static CATALOGS: LazyLock<BTreeMap<&'static str, Catalog>> = LazyLock::new(|| {
    BTreeMap::from([
        ("en", parse_catalog("en", include_str!("en.json"))),
        ("es", parse_catalog("es", include_str!("es.json"))),
        ("de", parse_catalog("de", include_str!("de.json"))),
    ])
});

fn parse_catalog(locale: &str, json: &str) -> Catalog {
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::error!(locale = %locale, "Failed to parse message catalog: {}", e);
        Catalog::new()
    })
}

/// Returns the supported locale matching `locale` (case-insensitive), if any.
pub fn supported_locale(locale: &str) -> Option<&'static str> {
    let locale = locale.trim().to_ascii_lowercase();
    SUPPORTED_LOCALES.into_iter().find(|l| *l == locale)
}

/// English name of a supported locale's language.
pub fn language_name(locale: &str) -> Option<&'static str> {
    match supported_locale(locale)? {
        "en" => Some("English"),
        "es" => Some("Spanish"),
        "de" => Some("German"),
        _ => None,
    }
}

/// Messages for `locale`: the English catalog overlaid with the locale's entries.
///
/// Returns `None` for unsupported locales.
pub fn messages(locale: &str) -> Option<Catalog> {
    let locale = supported_locale(locale)?;

    let mut messages = CATALOGS.get(DEFAULT_LOCALE).cloned().unwrap_or_default();
    if locale != DEFAULT_LOCALE {
        if let Some(overlay) = CATALOGS.get(locale) {
            messages.extend(overlay.clone());
        }
    }

    Some(messages)
}

/// Picks a locale from an explicit request parameter, then `Accept-Language`.
///
/// `Accept-Language` entries are ranked by their `q` weight (default 1) and matched on
/// the primary subtag, so `de-AT` selects `de`.
pub fn negotiate(explicit: Option<&str>, accept_language: Option<&str>) -> &'static str {
    if let Some(locale) = explicit.and_then(supported_locale) {
        return locale;
    }

    let Some(header) = accept_language else {
        return DEFAULT_LOCALE;
    };

    let mut ranked: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let weight = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            Some((tag, weight))
        })
        .filter(|(_, weight)| *weight > 0.0)
        .collect();

    // Stable sort keeps header order among equal weights
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .find_map(|(tag, _)| {
            let primary = tag.split('-').next().unwrap_or(tag);
            supported_locale(primary)
        })
        .unwrap_or(DEFAULT_LOCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_catalog_is_complete_superset() {
        let english = CATALOGS.get("en").unwrap();

        assert!(!english.is_empty());
        for locale in ["es", "de"] {
            for key in CATALOGS.get(locale).unwrap().keys() {
                assert!(english.contains_key(key), "{} has unknown key {}", locale, key);
            }
        }
    }

    #[test]
    fn overlays_locale_on_english() {
        let german = messages("de").unwrap();
        let english = messages("en").unwrap();

        assert_eq!(german.get("nav.home").map(String::as_str), Some("Startseite"));
        // Missing German entry falls back to English
        assert_eq!(german.get("home.empty"), english.get("home.empty"));
        assert_eq!(german.len(), english.len());
    }

    #[test]
    fn names_languages() {
        assert_eq!(language_name("DE"), Some("German"));
        assert_eq!(language_name("fr"), None);
    }

    #[test]
    fn rejects_unsupported_locale() {
        assert!(messages("fr").is_none());
        assert_eq!(supported_locale("ES"), Some("es"));
    }

    #[test]
    fn prefers_explicit_locale() {
        assert_eq!(negotiate(Some("es"), Some("de")), "es");
        assert_eq!(negotiate(Some("fr"), Some("de")), "de");
    }

    #[test]
    fn ranks_accept_language_by_weight() {
        assert_eq!(negotiate(None, Some("fr;q=0.9, de;q=0.8, es;q=0.85")), "es");
        assert_eq!(negotiate(None, Some("de-AT, en;q=0.5")), "de");
        assert_eq!(negotiate(None, Some("es;q=0, fr")), "en");
        assert_eq!(negotiate(None, None), "en");
    }
}
