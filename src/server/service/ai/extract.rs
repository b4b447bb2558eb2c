//! Parsing helpers for model replies and fetched pages.

use serde::de::DeserializeOwned;

use crate::server::error::{ai::AiError, Error};

const REPLY_EXCERPT_CHARS: usize = 200;

/// Parses a JSON object out of a model reply.
///
/// Tries the whole reply, then the first fenced code block, then the span from the
/// first `{` to the last `}`.
pub fn extract_json<T: DeserializeOwned>(reply: &str) -> Result<T, Error> {
    let reply = reply.trim();

    if let Ok(value) = serde_json::from_str(reply) {
        return Ok(value);
    }

    if let Some(block) = fenced_block(reply) {
        if let Ok(value) = serde_json::from_str(block) {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&reply[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(AiError::UnparsableReply(reply.chars().take(REPLY_EXCERPT_CHARS).collect()).into())
}

/// Contents of the first ``` fenced block, without its language tag.
fn fenced_block(reply: &str) -> Option<&str> {
    let start = reply.find("```")? + 3;
    let rest = &reply[start..];
    let end = rest.find("```")?;
    let block = &rest[..end];

    // Drop an info string such as `json` on the opening fence line
    let block = match block.find('\n') {
        Some(newline) if !block[..newline].trim().starts_with('{') => &block[newline + 1..],
        _ => block,
    };

    Some(block.trim())
}

/// Title and description found in a page's `<head>`.
#[derive(Debug, Default, PartialEq)]
pub struct PageMeta {
    /// Content of the `<title>` element
    pub title: Option<String>,
    /// Content of the description meta tag
    pub description: Option<String>,
}

/// Extracts `<title>` and the description meta tag from `html`.
pub fn page_meta(html: &str) -> PageMeta {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lower = html.to_ascii_lowercase();

    let title = lower.find("<title").and_then(|start| {
        let open_end = start + lower[start..].find('>')? + 1;
        let close = open_end + lower[open_end..].find("</title")?;
        clean_text(&html[open_end..close])
    });

    let mut description = None;
    let mut og_description = None;
    let mut offset = 0;
    while let Some(found) = lower[offset..].find("<meta") {
        let start = offset + found;
        let Some(len) = lower[start..].find('>') else {
            break;
        };
        let tag = &html[start..start + len];
        offset = start + len;

        let name = attribute(tag, "name")
            .or_else(|| attribute(tag, "property"))
            .map(|name| name.to_ascii_lowercase());
        match name.as_deref() {
            Some("description") if description.is_none() => {
                description = attribute(tag, "content").and_then(clean_text)
            }
            Some("og:description") if og_description.is_none() => {
                og_description = attribute(tag, "content").and_then(clean_text)
            }
            _ => {}
        }
    }

    PageMeta {
        title,
        description: description.or(og_description),
    }
}

/// Value of a quoted attribute inside a tag.
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = tag.to_ascii_lowercase();
    let mut offset = 0;

    while let Some(found) = lower[offset..].find(name) {
        let start = offset + found;
        offset = start + name.len();

        let preceded_by_space = lower[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let rest = lower[offset..].trim_start();
        if !preceded_by_space || !rest.starts_with('=') {
            continue;
        }

        let value_start = tag.len() - rest.len() + 1;
        let value = tag[value_start..].trim_start();
        let quote = value.chars().next()?;
        if quote != '"' && quote != '\'' {
            continue;
        }
        let end = value[1..].find(quote)?;

        return Some(&value[1..=end]);
    }

    None
}

/// Decodes common entities and collapses whitespace; `None` if nothing remains.
fn clean_text(raw: &str) -> Option<String> {
    let decoded = raw
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    let text = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    (!text.is_empty()).then_some(text)
}

/// First `max` characters of `value`.
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
