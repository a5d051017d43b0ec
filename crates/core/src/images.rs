//! Image reference normalization.
//!
//! The API hands back the `images` field either as a real JSON array or as a
//! string holding a serialized array (sometimes malformed). [`RawImages`] tags
//! the input once; [`normalize`] turns it into a clean, ordered list of
//! trimmed, non-empty strings. URL validity is a render-time concern
//! ([`is_renderable`]), not checked here.

#![forbid(unsafe_code)]

use tracing::debug;

use crate::error::ImageDecodeError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawImages {
    /// String that should encode a JSON array of URLs.
    Text(String),
    /// Already-parsed collection; non-string elements are ignored.
    List(Vec<serde_json::Value>),
    #[default]
    Absent,
}

impl RawImages {
    /// Classify a raw JSON field. Anything that is neither a string nor an array is absent.
    pub fn from_json(v: Option<&serde_json::Value>) -> Self {
        match v {
            Some(serde_json::Value::String(s)) => RawImages::Text(s.clone()),
            Some(serde_json::Value::Array(items)) => RawImages::List(items.clone()),
            _ => RawImages::Absent,
        }
    }
}

/// Decode a string-encoded image list.
pub fn decode_text(text: &str) -> Result<Vec<serde_json::Value>, ImageDecodeError> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(items)) => Ok(items),
        Ok(serde_json::Value::Null) => Err(ImageDecodeError::NotAList("null")),
        Ok(serde_json::Value::Bool(_)) => Err(ImageDecodeError::NotAList("bool")),
        Ok(serde_json::Value::Number(_)) => Err(ImageDecodeError::NotAList("number")),
        Ok(serde_json::Value::String(_)) => Err(ImageDecodeError::NotAList("string")),
        Ok(serde_json::Value::Object(_)) => Err(ImageDecodeError::NotAList("object")),
        Err(e) => Err(ImageDecodeError::Syntax(e.to_string())),
    }
}

pub fn normalize(raw: &RawImages) -> Vec<String> {
    match raw {
        RawImages::Absent => Vec::new(),
        RawImages::Text(text) if text.trim().is_empty() => Vec::new(),
        RawImages::Text(text) => match decode_text(text) {
            Ok(items) => clean(&items),
            Err(e) => {
                debug!(error = %e, "dropping undecodable image field");
                Vec::new()
            }
        },
        RawImages::List(items) => clean(items),
    }
}

fn clean(items: &[serde_json::Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Absolute `http`/`https` URL check applied when rendering.
pub fn is_renderable(url: &str) -> bool {
    let url = url.trim();
    let rest = strip_prefix_ci(url, "https://").or_else(|| strip_prefix_ci(url, "http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
