//! Pulls the result image URL out of a provider response of unknown shape.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use crate::{AdminError, Result};

type Strategy = fn(&Value) -> Option<String>;

/// Most precise shape first; the serialized scan accepts anything that looks like a URL.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("string", direct_string),
    ("array", first_element),
    ("scan", scan_serialized),
];

fn direct_string(output: &Value) -> Option<String> {
    output.as_str().map(str::to_string)
}

fn first_element(output: &Value) -> Option<String> {
    output.as_array()?.first()?.as_str().map(str::to_string)
}

fn scan_serialized(output: &Value) -> Option<String> {
    static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"https?://[^\s"']+"#).unwrap());
    let serialized = serde_json::to_string(output).ok()?;
    URL_RE.find(&serialized).map(|m| m.as_str().to_string())
}

/// Returns the first candidate URL starting with `http`.
pub fn extract_image_url(output: &Value) -> Result<String> {
    for (name, strategy) in STRATEGIES {
        match strategy(output) {
            Some(url) if url.starts_with("http") => {
                debug!(strategy = name, %url, "Extracted image URL from provider output");
                return Ok(url);
            }
            Some(other) => debug!(strategy = name, candidate = %other, "Rejected non-HTTP candidate"),
            None => {}
        }
    }
    let mut shown = output.to_string();
    if shown.len() > 200 {
        let cut = (0..=200).rev().find(|i| shown.is_char_boundary(*i)).unwrap_or(0);
        shown.truncate(cut);
        shown.push('…');
    }
    Err(AdminError::NoImageUrl(shown))
}
