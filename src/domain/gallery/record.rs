//! Generated image records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One generated image, as persisted in the journal and returned to the gallery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImageRecord {
    /// Creation time in epoch milliseconds; strictly increasing per store.
    pub id: String,
    pub file_name: String,
    pub local_url: String,
    /// Provider URL at generation time. Kept for provenance only, it expires.
    pub original_url: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

impl GeneratedImageRecord {
    /// Numeric form of the id; legacy or hand-edited ids may not parse.
    pub fn sequence(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

/// A freshly generated image that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewImage {
    pub original_url: String,
    pub prompt: String,
    /// File extension without the dot.
    pub extension: String,
}

impl NewImage {
    pub fn jpeg(original_url: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self { original_url: original_url.into(), prompt: prompt.into(), extension: "jpg".into() }
    }

    pub(crate) fn file_name(&self, id: u64) -> String {
        format!("ai-generated-{id}.{}", self.extension)
    }
}
