pub mod config;
pub mod error;
pub mod server;
pub mod synthesize;
pub mod transcript;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default number of transcript characters forwarded to the LLM
pub const DEFAULT_MAX_TRANSCRIPT_CHARS: usize = 20_000;

/// Success envelope returned by every JSON endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// One headed block of a generated article
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub headline: String,
    pub content: String,
}

/// Article payload as returned by the LLM.
///
/// The payload is kept exactly as parsed; the accessors only read it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Article(pub serde_json::Value);

impl Article {
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(|t| t.as_str())
    }

    pub fn sections(&self) -> Option<Vec<Section>> {
        let sections = self.0.get("sections")?;
        serde_json::from_value(sections.clone()).ok()
    }
}

/// Quote payload as returned by the LLM
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Quote(pub serde_json::Value);

impl Quote {
    pub fn quote(&self) -> Option<&str> {
        self.0.get("quote").and_then(|q| q.as_str())
    }

    pub fn author(&self) -> Option<&str> {
        self.0.get("author").and_then(|a| a.as_str())
    }

    pub fn context(&self) -> Option<&str> {
        self.0.get("context").and_then(|c| c.as_str())
    }
}

/// Extract video ID from the supported YouTube URL formats.
///
/// Malformed input and unsupported URL shapes both yield `None`.
pub fn extract_video_id(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let path = url.path();

    let id = match url.host_str()? {
        "youtu.be" => path.strip_prefix('/').map(str::to_string),
        "www.youtube.com" | "youtube.com" => {
            if path == "/watch" {
                url.query_pairs()
                    .find(|(k, v)| k == "v" && !v.is_empty())
                    .map(|(_, v)| v.into_owned())
            } else if path.starts_with("/embed/") || path.starts_with("/v/") {
                path.split('/').nth(2).map(str::to_string)
            } else {
                None
            }
        }
        _ => None,
    }?;

    if id.is_empty() { None } else { Some(id) }
}

/// Cut text to at most `budget` characters, ignoring word boundaries
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
