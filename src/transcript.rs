use eyre::{Result, bail};
use log::debug;
use serde_json::Value;

use crate::config::Settings;

/// Client for the RapidAPI-hosted transcript provider
#[derive(Debug, Clone)]
pub struct TranscriptClient {
    http: reqwest::Client,
    api_key: Option<String>,
    host: Option<String>,
    base_url: Option<String>,
}

impl TranscriptClient {
    pub fn new(http: reqwest::Client, settings: &Settings) -> Self {
        Self {
            http,
            api_key: settings.transcript_api_key.clone(),
            host: settings.transcript_host.clone(),
            base_url: settings.transcript_base_url(),
        }
    }

    /// Fetch the transcript of a video and flatten it into one string
    pub async fn fetch(&self, video_id: &str) -> Result<String> {
        let (Some(api_key), Some(host), Some(base_url)) = (&self.api_key, &self.host, &self.base_url) else {
            bail!("RAPIDAPI_KEY and RAPIDAPI_HOST must be set to fetch transcripts");
        };

        let url = format!("{}/api/transcript", base_url.trim_end_matches('/'));
        debug!("Fetching transcript for {video_id} from {host}");

        let resp = self
            .http
            .get(&url)
            .query(&[("videoId", video_id)])
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", host)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("transcript provider returned {status}: {body}");
        }

        let body = resp.text().await?;
        let text = match serde_json::from_str::<Value>(&body) {
            Ok(payload) => normalize(&payload),
            Err(e) => {
                debug!("Transcript body is not JSON ({e}), using it verbatim");
                body
            }
        };

        if text.trim().is_empty() {
            bail!("transcript provider returned an empty transcript for {video_id}");
        }

        debug!("Transcript for {video_id}: {} chars", text.chars().count());
        Ok(text)
    }
}

/// Flatten a provider payload into plain text.
///
/// Checked in order: an object whose `content` is a fragment list, a bare
/// fragment list, and finally the JSON rendering of whatever came back.
pub fn normalize(payload: &Value) -> String {
    if let Some(fragments) = payload.get("content").and_then(Value::as_array) {
        return join_fragments(fragments);
    }
    if let Some(fragments) = payload.as_array() {
        return join_fragments(fragments);
    }
    payload.to_string()
}

fn join_fragments(fragments: &[Value]) -> String {
    fragments
        .iter()
        .filter_map(|f| f.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
