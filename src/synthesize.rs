use eyre::{Result, WrapErr, bail};
use log::debug;
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::config::Settings;
use crate::{Article, Quote, truncate_chars};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that outputs only JSON.";

/// Authors the daily quote is drawn from
pub const AUTHORS: [&str; 25] = [
    "Marcus Aurelius",
    "Seneca",
    "Epictetus",
    "Aristotle",
    "Socrates",
    "Confucius",
    "Lao Tzu",
    "Rumi",
    "Nënë Tereza",
    "Albert Einstein",
    "Nikola Tesla",
    "Leonardo da Vinci",
    "Winston Churchill",
    "Abraham Lincoln",
    "Nelson Mandela",
    "Mahatma Gandhi",
    "Martin Luther King Jr.",
    "Theodore Roosevelt",
    "Benjamin Franklin",
    "Ralph Waldo Emerson",
    "Friedrich Nietzsche",
    "Viktor Frankl",
    "Steve Jobs",
    "Naim Frashëri",
    "Gjergj Kastrioti Skënderbeu",
];

/// Pick an author at random from [`AUTHORS`]
pub fn pick_author() -> &'static str {
    AUTHORS.choose(&mut rand::thread_rng()).copied().unwrap_or(AUTHORS[0])
}

/// Turns transcripts and author names into JSON documents via a chat-completion LLM
#[derive(Debug, Clone)]
pub struct Synthesizer {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_transcript_chars: usize,
}

impl Synthesizer {
    pub fn new(http: reqwest::Client, settings: &Settings) -> Self {
        Self {
            http,
            api_key: settings.openai_api_key.clone(),
            base_url: settings.openai_base_url.clone(),
            model: settings.model.clone(),
            max_transcript_chars: settings.max_transcript_chars,
        }
    }

    /// Translate and restructure a transcript into an Albanian article
    pub async fn article(&self, transcript: &str) -> Result<Article> {
        let text = truncate_chars(transcript, self.max_transcript_chars);
        debug!(
            "Requesting article from {} chars of transcript ({} available)",
            text.chars().count(),
            transcript.chars().count()
        );
        let payload = self.complete_json(&article_prompt(text)).await?;
        Ok(Article(payload))
    }

    /// Ask for one motivational quote by `author`, translated into Albanian
    pub async fn quote(&self, author: &str) -> Result<Quote> {
        debug!("Requesting quote by {author}");
        let mut payload = self.complete_json(&quote_prompt(author)).await?;
        if let Some(obj) = payload.as_object_mut() {
            obj.insert("author".to_string(), Value::String(author.to_string()));
        }
        Ok(Quote(payload))
    }

    async fn complete_json(&self, prompt: &str) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| eyre::eyre!("OPENAI_API_KEY environment variable not set"))?;

        debug!("Calling completion API with model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "response_format": { "type": "json_object" }
        });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("OpenAI API returned {status}: {body}");
        }

        let json: Value = resp.json().await?;
        let text = extract_openai_text(&json)?;
        serde_json::from_str(&text).wrap_err("LLM response was not valid JSON")
    }
}

fn extract_openai_text(json: &Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    bail!("unexpected OpenAI API response format");
}

fn article_prompt(text: &str) -> String {
    format!(
        r#"Ti je një asistent inteligjent. Detyra jote është:
1. Lexo tekstin e mëposhtëm (që është transkript i një videoje).
2. Përktheje dhe përmblidhe në gjuhën SHQIPE.
3. Strukturoje në format JSON me fusha 'title' (titulli) dhe 'sections' (lista e kapitujve me 'headline' dhe 'content').
4. Teksti duhet të jetë i rrjedhshëm, profesional dhe i ndarë me tituj (headlines) të qartë.

Teksti origjinal:
{text}

Përgjigju VETËM me JSON valid në këtë format:
{{
    "title": "Titulli i Videos në Shqip",
    "sections": [
        {{ "headline": "Hyrje", "content": "Përmbajtja..." }},
        {{ "headline": "Pika Kryesore", "content": "Përmbajtja..." }}
    ]
}}"#
    )
}

fn quote_prompt(author: &str) -> String {
    format!(
        r#"Zgjidh një thënie të njohur motivuese nga {author}.
Përktheje thënien në gjuhën SHQIPE në mënyrë të natyrshme.
Shto një fjali të vetme që shpjegon kontekstin ose kuptimin e saj.

Përgjigju VETËM me JSON valid në këtë format:
{{
    "quote": "Thënia në shqip",
    "author": "{author}",
    "context": "Një fjali për kontekstin."
}}"#
    )
}
