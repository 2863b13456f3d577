use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_MAX_TRANSCRIPT_CHARS;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Optional settings file, every key may be omitted
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub port: Option<u16>,
    pub model: Option<String>,
    pub max_transcript_chars: Option<usize>,
    pub transcript_host: Option<String>,
    pub openai_base_url: Option<String>,
}

impl Config {
    /// Load config from ~/.config/artx/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("artx")
        .join("config.toml")
}

/// Resolved runtime settings, built once at startup and handed to each component.
///
/// Credentials stay optional here; the call that needs one fails when it is absent.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub max_transcript_chars: usize,
    pub transcript_api_key: Option<String>,
    pub transcript_host: Option<String>,
    pub transcript_base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_transcript_chars: DEFAULT_MAX_TRANSCRIPT_CHARS,
            transcript_api_key: None,
            transcript_host: None,
            transcript_base_url: None,
        }
    }
}

impl Settings {
    /// Overlay the values present in the config file
    pub fn with_config(mut self, config: &Config) -> Self {
        if let Some(port) = config.port {
            self.port = port;
        }
        if let Some(ref model) = config.model {
            self.model = model.clone();
        }
        if let Some(chars) = config.max_transcript_chars {
            self.max_transcript_chars = chars;
        }
        if let Some(ref url) = config.openai_base_url {
            self.openai_base_url = url.clone();
        }
        if let Some(ref host) = config.transcript_host {
            self.transcript_host = Some(host.clone());
        }
        self
    }

    /// Base URL of the transcript provider: explicit override, else https://<host>
    pub fn transcript_base_url(&self) -> Option<String> {
        self.transcript_base_url
            .clone()
            .or_else(|| self.transcript_host.as_ref().map(|h| format!("https://{h}")))
    }
}
