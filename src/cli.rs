use clap::Parser;
use std::path::PathBuf;

use artx::config::{Config, Settings};

#[derive(Parser)]
#[command(
    name = "artx",
    about = "Serves YouTube transcripts as translated Albanian articles",
    version
)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on [default: 5000]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// API key for the OpenAI-compatible completion endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the completion endpoint [default: https://api.openai.com/v1]
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// LLM model used for articles and quotes [default: gpt-4o-mini]
    #[arg(short, long, env = "ARTX_MODEL")]
    pub model: Option<String>,

    /// Transcript characters forwarded to the LLM [default: 20000]
    #[arg(long, env = "ARTX_MAX_TRANSCRIPT_CHARS")]
    pub max_transcript_chars: Option<usize>,

    /// RapidAPI key for the transcript provider
    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true)]
    pub rapidapi_key: Option<String>,

    /// RapidAPI host of the transcript provider
    #[arg(long, env = "RAPIDAPI_HOST")]
    pub rapidapi_host: Option<String>,

    /// Override the transcript provider base URL (defaults to https://<rapidapi host>)
    #[arg(long, env = "TRANSCRIPT_BASE_URL")]
    pub transcript_base_url: Option<String>,

    /// Config file path [default: ~/.config/artx/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve settings: flags and environment first, then the config file, then defaults
    pub fn settings(&self, config: &Config) -> Settings {
        let mut settings = Settings::default().with_config(config);

        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(ref url) = self.openai_base_url {
            settings.openai_base_url = url.clone();
        }
        if let Some(ref model) = self.model {
            settings.model = model.clone();
        }
        if let Some(chars) = self.max_transcript_chars {
            settings.max_transcript_chars = chars;
        }
        if self.rapidapi_host.is_some() {
            settings.transcript_host = self.rapidapi_host.clone();
        }
        settings.openai_api_key = self.openai_api_key.clone();
        settings.transcript_api_key = self.rapidapi_key.clone();
        settings.transcript_base_url = self.transcript_base_url.clone();
        settings
    }
}
