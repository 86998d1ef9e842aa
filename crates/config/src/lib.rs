//! Configuration loading, validation, and display for groundrag.
//!
//! Settings come from three layers, later layers winning:
//! 1. an optional TOML file (`./groundrag.toml` by default)
//! 2. a `.env` file in the working directory, if present
//! 3. process environment variables
//!
//! The resulting [`AppConfig`] is built once at startup and passed by
//! reference into every component; nothing reads the environment later.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables that must be set before any command talks to a
/// remote service.
pub const REQUIRED_VARS: [&str; 3] = ["GROUNDX_API_KEY", "OPENAI_API_KEY", "OPENAI_API_BASE"];

/// The root configuration structure.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Retrieval index settings
    #[serde(default)]
    pub groundx: GroundXConfig,

    /// Chat-completion endpoint settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Context assembly limits
    #[serde(default)]
    pub rag: RagConfig,

    /// Input and output files
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GroundXConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_groundx_url")]
    pub api_url: String,

    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_groundx_url() -> String {
    "https://api.groundx.ai/api".into()
}
fn default_bucket_name() -> String {
    "itnb_website".into()
}

impl Default for GroundXConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_groundx_url(),
            bucket_name: default_bucket_name(),
            request_timeout_secs: default_timeout(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL; `/v1/chat/completions` is appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "inference-llama4-maverick".into()
}
fn default_max_tokens() -> u32 {
    512
}
fn default_timeout() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            request_timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Number of citations kept per answer
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Limit applied when assembling retrieved text
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,

    /// Independent limit applied to the final system message
    #[serde(default = "default_max_system_chars")]
    pub max_system_chars: usize,

    /// Limit for the `/raw` display
    #[serde(default = "default_raw_display_chars")]
    pub raw_display_chars: usize,

    /// Per-result excerpt length when no suggested text exists
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

fn default_top_k() -> usize {
    3
}
fn default_max_context_chars() -> usize {
    100_000
}
fn default_max_system_chars() -> usize {
    20_000
}
fn default_raw_display_chars() -> usize {
    20_000
}
fn default_excerpt_chars() -> usize {
    3_000
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_context_chars: default_max_context_chars(),
            max_system_chars: default_max_system_chars(),
            raw_display_chars: default_raw_display_chars(),
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON list of `{url, title, content}` produced by preprocessing
    #[serde(default = "default_documents_path")]
    pub documents_path: PathBuf,

    /// Per-document ingestion log
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

fn default_documents_path() -> PathBuf {
    PathBuf::from("data/itnb_texts.json")
}
fn default_log_path() -> PathBuf {
    PathBuf::from("data/ingest_log.txt")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            documents_path: default_documents_path(),
            log_path: default_log_path(),
        }
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("groundx", &self.groundx)
            .field("llm", &self.llm)
            .field("rag", &self.rag)
            .field("paths", &self.paths)
            .finish()
    }
}

impl std::fmt::Debug for GroundXConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroundXConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("bucket_name", &self.bucket_name)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Default config file location, relative to the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("groundrag.toml")
    }

    /// Load configuration: file, then `.env`, then environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if let Ok(env_file) = dotenvy::dotenv() {
            tracing::debug!(path = %env_file.display(), "Loaded .env file");
        }
        config.apply_env_with(|key| std::env::var(key).ok());

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file only. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Empty values count as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("GROUNDX_API_KEY") {
            self.groundx.api_key = Some(v);
        }
        if let Some(v) = get("GROUNDX_API_URL") {
            self.groundx.api_url = v;
        }
        if let Some(v) = get("GROUNDX_BUCKET_NAME") {
            self.groundx.bucket_name = v;
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_API_BASE") {
            self.llm.api_base = Some(v);
        }
        if let Some(v) = get("OPENAI_MODEL_NAME") {
            self.llm.model = v;
        }
    }

    /// Range-check numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.llm.request_timeout_secs == 0 || self.groundx.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }
        if self.rag.top_k == 0 {
            return Err(ConfigError::ValidationError("rag.top_k must be > 0".into()));
        }
        if self.rag.max_context_chars == 0 || self.rag.max_system_chars == 0 {
            return Err(ConfigError::ValidationError(
                "rag.max_context_chars and rag.max_system_chars must be > 0".into(),
            ));
        }
        if self.groundx.bucket_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "groundx.bucket_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Names of required variables that are still unset.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let present = [
            self.groundx.api_key.is_some(),
            self.llm.api_key.is_some(),
            self.llm.api_base.is_some(),
        ];
        REQUIRED_VARS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Fail with every missing variable listed at once.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingRequired(
                missing.into_iter().map(String::from).collect(),
            ))
        }
    }

    /// Human-readable summary without secrets.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("GroundX Bucket: {}", self.groundx.bucket_name),
            format!("GroundX API:    {}", self.groundx.api_url),
            format!("LLM Model:      {}", self.llm.model),
            format!(
                "LLM API Base:   {}",
                self.llm.api_base.as_deref().unwrap_or("(unset)")
            ),
            format!("TOP_K:          {}", self.rag.top_k),
            format!("Max Context:    {} chars", self.rag.max_context_chars),
            format!("Max System:     {} chars", self.rag.max_system_chars),
            format!("Temperature:    {}", self.llm.temperature),
            format!("Max Tokens:     {}", self.llm.max_tokens),
            format!("Timeout:        {}s", self.llm.request_timeout_secs),
            format!("Documents:      {}", self.paths.documents_path.display()),
            format!("Ingest Log:     {}", self.paths.log_path.display()),
        ]
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
}
