//! prdeval configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local config file name
const LOCAL_CONFIG: &str = ".prdeval.yml";

/// Main prdeval configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Prompt catalog path; the embedded catalog is used when unset and
    /// `prompts.json` is absent from the working directory
    #[serde(rename = "prompts-file")]
    pub prompts_file: Option<PathBuf>,

    /// Provider that writes the PRD
    pub generator: LlmConfig,

    /// Provider that scores the PRD
    pub evaluator: LlmConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Resolves both roles and checks that their API key environment variables
    /// are set, so a missing key fails before any provider call is made.
    pub fn validate(&self) -> Result<()> {
        for role in [LlmRole::Generator, LlmRole::Evaluator] {
            let resolved = self.resolve(role)?;
            if resolved.get_api_key().is_err() {
                return Err(eyre::eyre!(
                    "{} API key not found. Set the {} environment variable.",
                    role,
                    resolved.api_key_env
                ));
            }
        }
        Ok(())
    }

    /// Resolve the LLM settings for one role, filling provider defaults
    pub fn resolve(&self, role: LlmRole) -> Result<ResolvedLlmConfig> {
        match role {
            LlmRole::Generator => self.generator.resolve(role),
            LlmRole::Evaluator => self.evaluator.resolve(role),
        }
    }

    /// Load configuration with fallback chain
    ///
    /// 1. Explicit `--config` path
    /// 2. `./.prdeval.yml`
    /// 3. `<config_dir>/prdeval/prdeval.yml`
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        debug!(?config_path, "Config::load: called");
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::fallback_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Follows the same fallback chain as [`Config::load`]. Errors are
    /// swallowed; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let paths = match config_path {
            Some(p) => vec![p.clone()],
            None => Self::fallback_paths(),
        };
        paths
            .into_iter()
            .find_map(|path| {
                let content = fs::read_to_string(path).ok()?;
                serde_yaml::from_str::<Self>(&content).ok()
            })
            .and_then(|config| config.log_level)
    }

    /// Config files tried when no `--config` path is given
    fn fallback_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("prdeval").join("prdeval.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Which side of the pipeline an LLM serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmRole {
    /// Writes the PRD (Claude by default)
    Generator,
    /// Scores the PRD (GPT by default)
    Evaluator,
}

impl LlmRole {
    fn default_provider(&self) -> &'static str {
        match self {
            LlmRole::Generator => "anthropic",
            LlmRole::Evaluator => "openai",
        }
    }
}

impl std::fmt::Display for LlmRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmRole::Generator => write!(f, "generator"),
            LlmRole::Evaluator => write!(f, "evaluator"),
        }
    }
}

/// LLM settings for one role as written in the config file
///
/// Every field is optional; unset fields take the defaults of the selected
/// provider when resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "openai")
    pub provider: Option<String>,

    /// Model identifier
    pub model: Option<String>,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: Option<u32>,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl LlmConfig {
    /// Fill unset fields from the provider defaults
    pub fn resolve(&self, role: LlmRole) -> Result<ResolvedLlmConfig> {
        let provider = self.provider.as_deref().unwrap_or(role.default_provider());
        debug!(%role, %provider, "LlmConfig::resolve: called");
        let defaults = ResolvedLlmConfig::defaults_for(provider)
            .ok_or_else(|| eyre::eyre!("Unknown LLM provider for {}: '{}'. Supported: anthropic, openai", role, provider))?;

        Ok(ResolvedLlmConfig {
            provider: defaults.provider,
            model: self.model.clone().unwrap_or(defaults.model),
            api_key_env: self.api_key_env.clone().unwrap_or(defaults.api_key_env),
            base_url: self
                .base_url
                .clone()
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
            temperature: self.temperature.unwrap_or(defaults.temperature),
        })
    }
}

/// Fully-specified LLM settings handed to a client
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub temperature: f32,
}

impl ResolvedLlmConfig {
    /// Defaults for a known provider: Claude 3 Opus with 1000 tokens for
    /// Anthropic, GPT-4o mini with 2000 tokens for OpenAI, temperature 0
    pub fn defaults_for(provider: &str) -> Option<Self> {
        match provider {
            "anthropic" => Some(Self {
                provider: "anthropic".to_string(),
                model: "claude-3-opus-20240229".to_string(),
                api_key_env: "claude_api_key".to_string(),
                base_url: "https://api.anthropic.com".to_string(),
                max_tokens: 1000,
                timeout_ms: 300_000,
                temperature: 0.0,
            }),
            "openai" => Some(Self {
                provider: "openai".to_string(),
                model: "gpt-4o-mini-2024-07-18".to_string(),
                api_key_env: "chatgpt_api_key".to_string(),
                base_url: "https://api.openai.com".to_string(),
                max_tokens: 2000,
                timeout_ms: 300_000,
                temperature: 0.0,
            }),
            _ => None,
        }
    }

    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(env_var = %self.api_key_env, "ResolvedLlmConfig::get_api_key: called");
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(eyre::eyre!(
                "API key not found. Set the {} environment variable.",
                self.api_key_env
            )),
        }
    }
}
