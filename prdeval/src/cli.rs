//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{Config, LlmRole};
use crate::prompts::ENRICH_TASK;

/// prdeval - PRD generation and evaluation
#[derive(Parser)]
#[command(
    name = "prdeval",
    about = "Generate PRDs from task descriptions and score them with a second model",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Path to a prompts.json catalog
    #[arg(short, long, global = true, help = "Path to prompts.json catalog")]
    pub prompts: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a PRD from a task
    Generate {
        /// Task JSON file ("-" for stdin)
        #[arg(value_name = "TASK_JSON")]
        task: PathBuf,

        /// Generation style
        #[arg(short, long, default_value = "comprehensive")]
        style: String,

        /// Prompt type
        #[arg(short = 't', long = "type", default_value = ENRICH_TASK)]
        prompt_type: String,
    },

    /// Score an existing PRD
    Evaluate {
        /// PRD file ("-" for stdin)
        #[arg(value_name = "PRD_FILE")]
        prd: PathBuf,

        /// Task JSON the PRD was written for
        #[arg(long, value_name = "TASK_JSON")]
        task: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate and evaluate a PRD per style, then compare the scores
    Run {
        /// Task JSON file ("-" for stdin)
        #[arg(value_name = "TASK_JSON")]
        task: PathBuf,

        /// Styles to compare (repeatable)
        #[arg(short, long = "style", default_values_t = default_styles())]
        styles: Vec<String>,

        /// Prompt type
        #[arg(short = 't', long = "type", default_value = ENRICH_TASK)]
        prompt_type: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Send a raw prompt to the generator model
    Ask {
        /// User prompt
        prompt: String,

        /// System prompt
        #[arg(long, default_value = "You are a helpful assistant.")]
        system: String,
    },

    /// List prompt types, styles, and templates in the active catalog
    Prompts,
}

fn default_styles() -> Vec<String> {
    vec!["comprehensive".to_string(), "concise".to_string()]
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prdeval")
        .join("logs")
        .join("prdeval.log")
}

/// Help footer showing API key status and log location
pub fn generate_after_help(config: &Config) -> String {
    debug!("generate_after_help: called");
    let mut help = String::from("API keys:\n");

    for role in [LlmRole::Generator, LlmRole::Evaluator] {
        match config.resolve(role) {
            Ok(resolved) => {
                let status = if std::env::var(&resolved.api_key_env).is_ok() {
                    "set"
                } else {
                    "missing"
                };
                help.push_str(&format!(
                    "  {:<10} {} {} ({})\n",
                    role.to_string(),
                    resolved.provider,
                    resolved.api_key_env,
                    status
                ));
            }
            Err(e) => {
                debug!(%role, error = %e, "generate_after_help: resolve failed");
                help.push_str(&format!("  {:<10} invalid config: {}\n", role.to_string(), e));
            }
        }
    }

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

/// Output format for evaluate/run results
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
