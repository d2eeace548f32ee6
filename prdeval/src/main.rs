//! prdeval - PRD generation and evaluation
//!
//! CLI entry point: generate PRDs with one model, score them with another.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use prdeval::cli::{Cli, Command, OutputFormat, generate_after_help};
use prdeval::config::{Config, LlmRole};
use prdeval::domain::TaskInfo;
use prdeval::evaluator::{ContentEvaluator, EvaluatorSettings, Generation};
use prdeval::llm::create_client;
use prdeval::prompts::PromptManager;
use prdeval::report;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prdeval")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("prdeval.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // API keys may live in ./.env; variables already set win
    dotenvy::dotenv().ok();

    let help_config = Config::load(None).unwrap_or_default();
    let cmd = Cli::command().after_help(generate_after_help(&help_config));
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let prompts = PromptManager::load(cli.prompts.as_deref(), config.prompts_file.as_deref())
        .context("Failed to load prompt catalog")?;
    info!("Using prompt catalog: {}", prompts.source());

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate {
            task,
            style,
            prompt_type,
        } => {
            debug!(?task, %style, %prompt_type, "main: matched Generate command");
            cmd_generate(&config, prompts, &task, &prompt_type, &style).await
        }
        Command::Evaluate { prd, task, format } => {
            debug!(?prd, ?task, %format, "main: matched Evaluate command");
            cmd_evaluate(&config, prompts, &prd, task.as_deref(), format).await
        }
        Command::Run {
            task,
            styles,
            prompt_type,
            format,
        } => {
            debug!(?task, ?styles, %prompt_type, %format, "main: matched Run command");
            cmd_run(&config, prompts, &task, &prompt_type, &styles, format).await
        }
        Command::Ask { prompt, system } => {
            debug!("main: matched Ask command");
            cmd_ask(&config, prompts, &system, &prompt).await
        }
        Command::Prompts => {
            debug!("main: matched Prompts command");
            cmd_prompts(&prompts)
        }
    }
}

/// Build the evaluator with clients for both roles
fn build_evaluator(config: &Config, prompts: PromptManager) -> Result<ContentEvaluator> {
    debug!("build_evaluator: called");
    let generator_config = config.resolve(LlmRole::Generator)?;
    let evaluator_config = config.resolve(LlmRole::Evaluator)?;

    let generator = create_client(&generator_config).context("Failed to create generator client")?;
    let evaluator = create_client(&evaluator_config).context("Failed to create evaluator client")?;
    info!(
        "Generator: {} ({}), evaluator: {} ({})",
        generator_config.provider, generator_config.model, evaluator_config.provider, evaluator_config.model
    );

    let settings = EvaluatorSettings::from_config(&generator_config, &evaluator_config);
    Ok(ContentEvaluator::new(prompts, generator, evaluator, settings))
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

/// Read a text file, or stdin when the path is "-"
fn read_input(path: &Path) -> Result<String> {
    debug!(?path, "read_input: called");
    if is_stdin(path) {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }
    fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}

fn warn_if_truncated(generation: &Generation) {
    if generation.truncated {
        warn!(style = %generation.style, "generation hit the token limit");
        eprintln!(
            "Warning: {} PRD hit the max-tokens limit and may be cut off",
            generation.style
        );
    }
}

/// Generate one PRD and print it
async fn cmd_generate(
    config: &Config,
    prompts: PromptManager,
    task_path: &Path,
    prompt_type: &str,
    style: &str,
) -> Result<()> {
    debug!(?task_path, %prompt_type, %style, "cmd_generate: called");
    let task = TaskInfo::load(task_path)?;
    let evaluator = build_evaluator(config, prompts)?;

    let generation = evaluator.generate(&task, prompt_type, style).await?;
    warn_if_truncated(&generation);
    println!("{}", generation.content);
    Ok(())
}

/// Score an existing PRD
async fn cmd_evaluate(
    config: &Config,
    prompts: PromptManager,
    prd_path: &Path,
    task_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    debug!(?prd_path, ?task_path, %format, "cmd_evaluate: called");
    if is_stdin(prd_path) && task_path.is_some_and(is_stdin) {
        eyre::bail!("PRD_FILE and --task cannot both read from stdin (\"-\")");
    }
    let content = read_input(prd_path)?;
    let original_task = task_path.map(TaskInfo::load).transpose()?.map(|t| t.to_original_task());
    let evaluator = build_evaluator(config, prompts)?;

    let result = evaluator.evaluate(&content, original_task.as_deref()).await?;

    match format {
        OutputFormat::Text => print!("{}", report::render_evaluation(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

/// Generate and evaluate each style, then compare
async fn cmd_run(
    config: &Config,
    prompts: PromptManager,
    task_path: &Path,
    prompt_type: &str,
    styles: &[String],
    format: OutputFormat,
) -> Result<()> {
    debug!(?task_path, %prompt_type, ?styles, %format, "cmd_run: called");
    config.validate()?;
    let task = TaskInfo::load(task_path)?;
    let evaluator = build_evaluator(config, prompts)?;

    let mut runs = Vec::with_capacity(styles.len());
    for style in styles {
        info!("Running style: {}", style);
        let run = evaluator
            .run(&task, prompt_type, style)
            .await
            .context(format!("Style '{}' failed", style))?;
        warn_if_truncated(&run.generation);
        runs.push(run);
    }

    match format {
        OutputFormat::Text => {
            for run in &runs {
                println!("=== {} ===\n", run.style());
                println!("{}\n", run.generation.content);
                print!("{}", report::render_evaluation(&run.evaluation));
                println!();
            }
            print!("{}", report::render_comparison(&runs));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&runs)?),
    }
    Ok(())
}

/// Raw completion from the generator
async fn cmd_ask(config: &Config, prompts: PromptManager, system: &str, prompt: &str) -> Result<()> {
    debug!(%system, "cmd_ask: called");
    let evaluator = build_evaluator(config, prompts)?;
    let answer = evaluator.complete(system, prompt).await?;
    println!("{}", answer);
    Ok(())
}

/// List what the active catalog offers
fn cmd_prompts(prompts: &PromptManager) -> Result<()> {
    debug!("cmd_prompts: called");
    println!("Catalog: {}\n", prompts.source());

    println!("Generation prompt types:");
    for prompt_type in prompts.prompt_types() {
        println!("  {}", prompt_type);
        println!("    styles: {}", prompts.styles(&prompt_type).join(", "));
    }

    let catalog = prompts.catalog();
    for category in [prdeval::prompts::CONTENT_GENERATION, prdeval::prompts::CONTENT_EVALUATION] {
        let Some(templates) = catalog.user_templates(category) else {
            continue;
        };
        println!("\nUser templates ({}):", category);
        for (name, template) in templates {
            match &template.description {
                Some(description) => println!("  {} - {}", name, description),
                None => println!("  {}", name),
            }
        }
    }
    Ok(())
}
