//! Command-line surface
//!
//! `execute` does the setup work in the order that lets configuration
//! problems fail before any locale is touched: provider credentials first,
//! then the diff file, then target discovery.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::config::{Credentials, OutputMode, ProviderConfig, ProviderName, RunOptions};
use crate::error::Result;
use crate::files::{discover_target_locales, read_text_file};
use crate::locale::validate_locale;
use crate::orchestrator::{Orchestrator, RunSummary};
use crate::provider::create_provider;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "ai-translate",
    version,
    about = "Translate i18n JSON locale files from a source-language diff using an LLM"
)]
pub struct Cli {
    /// Path to the git diff of the source-language JSON file (e.g. en.json)
    #[arg(long, value_name = "PATH")]
    pub diff: PathBuf,

    /// Target locale code (e.g. es, fr). Translates every locale found when omitted
    #[arg(long, value_name = "LOCALE_CODE")]
    pub lang: Option<String>,

    /// Source locale code
    #[arg(long, value_name = "LOCALE_CODE", default_value = "en")]
    pub source_lang: String,

    /// Directory containing the locale JSON files
    #[arg(long, value_name = "PATH", default_value = "./locales")]
    pub locales_path: PathBuf,

    /// LLM backend to use
    #[arg(long, value_enum, ignore_case = true, default_value_t = ProviderName::Gemini)]
    pub provider: ProviderName,

    /// Model identifier (provider default when omitted)
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature between 0 and 1
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Return the whole file (full) or only changed keys merged locally (delta)
    #[arg(long, value_enum, ignore_case = true, default_value_t = OutputMode::Full)]
    pub mode: OutputMode,

    /// Show detailed progress
    #[arg(short, long)]
    pub verbose: bool,
}

/// How a run ended when it did not fail outright
#[derive(Debug)]
pub enum RunStatus {
    /// The locale loop ran to completion
    Completed(RunSummary),
    /// Scanning found nothing to translate; no provider call was made
    NoTargets,
}

/// Run the whole command
///
/// # Errors
///
/// Setup failures (missing key, missing diff, unreadable locales directory,
/// invalid options) and write failures during the loop.
pub async fn execute(cli: &Cli, credentials: &Credentials) -> Result<RunStatus> {
    info!("Starting AI Translation CLI...");

    let provider_config = ProviderConfig::new(cli.model.clone(), cli.temperature)?;
    let provider = create_provider(cli.provider, &provider_config, credentials)?;
    validate_locale(&cli.source_lang)?;

    info!("Reading diff file from: {}", cli.diff.display());
    let diff = read_text_file(&cli.diff).await?;
    info!("Diff content loaded successfully");

    let locales = match &cli.lang {
        Some(lang) => {
            validate_locale(lang)?;
            info!("Target language specified: {}", lang);
            vec![lang.clone()]
        }
        None => {
            info!(
                "No target language specified, scanning {} for all languages...",
                cli.locales_path.display()
            );
            let found = discover_target_locales(&cli.locales_path, &cli.source_lang).await?;
            if found.is_empty() {
                warn!(
                    "No target locale files found in {} (excluding {}.json). Exiting.",
                    cli.locales_path.display(),
                    cli.source_lang
                );
                return Ok(RunStatus::NoTargets);
            }
            info!("Found target languages: {}", found.join(", "));
            found
        }
    };

    let orchestrator = Orchestrator::new(
        provider,
        RunOptions {
            locales_path: cli.locales_path.clone(),
            mode: cli.mode,
        },
    );
    info!("Using provider {}", orchestrator.provider().name());

    let summary = orchestrator.run(&diff, &locales).await?;
    Ok(RunStatus::Completed(summary))
}
