//! Per-locale translation loop
//!
//! Each target locale moves through load → prompt → invoke → parse → apply →
//! persist and ends in exactly one `LocaleOutcome`. Locales are processed one
//! after another; a failure in one locale never stops the next, except a
//! write failure, which aborts the run.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::LocaleDocument;
use crate::config::{OutputMode, RunOptions};
use crate::error::{Result, TranslateError};
use crate::files::{locale_file_path, parse_locale_document, read_json_file, write_json_file};
use crate::locale::validate_locale;
use crate::merge::{count_leaves, merge};
use crate::prompt::build_prompt;
use crate::provider::LlmProvider;

/// Why a locale was skipped without writing
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The provider answered with something that is not a JSON object
    ResultParse { raw: String, error: String },
}

/// Terminal state of one locale
#[derive(Debug)]
pub enum LocaleOutcome {
    Updated {
        locale: String,
        path: PathBuf,
        /// Leaf values in the document that was written
        keys: usize,
    },
    Skipped {
        locale: String,
        reason: SkipReason,
    },
    Failed {
        locale: String,
        error: TranslateError,
    },
}

impl LocaleOutcome {
    pub fn locale(&self) -> &str {
        match self {
            LocaleOutcome::Updated { locale, .. }
            | LocaleOutcome::Skipped { locale, .. }
            | LocaleOutcome::Failed { locale, .. } => locale,
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, LocaleOutcome::Updated { .. })
    }
}

/// Outcomes of a run, in processing order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<LocaleOutcome>,
}

impl RunSummary {
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, LocaleOutcome::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, LocaleOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LocaleOutcome::Failed { .. }))
    }

    pub fn get(&self, locale: &str) -> Option<&LocaleOutcome> {
        self.outcomes.iter().find(|o| o.locale() == locale)
    }

    fn count(&self, pred: impl Fn(&LocaleOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} updated, {} skipped, {} failed",
            self.updated(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Drives one provider across a list of target locales
pub struct Orchestrator {
    provider: Box<dyn LlmProvider>,
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(provider: Box<dyn LlmProvider>, options: RunOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Translate `diff` into every locale in `locales`, strictly in order
    ///
    /// # Errors
    ///
    /// Only a `Write` failure is returned; every other error is recorded as
    /// that locale's `Failed` outcome.
    pub async fn run(&self, diff: &str, locales: &[String]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for locale in locales {
            info!("--- Starting translation for {} ---", locale);
            let outcome = match self.process_locale(diff, locale).await {
                Ok(outcome) => outcome,
                Err(e @ TranslateError::Write { .. }) => {
                    error!(locale = %locale, "Aborting run: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!(locale = %locale, "Translation failed: {}", e);
                    LocaleOutcome::Failed {
                        locale: locale.clone(),
                        error: e,
                    }
                }
            };
            summary.outcomes.push(outcome);
        }

        info!("All translations processed: {}", summary);
        Ok(summary)
    }

    async fn process_locale(&self, diff: &str, locale: &str) -> Result<LocaleOutcome> {
        validate_locale(locale)?;
        let target_path = locale_file_path(&self.options.locales_path, locale);

        let context = self.load_context(locale, &target_path).await?;
        let prompt = build_prompt(self.options.mode, diff, locale);

        info!(
            "Sending request to {} for {} ({:?} mode)...",
            self.provider.name(),
            locale,
            self.options.mode
        );
        let raw = self.provider.translate(&prompt, Some(&target_path)).await?;
        info!("Received response from {} for {}", self.provider.name(), locale);

        let result = match parse_locale_document(&raw) {
            Ok(doc) => doc,
            Err(parse_error) => {
                warn!(
                    locale = %locale,
                    "Response was not a valid JSON object ({}). Skipping update for this language.",
                    parse_error
                );
                warn!("Received: {}", raw);
                return Ok(LocaleOutcome::Skipped {
                    locale: locale.to_string(),
                    reason: SkipReason::ResultParse {
                        raw,
                        error: parse_error,
                    },
                });
            }
        };

        let updated = self.apply(&context, result);
        write_json_file(&target_path, &updated).await?;
        info!("Successfully updated {}", target_path.display());

        Ok(LocaleOutcome::Updated {
            locale: locale.to_string(),
            path: target_path,
            keys: count_leaves(&updated),
        })
    }

    async fn load_context(&self, locale: &str, path: &Path) -> Result<LocaleDocument> {
        match read_json_file(path).await {
            Ok(doc) => {
                info!("Loaded existing translations from {}", path.display());
                Ok(doc)
            }
            Err(TranslateError::FileNotFound { .. }) => {
                info!(
                    "No existing file found for {} at {}. Starting with an empty JSON object.",
                    locale,
                    path.display()
                );
                Ok(LocaleDocument::new())
            }
            Err(e) => Err(e),
        }
    }

    fn apply(&self, context: &LocaleDocument, result: LocaleDocument) -> LocaleDocument {
        match self.options.mode {
            OutputMode::Full => result,
            OutputMode::Delta => merge(context, &result),
        }
    }
}
