use std::time::Duration;

use thiserror::Error;

pub mod analyzer;
pub mod catalog;
pub mod config_file;
pub mod import;

// Re-export for convenience
pub use analyzer::{AnalysisError, AnalysisOutcome, Analyzer, OutcomeKind, TextRazorAnalyzer};
pub use catalog::{Catalog, CatalogError, FileRecord, RecordAnalysis, RecordStatus};
pub use import::{
    AnalysisFinished, DeleteConfirmation, FailurePolicy, ImportController, ImportError,
    ImportPhase, IncomingFile, Notice, RequestId, Severity, ValidationError,
};

/// Environment variable holding the analysis service key.
pub const API_KEY_ENV: &str = "TEXT_RAZOR_API_KEY";

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}

/// Runtime configuration shared by the CLI and TUI.
#[derive(Clone)]
pub struct Config {
    /// May be empty; the service then rejects calls with an auth error.
    pub api_key: String,
    pub endpoint: String,
    pub extractors: Vec<String>,
    pub failure_policy: FailurePolicy,
    pub notice_ttl: Duration,
    pub theme: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "api_key",
                &if self.api_key.is_empty() { "<empty>" } else { "***" },
            )
            .field("endpoint", &self.endpoint)
            .field("extractors", &self.extractors)
            .field("failure_policy", &self.failure_policy)
            .field("notice_ttl", &self.notice_ttl)
            .field("theme", &self.theme)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: analyzer::textrazor::DEFAULT_ENDPOINT.to_string(),
            extractors: analyzer::textrazor::DEFAULT_EXTRACTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            failure_policy: FailurePolicy::default(),
            notice_ttl: import::DEFAULT_NOTICE_TTL,
            theme: None,
        }
    }
}

impl Config {
    /// Resolve from the config files and the process environment.
    ///
    /// The key is taken from `cli_key`, then [`API_KEY_ENV`], then the config
    /// file, and is otherwise left empty.
    pub fn load(cli_key: Option<String>) -> Self {
        let file = config_file::load_config();
        let env_key = std::env::var(API_KEY_ENV).ok();
        Self::resolve(&file, env_key, cli_key)
    }

    /// Pure form of [`load`](Self::load).
    pub fn resolve(
        file: &config_file::ConfigFile,
        env_key: Option<String>,
        cli_key: Option<String>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(api) = &file.api {
            if let Some(endpoint) = &api.endpoint
                && !endpoint.is_empty()
            {
                config.endpoint = endpoint.clone();
            }
            if let Some(extractors) = &api.extractors
                && !extractors.is_empty()
            {
                config.extractors = extractors.clone();
            }
        }
        if let Some(policy) = file.import.as_ref().and_then(|i| i.failure_policy.as_ref()) {
            match FailurePolicy::parse(policy) {
                Some(p) => config.failure_policy = p,
                None => {
                    tracing::warn!(value = %policy, "unknown failure_policy, using default")
                }
            }
        }
        if let Some(display) = &file.display {
            if let Some(secs) = display.notice_secs {
                config.notice_ttl = Duration::from_secs(secs.max(1));
            }
            config.theme = display.theme.clone().filter(|t| !t.is_empty());
        }

        let file_key = file.api.as_ref().and_then(|a| a.api_key.clone());
        config.api_key = cli_key.or(env_key).or(file_key).unwrap_or_default();
        config
    }
}
