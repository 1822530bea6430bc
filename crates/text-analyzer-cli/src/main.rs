use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use text_analyzer_core::config_file::{self, ApiConfig, ConfigFile, DisplayConfig, ImportConfig};
use text_analyzer_core::{
    Catalog, Config, FailurePolicy, ImportController, IncomingFile, RecordStatus,
    TextRazorAnalyzer,
};

mod output;

use output::ColorMode;

/// Text Analyzer - Send a text file to an analysis service and report what it found
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and analyze a single .txt file
    Analyze {
        /// Path to the text file
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// API key (overrides TEXT_RAZOR_API_KEY and the config file)
        #[arg(long)]
        api_key: Option<String>,

        /// Analysis endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Comma-separated list of extractors
        #[arg(long, value_delimiter = ',')]
        extractors: Vec<String>,

        /// Keep a failed record instead of discarding it
        #[arg(long)]
        record_failures: bool,
    },

    /// Print the resolved configuration
    CheckConfig {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Store settings in the config file (unset options keep their value)
    SetConfig {
        /// API key to store
        #[arg(long)]
        api_key: Option<String>,

        /// Analysis endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Comma-separated list of extractors
        #[arg(long, value_delimiter = ',')]
        extractors: Vec<String>,

        /// What to do with failed analyses: discard or record
        #[arg(long, value_parser = parse_policy)]
        failure_policy: Option<FailurePolicy>,

        /// Color theme for the TUI: dark or light
        #[arg(long)]
        theme: Option<String>,

        /// Seconds a notice stays visible
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        notice_secs: Option<u64>,

        /// Write ./.text-analyzer.toml instead of the user config file
        #[arg(long)]
        local: bool,
    },
}

fn parse_policy(s: &str) -> Result<FailurePolicy, String> {
    FailurePolicy::parse(s)
        .ok_or_else(|| format!("unknown failure policy '{}' (expected discard or record)", s))
}

/// Build the sections to write; options that were not given stay `None`.
fn config_changes(
    api_key: Option<String>,
    endpoint: Option<String>,
    extractors: Vec<String>,
    failure_policy: Option<FailurePolicy>,
    theme: Option<String>,
    notice_secs: Option<u64>,
) -> ConfigFile {
    let extractors = (!extractors.is_empty()).then_some(extractors);
    let api = (api_key.is_some() || endpoint.is_some() || extractors.is_some()).then_some(
        ApiConfig {
            api_key,
            endpoint,
            extractors,
        },
    );
    let import = failure_policy.map(|p| ImportConfig {
        failure_policy: Some(p.as_str().to_string()),
    });
    let display = (theme.is_some() || notice_secs.is_some())
        .then_some(DisplayConfig { theme, notice_secs });
    ConfigFile {
        api,
        import,
        display,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            file_path,
            no_color,
            api_key,
            endpoint,
            extractors,
            record_failures,
        } => {
            let mut config = Config::load(api_key);
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            if !extractors.is_empty() {
                config.extractors = extractors;
            }
            if record_failures {
                config.failure_policy = FailurePolicy::Record;
            }
            analyze(file_path, config, ColorMode(!no_color)).await
        }
        Command::CheckConfig { no_color } => {
            let config = Config::load(None);
            tracing::debug!(?config, "resolved config");
            let mut stdout = std::io::stdout();
            output::print_config(&mut stdout, &config, ColorMode(!no_color))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::SetConfig {
            api_key,
            endpoint,
            extractors,
            failure_policy,
            theme,
            notice_secs,
            local,
        } => {
            let changes =
                config_changes(api_key, endpoint, extractors, failure_policy, theme, notice_secs);
            if changes == ConfigFile::default() {
                anyhow::bail!("Nothing to set; pass at least one option (see --help)");
            }
            let path = if local {
                let path = Path::new(".text-analyzer.toml");
                config_file::update_at(path, changes)?;
                path.to_path_buf()
            } else {
                config_file::save_config(changes)?
            };
            println!("Saved {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn analyze(file_path: PathBuf, config: Config, color: ColorMode) -> anyhow::Result<ExitCode> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    let file = IncomingFile::from_path(&file_path)?;
    let filename = file.name.clone();

    let analyzer = Arc::new(TextRazorAnalyzer::from_config(&config)?);
    let mut controller =
        ImportController::new(analyzer, config.api_key.clone()).with_policy(config.failure_policy);
    let mut catalog = Catalog::new();

    let mut stdout = std::io::stdout();
    let notice = match controller.run(file, &mut catalog).await {
        Ok(notice) => notice,
        Err(e) => {
            // Validation failures already raised a notice
            match controller.notice() {
                Some(notice) => output::print_notice(&mut stdout, notice, color)?,
                None => writeln!(stdout, "{}", e)?,
            }
            return Ok(ExitCode::from(2));
        }
    };

    output::print_notice(&mut stdout, &notice, color)?;
    match catalog.get(&filename) {
        Some(record) if record.status == RecordStatus::Ready => {
            if let Some(outcome) = record.outcome() {
                output::print_outcome(&mut stdout, &filename, outcome, color)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_given_options_become_changes() {
        let changes = config_changes(
            None,
            None,
            vec![],
            Some(FailurePolicy::Record),
            None,
            Some(3),
        );
        assert!(changes.api.is_none());
        assert_eq!(
            changes.import.unwrap().failure_policy.as_deref(),
            Some("record")
        );
        let display = changes.display.unwrap();
        assert_eq!(display.notice_secs, Some(3));
        assert!(display.theme.is_none());

        let empty = config_changes(None, None, vec![], None, None, None);
        assert_eq!(empty, ConfigFile::default());
    }

    #[test]
    fn set_config_parses_policy_and_rejects_unknown() {
        let cli = Cli::try_parse_from([
            "text-analyzer",
            "set-config",
            "--failure-policy",
            "Record",
            "--extractors",
            "entities,topics",
        ])
        .unwrap();
        match cli.command {
            Command::SetConfig {
                failure_policy,
                extractors,
                local,
                ..
            } => {
                assert_eq!(failure_policy, Some(FailurePolicy::Record));
                assert_eq!(extractors, vec!["entities", "topics"]);
                assert!(!local);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(
            Cli::try_parse_from(["text-analyzer", "set-config", "--failure-policy", "keep"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from(["text-analyzer", "set-config", "--notice-secs", "0"]).is_err()
        );
    }
}
