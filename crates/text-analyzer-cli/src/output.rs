use std::io::Write;

use owo_colors::OwoColorize;
use text_analyzer_core::{AnalysisOutcome, Config, Notice, OutcomeKind, Severity};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the notice raised by an import attempt.
pub fn print_notice(w: &mut dyn Write, notice: &Notice, color: ColorMode) -> std::io::Result<()> {
    let tag = match notice.severity {
        Severity::Success => "OK",
        Severity::Info => "INFO",
        Severity::Warning => "WARNING",
        Severity::Danger => "ERROR",
    };
    if color.enabled() {
        let tag = match notice.severity {
            Severity::Success => tag.green().bold().to_string(),
            Severity::Info => tag.cyan().bold().to_string(),
            Severity::Warning => tag.yellow().bold().to_string(),
            Severity::Danger => tag.red().bold().to_string(),
        };
        writeln!(w, "{} {}", tag, notice.message)
    } else {
        writeln!(w, "{} {}", tag, notice.message)
    }
}

/// Print the details of a successful analysis.
pub fn print_outcome(
    w: &mut dyn Write,
    filename: &str,
    outcome: &AnalysisOutcome,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", filename.bold())?;
    } else {
        writeln!(w, "{}", filename)?;
    }

    let kind = outcome.kind.as_str();
    match (outcome.kind, color.enabled()) {
        (OutcomeKind::Info, true) => writeln!(w, "  Result:     {} ({})", outcome.text, kind.cyan())?,
        (OutcomeKind::Warning, true) => {
            writeln!(w, "  Result:     {} ({})", outcome.text, kind.yellow())?
        }
        _ => writeln!(w, "  Result:     {} ({})", outcome.text, kind)?,
    }
    if let Some(confidence) = outcome.confidence {
        writeln!(w, "  Confidence: {:.0}%", confidence * 100.0)?;
    }
    if let Some(language) = &outcome.language {
        writeln!(w, "  Language:   {}", language)?;
    }

    if !outcome.entities.is_empty() {
        writeln!(w, "  Entities:")?;
        for entity in outcome.entities.iter().take(10) {
            let label = if entity.id.is_empty() {
                &entity.matched_text
            } else {
                &entity.id
            };
            if color.enabled() {
                writeln!(
                    w,
                    "    - {} {}",
                    label,
                    format!("({:.2})", entity.relevance).dimmed()
                )?;
            } else {
                writeln!(w, "    - {} ({:.2})", label, entity.relevance)?;
            }
        }
        if outcome.entities.len() > 10 {
            writeln!(w, "    ... and {} more", outcome.entities.len() - 10)?;
        }
    }

    if !outcome.topics.is_empty() {
        writeln!(w, "  Topics:")?;
        for topic in &outcome.topics {
            writeln!(w, "    - {} ({:.2})", topic.label, topic.score)?;
        }
    }
    Ok(())
}

/// Print the resolved configuration. The key is never printed.
pub fn print_config(w: &mut dyn Write, config: &Config, color: ColorMode) -> std::io::Result<()> {
    let key_state = if config.api_key.is_empty() {
        "not set (requests will be rejected)"
    } else {
        "set"
    };
    if color.enabled() && config.api_key.is_empty() {
        writeln!(w, "API key:        {}", key_state.yellow())?;
    } else {
        writeln!(w, "API key:        {}", key_state)?;
    }
    writeln!(w, "Endpoint:       {}", config.endpoint)?;
    writeln!(w, "Extractors:     {}", config.extractors.join(","))?;
    writeln!(w, "Failure policy: {}", config.failure_policy.as_str())?;
    writeln!(w, "Notice timeout: {}s", config.notice_ttl.as_secs())?;
    writeln!(
        w,
        "Theme:          {}",
        config.theme.as_deref().unwrap_or("default")
    )?;
    match text_analyzer_core::config_file::config_path() {
        Some(path) => writeln!(w, "Config file:    {}", path.display()),
        None => writeln!(w, "Config file:    (no config directory)"),
    }
}
