//! Analysis backend trait and implementations for the remote text-analysis service.

pub mod mock;
pub mod textrazor;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub use textrazor::{TextRazorAnalyzer, classify_response};

/// Boxed future returned by [`Analyzer::analyze`].
pub type AnalysisFuture<'a> =
    Pin<Box<dyn Future<Output = Result<AnalysisOutcome, AnalysisError>> + Send + 'a>>;

/// A backend that sends text content to an analysis service.
///
/// Implementations perform exactly one outbound call per invocation and never
/// retry; retry policy belongs to the caller.
pub trait Analyzer: Send + Sync {
    /// Display name of the backend (e.g., "TextRazor").
    fn name(&self) -> &str;

    /// Analyze `content` using `credentials` as the API key.
    ///
    /// An empty credential string is allowed; the service is expected to
    /// reject it with [`AnalysisError::Auth`].
    fn analyze<'a>(&'a self, content: &'a str, credentials: &'a str) -> AnalysisFuture<'a>;
}

/// Coarse classification of an analysis outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The service found something in the text.
    Info,
    /// The call succeeded but nothing was extracted.
    Warning,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// A named entity recognized in the analyzed text.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub matched_text: String,
    /// 0.0 - 1.0
    pub relevance: f64,
    pub confidence: f64,
    pub types: Vec<String>,
}

/// A topic the text was classified under.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub label: String,
    pub score: f64,
}

/// Normalized result of a successful analysis call.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub kind: OutcomeKind,
    /// Human-readable summary, e.g. "3 entities found".
    pub text: String,
    /// Mean entity relevance, if any entities were found.
    pub confidence: Option<f64>,
    pub language: Option<String>,
    pub entities: Vec<Entity>,
    pub topics: Vec<Topic>,
}

impl AnalysisOutcome {
    /// Build a bare outcome with no extracted details.
    pub fn summary(kind: OutcomeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            confidence: None,
            language: None,
            entities: Vec::new(),
            topics: Vec::new(),
        }
    }
}

/// Failure of a single analysis call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The service was unreachable or the connection dropped.
    #[error("network error: {0}")]
    Network(String),
    /// The service rejected the credentials (401/403).
    #[error("authorization rejected: {0}")]
    Auth(String),
    /// The service returned an error body or a non-2xx status.
    #[error("service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },
    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Nothing to analyze; no request was sent.
    #[error("content is empty")]
    EmptyContent,
}

impl AnalysisError {
    /// Short user-facing description. Never includes raw transport details.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "the analysis service could not be reached",
            Self::Auth(_) => "the API key was rejected",
            Self::Service { .. } => "the analysis service returned an error",
            Self::MalformedResponse(_) => "the analysis service sent an unreadable response",
            Self::EmptyContent => "the file has no content to analyze",
        }
    }
}
