//! Mock analysis backend for testing and offline use.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{AnalysisError, AnalysisFuture, AnalysisOutcome, Analyzer, OutcomeKind};

/// A configurable mock response for [`MockAnalyzer`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a successful analysis.
    Outcome(AnalysisOutcome),
    /// Simulate a failed call.
    Fail(AnalysisError),
}

impl MockResponse {
    /// Shorthand for a successful `info` outcome with the given text.
    pub fn info(text: &str) -> Self {
        Self::Outcome(AnalysisOutcome::summary(OutcomeKind::Info, text))
    }
}

/// A hand-rolled mock implementing [`Analyzer`].
///
/// Supports:
/// - A fixed response (used for every call), **or**
/// - A sequence of responses (one per call, repeating the last if exhausted).
/// - Optional per-call latency.
/// - Call counting via [`call_count()`](MockAnalyzer::call_count).
pub struct MockAnalyzer {
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    last_credentials: Mutex<Option<String>>,
}

impl MockAnalyzer {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            call_count: AtomicUsize::new(0),
            last_credentials: Mutex::new(None),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    ///
    /// An empty sequence behaves like an `info` mock reporting no entities.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        responses.reverse();
        let fallback = responses
            .first()
            .cloned()
            .unwrap_or_else(|| MockResponse::info("0 entities found"));
        Self {
            responses: Mutex::new(responses),
            ..Self::new(fallback)
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `analyze()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Credentials passed to the most recent call.
    pub fn last_credentials(&self) -> Option<String> {
        self.last_credentials.lock().ok().and_then(|c| c.clone())
    }

    fn next_response(&self) -> MockResponse {
        match self.responses.lock() {
            Ok(mut seq) => seq.pop().unwrap_or_else(|| self.fallback.clone()),
            Err(_) => self.fallback.clone(),
        }
    }
}

impl Analyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "Mock"
    }

    fn analyze<'a>(&'a self, content: &'a str, credentials: &'a str) -> AnalysisFuture<'a> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_credentials.lock() {
            *last = Some(credentials.to_string());
        }
        let response = self.next_response();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            if content.is_empty() {
                return Err(AnalysisError::EmptyContent);
            }
            match response {
                MockResponse::Outcome(outcome) => Ok(outcome),
                MockResponse::Fail(err) => Err(err),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequence_repeats_last_response() {
        let mock = MockAnalyzer::with_sequence(vec![
            MockResponse::Fail(AnalysisError::Network("down".into())),
            MockResponse::info("2 entities found"),
        ]);

        assert!(mock.analyze("a", "k").await.is_err());
        assert_eq!(mock.analyze("a", "k").await.unwrap().text, "2 entities found");
        assert_eq!(mock.analyze("a", "k").await.unwrap().text, "2 entities found");
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.last_credentials().as_deref(), Some("k"));
    }
}
