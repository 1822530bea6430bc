//! Import workflow: validate a file, analyze it, and record the result.
//!
//! At most one analysis is in flight at a time. The [`ImportController`] owns
//! that single slot; a second attempt while it is occupied is refused with
//! [`ImportError::Busy`] and changes nothing.

pub mod delete;
pub mod notice;
pub mod validate;

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::analyzer::{AnalysisError, AnalysisOutcome, Analyzer};
use crate::catalog::{Catalog, FileRecord, RecordStatus};

pub use delete::DeleteConfirmation;
pub use notice::{DEFAULT_NOTICE_TTL, Notice, Severity};
pub use validate::{AcceptedFile, IncomingFile, MAX_FILE_SIZE, ValidationError, validate};

/// Identifies one submitted analysis.
pub type RequestId = u64;

/// Where the controller is in the current (or last) import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    Validating,
    Submitting,
    Completed,
    Rejected,
}

impl ImportPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }
}

/// What happens to the catalog when an analysis call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the catalog untouched; only raise a notice.
    #[default]
    Discard,
    /// Keep a `Failed` record so the attempt stays visible.
    Record,
}

impl FailurePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discard" => Some(Self::Discard),
            "record" => Some(Self::Record),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discard => "discard",
            Self::Record => "record",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Another analysis is still running.
    #[error("an analysis of {in_flight} is already running")]
    Busy { in_flight: String },
}

/// An accepted import handed to the analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: RequestId,
    pub filename: String,
    pub content: String,
}

/// Result of a spawned analysis, delivered back to the controller's owner.
#[derive(Debug, Clone)]
pub struct AnalysisFinished {
    pub id: RequestId,
    pub result: Result<AnalysisOutcome, AnalysisError>,
}

struct InFlight {
    id: RequestId,
    filename: String,
    content: String,
    /// Set when the call was spawned; dropping it detaches the task.
    task: Option<JoinHandle<()>>,
}

/// Drives one import at a time from validation to a catalog update.
pub struct ImportController {
    analyzer: Arc<dyn Analyzer>,
    credentials: String,
    policy: FailurePolicy,
    phase: ImportPhase,
    in_flight: Option<InFlight>,
    next_id: RequestId,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl ImportController {
    pub fn new(analyzer: Arc<dyn Analyzer>, credentials: impl Into<String>) -> Self {
        Self {
            analyzer,
            credentials: credentials.into(),
            policy: FailurePolicy::default(),
            phase: ImportPhase::Idle,
            in_flight: None,
            next_id: 1,
            notice: None,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// Leave a terminal phase (`Completed` or `Rejected`) for `Idle`.
    ///
    /// Happens implicitly when the next attempt starts. Returns true if the
    /// phase changed; a busy or idle controller is left as is.
    pub fn reset(&mut self) -> bool {
        match self.phase {
            ImportPhase::Completed | ImportPhase::Rejected => {
                tracing::trace!(from = self.phase.label(), "import phase reset");
                self.phase = ImportPhase::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.phase.is_busy()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    /// Name of the file whose analysis is currently running.
    pub fn in_flight_filename(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.filename.as_str())
    }

    pub fn in_flight_id(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|f| f.id)
    }

    /// Last outcome message, until dismissed or expired.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Show a notice that did not come from an import attempt, such as a
    /// file that could not be read. Replaces any current notice.
    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Clear the notice if it has been visible for its full duration.
    /// Returns true if a notice was cleared.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(now, self.notice_ttl))
        {
            self.notice = None;
            return true;
        }
        false
    }

    /// Validate `file` and claim the in-flight slot.
    ///
    /// The caller is expected to run the analysis and hand the result to
    /// [`complete`](Self::complete). Under [`FailurePolicy::Record`] a
    /// `Pending` record is written to the catalog here.
    pub fn begin(
        &mut self,
        file: IncomingFile,
        catalog: &mut Catalog,
    ) -> Result<Submission, ImportError> {
        self.ensure_idle(&file)?;
        let flight = self.admit(file, catalog)?;
        let submission = Submission {
            id: flight.id,
            filename: flight.filename.clone(),
            content: flight.content.clone(),
        };
        self.in_flight = Some(flight);
        Ok(submission)
    }

    /// [`begin`](Self::begin), then run the analysis on a background task.
    ///
    /// The result is sent on `events` as an [`AnalysisFinished`] and must be
    /// passed back to [`complete`](Self::complete). If the receiver is gone
    /// by then, the result is dropped.
    pub fn spawn<E>(
        &mut self,
        file: IncomingFile,
        catalog: &mut Catalog,
        events: mpsc::UnboundedSender<E>,
    ) -> Result<RequestId, ImportError>
    where
        E: From<AnalysisFinished> + Send + 'static,
    {
        let Submission { id, content, .. } = self.begin(file, catalog)?;
        let analyzer = Arc::clone(&self.analyzer);
        let credentials = self.credentials.clone();

        let task = tokio::spawn(async move {
            let result = analyzer.analyze(&content, &credentials).await;
            if events.send(AnalysisFinished { id, result }.into()).is_err() {
                tracing::debug!(request_id = id, "analysis finished after receiver closed");
            }
        });

        if let Some(flight) = self.in_flight.as_mut() {
            flight.task = Some(task);
        }
        Ok(id)
    }

    /// Apply the result of request `id`.
    ///
    /// Results for anything but the current in-flight request are stale and
    /// ignored (returns `None`). Under [`FailurePolicy::Record`] the result is
    /// also stale once the request's `Pending` record has left the catalog,
    /// e.g. because the user deleted it while the analysis was running.
    pub fn complete(
        &mut self,
        id: RequestId,
        result: Result<AnalysisOutcome, AnalysisError>,
        catalog: &mut Catalog,
    ) -> Option<Notice> {
        if self.in_flight_id() != Some(id) {
            tracing::warn!(request_id = id, "ignoring stale analysis result");
            return None;
        }
        let flight = self.in_flight.take()?;

        if self.policy == FailurePolicy::Record
            && !catalog
                .get(&flight.filename)
                .is_some_and(|r| r.status == RecordStatus::Pending)
        {
            tracing::warn!(
                request_id = id,
                filename = %flight.filename,
                "pending record is gone, ignoring analysis result"
            );
            self.phase = ImportPhase::Idle;
            return None;
        }

        Some(self.settle(flight, result, catalog))
    }

    /// Validate, analyze, and apply in one call.
    pub async fn run(
        &mut self,
        file: IncomingFile,
        catalog: &mut Catalog,
    ) -> Result<Notice, ImportError> {
        self.ensure_idle(&file)?;
        let flight = self.admit(file, catalog)?;
        let result = self
            .analyzer
            .analyze(&flight.content, &self.credentials)
            .await;
        Ok(self.settle(flight, result, catalog))
    }

    /// Release the in-flight slot because its UI context went away.
    ///
    /// The analysis keeps running, but its result will be treated as stale.
    pub fn abandon(&mut self, catalog: &mut Catalog) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };
        tracing::info!(request_id = flight.id, filename = %flight.filename, "abandoning analysis");
        // Dropping the handle detaches the task; it is not cancelled.
        drop(flight.task);

        if self.policy == FailurePolicy::Record
            && catalog
                .get(&flight.filename)
                .is_some_and(|r| r.status == RecordStatus::Pending)
        {
            catalog.upsert(
                flight.filename.clone(),
                FileRecord::failed(flight.filename, flight.content, "analysis abandoned"),
            );
        }
        self.phase = ImportPhase::Idle;
    }

    fn ensure_idle(&self, file: &IncomingFile) -> Result<(), ImportError> {
        match &self.in_flight {
            Some(current) => {
                tracing::error!(
                    filename = %file.name,
                    in_flight = %current.filename,
                    "import refused: analysis already in flight"
                );
                Err(ImportError::Busy {
                    in_flight: current.filename.clone(),
                })
            }
            None => Ok(()),
        }
    }

    /// Validation step shared by [`begin`](Self::begin) and [`run`](Self::run).
    fn admit(
        &mut self,
        file: IncomingFile,
        catalog: &mut Catalog,
    ) -> Result<InFlight, ImportError> {
        self.reset();
        self.phase = ImportPhase::Validating;
        tracing::debug!(filename = %file.name, size = file.size, "validating import");

        let accepted = match validate(file) {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::info!(error = %err, "import rejected");
                self.phase = ImportPhase::Rejected;
                self.notice = Some(Notice::warning(err.to_string()));
                return Err(err.into());
            }
        };

        let id = self.next_id;
        self.next_id += 1;

        if self.policy == FailurePolicy::Record {
            catalog.upsert(
                accepted.filename.clone(),
                FileRecord::pending(accepted.filename.clone(), accepted.content.clone()),
            );
        }

        self.phase = ImportPhase::Submitting;
        tracing::info!(
            request_id = id,
            filename = %accepted.filename,
            bytes = accepted.size,
            analyzer = self.analyzer.name(),
            "analysis submitted"
        );

        Ok(InFlight {
            id,
            filename: accepted.filename,
            content: accepted.content,
            task: None,
        })
    }

    fn settle(
        &mut self,
        flight: InFlight,
        result: Result<AnalysisOutcome, AnalysisError>,
        catalog: &mut Catalog,
    ) -> Notice {
        let InFlight {
            id,
            filename,
            content,
            ..
        } = flight;

        let notice = match result {
            Ok(outcome) => {
                tracing::info!(request_id = id, filename = %filename, summary = %outcome.text, "analysis complete");
                let notice = Notice::success(format!("{} analyzed: {}", filename, outcome.text));
                catalog.upsert(filename.clone(), FileRecord::ready(filename, content, outcome));
                self.phase = ImportPhase::Completed;
                notice
            }
            Err(err) => {
                tracing::warn!(request_id = id, filename = %filename, error = %err, "analysis failed");
                let notice = Notice::danger(format!(
                    "Analysis of {} failed: {}.",
                    filename,
                    err.user_message()
                ));
                if self.policy == FailurePolicy::Record {
                    catalog.upsert(
                        filename.clone(),
                        FileRecord::failed(filename, content, err.to_string()),
                    );
                }
                self.phase = ImportPhase::Rejected;
                notice
            }
        };

        self.notice = Some(notice.clone());
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::mock::{MockAnalyzer, MockResponse};
    use crate::analyzer::OutcomeKind;

    fn controller(mock: Arc<MockAnalyzer>) -> ImportController {
        ImportController::new(mock, "secret")
    }

    fn notes() -> IncomingFile {
        IncomingFile::new("notes.txt", b"0123456789".to_vec())
    }

    #[tokio::test]
    async fn run_success_upserts_ready_record() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("3 entities found")));
        let mut ctl = controller(mock.clone());
        let mut catalog = Catalog::new();

        let notice = ctl.run(notes(), &mut catalog).await.unwrap();

        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(ctl.phase(), ImportPhase::Completed);
        assert!(!ctl.is_busy());
        let record = catalog.get("notes.txt").unwrap();
        assert_eq!(record.status, RecordStatus::Ready);
        assert_eq!(record.outcome().unwrap().kind, OutcomeKind::Info);
        assert_eq!(mock.last_credentials().as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn validation_failure_never_calls_analyzer() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock.clone());
        let mut catalog = Catalog::new();

        let err = ctl
            .run(IncomingFile::new("image.png", vec![1, 2, 3]), &mut catalog)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::Validation(ValidationError::UnsupportedType { .. })
        ));
        assert_eq!(mock.call_count(), 0);
        assert_eq!(ctl.phase(), ImportPhase::Rejected);
        assert_eq!(ctl.notice().unwrap().severity, Severity::Warning);
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn begin_twice_is_busy_and_keeps_first() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock);
        let mut catalog = Catalog::new();

        let first = ctl.begin(notes(), &mut catalog).unwrap();
        let err = ctl
            .begin(IncomingFile::new("other.txt", b"abc".to_vec()), &mut catalog)
            .unwrap_err();

        assert_eq!(
            err,
            ImportError::Busy {
                in_flight: "notes.txt".into()
            }
        );
        assert_eq!(ctl.in_flight_id(), Some(first.id));
        assert_eq!(ctl.phase(), ImportPhase::Submitting);
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn stale_result_is_ignored() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock);
        let mut catalog = Catalog::new();

        let submission = ctl.begin(notes(), &mut catalog).unwrap();
        let notice = ctl.complete(
            submission.id + 100,
            Ok(AnalysisOutcome::summary(OutcomeKind::Info, "x")),
            &mut catalog,
        );
        assert!(notice.is_none());
        assert!(catalog.is_empty());
        assert_eq!(ctl.in_flight_id(), Some(submission.id));
    }

    #[tokio::test]
    async fn abandoned_result_is_ignored() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock);
        let mut catalog = Catalog::new();

        let submission = ctl.begin(notes(), &mut catalog).unwrap();
        ctl.abandon(&mut catalog);
        assert!(!ctl.is_busy());
        assert_eq!(ctl.phase(), ImportPhase::Idle);

        let notice = ctl.complete(
            submission.id,
            Ok(AnalysisOutcome::summary(OutcomeKind::Info, "x")),
            &mut catalog,
        );
        assert!(notice.is_none());
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn spawn_delivers_result_through_channel() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("2 entities found")));
        let mut ctl = controller(mock);
        let mut catalog = Catalog::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<AnalysisFinished>();

        let id = ctl.spawn(notes(), &mut catalog, tx).unwrap();
        assert!(ctl.is_busy());
        assert_eq!(ctl.in_flight_filename(), Some("notes.txt"));

        let finished = rx.recv().await.unwrap();
        assert_eq!(finished.id, id);
        let notice = ctl
            .complete(finished.id, finished.result, &mut catalog)
            .unwrap();
        assert_eq!(notice.message, "notes.txt analyzed: 2 entities found");
        assert!(!ctl.is_busy());
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn failure_with_discard_policy_leaves_catalog_alone() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::Fail(AnalysisError::Network(
            "connection refused".into(),
        ))));
        let mut ctl = controller(mock);
        let mut catalog = Catalog::new();
        catalog.upsert("notes.txt", FileRecord::pending("notes.txt", "old"));

        let notice = ctl.run(notes(), &mut catalog).await.unwrap();

        assert_eq!(notice.severity, Severity::Danger);
        assert_eq!(
            notice.message,
            "Analysis of notes.txt failed: the analysis service could not be reached."
        );
        assert!(!notice.message.contains("refused"));
        assert_eq!(ctl.phase(), ImportPhase::Rejected);
        // The earlier record with the same name is untouched
        assert_eq!(catalog.get("notes.txt").unwrap().content, "old");
    }

    #[tokio::test]
    async fn failure_with_record_policy_keeps_failed_record() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::Fail(AnalysisError::Auth(
            "invalid key".into(),
        ))));
        let mut ctl = controller(mock).with_policy(FailurePolicy::Record);
        let mut catalog = Catalog::new();

        let submission = ctl.begin(notes(), &mut catalog).unwrap();
        assert_eq!(
            catalog.get("notes.txt").unwrap().status,
            RecordStatus::Pending
        );

        ctl.complete(
            submission.id,
            Err(AnalysisError::Auth("invalid key".into())),
            &mut catalog,
        );
        let record = catalog.get("notes.txt").unwrap();
        assert_eq!(record.status, RecordStatus::Failed);
        assert!(record.outcome().is_none());
    }

    #[tokio::test]
    async fn abandon_with_record_policy_fails_pending_record() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock).with_policy(FailurePolicy::Record);
        let mut catalog = Catalog::new();

        ctl.begin(notes(), &mut catalog).unwrap();
        ctl.abandon(&mut catalog);
        assert_eq!(
            catalog.get("notes.txt").unwrap().status,
            RecordStatus::Failed
        );
    }

    #[tokio::test]
    async fn terminal_phase_accepts_next_attempt() {
        let mock = Arc::new(MockAnalyzer::with_sequence(vec![
            MockResponse::Fail(AnalysisError::Network("down".into())),
            MockResponse::info("1 entity found"),
        ]));
        let mut ctl = controller(mock);
        let mut catalog = Catalog::new();

        ctl.run(notes(), &mut catalog).await.unwrap();
        assert_eq!(ctl.phase(), ImportPhase::Rejected);
        ctl.run(notes(), &mut catalog).await.unwrap();
        assert_eq!(ctl.phase(), ImportPhase::Completed);
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn deleted_pending_record_stays_deleted() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock).with_policy(FailurePolicy::Record);
        let mut catalog = Catalog::new();

        let submission = ctl.begin(notes(), &mut catalog).unwrap();
        catalog.select("notes.txt").unwrap();
        let mut delete = DeleteConfirmation::default();
        assert!(delete.request("notes.txt", &catalog));
        delete.confirm(&mut catalog);
        assert!(catalog.is_empty());

        let notice = ctl.complete(
            submission.id,
            Ok(AnalysisOutcome::summary(OutcomeKind::Info, "1 entity found")),
            &mut catalog,
        );
        assert!(notice.is_none());
        assert!(catalog.is_empty());
        assert!(catalog.selected().is_none());
        assert!(!ctl.is_busy());
        assert_eq!(ctl.phase(), ImportPhase::Idle);
    }

    #[tokio::test]
    async fn failed_result_after_delete_is_not_recorded() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock).with_policy(FailurePolicy::Record);
        let mut catalog = Catalog::new();

        let submission = ctl.begin(notes(), &mut catalog).unwrap();
        catalog.remove("notes.txt");
        let notice = ctl.complete(
            submission.id,
            Err(AnalysisError::Network("down".into())),
            &mut catalog,
        );
        assert!(notice.is_none());
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn terminal_phase_resets_to_idle() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock);
        let mut catalog = Catalog::new();

        assert!(!ctl.reset());
        ctl.run(notes(), &mut catalog).await.unwrap();
        assert_eq!(ctl.phase(), ImportPhase::Completed);
        assert!(ctl.reset());
        assert_eq!(ctl.phase(), ImportPhase::Idle);

        let _ = ctl.begin(IncomingFile::new("a.pdf", b"x".to_vec()), &mut catalog);
        assert_eq!(ctl.phase(), ImportPhase::Rejected);
        assert!(ctl.reset());
        assert_eq!(ctl.phase(), ImportPhase::Idle);

        ctl.begin(notes(), &mut catalog).unwrap();
        assert_eq!(ctl.phase(), ImportPhase::Submitting);
        assert!(!ctl.reset());
        assert_eq!(ctl.phase(), ImportPhase::Submitting);
    }

    #[test]
    fn notice_expiry_and_dismissal() {
        let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
        let mut ctl = controller(mock).with_notice_ttl(Duration::from_secs(1));
        let mut catalog = Catalog::new();

        let _ = ctl.begin(IncomingFile::new("a.pdf", b"x".to_vec()), &mut catalog);
        let raised = ctl.notice().unwrap().raised_at;
        assert!(!ctl.expire_notice(raised));
        assert!(ctl.expire_notice(raised + Duration::from_secs(1)));
        assert!(ctl.notice().is_none());

        let _ = ctl.begin(IncomingFile::new("a.pdf", b"x".to_vec()), &mut catalog);
        ctl.dismiss_notice();
        assert!(ctl.notice().is_none());
    }

    #[test]
    fn failure_policy_parse() {
        assert_eq!(FailurePolicy::parse("Record"), Some(FailurePolicy::Record));
        assert_eq!(FailurePolicy::parse(" discard "), Some(FailurePolicy::Discard));
        assert_eq!(FailurePolicy::parse("keep"), None);
        assert_eq!(FailurePolicy::default().as_str(), "discard");
    }
}
