//! End-to-end import scenarios driven through the public API with a mock backend.

use std::sync::Arc;
use std::time::Duration;

use text_analyzer_core::analyzer::mock::{MockAnalyzer, MockResponse};
use text_analyzer_core::import::MAX_FILE_SIZE;
use text_analyzer_core::{
    AnalysisError, AnalysisFinished, Catalog, DeleteConfirmation, FailurePolicy, ImportController,
    ImportError, ImportPhase, IncomingFile, OutcomeKind, RecordStatus, Severity, ValidationError,
};
use tokio::sync::mpsc;

#[tokio::test]
async fn small_text_file_is_analyzed_and_stored() {
    let mock = Arc::new(MockAnalyzer::new(MockResponse::info("3 entities found")));
    let mut controller = ImportController::new(mock.clone(), "");
    let mut catalog = Catalog::new();

    let notice = controller
        .run(IncomingFile::new("notes.txt", vec![b'x'; 10]), &mut catalog)
        .await
        .unwrap();

    assert_eq!(notice.severity, Severity::Success);
    assert_eq!(catalog.list_sorted(), vec!["notes.txt"]);
    let outcome = catalog.get("notes.txt").unwrap().outcome().unwrap();
    assert_eq!(outcome.kind, OutcomeKind::Info);
    assert_eq!(outcome.text, "3 entities found");
    // Empty credentials are passed through unchanged
    assert_eq!(mock.last_credentials().as_deref(), Some(""));
}

#[tokio::test]
async fn oversized_file_is_rejected_without_a_call() {
    let mock = Arc::new(MockAnalyzer::new(MockResponse::info("x")));
    let mut controller = ImportController::new(mock.clone(), "key");
    let mut catalog = Catalog::new();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.txt");
    std::fs::write(&path, vec![b'a'; 6 * 1024 * 1024]).unwrap();
    let file = IncomingFile::from_path(&path).unwrap();
    assert!(file.size > MAX_FILE_SIZE);

    let err = controller.run(file, &mut catalog).await.unwrap_err();

    assert!(matches!(
        err,
        ImportError::Validation(ValidationError::TooLarge { .. })
    ));
    assert_eq!(err.to_string(), "File size exceeds 5MB.");
    let notice = controller.notice().unwrap();
    assert_eq!(notice.severity, Severity::Warning);
    assert_eq!(notice.message, "File size exceeds 5MB.");
    assert_eq!(mock.call_count(), 0);
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn auth_failure_discards_the_import_by_default() {
    let mock = Arc::new(MockAnalyzer::new(MockResponse::Fail(AnalysisError::Auth(
        "Unauthorized".into(),
    ))));
    let mut controller = ImportController::new(mock, "");
    assert_eq!(controller.policy(), FailurePolicy::Discard);
    let mut catalog = Catalog::new();

    let notice = controller
        .run(IncomingFile::new("notes.txt", b"hello".to_vec()), &mut catalog)
        .await
        .unwrap();

    assert_eq!(notice.severity, Severity::Danger);
    assert!(!notice.message.contains("Unauthorized"));
    assert_eq!(controller.phase(), ImportPhase::Rejected);
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn auth_failure_is_kept_when_recording_failures() {
    let mock = Arc::new(MockAnalyzer::new(MockResponse::Fail(AnalysisError::Auth(
        "Unauthorized".into(),
    ))));
    let mut controller = ImportController::new(mock, "").with_policy(FailurePolicy::Record);
    let mut catalog = Catalog::new();

    controller
        .run(IncomingFile::new("notes.txt", b"hello".to_vec()), &mut catalog)
        .await
        .unwrap();

    let record = catalog.get("notes.txt").unwrap();
    assert_eq!(record.status, RecordStatus::Failed);
}

#[tokio::test]
async fn second_import_while_in_flight_is_refused() {
    let mock = Arc::new(
        MockAnalyzer::new(MockResponse::info("1 entity found"))
            .with_delay(Duration::from_millis(50)),
    );
    let mut controller = ImportController::new(mock.clone(), "key");
    let mut catalog = Catalog::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<AnalysisFinished>();

    let first = controller
        .spawn(
            IncomingFile::new("a.txt", b"alpha".to_vec()),
            &mut catalog,
            tx.clone(),
        )
        .unwrap();
    let err = controller
        .spawn(IncomingFile::new("b.txt", b"beta".to_vec()), &mut catalog, tx)
        .unwrap_err();
    assert!(matches!(err, ImportError::Busy { ref in_flight } if in_flight == "a.txt"));

    let finished = rx.recv().await.unwrap();
    assert_eq!(finished.id, first);
    controller.complete(finished.id, finished.result, &mut catalog);

    assert_eq!(catalog.list_sorted(), vec!["a.txt"]);
    assert_eq!(mock.call_count(), 1);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn reimport_overwrites_record() {
    let mock = Arc::new(MockAnalyzer::with_sequence(vec![
        MockResponse::info("1 entity found"),
        MockResponse::info("2 entities found"),
    ]));
    let mut controller = ImportController::new(mock, "key");
    let mut catalog = Catalog::new();

    controller
        .run(IncomingFile::new("a.txt", b"first".to_vec()), &mut catalog)
        .await
        .unwrap();
    controller
        .run(IncomingFile::new("a.txt", b"second".to_vec()), &mut catalog)
        .await
        .unwrap();

    assert_eq!(catalog.len(), 1);
    let record = catalog.get("a.txt").unwrap();
    assert_eq!(record.content, "second");
    assert_eq!(record.outcome().unwrap().text, "2 entities found");
}

#[tokio::test]
async fn deleting_selected_file_clears_selection() {
    let mock = Arc::new(MockAnalyzer::new(MockResponse::info("1 entity found")));
    let mut controller = ImportController::new(mock, "key");
    let mut catalog = Catalog::new();
    for name in ["b.txt", "a.txt"] {
        controller
            .run(IncomingFile::new(name, b"text".to_vec()), &mut catalog)
            .await
            .unwrap();
    }
    catalog.select("a.txt").unwrap();

    let mut confirm = DeleteConfirmation::new();
    assert!(confirm.request("a.txt", &catalog));
    confirm.confirm(&mut catalog);

    assert_eq!(catalog.selected(), None);
    assert_eq!(catalog.list_sorted(), vec!["b.txt"]);
}
