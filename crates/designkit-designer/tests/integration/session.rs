use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use designkit_core::{
    AppEvent, DocumentEvent, EventBus, EventBusConfig, PersistenceError, SaveEvent, SaveTrigger,
};
use designkit_designer::{
    CanvasDefaults, CanvasElement, CanvasSettings, DesignDocument, DesignerCommand, DesignerState,
    DocumentApi, DocumentPatch, DocumentSaver, EditorStore, InMemoryDocumentApi, PricingRates, SaveOutcome,
    SessionConfig, SkipReason, TextContent,
};

fn config() -> SessionConfig {
    SessionConfig::new(CanvasSettings::from(CanvasDefaults::banner()), 100)
}

fn history_bus() -> Arc<EventBus> {
    Arc::new(EventBus::with_config(EventBusConfig {
        enable_history: true,
        ..Default::default()
    }))
}

fn headline() -> CanvasElement {
    CanvasElement::text("t1", 10.0, 10.0, 300.0, 30.0, TextContent::new("Grand opening"))
}

#[tokio::test]
async fn test_manual_save_creates_then_updates() {
    let bus = history_bus();
    let store = EditorStore::new(DesignerState::new(config()), bus.clone());
    let api = Arc::new(InMemoryDocumentApi::new());
    let saver =
        DocumentSaver::new(store.clone(), api.clone()).with_pricing(PricingRates::default());

    // Auto-save never creates
    assert_eq!(
        saver.save(SaveTrigger::Auto).await.unwrap(),
        SaveOutcome::Skipped(SkipReason::NotDirty)
    );
    store.dispatch(DesignerCommand::AddElement(headline()));
    assert_eq!(
        saver.save(SaveTrigger::Auto).await.unwrap(),
        SaveOutcome::Skipped(SkipReason::NoDocument)
    );

    let SaveOutcome::Created { document_id } = saver.save_now("Grand opening").await.unwrap()
    else {
        panic!("expected a new document");
    };
    assert!(!store.is_dirty());
    let stored = api.get(&document_id).unwrap();
    assert_eq!(stored.name, "Grand opening");
    assert_eq!(stored.version, 1);
    assert_eq!(stored.customizations.elements.len(), 1);
    assert!(stored.estimated_cost.is_some());

    store.dispatch(DesignerCommand::delete("t1"));
    let outcome = saver.save_now("ignored").await.unwrap();
    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            document_id: document_id.clone(),
            version: 2,
            clean: true,
        }
    );
    assert!(api.get(&document_id).unwrap().customizations.elements.is_empty());

    let events = bus.history(None);
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Document(DocumentEvent::Created { document_id: id }) if *id == document_id
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Save(SaveEvent::Saved { version: 2, trigger: SaveTrigger::Manual, .. })
    )));
}

#[tokio::test]
async fn test_version_conflict_keeps_session_dirty() {
    let api = Arc::new(InMemoryDocumentApi::new());
    let store = EditorStore::new(DesignerState::new(config()), history_bus());
    let saver = DocumentSaver::new(store.clone(), api.clone());

    store.dispatch(DesignerCommand::AddElement(headline()));
    let SaveOutcome::Created { document_id } = saver.save_now("Banner").await.unwrap() else {
        panic!("expected a new document");
    };

    // Someone else saves in between
    api.update_document(&document_id, DocumentPatch::default())
        .await
        .unwrap();

    store.dispatch(DesignerCommand::delete("t1"));
    let err = saver.save(SaveTrigger::Auto).await.unwrap_err();
    assert_eq!(
        err,
        PersistenceError::VersionConflict {
            id: document_id.clone(),
            expected: 1,
            actual: 2,
        }
    );
    assert!(store.is_dirty());
    assert_eq!(store.read(|s| s.document_version()), Some(1));
    assert!(store.events().history(None).iter().any(|e| matches!(
        e,
        AppEvent::Save(SaveEvent::Failed { code, .. }) if code == "version_conflict"
    )));
}

#[tokio::test]
async fn test_reopen_document_in_new_session() {
    let api = Arc::new(InMemoryDocumentApi::new());
    let first = EditorStore::new(DesignerState::new(config()), Arc::new(EventBus::new()));
    let saver = DocumentSaver::new(first.clone(), api.clone());
    first.dispatch(DesignerCommand::AddElement(headline().with_rotation(370.0)));
    let SaveOutcome::Created { document_id } = saver.save_now("Banner").await.unwrap() else {
        panic!("expected a new document");
    };

    let loaded = api.load_document(&document_id).await.unwrap();
    let bus = history_bus();
    let second = EditorStore::new(DesignerState::from_document(loaded, config()), bus.clone());

    second.read(|s| {
        assert_eq!(s.document_id(), Some(document_id.as_str()));
        assert_eq!(s.elements(), first.snapshot().elements());
        assert_eq!(s.element("t1").unwrap().rotation, 370.0);
        assert!(!s.is_dirty());
        assert!(!s.can_undo());
        assert!(s.last_saved().is_some());
    });
    assert!(matches!(
        bus.history(None).as_slice(),
        [AppEvent::Document(DocumentEvent::Loaded { version: 1, .. })]
    ));

    // Sessions are independent
    second.dispatch(DesignerCommand::delete("t1"));
    assert_eq!(first.read(|s| s.elements().len()), 1);
    assert!(!first.is_dirty());
}

/// A document the host swaps in while a request is outstanding.
fn replacement(store: &EditorStore) -> DesignDocument {
    let draft = store.read(|s| s.to_draft("Other"));
    let mut doc = DesignDocument::from_draft("other", draft, Utc::now());
    doc.version = 7;
    doc
}

#[tokio::test(start_paused = true)]
async fn test_save_result_ignored_after_document_switch() {
    let api = Arc::new(InMemoryDocumentApi::new().with_latency(Duration::from_millis(300)));
    let store = EditorStore::new(DesignerState::new(config()), Arc::new(EventBus::new()));
    store.dispatch(DesignerCommand::AddElement(headline()));
    let first = api
        .create_document(store.read(|s| s.to_draft("First")))
        .await
        .unwrap();
    store.dispatch(DesignerCommand::set_document(first.clone()));
    store.dispatch(DesignerCommand::delete("t1"));

    let saver = Arc::new(DocumentSaver::new(store.clone(), api.clone()));
    let task = tokio::spawn({
        let saver = saver.clone();
        async move { saver.save(SaveTrigger::Auto).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    store.dispatch(DesignerCommand::set_document(replacement(&store)));

    let outcome = task.await.unwrap().unwrap();
    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            document_id: first.id.clone(),
            version: 2,
            clean: false,
        }
    );
    assert_eq!(api.get(&first.id).unwrap().version, 2);
    store.read(|s| {
        let current = s.document().unwrap();
        assert_eq!(current.id, "other");
        assert_eq!(current.name, "Other");
        assert_eq!(current.version, 7);
        assert!(s.is_dirty());
    });
}

#[tokio::test(start_paused = true)]
async fn test_created_document_does_not_replace_attached_one() {
    let api = Arc::new(InMemoryDocumentApi::new().with_latency(Duration::from_millis(300)));
    let store = EditorStore::new(DesignerState::new(config()), Arc::new(EventBus::new()));
    store.dispatch(DesignerCommand::AddElement(headline()));

    let saver = Arc::new(DocumentSaver::new(store.clone(), api.clone()));
    let task = tokio::spawn({
        let saver = saver.clone();
        async move { saver.save_now("Mine").await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    store.dispatch(DesignerCommand::set_document(replacement(&store)));

    let SaveOutcome::Created { document_id } = task.await.unwrap().unwrap() else {
        panic!("expected a new document");
    };
    assert_ne!(document_id, "other");
    assert_eq!(api.get(&document_id).unwrap().name, "Mine");
    store.read(|s| {
        assert_eq!(s.document_id(), Some("other"));
        assert_eq!(s.document_version(), Some(7));
        assert!(s.is_dirty());
    });
}
