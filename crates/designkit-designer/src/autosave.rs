//! Debounced auto-save.
//!
//! The scheduler waits for the store to become dirty, then for a quiet
//! interval with no further edits, then persists through [`DocumentSaver`].
//! Every edit during the wait restarts the interval. A failed or skipped save
//! is not retried until the next edit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use designkit_core::{AppEvent, DocumentEvent, PersistenceError, SaveEvent, SaveTrigger};

use crate::commands::DesignerCommand;
use crate::persistence::DocumentApi;
use crate::pricing::PricingRates;
use crate::store::EditorStore;

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(5000);

/// Auto-save configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveConfig {
    pub enabled: bool,
    /// Quiet period after the last edit.
    pub interval: Duration,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

/// Why a save did not call the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotDirty,
    NoDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved {
        document_id: String,
        version: u64,
        /// False when edits landed while the request was in flight.
        clean: bool,
    },
    Created {
        document_id: String,
    },
    Skipped(SkipReason),
}

/// Persists one store, one request at a time.
pub struct DocumentSaver {
    store: Arc<EditorStore>,
    api: Arc<dyn DocumentApi>,
    pricing: Option<PricingRates>,
    in_flight: Mutex<()>,
}

impl DocumentSaver {
    pub fn new(store: Arc<EditorStore>, api: Arc<dyn DocumentApi>) -> Self {
        Self {
            store,
            api,
            pricing: None,
            in_flight: Mutex::new(()),
        }
    }

    /// Attach a cost estimate to every saved patch.
    pub fn with_pricing(mut self, rates: PricingRates) -> Self {
        self.pricing = Some(rates);
        self
    }

    pub fn store(&self) -> &Arc<EditorStore> {
        &self.store
    }

    /// Save the current document if it is dirty. Never creates a document.
    pub async fn save(&self, trigger: SaveTrigger) -> Result<SaveOutcome, PersistenceError> {
        let _guard = self.in_flight.lock().await;

        let prepared = self.store.read(|s| {
            if !s.is_dirty() {
                return Err(SkipReason::NotDirty);
            }
            let (id, version) = match s.document() {
                Some(doc) => (doc.id.clone(), doc.version),
                None => return Err(SkipReason::NoDocument),
            };
            let mut patch = s.to_patch(Some(version));
            patch.estimated_cost = self.pricing.as_ref().map(|r| s.estimated_cost(r).total);
            Ok((id, patch, s.revision()))
        });

        let (id, patch, revision) = match prepared {
            Ok(p) => p,
            Err(reason) => {
                tracing::debug!("Save skipped: {:?}", reason);
                return Ok(SaveOutcome::Skipped(reason));
            }
        };

        self.publish(AppEvent::Save(SaveEvent::Started {
            document_id: id.clone(),
            trigger,
        }));

        match self.api.update_document(&id, patch).await {
            Ok(doc) => {
                let applied = self.store.dispatch(DesignerCommand::ApplySaveResult {
                    document_id: id.clone(),
                    version: doc.version,
                    updated_at: doc.updated_at,
                });
                let clean = applied
                    && self.store.dispatch_if(
                        |s| s.document_id() == Some(id.as_str()) && s.revision() == revision,
                        DesignerCommand::mark_saved(),
                    );
                if !applied {
                    tracing::warn!("Document {} replaced during save, result not applied", id);
                } else if !clean {
                    tracing::debug!("Document {} edited during save, staying dirty", id);
                }
                tracing::info!("Saved document {} v{} ({:?})", id, doc.version, trigger);
                self.publish(AppEvent::Save(SaveEvent::Saved {
                    document_id: id.clone(),
                    version: doc.version,
                    trigger,
                }));
                self.publish(AppEvent::success("Design saved"));
                Ok(SaveOutcome::Saved {
                    document_id: id,
                    version: doc.version,
                    clean,
                })
            }
            Err(e) => {
                self.report_failure(Some(id), &e, trigger);
                Err(e)
            }
        }
    }

    /// Manual save. Creates the document named `name` when the session has
    /// none yet, otherwise behaves like [`DocumentSaver::save`].
    pub async fn save_now(&self, name: &str) -> Result<SaveOutcome, PersistenceError> {
        let guard = self.in_flight.lock().await;
        if self.store.read(|s| s.document().is_some()) {
            drop(guard);
            return self.save(SaveTrigger::Manual).await;
        }

        let (draft, revision) = self.store.read(|s| {
            let mut draft = s.to_draft(name);
            draft.estimated_cost = self.pricing.as_ref().map(|r| s.estimated_cost(r).total);
            (draft, s.revision())
        });

        match self.api.create_document(draft).await {
            Ok(doc) => {
                let document_id = doc.id.clone();
                let attached = self.store.dispatch_if(
                    |s| s.document().is_none(),
                    DesignerCommand::set_document(doc),
                );
                if attached {
                    self.store.dispatch_if(
                        |s| s.document_id() == Some(document_id.as_str()) && s.revision() == revision,
                        DesignerCommand::mark_saved(),
                    );
                } else {
                    tracing::warn!(
                        "Another document was attached while creating {}, keeping it",
                        document_id
                    );
                }
                tracing::info!("Created document {}", document_id);
                self.publish(AppEvent::Document(DocumentEvent::Created {
                    document_id: document_id.clone(),
                }));
                self.publish(AppEvent::success("Design saved"));
                Ok(SaveOutcome::Created { document_id })
            }
            Err(e) => {
                self.report_failure(None, &e, SaveTrigger::Manual);
                Err(e)
            }
        }
    }

    fn report_failure(
        &self,
        document_id: Option<String>,
        e: &PersistenceError,
        trigger: SaveTrigger,
    ) {
        tracing::error!("Save failed ({:?}): {}", trigger, e);
        let code = designkit_core::Error::from(e.clone()).code().to_string();
        self.publish(AppEvent::Save(SaveEvent::Failed {
            document_id,
            code,
            message: e.to_string(),
            trigger,
        }));
        self.publish(AppEvent::error(format!("Failed to save design: {}", e)));
    }

    fn publish(&self, event: AppEvent) {
        self.store.events().publish(event).ok();
    }
}

/// Spawns the debounce loop.
pub struct AutoSaveScheduler;

impl AutoSaveScheduler {
    /// Start auto-saving `saver`'s store. Must be called inside a tokio runtime.
    pub fn spawn(saver: Arc<DocumentSaver>, config: AutoSaveConfig) -> AutoSaveHandle {
        if !config.enabled {
            tracing::debug!("Auto-save disabled");
            return AutoSaveHandle {
                shutdown_tx: None,
                task: None,
            };
        }

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let task = tokio::spawn(run(saver, config.interval, shutdown_rx));
        AutoSaveHandle {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

async fn run(saver: Arc<DocumentSaver>, interval: Duration, mut shutdown_rx: mpsc::Receiver<()>) {
    let store = saver.store().clone();
    let mut revisions = store.subscribe_revisions();
    // Revision at which the last attempt left the document dirty.
    let mut parked_at: Option<u64> = None;

    loop {
        let armed = store.is_dirty() && parked_at != Some(store.revision());
        if !armed {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                changed = revisions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
        }

        revisions.borrow_and_update();
        let sleep = tokio::time::sleep(interval);
        tokio::pin!(sleep);
        let fire = loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break false,
                _ = &mut sleep => break true,
                changed = revisions.changed() => {
                    if changed.is_err() {
                        break false;
                    }
                    revisions.borrow_and_update();
                    sleep.as_mut().reset(Instant::now() + interval);
                }
            }
        };
        if !fire {
            break;
        }

        let before = store.revision();
        parked_at = match saver.save(SaveTrigger::Auto).await {
            Ok(SaveOutcome::Saved { .. }) => None,
            Ok(_) | Err(_) => Some(before),
        };
    }
    tracing::debug!("Auto-save loop stopped");
}

/// Owner of the auto-save task. Dropping it stops the timer.
pub struct AutoSaveHandle {
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutoSaveHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the timer. An in-flight save is abandoned.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for AutoSaveHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
