//! Caller-constructed container for one editor session's state.
//!
//! Hosts create one store per editor and share it behind an `Arc`; several
//! stores can live side by side. Every edit bumps the state's revision, which
//! is broadcast on a `watch` channel for the auto-save scheduler.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

use designkit_core::{AppEvent, DocumentEvent, EventBus};

use crate::commands::DesignerCommand;
use crate::designer_state::{DesignerError, DesignerState};

pub struct EditorStore {
    state: RwLock<DesignerState>,
    revision_tx: watch::Sender<u64>,
    events: Arc<EventBus>,
}

impl EditorStore {
    /// Wraps a state and announces the session on the bus.
    pub fn new(state: DesignerState, events: Arc<EventBus>) -> Arc<Self> {
        let event = match state.document() {
            Some(doc) => DocumentEvent::Loaded {
                document_id: doc.id.clone(),
                version: doc.version,
            },
            None => DocumentEvent::Blank {
                width_mm: state.canvas().width_mm,
                height_mm: state.canvas().height_mm,
            },
        };
        let (revision_tx, _) = watch::channel(state.revision());
        let store = Arc::new(Self {
            state: RwLock::new(state),
            revision_tx,
            events,
        });
        store.events.publish(AppEvent::Document(event)).ok();
        store
    }

    /// Apply an intent; see [`DesignerState::dispatch`].
    pub fn dispatch(&self, command: DesignerCommand) -> bool {
        let (applied, revision) = {
            let mut state = self.state.write();
            let applied = state.dispatch(command);
            (applied, state.revision())
        };
        self.publish_revision(revision);
        applied
    }

    /// Apply an intent; see [`DesignerState::try_apply`].
    pub fn try_apply(&self, command: DesignerCommand) -> Result<(), DesignerError> {
        let (result, revision) = {
            let mut state = self.state.write();
            let result = state.try_apply(command);
            (result, state.revision())
        };
        self.publish_revision(revision);
        result
    }

    /// Apply `command` only if `guard` accepts the current state.
    /// The check and the change happen under one write lock.
    pub fn dispatch_if(
        &self,
        guard: impl FnOnce(&DesignerState) -> bool,
        command: DesignerCommand,
    ) -> bool {
        let (applied, current) = {
            let mut state = self.state.write();
            if !guard(&state) {
                return false;
            }
            let applied = state.dispatch(command);
            (applied, state.revision())
        };
        self.publish_revision(current);
        applied
    }

    /// Apply `command` only if no edit happened since `revision` was read.
    pub fn dispatch_if_unchanged(&self, revision: u64, command: DesignerCommand) -> bool {
        self.dispatch_if(|s| s.revision() == revision, command)
    }

    /// Run `f` against the current state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&DesignerState) -> R) -> R {
        f(&*self.state.read())
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> DesignerState {
        self.state.read().clone()
    }

    pub fn revision(&self) -> u64 {
        *self.revision_tx.borrow()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.read().is_dirty()
    }

    /// Receiver that wakes on every edit.
    pub fn subscribe_revisions(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    fn publish_revision(&self, revision: u64) {
        self.revision_tx.send_if_modified(|current| {
            if *current != revision {
                *current = revision;
                true
            } else {
                false
            }
        });
    }
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("EditorStore")
            .field("document_id", &state.document_id())
            .field("elements", &state.elements().len())
            .field("revision", &state.revision())
            .field("dirty", &state.is_dirty())
            .finish()
    }
}
