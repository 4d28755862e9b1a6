//! Session event bus.
//!
//! Each editor session owns its bus (hosts construct it and hand out `Arc`s),
//! so several editors can coexist and tests get isolated instances.
//! Synchronous handlers run on the publishing thread in subscription order;
//! async consumers read a `broadcast` channel.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::events::{AppEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Which events a handler wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    /// Events of any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type Handler = Arc<dyn Fn(AppEvent) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Handler,
}

#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Buffer of the async channel; slow receivers lag past this.
    pub channel_capacity: usize,
    /// Keep published events for [`EventBus::history`].
    pub enable_history: bool,
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 200,
        }
    }
}

/// Bounded record of published events.
#[derive(Debug)]
struct EventLog {
    entries: VecDeque<(DateTime<Utc>, AppEvent)>,
    capacity: usize,
}

impl EventLog {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    fn record(&mut self, event: &AppEvent) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((Utc::now(), event.clone()));
    }

    fn since(&self, since: Option<DateTime<Utc>>) -> Vec<AppEvent> {
        self.entries
            .iter()
            .filter(|(at, _)| since.map_or(true, |s| *at >= s))
            .map(|(_, e)| e.clone())
            .collect()
    }
}

/// Returned by [`EventBus::publish`] when the event reached nobody.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event '{0}' had no listeners")]
pub struct Unheard(pub String);

/// Event distribution for one editor session
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
    log: Option<Mutex<EventLog>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            log: config
                .enable_history
                .then(|| Mutex::new(EventLog::new(config.max_history_size))),
        }
    }

    /// Deliver `event` to matching handlers and async receivers.
    ///
    /// Returns how many listeners got it. Publishers normally ignore the
    /// [`Unheard`] error.
    pub fn publish(&self, event: AppEvent) -> Result<usize, Unheard> {
        tracing::trace!("event: {}", event.description());
        if let Some(log) = &self.log {
            log.lock().record(&event);
        }

        // Handlers may subscribe or publish themselves, so call them unlocked.
        let handlers: Vec<Handler> = self
            .subscribers
            .read()
            .iter()
            .filter(|s| s.filter.matches(&event))
            .map(|s| s.handler.clone())
            .collect();
        for handler in &handlers {
            handler(event.clone());
        }

        let description = event.description();
        let receivers = self.sender.send(event).unwrap_or(0);
        match handlers.len() + receivers {
            0 => Err(Unheard(description)),
            n => Ok(n),
        }
    }

    /// Register a synchronous handler.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push(Subscriber {
            id,
            filter,
            handler: Arc::new(handler),
        });
        tracing::debug!("{} subscribed", id);
        id
    }

    /// Receiver for consuming events from a tokio task.
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Recorded events, oldest first. Empty unless history is enabled.
    pub fn history(&self, since: Option<DateTime<Utc>>) -> Vec<AppEvent> {
        self.log
            .as_ref()
            .map(|log| log.lock().since(since))
            .unwrap_or_default()
    }

    pub fn clear_history(&self) {
        if let Some(log) = &self.log {
            log.lock().entries.clear();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("history", &self.log.is_some())
            .finish()
    }
}
