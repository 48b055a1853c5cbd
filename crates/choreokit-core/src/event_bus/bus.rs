//! Observer registry for document events.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

const CHANNEL_CAPACITY: usize = 256;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.simple().to_string()[..8])
    }
}

/// Which events an observer wants.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
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

type Callback = Arc<dyn Fn(&AppEvent) + Send + Sync>;

struct Observer {
    id: SubscriptionId,
    filter: EventFilter,
    callback: Callback,
}

/// Delivers events to synchronous observers and async receivers.
///
/// Observers run on the emitting thread, in subscription order, after the
/// registry lock is released; an observer may subscribe or unsubscribe
/// from inside its callback.
pub struct EventBus {
    observers: RwLock<Vec<Observer>>,
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            observers: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Deliver `event`; returns how many observers and receivers saw it.
    pub fn publish(&self, event: AppEvent) -> usize {
        let callbacks: Vec<Callback> = self
            .observers
            .read()
            .iter()
            .filter(|o| o.filter.matches(&event))
            .map(|o| Arc::clone(&o.callback))
            .collect();

        for callback in &callbacks {
            callback(&event);
        }
        callbacks.len() + self.sender.send(event).unwrap_or(0)
    }

    pub fn emit(&self, event: AppEvent) {
        tracing::trace!("event: {}", event);
        self.publish(event);
    }

    pub fn subscribe<F>(&self, filter: EventFilter, callback: F) -> SubscriptionId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.observers.write().push(Observer {
            id,
            filter,
            callback: Arc::new(callback),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Async receiver of every event emitted from now on.
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        before != observers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.read().len()
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
            .finish()
    }
}
