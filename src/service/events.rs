//! Event system for progress operations
//!
//! Provides an event bus for notifying listeners about ledger writes.
//! Useful for:
//! - Audit logging
//! - Real-time notifications (badge toasts in the lesson viewer)
//! - Downstream sync triggers

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, trace};

/// Progress events emitted by the service layer
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    LessonCompleted {
        user_id: i64,
        lesson_id: String,
    },
    BadgeUnlocked {
        user_id: i64,
        category: String,
        badge_name: String,
    },
}

/// Trait for event listeners
pub trait EventListener: Send + Sync {
    /// Handle an event
    fn on_event(&self, event: &ProgressEvent);
}

/// Event bus for broadcasting progress events
pub struct EventBus {
    sender: broadcast::Sender<ProgressEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new event bus with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: ProgressEvent) {
        trace!(event = ?event, "Emitting progress event");
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging event listener for audit trails
pub struct LoggingEventListener;

impl EventListener for LoggingEventListener {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::LessonCompleted { user_id, lesson_id } => {
                debug!(user_id, lesson_id = %lesson_id, "Lesson completed");
            }
            ProgressEvent::BadgeUnlocked {
                user_id,
                category,
                badge_name,
            } => {
                info!(
                    user_id,
                    category = %category,
                    badge = %badge_name,
                    "Badge unlocked"
                );
            }
        }
    }
}

/// Spawn a background task that logs all events
pub fn spawn_logging_listener(event_bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
    let mut receiver = event_bus.subscribe();
    let listener = LoggingEventListener;

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => listener.on_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Event listener lagged, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed, stopping listener");
                    break;
                }
            }
        }
    })
}
