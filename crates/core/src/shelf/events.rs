use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::library::Work;

/// Change notification published after a committed mutation or a session
/// transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShelfEvent {
    SessionStarted { user_id: String, name: String },
    SessionEnded,
    WorkAdded { work: Work },
    WorkUpdated { work: Work },
    WorkRemoved { work_id: String },
    LibraryCleared { removed: usize },
    ProfileUpdated { user_id: String, name: String },
}

impl ShelfEvent {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ShelfEvent::SessionStarted { .. } => "session_started",
            ShelfEvent::SessionEnded => "session_ended",
            ShelfEvent::WorkAdded { .. } => "work_added",
            ShelfEvent::WorkUpdated { .. } => "work_updated",
            ShelfEvent::WorkRemoved { .. } => "work_removed",
            ShelfEvent::LibraryCleared { .. } => "library_cleared",
            ShelfEvent::ProfileUpdated { .. } => "profile_updated",
        }
    }
}

/// Fan-out of [`ShelfEvent`]s over a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShelfEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: ShelfEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShelfEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
