use std::collections::HashSet;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::{debug, error};
use uuid::Uuid;

use shared::models::VoteSnapshot;

pub type SnapshotSender = broadcast::Sender<VoteSnapshot>;
pub type SnapshotReceiver = broadcast::Receiver<VoteSnapshot>;

const CHANNEL_CAPACITY: usize = 64;

/// Fan-out of vote snapshots to live WebSocket subscribers. The broadcast
/// channel decouples the submission path from the subscribers: a send with
/// nobody listening is not an error, and a slow subscriber lags and drops
/// old snapshots instead of blocking anyone.
pub struct Broadcaster {
    sender: SnapshotSender,
    connections: Mutex<HashSet<Uuid>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            connections: Mutex::new(HashSet::new()),
        }
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.sender.subscribe()
    }

    pub fn add_connection(&self) -> Uuid {
        let id = Uuid::new_v4();
        if let Ok(mut connections) = self.connections.lock() {
            connections.insert(id);
            debug!("Subscriber {} connected ({} active)", id, connections.len());
        } else {
            error!("Failed to acquire lock for connection registry");
        }
        id
    }

    pub fn remove_connection(&self, id: &Uuid) {
        if let Ok(mut connections) = self.connections.lock() {
            connections.remove(id);
            debug!("Subscriber {} removed ({} active)", id, connections.len());
        } else {
            error!("Failed to acquire lock for connection registry");
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn broadcast(&self, snapshot: VoteSnapshot) {
        let _ = self.sender.send(snapshot);
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
