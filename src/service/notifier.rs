use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::event::ChangeEvent;

/// Buffered events per topic before slow subscribers start lagging. A lagged
/// subscriber misses events and is expected to re-fetch a snapshot.
const TOPIC_CAPACITY: usize = 64;

/// In-process pub/sub hub pushing row-change events to connected clients.
/// One broadcast channel per session; dashboards subscribe over SSE and
/// re-fetch whatever the event points at.
pub struct ChangeNotifier {
    topics: DashMap<Uuid, broadcast::Sender<ChangeEvent>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    pub fn subscribe(&self, session_id: Uuid) -> broadcast::Receiver<ChangeEvent> {
        self.topics
            .entry(session_id)
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Fans an event out to the session's subscribers. Publishing to a topic
    /// nobody listens on is a no-op.
    pub fn publish(&self, event: ChangeEvent) {
        let Some(sender) = self.topics.get(&event.session_id()) else {
            return;
        };

        if let Err(e) = sender.send(event) {
            debug!("No active subscribers for event: {:?}", e.0);
        }
    }

    pub fn subscriber_count(&self, session_id: Uuid) -> usize {
        self.topics
            .get(&session_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Drops the topic for a purged session so its channel can be freed.
    pub fn drop_topic(&self, session_id: Uuid) {
        self.topics.remove(&session_id);
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
