use tokio::sync::broadcast;
use tracing::debug;

use crate::models::ReservationChange;

const FEED_CAPACITY: usize = 256;

pub type FeedReceiver = broadcast::Receiver<ReservationChange>;

/// Live change feed for reservation rows. Every successful store mutation is
/// published here; availability watchers subscribe and react without polling.
/// Cloning shares the underlying channel.
#[derive(Clone)]
pub struct ReservationFeed {
    sender: broadcast::Sender<ReservationChange>,
}

impl ReservationFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> FeedReceiver {
        self.sender.subscribe()
    }

    pub fn publish(&self, change: ReservationChange) {
        if self.sender.send(change).is_err() {
            // No live subscribers; nothing to notify.
            debug!("Reservation change published with no subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReservationFeed {
    fn default() -> Self {
        Self::new()
    }
}
