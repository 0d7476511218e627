use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::db::SchedulingStore;
use crate::i18n::Localizer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SchedulingStore>,
    pub env: Config,
    pub events: broadcast::Sender<String>,
    pub localizer: Arc<Localizer>,
}

impl AppState {
    pub fn new(store: Arc<dyn SchedulingStore>, env: Config, localizer: Arc<Localizer>) -> Self {
        let (events, _) = broadcast::channel(100);
        Self {
            store,
            env,
            events,
            localizer,
        }
    }

    /// Fan an event out to websocket subscribers; dropped when nobody listens.
    pub fn publish(&self, event: String) {
        if self.events.send(event).is_err() {
            tracing::trace!("No websocket subscribers for event");
        }
    }
}
