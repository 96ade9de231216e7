//! Domain event publishing over NATS.

use tracing::{debug, warn};

use crate::domain::events::DomainEvent;

/// Publishes domain events when a bus is configured. Publishing never fails a request.
#[derive(Clone, Debug, Default)]
pub struct EventPublisher {
    nats: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn new(nats: Option<async_nats::Client>) -> Self {
        Self { nats }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub async fn publish(&self, event: DomainEvent) {
        debug!(subject = event.subject(), ?event, "domain event");
        let Some(client) = &self.nats else { return };
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(subject = event.subject(), "failed to encode event: {e}");
                return;
            }
        };
        if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
            warn!(subject = event.subject(), "failed to publish event: {e}");
        }
    }
}
