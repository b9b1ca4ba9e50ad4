// Event service for creation and queries
// Decision: Events are created in DRAFT; no automatic status transition

use chrono::Utc;
use eventdesk_core::{Event, EventDraft, EventStore, EventValidator, Result};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

pub struct EventService {
    store: Arc<dyn EventStore>,
    validator: EventValidator,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            validator: EventValidator::new(),
        }
    }

    /// Validate the draft, assign an id and persist it
    pub async fn create(&self, draft: EventDraft) -> Result<Event> {
        let span = tracing::info_span!(
            "create_event",
            "event.name" = draft.name.as_deref().unwrap_or(""),
            "event.id" = tracing::field::Empty,
        );

        self.create_inner(draft).instrument(span).await
    }

    async fn create_inner(&self, draft: EventDraft) -> Result<Event> {
        let span = tracing::Span::current();

        let validated = self.validator.validate(draft).map_err(|errors| {
            tracing::info!(violations = errors.len(), "Event rejected");
            errors
        })?;

        let event = validated.into_event(Uuid::now_v7(), Utc::now());
        span.record("event.id", event.id.to_string().as_str());

        let event = self.store.save_event(event).await?;
        tracing::info!(
            free = event.free,
            offline = event.offline,
            status = %event.event_status,
            "Event created"
        );
        Ok(event)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        self.store.get_event(id).await
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.store.list_events().await
    }
}
