//! Booking Event Bus
//!
//! Explicit notification interface for booking lifecycle changes. The
//! core publishes; transports (websocket push, automation triggers) are
//! subscribers living outside this crate. No transport mechanics leak in
//! here; it is a plain broadcast channel.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use shared::booking::BookingView;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What happened to the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingEventKind {
    Created,
    Updated,
}

/// A booking lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEvent {
    pub tenant_id: String,
    pub kind: BookingEventKind,
    pub booking: BookingView,
}

/// Broadcast bus for booking events
///
/// Slow subscribers lag and miss events (broadcast semantics); the UI
/// treats the stream as refresh hints, not as a source of truth.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BookingEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event; silently dropped when nobody subscribes
    pub fn publish(&self, event: BookingEvent) {
        if let Ok(receivers) = self.tx.send(event) {
            tracing::debug!(receivers, "booking event published");
        }
    }

    /// Subscribe to the event stream
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::BookingStatus;

    fn sample_view() -> BookingView {
        BookingView {
            id: "booking:abc".into(),
            tenant_id: "demo".into(),
            table_id: "dining_table:t1".into(),
            party_size: 2,
            start: Utc::now(),
            end: Utc::now(),
            guest_name: "Jane".into(),
            guest_email: "jane@example.com".into(),
            guest_phone: "+34600123456".into(),
            special_requests: None,
            status: BookingStatus::Confirmed,
            confirmation_code: "BK-ABC123".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(BookingEvent {
            tenant_id: "demo".into(),
            kind: BookingEventKind::Created,
            booking: sample_view(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind, BookingEventKind::Created);
        assert_eq!(event.tenant_id, "demo");
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(BookingEvent {
            tenant_id: "demo".into(),
            kind: BookingEventKind::Updated,
            booking: sample_view(),
        });
    }
}
