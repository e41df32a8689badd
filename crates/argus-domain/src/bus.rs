//! In-process notification bus.
//!
//! Mutations fan out as (topic, payload, principal) events over a broadcast
//! channel. Publishing is fire-and-forget: it never blocks the mutating
//! call path and never surfaces an error to it. A slow subscriber lags and
//! loses events rather than stalling writers; the real-time transport layer
//! subscribes here and owns delivery beyond the process.

use tokio::sync::broadcast;

use argus_core::config::NotificationSettings;
use argus_core::{NotificationEvent, NotificationPayload, Principal, Topic};

/// Cheaply cloneable handle to the broadcast channel.
#[derive(Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<NotificationEvent>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Build the bus from configuration.
    pub fn from_settings(settings: &NotificationSettings) -> Self {
        Self::new(settings.bus_capacity)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    /// Publish a change event. Delivery failure (no subscribers) is logged
    /// and swallowed; the preceding mutation already succeeded.
    pub fn publish(&self, topic: &Topic, payload: NotificationPayload, principal: &Principal) {
        let event = NotificationEvent::new(topic.clone(), payload, principal.clone());
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::trace!(topic = %topic, receivers, "Notification published");
            }
            Err(_) => {
                tracing::debug!(topic = %topic, "No subscribers, notification dropped");
            }
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::from_settings(&NotificationSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::types::{attributes_from, generate_internal_id};
    use argus_core::{Entity, EntityType};
    use chrono::Utc;
    use serde_json::json;

    fn entity() -> Entity {
        Entity {
            internal_id: generate_internal_id(),
            entity_type: EntityType::Group,
            attributes: attributes_from([("name", json!("analysts"))]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = NotificationBus::default();
        let mut rx = bus.subscribe();
        let topic = Topic("GROUP_EDIT_TOPIC".to_string());

        bus.publish(
            &topic,
            NotificationPayload::Entity(entity()),
            &Principal::new("u1", "alice"),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.topic, topic);
        assert_eq!(event.principal.id, "u1");
    }

    #[tokio::test]
    async fn channel_capacity_comes_from_settings() {
        let bus = NotificationBus::from_settings(&NotificationSettings { bus_capacity: 1 });
        let mut rx = bus.subscribe();
        let topic = Topic("GROUP_EDIT_TOPIC".to_string());
        let alice = Principal::new("u1", "alice");

        bus.publish(&topic, NotificationPayload::Entity(entity()), &alice);
        bus.publish(&topic, NotificationPayload::Entity(entity()), &alice);

        // Capacity 1: the older event is dropped for the lagging
        // receiver instead of blocking the publishers.
        use tokio::sync::broadcast::error::TryRecvError;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(1))));
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = NotificationBus::new(4);
        // Must not panic or error; the mutation path never sees this.
        bus.publish(
            &Topic("GROUP_ADDED_TOPIC".to_string()),
            NotificationPayload::Entity(entity()),
            &Principal::new("u1", "alice"),
        );
    }
}
