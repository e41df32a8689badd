//! Notification topics and event types for change broadcasting.
//!
//! Every mutation performed by an accessor fans out to subscribers through
//! a (topic, payload, principal) triple. Topics are looked up per entity
//! type and operation kind from an explicit registry built at startup.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Entity, EntityType, Principal, Relation};

/// Topic key for ADDED events shared by all intelligence domain objects.
pub const ABSTRACT_DOMAIN_OBJECT: &str = "Stix-Domain-Object";

/// The kind of mutation a topic carries. Entity deletion intentionally has
/// no kind here: the evidenced protocol publishes nothing on delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Added,
    Edited,
}

/// A notification channel identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Topic(pub String);

impl Topic {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry mapping (topic key, operation kind) to a topic identifier.
///
/// Keys are entity-type names plus the abstract domain-object key; the
/// registry is injected at accessor construction, never consulted as a
/// global.
#[derive(Debug, Clone, Default)]
pub struct TopicRegistry {
    topics: HashMap<(String, OperationKind), Topic>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the platform's built-in topics.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for et in [
            EntityType::Group,
            EntityType::User,
            EntityType::Infrastructure,
            EntityType::MarkingDefinition,
        ] {
            registry.register_entity(et, OperationKind::Added);
            registry.register_entity(et, OperationKind::Edited);
        }
        registry.register(
            ABSTRACT_DOMAIN_OBJECT,
            OperationKind::Added,
            Topic("STIX_DOMAIN_OBJECT_ADDED_TOPIC".to_string()),
        );
        registry
    }

    pub fn register(&mut self, key: impl Into<String>, kind: OperationKind, topic: Topic) {
        self.topics.insert((key.into(), kind), topic);
    }

    fn register_entity(&mut self, entity_type: EntityType, kind: OperationKind) {
        let suffix = match kind {
            OperationKind::Added => "ADDED_TOPIC",
            OperationKind::Edited => "EDIT_TOPIC",
        };
        let name = format!(
            "{}_{suffix}",
            entity_type.as_str().to_uppercase().replace('-', "_")
        );
        self.register(entity_type.as_str(), kind, Topic(name));
    }

    pub fn topic(&self, key: &str, kind: OperationKind) -> Option<&Topic> {
        self.topics.get(&(key.to_string(), kind))
    }
}

/// What a notification carries: the mutated entity, or the relation a
/// relation-add produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "payload_type")]
pub enum NotificationPayload {
    Entity(Entity),
    Relation(Relation),
}

impl NotificationPayload {
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Self::Entity(e) => Some(e),
            Self::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(r) => Some(r),
            Self::Entity(_) => None,
        }
    }
}

/// A change event handed to the notification bus. Fire-and-forget: not
/// persisted, and delivery failure never fails the mutation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationEvent {
    pub topic: Topic,
    pub payload: NotificationPayload,
    pub principal: Principal,
    pub timestamp: DateTime<Utc>,
}

impl NotificationEvent {
    pub fn new(topic: Topic, payload: NotificationPayload, principal: Principal) -> Self {
        Self {
            topic,
            payload,
            principal,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{attributes_from, generate_internal_id};
    use serde_json::json;

    #[test]
    fn builtin_topic_lookup() {
        let registry = TopicRegistry::builtin();
        assert_eq!(
            registry
                .topic("Group", OperationKind::Edited)
                .map(Topic::as_str),
            Some("GROUP_EDIT_TOPIC")
        );
        assert_eq!(
            registry
                .topic(ABSTRACT_DOMAIN_OBJECT, OperationKind::Added)
                .map(Topic::as_str),
            Some("STIX_DOMAIN_OBJECT_ADDED_TOPIC")
        );
        assert_eq!(registry.topic("Campaign", OperationKind::Added), None);
    }

    #[test]
    fn event_serialization_roundtrip() {
        let entity = Entity {
            internal_id: generate_internal_id(),
            entity_type: EntityType::Group,
            attributes: attributes_from([("name", json!("analysts"))]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let event = NotificationEvent::new(
            Topic("GROUP_ADDED_TOPIC".to_string()),
            NotificationPayload::Entity(entity),
            Principal::new("u1", "alice"),
        );

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: NotificationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
        assert!(json.contains("\"payload_type\":\"Entity\""));
    }
}
