//! The per-entity-type accessor and its entity operations.

use std::sync::Arc;

use serde_json::Value;

use argus_core::{
    DomainError, EditContextStore, EditInput, Entity, EntityType, GraphStore, ListArgs,
    NotificationPayload, OperationKind, Page, Principal, RelationCategory, RelationshipSchema,
    Topic, TopicRegistry,
};

use crate::bus::NotificationBus;

/// Static configuration of one accessor: which entity type it serves,
/// which fields are searchable, which relation category it may mutate,
/// and which topics its notifications go out on. Built explicitly at
/// startup; there are no ambient registries.
#[derive(Debug, Clone)]
pub struct AccessorConfig {
    pub entity_type: EntityType,
    pub searchable_fields: Vec<String>,
    pub relation_category: RelationCategory,
    pub added_topic: Topic,
    pub edited_topic: Topic,
}

impl AccessorConfig {
    /// Resolve topics from the registry. `added_topic_key` may differ from
    /// the entity type's own key: domain objects publish ADDED on the
    /// abstract domain-object topic.
    pub fn resolve(
        entity_type: EntityType,
        searchable_fields: Vec<String>,
        relation_category: RelationCategory,
        added_topic_key: &str,
        topics: &TopicRegistry,
    ) -> Result<Self, DomainError> {
        let added_topic = topics
            .topic(added_topic_key, OperationKind::Added)
            .cloned()
            .ok_or_else(|| DomainError::TopicNotRegistered {
                key: added_topic_key.to_string(),
                kind: OperationKind::Added,
            })?;
        let edited_topic = topics
            .topic(entity_type.as_str(), OperationKind::Edited)
            .cloned()
            .ok_or_else(|| DomainError::TopicNotRegistered {
                key: entity_type.as_str().to_string(),
                kind: OperationKind::Edited,
            })?;

        Ok(Self {
            entity_type,
            searchable_fields,
            relation_category,
            added_topic,
            edited_topic,
        })
    }
}

/// Typed accessor for one entity type.
///
/// Stateless between calls and cheap to clone; safe to use from concurrent
/// tasks. All durable state lives in the graph store, all transient state
/// in the edit-context store.
pub struct EntityAccessor<S, C> {
    pub(crate) config: AccessorConfig,
    pub(crate) store: Arc<S>,
    pub(crate) contexts: Arc<C>,
    pub(crate) schema: RelationshipSchema,
    pub(crate) bus: NotificationBus,
}

impl<S, C> Clone for EntityAccessor<S, C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: Arc::clone(&self.store),
            contexts: Arc::clone(&self.contexts),
            schema: self.schema.clone(),
            bus: self.bus.clone(),
        }
    }
}

impl<S: GraphStore, C: EditContextStore> EntityAccessor<S, C> {
    pub fn new(
        config: AccessorConfig,
        store: Arc<S>,
        contexts: Arc<C>,
        schema: RelationshipSchema,
        bus: NotificationBus,
    ) -> Self {
        Self {
            config,
            store,
            contexts,
            schema,
            bus,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.config.entity_type
    }

    /// Direct lookup by identifier, scoped to this accessor's entity type.
    /// An id belonging to another type resolves to `None`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Entity>, DomainError> {
        Ok(self.store.load_by_id(id, self.config.entity_type).await?)
    }

    /// Paged listing over the configured searchable fields.
    pub async fn find_all(&self, args: &ListArgs) -> Result<Page<Entity>, DomainError> {
        Ok(self
            .store
            .list_entities(
                &[self.config.entity_type],
                &self.config.searchable_fields,
                args,
            )
            .await?)
    }

    /// Create an entity and publish it on the ADDED topic. The created
    /// entity is returned regardless of notification outcome.
    pub async fn add(
        &self,
        principal: &Principal,
        attributes: serde_json::Map<String, Value>,
    ) -> Result<Entity, DomainError> {
        let created = self
            .store
            .create_entity(principal, attributes, self.config.entity_type)
            .await?;
        self.bus.publish(
            &self.config.added_topic,
            NotificationPayload::Entity(created.clone()),
            principal,
        );
        Ok(created)
    }

    /// Apply a single-attribute update and publish the updated entity on
    /// the EDITED topic.
    pub async fn edit_field(
        &self,
        principal: &Principal,
        id: &str,
        input: &EditInput,
    ) -> Result<Entity, DomainError> {
        let updated = self
            .store
            .update_attribute(principal, id, self.config.entity_type, input)
            .await?
            .ok_or_else(|| DomainError::not_found("edit the field", self.config.entity_type))?;
        self.bus.publish(
            &self.config.edited_topic,
            NotificationPayload::Entity(updated.clone()),
            principal,
        );
        Ok(updated)
    }

    /// Remove the entity and all its incident relations. Deletion publishes
    /// no event in this protocol; see the DELETED-topic open question in
    /// DESIGN.md before changing that.
    pub async fn delete(&self, principal: &Principal, id: &str) -> Result<(), DomainError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found(
                "delete the entity",
                self.config.entity_type,
            ));
        }
        self.store
            .delete_element_by_id(principal, id, self.config.entity_type)
            .await?;
        Ok(())
    }

    /// List entities related to `anchor_id` through `relation_type`,
    /// restricted to `target_type` on the far side.
    pub async fn related(
        &self,
        anchor_id: &str,
        relation_type: &str,
        target_type: EntityType,
    ) -> Result<Vec<Entity>, DomainError> {
        Ok(self
            .store
            .list_related(anchor_id, self.config.entity_type, relation_type, target_type)
            .await?)
    }
}
