//! Group accessor: platform-internal groups of users.
//!
//! Groups mutate internal relations only (`member-of`, `accesses-to`);
//! their searchable surface is the group name.

use std::sync::Arc;

use argus_core::schema::{RELATION_ACCESSES_TO, RELATION_MEMBER_OF};
use argus_core::{
    DomainError, EditContextStore, Entity, EntityType, GraphStore, RelationCategory,
    RelationshipSchema, TopicRegistry,
};

use crate::accessor::{AccessorConfig, EntityAccessor};
use crate::bus::NotificationBus;

/// Build the Group accessor.
pub fn accessor<S, C>(
    store: Arc<S>,
    contexts: Arc<C>,
    schema: RelationshipSchema,
    topics: &TopicRegistry,
    bus: NotificationBus,
) -> Result<EntityAccessor<S, C>, DomainError>
where
    S: GraphStore,
    C: EditContextStore,
{
    let config = AccessorConfig::resolve(
        EntityType::Group,
        vec!["name".to_string()],
        RelationCategory::Internal,
        EntityType::Group.as_str(),
        topics,
    )?;
    Ok(EntityAccessor::new(config, store, contexts, schema, bus))
}

/// Users that are `member-of` the group.
pub async fn members<S, C>(
    groups: &EntityAccessor<S, C>,
    group_id: &str,
) -> Result<Vec<Entity>, DomainError>
where
    S: GraphStore,
    C: EditContextStore,
{
    groups
        .related(group_id, RELATION_MEMBER_OF, EntityType::User)
        .await
}

/// Marking definitions the group `accesses-to`.
pub async fn marking_definitions<S, C>(
    groups: &EntityAccessor<S, C>,
    group_id: &str,
) -> Result<Vec<Entity>, DomainError>
where
    S: GraphStore,
    C: EditContextStore,
{
    groups
        .related(group_id, RELATION_ACCESSES_TO, EntityType::MarkingDefinition)
        .await
}
