//! Infrastructure accessor: adversary infrastructure domain objects.
//!
//! Infrastructures mutate core domain relations (`uses`, `compromises`,
//! `communicates-with`) and publish creations on the abstract
//! domain-object ADDED topic, so subscribers watching for any new
//! intelligence object see them.

use std::sync::Arc;

use argus_core::events::ABSTRACT_DOMAIN_OBJECT;
use argus_core::{
    DomainError, EditContextStore, EntityType, GraphStore, RelationCategory, RelationshipSchema,
    TopicRegistry,
};

use crate::accessor::{AccessorConfig, EntityAccessor};
use crate::bus::NotificationBus;

/// Build the Infrastructure accessor.
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
        EntityType::Infrastructure,
        vec![
            "name".to_string(),
            "description".to_string(),
            "aliases".to_string(),
        ],
        RelationCategory::Core,
        ABSTRACT_DOMAIN_OBJECT,
        topics,
    )?;
    Ok(EntityAccessor::new(config, store, contexts, schema, bus))
}
