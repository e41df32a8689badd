//! Storage interfaces the domain layer requires.
//!
//! The domain accessors hold no state of their own: durable entity and
//! relation state lives behind [`GraphStore`], transient editing markers
//! behind [`EditContextStore`]. The Neo4j implementation of `GraphStore`
//! lives in argus-graph; tests run against in-memory implementations.

use serde_json::Value;

use crate::error::StoreError;
use crate::schema::RelationCategory;
use crate::types::{
    EditContext, EditInput, Entity, EntityType, ListArgs, Page, Principal, Relation,
    RelationInput,
};

/// Entity and relation storage.
///
/// All reads are expected to be at least snapshot-consistent; exclusivity
/// for concurrent writes on the same entity is the implementation's
/// concern (e.g. transactions).
#[allow(async_fn_in_trait)]
pub trait GraphStore: Send + Sync {
    /// Load an entity by id, scoped to `entity_type`. An id that resolves
    /// to an entity of a different type yields `None`.
    async fn load_by_id(
        &self,
        id: &str,
        entity_type: EntityType,
    ) -> Result<Option<Entity>, StoreError>;

    /// List entities of the given types, filterable and sortable over
    /// `searchable_fields`. Unrecognized args are ignored.
    async fn list_entities(
        &self,
        types: &[EntityType],
        searchable_fields: &[String],
        args: &ListArgs,
    ) -> Result<Page<Entity>, StoreError>;

    /// List entities related to `anchor_id` through `relation_type`,
    /// restricted to `target_type` on the far side. Orientation-agnostic:
    /// the target type identifies which endpoint the caller wants.
    async fn list_related(
        &self,
        anchor_id: &str,
        anchor_type: EntityType,
        relation_type: &str,
        target_type: EntityType,
    ) -> Result<Vec<Entity>, StoreError>;

    /// Create an entity and return it as stored.
    async fn create_entity(
        &self,
        principal: &Principal,
        attributes: serde_json::Map<String, Value>,
        entity_type: EntityType,
    ) -> Result<Entity, StoreError>;

    /// Apply a single-attribute update. `None` when `id` does not resolve.
    async fn update_attribute(
        &self,
        principal: &Principal,
        id: &str,
        entity_type: EntityType,
        input: &EditInput,
    ) -> Result<Option<Entity>, StoreError>;

    /// Remove an entity and all its incident relations.
    async fn delete_element_by_id(
        &self,
        principal: &Principal,
        id: &str,
        entity_type: EntityType,
    ) -> Result<(), StoreError>;

    /// Create a relation. Both endpoints must be populated at this level;
    /// endpoint inference happens in the accessor.
    async fn create_relation(
        &self,
        principal: &Principal,
        input: &RelationInput,
    ) -> Result<Relation, StoreError>;

    /// Delete every relation of `relationship_type` between `from_id` and
    /// `to_id`. Bulk by contract: returns the number of edges removed.
    async fn delete_relations_by_from_and_to(
        &self,
        principal: &Principal,
        from_id: &str,
        to_id: &str,
        relationship_type: &str,
        category: RelationCategory,
    ) -> Result<u64, StoreError>;
}

/// Transient store of "who is editing what" markers.
///
/// Advisory only: concurrent principals may hold contexts on the same
/// object, and entries carry no persistence guarantee.
#[allow(async_fn_in_trait)]
pub trait EditContextStore: Send + Sync {
    /// Upsert the context for (`object_id`, principal). Idempotent.
    async fn set(
        &self,
        principal: &Principal,
        object_id: &str,
        input: Value,
    ) -> Result<(), StoreError>;

    /// Remove the calling principal's context for `object_id`. Idempotent:
    /// clearing an absent context succeeds.
    async fn clear(&self, principal: &Principal, object_id: &str) -> Result<(), StoreError>;

    /// Who currently holds a context on `object_id`.
    async fn editors(&self, object_id: &str) -> Result<Vec<EditContext>, StoreError>;
}
