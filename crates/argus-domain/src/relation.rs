//! Relation operations: schema-validated add/remove anchored at one entity,
//! with endpoint direction inference.

use argus_core::{
    DomainError, EditContextStore, Entity, GraphStore, NotificationPayload, Principal, Relation,
    RelationInput,
};

use crate::accessor::EntityAccessor;

impl<S: GraphStore, C: EditContextStore> EntityAccessor<S, C> {
    /// Create a relation anchored at `anchor_id`.
    ///
    /// The caller supplies a partial descriptor with one endpoint; the
    /// anchor fills in the other side (a supplied `from_id` makes the
    /// anchor the `to_id`, and vice versa). A descriptor carrying both
    /// endpoints passes through unchanged; one carrying neither is a
    /// validation error.
    pub async fn add_relation(
        &self,
        principal: &Principal,
        anchor_id: &str,
        input: RelationInput,
    ) -> Result<Relation, DomainError> {
        // Resolve the anchor first so a failure names this entity type
        // instead of a generic storage error.
        if self.find_by_id(anchor_id).await?.is_none() {
            return Err(DomainError::not_found(
                "add the relation",
                self.config.entity_type,
            ));
        }
        if !self
            .schema
            .is_of_category(&input.relationship_type, self.config.relation_category)
        {
            return Err(DomainError::invalid_relationship_type(
                self.config.relation_category,
                "added",
            ));
        }

        let resolved = match (&input.from_id, &input.to_id) {
            (Some(_), Some(_)) => input,
            (Some(_), None) => RelationInput {
                to_id: Some(anchor_id.to_string()),
                ..input
            },
            (None, Some(_)) => RelationInput {
                from_id: Some(anchor_id.to_string()),
                ..input
            },
            (None, None) => return Err(DomainError::MissingEndpoint),
        };

        let relation = self.store.create_relation(principal, &resolved).await?;
        self.bus.publish(
            &self.config.edited_topic,
            NotificationPayload::Relation(relation.clone()),
            principal,
        );
        Ok(relation)
    }

    /// Delete every relation of `relationship_type` between the resolved
    /// endpoints, substituting the anchor for whichever endpoint is
    /// missing. Bulk by contract. Returns the anchor entity and publishes
    /// it on the EDITED topic.
    pub async fn delete_relation(
        &self,
        principal: &Principal,
        anchor_id: &str,
        from_id: Option<&str>,
        to_id: Option<&str>,
        relationship_type: &str,
    ) -> Result<Entity, DomainError> {
        let anchor = self
            .find_by_id(anchor_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("delete the relation", self.config.entity_type)
            })?;
        if !self
            .schema
            .is_of_category(relationship_type, self.config.relation_category)
        {
            return Err(DomainError::invalid_relationship_type(
                self.config.relation_category,
                "deleted",
            ));
        }

        let (from, to) = match (from_id, to_id) {
            (Some(f), Some(t)) => (f.to_string(), t.to_string()),
            (Some(f), None) => (f.to_string(), anchor_id.to_string()),
            (None, Some(t)) => (anchor_id.to_string(), t.to_string()),
            (None, None) => return Err(DomainError::MissingEndpoint),
        };

        let deleted = self
            .store
            .delete_relations_by_from_and_to(
                principal,
                &from,
                &to,
                relationship_type,
                self.config.relation_category,
            )
            .await?;
        tracing::debug!(
            entity_type = %self.config.entity_type,
            anchor_id,
            relationship_type,
            deleted,
            "Anchored relations deleted"
        );

        self.bus.publish(
            &self.config.edited_topic,
            NotificationPayload::Entity(anchor.clone()),
            principal,
        );
        Ok(anchor)
    }
}
