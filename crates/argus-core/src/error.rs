//! Error types for the Argus domain layer.

use thiserror::Error;

use crate::events::OperationKind;
use crate::schema::RelationCategory;
use crate::types::EntityType;

/// Errors surfaced by a graph or edit-context store implementation.
/// The domain layer propagates these unchanged: no retries, no
/// compensating action.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the domain accessors.
///
/// Validation variants are raised before any store write; a failing
/// notification publish never appears here.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Cannot {operation}, {entity_type} cannot be found.")]
    NotFound {
        operation: String,
        entity_type: EntityType,
    },

    #[error("Only {category} relationships can be {operation} through this method.")]
    InvalidRelationshipType {
        category: RelationCategory,
        operation: String,
    },

    #[error("A relation input must carry at least one of fromId or toId.")]
    MissingEndpoint,

    #[error("No {kind:?} topic registered for key {key}")]
    TopicNotRegistered { key: String, kind: OperationKind },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    pub fn not_found(operation: impl Into<String>, entity_type: EntityType) -> Self {
        Self::NotFound {
            operation: operation.into(),
            entity_type,
        }
    }

    pub fn invalid_relationship_type(
        category: RelationCategory,
        operation: impl Into<String>,
    ) -> Self {
        Self::InvalidRelationshipType {
            category,
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_identify_operation_and_type() {
        let err = DomainError::not_found("add the relation", EntityType::Group);
        assert_eq!(
            err.to_string(),
            "Cannot add the relation, Group cannot be found."
        );

        let err = DomainError::invalid_relationship_type(RelationCategory::Internal, "added");
        assert_eq!(
            err.to_string(),
            "Only internal relationships can be added through this method."
        );
    }
}
