//! Relationship schema registry.
//!
//! Classifies relationship-type identifiers into coarse categories so each
//! accessor can restrict which relations it may create or delete. The
//! registry is an explicit structure injected at accessor construction,
//! never an ambient global.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// Built-in relationship types.
pub const RELATION_MEMBER_OF: &str = "member-of";
pub const RELATION_ACCESSES_TO: &str = "accesses-to";
pub const RELATION_USES: &str = "uses";
pub const RELATION_COMPROMISES: &str = "compromises";
pub const RELATION_COMMUNICATES_WITH: &str = "communicates-with";

/// Coarse classification of relationship types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RelationCategory {
    /// Platform-internal relations (group membership, marking access).
    Internal,
    /// Domain-object relations between intelligence entities.
    Core,
}

impl fmt::Display for RelationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => f.write_str("internal"),
            Self::Core => f.write_str("core"),
        }
    }
}

/// Registry mapping relationship-type identifiers to their category.
#[derive(Debug, Clone, Default)]
pub struct RelationshipSchema {
    categories: HashMap<String, RelationCategory>,
}

impl RelationshipSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the built-in relationship types.
    pub fn builtin() -> Self {
        let mut schema = Self::new();
        schema.register(RELATION_MEMBER_OF, RelationCategory::Internal);
        schema.register(RELATION_ACCESSES_TO, RelationCategory::Internal);
        schema.register(RELATION_USES, RelationCategory::Core);
        schema.register(RELATION_COMPROMISES, RelationCategory::Core);
        schema.register(RELATION_COMMUNICATES_WITH, RelationCategory::Core);
        schema
    }

    pub fn register(&mut self, relationship_type: impl Into<String>, category: RelationCategory) {
        self.categories.insert(relationship_type.into(), category);
    }

    /// Whether `relationship_type` is registered under `category`.
    /// Unknown types belong to no category.
    pub fn is_of_category(&self, relationship_type: &str, category: RelationCategory) -> bool {
        self.categories.get(relationship_type) == Some(&category)
    }

    pub fn category_of(&self, relationship_type: &str) -> Option<RelationCategory> {
        self.categories.get(relationship_type).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_categories() {
        let schema = RelationshipSchema::builtin();
        assert!(schema.is_of_category(RELATION_MEMBER_OF, RelationCategory::Internal));
        assert!(schema.is_of_category(RELATION_ACCESSES_TO, RelationCategory::Internal));
        assert!(schema.is_of_category(RELATION_USES, RelationCategory::Core));
        assert!(!schema.is_of_category(RELATION_USES, RelationCategory::Internal));
    }

    #[test]
    fn unknown_types_have_no_category() {
        let schema = RelationshipSchema::builtin();
        assert!(!schema.is_of_category("located-at", RelationCategory::Internal));
        assert!(!schema.is_of_category("located-at", RelationCategory::Core));
        assert_eq!(schema.category_of("located-at"), None);
    }

    #[test]
    fn custom_registration() {
        let mut schema = RelationshipSchema::new();
        schema.register("participates-in", RelationCategory::Internal);
        assert!(schema.is_of_category("participates-in", RelationCategory::Internal));
    }
}
