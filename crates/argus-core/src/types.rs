//! Core domain types for the Argus knowledge graph.
//!
//! These types represent entities (typed nodes) and relations (typed directed
//! edges) in the threat-intelligence graph, shared across all Argus services.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ── Entity types ──────────────────────────────────────────────────

/// Closed registry of entity types. An entity's type never changes
/// after creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityType {
    Group,
    User,
    Infrastructure,
    MarkingDefinition,
}

impl EntityType {
    /// The graph label / topic key for this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::User => "User",
            Self::Infrastructure => "Infrastructure",
            Self::MarkingDefinition => "Marking-Definition",
        }
    }

    /// Parse a stored type tag back into the closed registry.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "Group" => Some(Self::Group),
            "User" => Some(Self::User),
            "Infrastructure" => Some(Self::Infrastructure),
            "Marking-Definition" => Some(Self::MarkingDefinition),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a fresh opaque internal identifier.
pub fn generate_internal_id() -> String {
    Uuid::new_v4().to_string()
}

// ── Entities ──────────────────────────────────────────────────────

/// A typed node in the knowledge graph.
///
/// Type-specific fields (`name`, `description`, `aliases`, ...) live in the
/// `attributes` map; the accessors below cover the common ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub internal_id: String,
    pub entity_type: EntityType,
    pub attributes: serde_json::Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.attributes.get("description").and_then(Value::as_str)
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.attributes
            .get("aliases")
            .and_then(Value::as_array)
            .map(|vals| vals.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

// ── Relations ─────────────────────────────────────────────────────

/// A typed directed edge between two entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    pub internal_id: String,
    pub relationship_type: String,
    pub from_id: String,
    pub to_id: String,
    pub created_at: DateTime<Utc>,
}

/// Partial relation descriptor supplied by callers of relation-add.
///
/// Exactly one endpoint may be omitted; the accessor fills it in with the
/// anchor entity's id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelationInput {
    pub relationship_type: String,
    #[serde(default)]
    pub from_id: Option<String>,
    #[serde(default)]
    pub to_id: Option<String>,
}

// ── Mutation inputs ───────────────────────────────────────────────

/// A single-attribute update, as consumed by `update_attribute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditInput {
    pub key: String,
    pub value: Value,
}

// ── Principals ────────────────────────────────────────────────────

/// The acting identity. Opaque to the domain layer; carried through every
/// call purely for attribution in notifications and edit contexts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub name: String,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ── Edit contexts ─────────────────────────────────────────────────

/// A transient marker recording that a principal is currently editing an
/// object. Advisory only: no mutual exclusion, no persistence guarantee
/// beyond the store's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditContext {
    pub object_id: String,
    pub principal: Principal,
    pub input: Value,
    pub acquired_at: DateTime<Utc>,
}

// ── List arguments ────────────────────────────────────────────────

/// Ordering direction for list queries.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    #[default]
    Asc,
    Desc,
}

/// An exact-match filter over one attribute: matches when the stored value
/// is any of `values`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub key: String,
    pub values: Vec<String>,
}

/// Arguments for `find_all` / `list_entities`.
///
/// Deliberately non-strict: options the store does not recognize (an
/// `order_by` outside the searchable fields, a filter on an unknown key)
/// are ignored rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListArgs {
    /// Substring search across the accessor's searchable fields.
    #[serde(default)]
    pub search: Option<String>,

    /// Exact-match filters, restricted to the searchable fields.
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Field to order by; must be a searchable field or it is ignored.
    #[serde(default)]
    pub order_by: Option<String>,

    #[serde(default)]
    pub order_mode: OrderMode,

    /// Page size (defaults to 25 when absent).
    #[serde(default)]
    pub first: Option<u32>,

    /// Offset cursor.
    #[serde(default)]
    pub after: Option<u32>,
}

impl ListArgs {
    pub const DEFAULT_PAGE_SIZE: u32 = 25;

    pub fn page_size(&self) -> u32 {
        self.first.unwrap_or(Self::DEFAULT_PAGE_SIZE)
    }

    pub fn offset(&self) -> u32 {
        self.after.unwrap_or(0)
    }
}

/// One page of list results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching count, ignoring pagination.
    pub total: u64,
}

/// Convenience for building attribute maps in callers and tests.
pub fn attributes_from<I, K>(pairs: I) -> serde_json::Map<String, Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    // BTreeMap first for deterministic ordering in logs and fixtures.
    let ordered: BTreeMap<String, Value> =
        pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
    ordered.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_type_roundtrip() {
        for et in [
            EntityType::Group,
            EntityType::User,
            EntityType::Infrastructure,
            EntityType::MarkingDefinition,
        ] {
            assert_eq!(EntityType::parse(et.as_str()), Some(et));
        }
        assert_eq!(EntityType::parse("Campaign"), None);
    }

    #[test]
    fn entity_common_attributes() {
        let entity = Entity {
            internal_id: generate_internal_id(),
            entity_type: EntityType::Infrastructure,
            attributes: attributes_from([
                ("name", json!("botnet-c2")),
                ("description", json!("command and control")),
                ("aliases", json!(["c2", "command-server"])),
            ]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(entity.name(), Some("botnet-c2"));
        assert_eq!(entity.description(), Some("command and control"));
        assert_eq!(entity.aliases(), vec!["c2", "command-server"]);
    }

    #[test]
    fn list_args_ignore_unknown_options() {
        // Unrecognized options are ignored, not errors.
        let args: ListArgs = serde_json::from_value(json!({
            "search": "apt",
            "first": 10,
            "someFutureOption": true
        }))
        .unwrap();

        assert_eq!(args.search.as_deref(), Some("apt"));
        assert_eq!(args.page_size(), 10);
        assert_eq!(args.offset(), 0);
    }

    #[test]
    fn list_args_defaults() {
        let args = ListArgs::default();
        assert_eq!(args.page_size(), ListArgs::DEFAULT_PAGE_SIZE);
        assert_eq!(args.order_mode, OrderMode::Asc);
    }
}
