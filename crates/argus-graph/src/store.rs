//! [`GraphStore`] implementation over Neo4j.
//!
//! Entities are nodes labeled by their entity type, carrying `internal_id`,
//! `entity_type`, `created_at`, `updated_at` plus their type-specific
//! attributes as flat properties. Attribute maps are written through
//! `apoc.convert.fromJsonMap` so nested values convert server-side.

use chrono::{DateTime, Utc};
use neo4rs::query;
use serde_json::Value;

use argus_core::schema::RelationCategory;
use argus_core::types::{generate_internal_id, OrderMode};
use argus_core::{
    EditInput, Entity, EntityType, GraphStore, ListArgs, Page, Principal, Relation,
    RelationInput, StoreError,
};

use crate::client::GraphClient;
use crate::cypher::escape_identifier;

/// Properties managed by the adapter itself, never part of the attribute map.
const RESERVED_KEYS: [&str; 4] = ["internal_id", "entity_type", "created_at", "updated_at"];

impl GraphStore for GraphClient {
    async fn load_by_id(
        &self,
        id: &str,
        entity_type: EntityType,
    ) -> Result<Option<Entity>, StoreError> {
        let cypher = format!(
            "MATCH (n:{label} {{internal_id: $id}}) RETURN n LIMIT 1",
            label = escape_identifier(entity_type.as_str())
        );
        let q = query(&cypher).param("id", id.to_string());

        match self.query_one(q).await? {
            Some(row) => Ok(Some(row_to_entity(&row, "n")?)),
            None => Ok(None),
        }
    }

    async fn list_entities(
        &self,
        types: &[EntityType],
        searchable_fields: &[String],
        args: &ListArgs,
    ) -> Result<Page<Entity>, StoreError> {
        let mut where_parts: Vec<String> = Vec::new();

        let match_clause = if let [single] = types {
            format!("MATCH (n:{})", escape_identifier(single.as_str()))
        } else {
            where_parts.push("n.entity_type IN $types".to_string());
            "MATCH (n)".to_string()
        };

        let search_active = args.search.is_some() && !searchable_fields.is_empty();
        if search_active {
            // Fields may be scalars or lists (e.g. aliases); flatten both
            // into one searchable string per field.
            let per_field: Vec<String> = searchable_fields
                .iter()
                .map(|field| {
                    format!(
                        "toLower(apoc.text.join([x IN apoc.coll.flatten([coalesce(n.{f}, [])]) \
                         | toString(x)], ' ')) CONTAINS toLower($search)",
                        f = escape_identifier(field)
                    )
                })
                .collect();
            where_parts.push(format!("({})", per_field.join(" OR ")));
        }

        // Filters on keys outside the searchable fields are ignored.
        let mut filter_params: Vec<(String, Vec<String>)> = Vec::new();
        for (i, filter) in args.filters.iter().enumerate() {
            if !searchable_fields.contains(&filter.key) {
                continue;
            }
            let param = format!("filter_{i}");
            where_parts.push(format!(
                "n.{} IN ${param}",
                escape_identifier(&filter.key)
            ));
            filter_params.push((param, filter.values.clone()));
        }

        let where_clause = if where_parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_parts.join(" AND "))
        };

        // An order_by outside the searchable fields is ignored.
        let order_field = args
            .order_by
            .as_deref()
            .filter(|f| searchable_fields.iter().any(|s| s == f))
            .map(escape_identifier)
            .unwrap_or_else(|| "`created_at`".to_string());
        let order_dir = match args.order_mode {
            OrderMode::Asc => "ASC",
            OrderMode::Desc => "DESC",
        };

        let type_tags: Vec<String> = types.iter().map(|t| t.as_str().to_string()).collect();
        let bind = |cypher: &str| {
            let mut q = query(cypher);
            if types.len() != 1 {
                q = q.param("types", type_tags.clone());
            }
            if search_active {
                q = q.param("search", args.search.clone().unwrap_or_default());
            }
            for (name, values) in &filter_params {
                q = q.param(name.as_str(), values.clone());
            }
            q
        };

        let list_cypher = format!(
            "{match_clause}{where_clause} RETURN n \
             ORDER BY n.{order_field} {order_dir} SKIP $offset LIMIT $limit"
        );
        let list_q = bind(&list_cypher)
            .param("offset", args.offset() as i64)
            .param("limit", args.page_size() as i64);

        let rows = self.query_rows(list_q).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(row_to_entity(&row, "n")?);
        }

        let count_cypher = format!("{match_clause}{where_clause} RETURN count(n) AS cnt");
        let total = match self.query_one(bind(&count_cypher)).await? {
            Some(row) => row.get::<i64>("cnt").unwrap_or(0).max(0) as u64,
            None => 0,
        };

        Ok(Page { items, total })
    }

    async fn list_related(
        &self,
        anchor_id: &str,
        anchor_type: EntityType,
        relation_type: &str,
        target_type: EntityType,
    ) -> Result<Vec<Entity>, StoreError> {
        // Orientation-agnostic: members point at their group, while a
        // group points at the markings it accesses. The target label
        // pins down which side the caller wants.
        let cypher = format!(
            "MATCH (t:{target})-[:{rel}]-(a:{anchor} {{internal_id: $anchor_id}}) \
             RETURN t ORDER BY t.created_at ASC",
            target = escape_identifier(target_type.as_str()),
            rel = escape_identifier(relation_type),
            anchor = escape_identifier(anchor_type.as_str()),
        );
        let q = query(&cypher).param("anchor_id", anchor_id.to_string());

        let rows = self.query_rows(q).await?;
        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            entities.push(row_to_entity(&row, "t")?);
        }
        Ok(entities)
    }

    async fn create_entity(
        &self,
        principal: &Principal,
        attributes: serde_json::Map<String, Value>,
        entity_type: EntityType,
    ) -> Result<Entity, StoreError> {
        let internal_id = generate_internal_id();
        let now = Utc::now();

        let mut attributes = attributes;
        for key in RESERVED_KEYS {
            attributes.remove(key);
        }
        let props_json = serde_json::to_string(&attributes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let cypher = format!(
            "CREATE (n:{label} {{internal_id: $id, entity_type: $entity_type, \
             created_at: $now, updated_at: $now}}) \
             SET n += apoc.convert.fromJsonMap($props)",
            label = escape_identifier(entity_type.as_str())
        );
        let q = query(&cypher)
            .param("id", internal_id.clone())
            .param("entity_type", entity_type.as_str())
            .param("now", now.to_rfc3339())
            .param("props", props_json);

        self.run(q).await?;

        tracing::debug!(
            principal = %principal.id,
            entity_type = %entity_type,
            internal_id = %internal_id,
            "Entity created"
        );

        Ok(Entity {
            internal_id,
            entity_type,
            attributes,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_attribute(
        &self,
        principal: &Principal,
        id: &str,
        entity_type: EntityType,
        input: &EditInput,
    ) -> Result<Option<Entity>, StoreError> {
        if RESERVED_KEYS.contains(&input.key.as_str()) {
            // entity_type and the adapter-managed timestamps never change.
            return Err(StoreError::Backend(format!(
                "attribute {} is managed by the store and cannot be edited",
                input.key
            )));
        }

        let mut patch = serde_json::Map::new();
        patch.insert(input.key.clone(), input.value.clone());
        let patch_json = serde_json::to_string(&patch)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let cypher = format!(
            "MATCH (n:{label} {{internal_id: $id}}) \
             SET n += apoc.convert.fromJsonMap($patch), n.updated_at = $now \
             RETURN n",
            label = escape_identifier(entity_type.as_str())
        );
        let q = query(&cypher)
            .param("id", id.to_string())
            .param("patch", patch_json)
            .param("now", Utc::now().to_rfc3339());

        match self.query_one(q).await? {
            Some(row) => {
                tracing::debug!(
                    principal = %principal.id,
                    entity_type = %entity_type,
                    internal_id = %id,
                    key = %input.key,
                    "Attribute updated"
                );
                Ok(Some(row_to_entity(&row, "n")?))
            }
            None => Ok(None),
        }
    }

    async fn delete_element_by_id(
        &self,
        principal: &Principal,
        id: &str,
        entity_type: EntityType,
    ) -> Result<(), StoreError> {
        let cypher = format!(
            "MATCH (n:{label} {{internal_id: $id}}) DETACH DELETE n",
            label = escape_identifier(entity_type.as_str())
        );
        let q = query(&cypher).param("id", id.to_string());
        self.run(q).await?;

        tracing::debug!(
            principal = %principal.id,
            entity_type = %entity_type,
            internal_id = %id,
            "Entity deleted"
        );
        Ok(())
    }

    async fn create_relation(
        &self,
        principal: &Principal,
        input: &RelationInput,
    ) -> Result<Relation, StoreError> {
        let (Some(from_id), Some(to_id)) = (input.from_id.as_deref(), input.to_id.as_deref())
        else {
            return Err(StoreError::Backend(
                "create_relation requires both endpoints to be resolved".to_string(),
            ));
        };

        let internal_id = generate_internal_id();
        let now = Utc::now();

        let cypher = format!(
            "MATCH (a {{internal_id: $from_id}}) \
             MATCH (b {{internal_id: $to_id}}) \
             CREATE (a)-[r:{rel} {{internal_id: $rid, created_at: $now}}]->(b) \
             RETURN r.internal_id AS rid",
            rel = escape_identifier(&input.relationship_type)
        );
        let q = query(&cypher)
            .param("from_id", from_id.to_string())
            .param("to_id", to_id.to_string())
            .param("rid", internal_id.clone())
            .param("now", now.to_rfc3339());

        match self.query_one(q).await? {
            Some(_) => {
                tracing::debug!(
                    principal = %principal.id,
                    relationship_type = %input.relationship_type,
                    from_id,
                    to_id,
                    "Relation created"
                );
                Ok(Relation {
                    internal_id,
                    relationship_type: input.relationship_type.clone(),
                    from_id: from_id.to_string(),
                    to_id: to_id.to_string(),
                    created_at: now,
                })
            }
            None => Err(StoreError::NotFound {
                entity_type: "relation endpoint".to_string(),
                id: format!("{from_id} -> {to_id}"),
            }),
        }
    }

    async fn delete_relations_by_from_and_to(
        &self,
        principal: &Principal,
        from_id: &str,
        to_id: &str,
        relationship_type: &str,
        category: RelationCategory,
    ) -> Result<u64, StoreError> {
        let cypher = format!(
            "MATCH (a {{internal_id: $from_id}})-[r:{rel}]->(b {{internal_id: $to_id}}) \
             DELETE r RETURN count(r) AS cnt",
            rel = escape_identifier(relationship_type)
        );
        let q = query(&cypher)
            .param("from_id", from_id.to_string())
            .param("to_id", to_id.to_string());

        let deleted = match self.query_one(q).await? {
            Some(row) => row.get::<i64>("cnt").unwrap_or(0).max(0) as u64,
            None => 0,
        };

        tracing::debug!(
            principal = %principal.id,
            relationship_type,
            %category,
            from_id,
            to_id,
            deleted,
            "Relations deleted"
        );
        Ok(deleted)
    }
}

// ── Row / node conversion ────────────────────────────────────────

fn row_to_entity(row: &neo4rs::Row, column: &str) -> Result<Entity, StoreError> {
    let node: neo4rs::Node = row
        .get(column)
        .map_err(|e| StoreError::Serialization(format!("Failed to deserialize node: {e}")))?;
    node_to_entity(&node)
}

fn node_to_entity(node: &neo4rs::Node) -> Result<Entity, StoreError> {
    let internal_id: String = node
        .get("internal_id")
        .map_err(|e| StoreError::Serialization(format!("node missing internal_id: {e}")))?;
    let tag: String = node
        .get("entity_type")
        .map_err(|e| StoreError::Serialization(format!("node missing entity_type: {e}")))?;
    let entity_type = EntityType::parse(&tag)
        .ok_or_else(|| StoreError::Serialization(format!("unknown entity type tag: {tag}")))?;

    let created_at = timestamp_property(node, "created_at")?;
    let updated_at = timestamp_property(node, "updated_at")?;

    let mut attributes = serde_json::Map::new();
    for key in node.keys() {
        if RESERVED_KEYS.contains(&key) {
            continue;
        }
        if let Some(value) = property_value(node, key) {
            attributes.insert(key.to_string(), value);
        }
    }

    Ok(Entity {
        internal_id,
        entity_type,
        attributes,
        created_at,
        updated_at,
    })
}

fn timestamp_property(node: &neo4rs::Node, key: &str) -> Result<DateTime<Utc>, StoreError> {
    let raw: String = node
        .get(key)
        .map_err(|e| StoreError::Serialization(format!("node missing {key}: {e}")))?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("bad {key} timestamp: {e}")))
}

/// Read one node property back into a JSON value, probing the Bolt types
/// the adapter writes.
fn property_value(node: &neo4rs::Node, key: &str) -> Option<Value> {
    if let Ok(v) = node.get::<String>(key) {
        return Some(Value::String(v));
    }
    if let Ok(v) = node.get::<bool>(key) {
        return Some(Value::Bool(v));
    }
    if let Ok(v) = node.get::<i64>(key) {
        return Some(Value::from(v));
    }
    if let Ok(v) = node.get::<f64>(key) {
        return Some(Value::from(v));
    }
    if let Ok(v) = node.get::<Vec<String>>(key) {
        return Some(Value::from(v));
    }
    None
}
