//! Edit-context operations and the in-memory context store.
//!
//! An edit context is an advisory marker: it tells other connected clients
//! that a principal is editing an object. It enforces nothing — concurrent
//! principals may hold contexts on the same object — and both set and
//! clear are idempotent.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use argus_core::{
    DomainError, EditContext, EditContextStore, Entity, GraphStore, NotificationPayload,
    Principal, StoreError,
};

use crate::accessor::EntityAccessor;

impl<S: GraphStore, C: EditContextStore> EntityAccessor<S, C> {
    /// Mark `object_id` as being edited by `principal`, then re-fetch the
    /// object and publish it on the EDITED topic so other clients observe
    /// the change.
    pub async fn set_edit_context(
        &self,
        principal: &Principal,
        object_id: &str,
        input: Value,
    ) -> Result<Entity, DomainError> {
        self.contexts.set(principal, object_id, input).await?;
        self.refresh_and_notify(principal, object_id, "set the edit context")
            .await
    }

    /// Remove `principal`'s marker on `object_id`, mirroring `set`:
    /// re-fetch and re-publish. Clearing an absent context succeeds.
    pub async fn clear_edit_context(
        &self,
        principal: &Principal,
        object_id: &str,
    ) -> Result<Entity, DomainError> {
        self.contexts.clear(principal, object_id).await?;
        self.refresh_and_notify(principal, object_id, "clear the edit context")
            .await
    }

    /// Who currently holds an edit context on `object_id`.
    pub async fn editors(&self, object_id: &str) -> Result<Vec<EditContext>, DomainError> {
        Ok(self.contexts.editors(object_id).await?)
    }

    async fn refresh_and_notify(
        &self,
        principal: &Principal,
        object_id: &str,
        operation: &str,
    ) -> Result<Entity, DomainError> {
        let entity = self
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| DomainError::not_found(operation, self.config.entity_type))?;
        self.bus.publish(
            &self.config.edited_topic,
            NotificationPayload::Entity(entity.clone()),
            principal,
        );
        Ok(entity)
    }
}

/// Process-local edit-context store.
///
/// Suitable for single-node deployments and tests; a multi-node deployment
/// swaps in a shared transient store behind the same trait.
#[derive(Default)]
pub struct InMemoryEditContextStore {
    entries: RwLock<HashMap<String, Vec<EditContext>>>,
}

impl InMemoryEditContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditContextStore for InMemoryEditContextStore {
    async fn set(
        &self,
        principal: &Principal,
        object_id: &str,
        input: Value,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let contexts = entries.entry(object_id.to_string()).or_default();
        // One context per (object, principal): setting again replaces it.
        contexts.retain(|c| c.principal.id != principal.id);
        contexts.push(EditContext {
            object_id: object_id.to_string(),
            principal: principal.clone(),
            input,
            acquired_at: Utc::now(),
        });
        Ok(())
    }

    async fn clear(&self, principal: &Principal, object_id: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if let Some(contexts) = entries.get_mut(object_id) {
            contexts.retain(|c| c.principal.id != principal.id);
            if contexts.is_empty() {
                entries.remove(object_id);
            }
        }
        Ok(())
    }

    async fn editors(&self, object_id: &str) -> Result<Vec<EditContext>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(object_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_is_idempotent_per_principal() {
        let store = InMemoryEditContextStore::new();
        let alice = Principal::new("u1", "alice");

        store
            .set(&alice, "g1", json!({"focusOn": "name"}))
            .await
            .unwrap();
        store
            .set(&alice, "g1", json!({"focusOn": "description"}))
            .await
            .unwrap();

        let editors = store.editors("g1").await.unwrap();
        assert_eq!(editors.len(), 1);
        assert_eq!(editors[0].input, json!({"focusOn": "description"}));
    }

    #[tokio::test]
    async fn concurrent_editors_coexist() {
        let store = InMemoryEditContextStore::new();
        let alice = Principal::new("u1", "alice");
        let bob = Principal::new("u2", "bob");

        store.set(&alice, "g1", json!({})).await.unwrap();
        store.set(&bob, "g1", json!({})).await.unwrap();

        // Advisory, not a lock: both contexts are visible.
        assert_eq!(store.editors("g1").await.unwrap().len(), 2);

        // Clearing is scoped to the requesting principal.
        store.clear(&alice, "g1").await.unwrap();
        let editors = store.editors("g1").await.unwrap();
        assert_eq!(editors.len(), 1);
        assert_eq!(editors[0].principal.id, "u2");
    }

    #[tokio::test]
    async fn clear_absent_context_succeeds() {
        let store = InMemoryEditContextStore::new();
        let alice = Principal::new("u1", "alice");

        store.clear(&alice, "missing").await.unwrap();
        assert!(store.editors("missing").await.unwrap().is_empty());
    }
}
