//! argus-core: Shared types, configuration, and error handling for the Argus platform.
//!
//! This crate provides the foundational types used across all Argus components:
//! - Entity and relation types for the knowledge graph
//! - The relationship schema registry (relationship type → category)
//! - Notification topics and event types for change broadcasting
//! - The storage interfaces the domain layer requires
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod events;
pub mod schema;
pub mod store;
pub mod types;

pub use error::{DomainError, StoreError};
pub use events::{NotificationEvent, NotificationPayload, OperationKind, Topic, TopicRegistry};
pub use schema::{RelationCategory, RelationshipSchema};
pub use store::{EditContextStore, GraphStore};
pub use types::{
    EditContext, EditInput, Entity, EntityType, Filter, ListArgs, OrderMode, Page, Principal,
    Relation, RelationInput,
};
