//! Argus Domain — typed accessors over the knowledge graph.
//!
//! Every entity type on the platform is served by one [`EntityAccessor`]
//! instance implementing the same protocol: validate, delegate the mutation
//! to the graph store, then broadcast a notification before returning. The
//! accessors hold no durable state; the graph store and edit-context store
//! behind them are the only serialization points.
//!
//! - entity operations: find-by-id, find-all, add, edit-field, delete
//! - relation operations: schema-validated add/remove with endpoint
//!   direction inference from the anchor entity
//! - edit-context operations: advisory "who is editing this" markers,
//!   re-broadcast so connected clients observe the change

pub mod accessor;
pub mod bus;
pub mod context;
pub mod groups;
pub mod infrastructures;
mod relation;

pub use accessor::{AccessorConfig, EntityAccessor};
pub use bus::NotificationBus;
pub use context::InMemoryEditContextStore;
