//! Argus Graph — Neo4j adapter for the knowledge graph.
//!
//! This crate is the single mutation point for durable entity and relation
//! state. It implements the [`argus_core::GraphStore`] interface the domain
//! accessors are written against; all Cypher construction, parameter
//! binding, and identifier escaping happens here.

pub mod client;
pub mod cypher;
pub mod store;

pub use client::GraphClient;
pub use cypher::escape_identifier;
