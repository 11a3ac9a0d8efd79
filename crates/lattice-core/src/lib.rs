//! lattice-core: Shared domain types for the Lattice knowledge-graph client.
//!
//! This crate provides the types shared by the client and CLI crates:
//! - Entity and Relationship records as the knowledge-base admin API returns them
//! - The accumulated `KnowledgeGraph` snapshot
//! - Wire events for the streaming ingestion protocol
//! - Mutation payloads for the update/create endpoints

pub mod events;
pub mod types;

pub use events::{StreamEvent, DATA_PREFIX};
pub use types::{
    Entity, EntityId, EntityType, EntityUpdate, KnowledgeBaseId, KnowledgeGraph, Relationship,
    RelationshipId, RelationshipUpdate, SynopsisEntityCreate, SynopsisInfo,
};
