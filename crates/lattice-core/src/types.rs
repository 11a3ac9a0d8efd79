//! Core domain types for the Lattice knowledge graph.
//!
//! These types mirror the wire schema of the knowledge-base admin API and are
//! shared across the client and CLI crates. Identifiers are opaque integers
//! assigned by the server; the client never enforces uniqueness.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Identifiers ───────────────────────────────────────────────────

/// Identifier of a knowledge base on the remote service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct KnowledgeBaseId(pub i64);

/// Identifier of an entity, unique within its knowledge base.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EntityId(pub i64);

/// Identifier of a relationship, unique within its knowledge base.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RelationshipId(pub i64);

impl fmt::Display for KnowledgeBaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ── Entities ──────────────────────────────────────────────────────

/// Whether an entity came from extraction (`original`) or is a
/// synopsis summarizing other entities.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[default]
    Original,
    Synopsis,
}

/// Synopsis descriptor: the entities being summarized and the topic label.
///
/// Present only on entities with `entity_type == Synopsis`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynopsisInfo {
    pub entities: Vec<EntityId>,
    pub topic: String,
}

/// A node in the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<KnowledgeBaseId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Open-ended key/value metadata; the server does not fix a schema.
    #[serde(default)]
    pub meta: serde_json::Value,
    #[serde(default)]
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis_info: Option<SynopsisInfo>,
}

// ── Relationships ─────────────────────────────────────────────────

/// A directed edge between two entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub id: RelationshipId,
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<KnowledgeBaseId>,
    #[serde(default)]
    pub description: String,
    /// Open-ended key/value metadata; the server does not fix a schema.
    #[serde(default)]
    pub meta: serde_json::Value,
    #[serde(default)]
    pub weight: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
    /// Source document this edge was extracted from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<i64>,
    /// Source chunk this edge was extracted from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<Uuid>,
}

// ── Graph snapshot ────────────────────────────────────────────────

/// An ordered-by-arrival snapshot of graph data returned by the service.
///
/// Records keep the order and multiplicity the server sent them in; the
/// client performs no deduplication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl KnowledgeGraph {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }
}

// ── Mutation payloads ─────────────────────────────────────────────

/// Fields accepted by the entity update endpoint. `None` fields are
/// omitted from the request body and left unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Fields accepted by the relationship update endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

/// Request body for creating a synopsis entity over existing entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynopsisEntityCreate {
    pub name: String,
    pub description: String,
    pub topic: String,
    #[serde(default)]
    pub meta: serde_json::Value,
    /// Identifiers of the entities this synopsis summarizes.
    pub entities: Vec<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity() -> Entity {
        Entity {
            id: EntityId(42),
            knowledge_base_id: Some(KnowledgeBaseId(7)),
            name: "TiKV".to_string(),
            description: "Distributed key-value storage engine".to_string(),
            meta: serde_json::json!({"source": "docs", "lang": "en"}),
            entity_type: EntityType::Original,
            synopsis_info: None,
        }
    }

    #[test]
    fn entity_serialization_roundtrip() {
        let entity = sample_entity();
        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, back);
    }

    #[test]
    fn entity_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EntityType::Original).unwrap(),
            "\"original\""
        );
        assert_eq!(
            serde_json::to_string(&EntityType::Synopsis).unwrap(),
            "\"synopsis\""
        );
    }

    #[test]
    fn entity_defaults_for_missing_fields() {
        // Servers omit optional fields rather than sending nulls.
        let entity: Entity = serde_json::from_str(r#"{"id": 1, "name": "Raft"}"#).unwrap();
        assert_eq!(entity.id, EntityId(1));
        assert_eq!(entity.entity_type, EntityType::Original);
        assert!(entity.description.is_empty());
        assert!(entity.synopsis_info.is_none());
    }

    #[test]
    fn synopsis_entity_carries_sources_and_topic() {
        let json = r#"{
            "id": 9,
            "name": "Storage overview",
            "entity_type": "synopsis",
            "synopsis_info": {"entities": [1, 2, 3], "topic": "storage"}
        }"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.entity_type, EntityType::Synopsis);
        let info = entity.synopsis_info.unwrap();
        assert_eq!(info.entities, vec![EntityId(1), EntityId(2), EntityId(3)]);
        assert_eq!(info.topic, "storage");
    }

    #[test]
    fn relationship_serialization_roundtrip() {
        let rel = Relationship {
            id: RelationshipId(5),
            source_entity_id: EntityId(1),
            target_entity_id: EntityId(2),
            knowledge_base_id: None,
            description: "TiKV stores data for TiDB".to_string(),
            meta: serde_json::json!({}),
            weight: 3,
            last_modified_at: Some(Utc::now()),
            document_id: Some(11),
            chunk_id: Some(Uuid::new_v4()),
        };
        let json = serde_json::to_string(&rel).unwrap();
        let back: Relationship = serde_json::from_str(&json).unwrap();
        assert_eq!(rel, back);
    }

    #[test]
    fn entity_update_omits_unset_fields() {
        let update = EntityUpdate {
            description: Some("updated".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"description":"updated"}"#);
    }

    #[test]
    fn knowledge_graph_default_is_empty() {
        let graph = KnowledgeGraph::default();
        assert!(graph.is_empty());

        // Sparse server responses deserialize into empty sequences.
        let graph: KnowledgeGraph = serde_json::from_str("{}").unwrap();
        assert!(graph.is_empty());
    }
}
