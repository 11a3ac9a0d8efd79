//! Read operations against the knowledge-base graph API.

use reqwest::Method;
use serde::Serialize;

use lattice_core::{
    Entity, EntityId, KnowledgeBaseId, KnowledgeGraph, Relationship, RelationshipId,
};

use crate::client::{ClientError, GraphApiClient};

/// Request body for the graph retrieval endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveGraphRequest {
    pub query: String,
    pub top_k: u32,
}

/// Request body for the legacy graph search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSearchRequest {
    pub query: String,
    pub top_k: u32,
    pub similarity_threshold: f64,
}

impl GraphApiClient {
    // ── Entity Lookups ───────────────────────────────────────────

    /// Get a single entity by id.
    pub async fn get_entity(
        &self,
        kb_id: KnowledgeBaseId,
        entity_id: EntityId,
    ) -> Result<Entity, ClientError> {
        let url = self.graph_url(kb_id, &format!("/entities/{entity_id}"));
        match self.execute(self.request(Method::GET, url)).await {
            Err(ClientError::Api { status: 404, .. }) => Err(ClientError::NotFound {
                kind: "entity",
                id: entity_id.0,
                kb_id: kb_id.0,
            }),
            other => other,
        }
    }

    /// Search entities similar to a free-text query.
    pub async fn search_entities(
        &self,
        kb_id: KnowledgeBaseId,
        query: &str,
        top_k: u32,
    ) -> Result<Vec<Entity>, ClientError> {
        let url = self.graph_url(kb_id, "/entities/search");
        let request = self
            .request(Method::GET, url)
            .query(&[("query", query.to_string()), ("top_k", top_k.to_string())]);
        self.execute(request).await
    }

    /// Get the subgraph around a single entity (its relationships and the
    /// entities they touch).
    pub async fn get_entity_subgraph(
        &self,
        kb_id: KnowledgeBaseId,
        entity_id: EntityId,
    ) -> Result<KnowledgeGraph, ClientError> {
        let url = self.graph_url(kb_id, &format!("/entities/{entity_id}/subgraph"));
        match self.execute(self.request(Method::GET, url)).await {
            Err(ClientError::Api { status: 404, .. }) => Err(ClientError::NotFound {
                kind: "entity",
                id: entity_id.0,
                kb_id: kb_id.0,
            }),
            other => other,
        }
    }

    // ── Relationship Lookups ─────────────────────────────────────

    /// Get a single relationship by id.
    pub async fn get_relationship(
        &self,
        kb_id: KnowledgeBaseId,
        relationship_id: RelationshipId,
    ) -> Result<Relationship, ClientError> {
        let url = self.graph_url(kb_id, &format!("/relationships/{relationship_id}"));
        match self.execute(self.request(Method::GET, url)).await {
            Err(ClientError::Api { status: 404, .. }) => Err(ClientError::NotFound {
                kind: "relationship",
                id: relationship_id.0,
                kb_id: kb_id.0,
            }),
            other => other,
        }
    }

    // ── Graph Retrieval ──────────────────────────────────────────

    /// Retrieve the graph neighborhood relevant to a query in one shot.
    ///
    /// For large graphs prefer [`stream_knowledge_graph`], which accumulates
    /// results incrementally instead of materializing the response at once.
    ///
    /// [`stream_knowledge_graph`]: GraphApiClient::stream_knowledge_graph
    pub async fn retrieve_graph(
        &self,
        kb_id: KnowledgeBaseId,
        request: &RetrieveGraphRequest,
    ) -> Result<KnowledgeGraph, ClientError> {
        let url = self.graph_url(kb_id, "/retrieve");
        self.execute(self.request(Method::POST, url).json(request))
            .await
    }

    /// Legacy search endpoint, kept for servers that predate `/retrieve`.
    pub async fn search_graph(
        &self,
        kb_id: KnowledgeBaseId,
        request: &GraphSearchRequest,
    ) -> Result<KnowledgeGraph, ClientError> {
        let url = self.graph_url(kb_id, "/search");
        self.execute(self.request(Method::POST, url).json(request))
            .await
    }
}
