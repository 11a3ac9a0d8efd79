//! Write operations against the knowledge-base graph API.
//!
//! All mutations are single request/response exchanges; the server returns
//! the updated record, which is decoded and handed back to the caller.

use reqwest::Method;

use lattice_core::{
    Entity, EntityId, EntityUpdate, KnowledgeBaseId, Relationship, RelationshipId,
    RelationshipUpdate, SynopsisEntityCreate,
};

use crate::client::{ClientError, GraphApiClient};

impl GraphApiClient {
    // ── Entity Mutations ─────────────────────────────────────────

    /// Update an entity's name, description, or metadata.
    pub async fn update_entity(
        &self,
        kb_id: KnowledgeBaseId,
        entity_id: EntityId,
        update: &EntityUpdate,
    ) -> Result<Entity, ClientError> {
        let url = self.graph_url(kb_id, &format!("/entities/{entity_id}"));
        match self.execute(self.request(Method::PUT, url).json(update)).await {
            Err(ClientError::Api { status: 404, .. }) => Err(ClientError::NotFound {
                kind: "entity",
                id: entity_id.0,
                kb_id: kb_id.0,
            }),
            other => other,
        }
    }

    /// Create a synopsis entity summarizing a set of existing entities.
    pub async fn create_synopsis_entity(
        &self,
        kb_id: KnowledgeBaseId,
        request: &SynopsisEntityCreate,
    ) -> Result<Entity, ClientError> {
        let url = self.graph_url(kb_id, "/entities/synopsis");
        self.execute(self.request(Method::POST, url).json(request))
            .await
    }

    // ── Relationship Mutations ───────────────────────────────────

    /// Update a relationship's description, metadata, or weight.
    pub async fn update_relationship(
        &self,
        kb_id: KnowledgeBaseId,
        relationship_id: RelationshipId,
        update: &RelationshipUpdate,
    ) -> Result<Relationship, ClientError> {
        let url = self.graph_url(kb_id, &format!("/relationships/{relationship_id}"));
        match self.execute(self.request(Method::PUT, url).json(update)).await {
            Err(ClientError::Api { status: 404, .. }) => Err(ClientError::NotFound {
                kind: "relationship",
                id: relationship_id.0,
                kb_id: kb_id.0,
            }),
            other => other,
        }
    }
}
