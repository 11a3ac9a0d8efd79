//! Integration tests for the streaming ingestion endpoint, against a
//! wiremock server emitting newline-delimited `data: ` frames.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lattice_client::{ApiConfig, ClientError, GraphApiClient, StreamEnd};
use lattice_core::{EntityId, KnowledgeBaseId, RelationshipId};

const KB: KnowledgeBaseId = KnowledgeBaseId(7);

fn client_for(server: &MockServer) -> GraphApiClient {
    GraphApiClient::new(ApiConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..Default::default()
    })
    .unwrap()
}

async fn mount_stream(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/admin/knowledge_bases/7/graph/stream"))
        .and(query_param("query", "storage"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn streams_full_graph_until_complete() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"type\":\"entities\",\"data\":[{\"id\":1,\"name\":\"TiKV\"}]}\n",
        "data: {\"type\":\"relationships\",\"data\":[",
        "{\"id\":1,\"source_entity_id\":1,\"target_entity_id\":2}]}\n",
        "data: {\"type\":\"complete\"}\n",
    );
    mount_stream(&server, body).await;

    let result = client_for(&server)
        .stream_knowledge_graph(KB, "storage")
        .await
        .unwrap();

    assert_eq!(result.end, StreamEnd::Complete);
    assert_eq!(result.graph.entities.len(), 1);
    assert_eq!(result.graph.entities[0].id, EntityId(1));
    assert_eq!(result.graph.relationships.len(), 1);
    assert_eq!(result.graph.relationships[0].id, RelationshipId(1));
}

#[tokio::test]
async fn connection_close_without_complete_is_success() {
    let server = MockServer::start().await;
    let body = "data: {\"type\":\"entities\",\"data\":[{\"id\":3,\"name\":\"Raft\"}]}\n";
    mount_stream(&server, body).await;

    let result = client_for(&server)
        .stream_knowledge_graph(KB, "storage")
        .await
        .unwrap();

    assert_eq!(result.end, StreamEnd::ConnectionClosed);
    assert_eq!(result.graph.entities.len(), 1);
}

#[tokio::test]
async fn garbage_frames_do_not_abort_the_stream() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"type\":\"entities\",\"data\":[{\"id\":1,\"name\":\"TiKV\"}]}\n",
        "data: {{{ definitely not json\n",
        ": keep-alive\n",
        "data: {\"type\":\"heartbeat\"}\n",
        "data: {\"type\":\"complete\"}\n",
    );
    mount_stream(&server, body).await;

    let result = client_for(&server)
        .stream_knowledge_graph(KB, "storage")
        .await
        .unwrap();

    assert_eq!(result.end, StreamEnd::Complete);
    assert_eq!(result.graph.entities.len(), 1);
    assert!(result.graph.relationships.is_empty());
}

#[tokio::test]
async fn http_500_fails_without_a_graph() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/knowledge_bases/7/graph/stream"))
        .respond_with(ResponseTemplate::new(500).set_body_string("stream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .stream_knowledge_graph(KB, "storage")
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "stream unavailable");
        }
        other => panic!("expected Api error, got {other}"),
    }
}
