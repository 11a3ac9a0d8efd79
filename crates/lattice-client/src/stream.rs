//! Incremental streaming ingestion of a knowledge graph.
//!
//! The stream endpoint returns a long-lived, newline-delimited response
//! body. Frames prefixed with `data: ` carry JSON events; the coordinator
//! classifies each event and appends entity/relationship batches to an
//! accumulator until the server sends a `complete` event or closes the
//! connection. A single corrupt frame is skipped with a diagnostic, never
//! aborting the stream; a transport failure aborts the whole call and
//! discards everything accumulated so far.

use bytes::Bytes;
use futures::{Stream, StreamExt};

use lattice_core::{Entity, KnowledgeBaseId, KnowledgeGraph, Relationship, StreamEvent, DATA_PREFIX};

use crate::client::{ClientError, GraphApiClient};

/// How a successful streaming call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server sent an explicit `complete` event.
    Complete,
    /// The connection closed without a `complete` event. The accumulated
    /// graph is still returned; callers that need to know whether the
    /// server actually finished can check for this.
    ConnectionClosed,
}

/// Result of a streaming ingestion call.
#[derive(Debug, Clone)]
pub struct GraphStream {
    pub graph: KnowledgeGraph,
    pub end: StreamEnd,
}

impl GraphApiClient {
    /// Stream the knowledge graph for a query, accumulating entities and
    /// relationships in arrival order until the server signals completion
    /// or closes the connection.
    pub async fn stream_knowledge_graph(
        &self,
        kb_id: KnowledgeBaseId,
        query: &str,
    ) -> Result<GraphStream, ClientError> {
        let url = self.graph_url(kb_id, "/stream");
        let response = self
            .stream_request(url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let frames = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ClientError::Transport))
            .boxed();

        let result = ingest(frames).await?;
        tracing::debug!(
            %kb_id,
            entities = result.graph.entities.len(),
            relationships = result.graph.relationships.len(),
            end = ?result.end,
            "graph stream finished"
        );
        Ok(result)
    }
}

/// Drive the decoder over a byte stream and accumulate the graph.
///
/// Separated from the HTTP layer so the state machine is testable against
/// in-memory streams.
pub(crate) async fn ingest<S>(stream: S) -> Result<GraphStream, ClientError>
where
    S: Stream<Item = Result<Bytes, ClientError>> + Unpin,
{
    let mut decoder = FrameDecoder::new(stream);
    let mut graph = KnowledgeGraph::default();

    while let Some(frame) = decoder.next_frame().await? {
        match classify_frame(&frame) {
            FrameEvent::Entities(mut batch) => graph.entities.append(&mut batch),
            FrameEvent::Relationships(mut batch) => graph.relationships.append(&mut batch),
            FrameEvent::Complete => {
                return Ok(GraphStream {
                    graph,
                    end: StreamEnd::Complete,
                })
            }
            FrameEvent::Ignored => {}
            FrameEvent::Unrecognized => {
                tracing::debug!(frame = %frame, "skipping unrecognized stream event");
            }
            FrameEvent::Malformed(err) => {
                tracing::warn!(error = %err, "skipping malformed stream frame");
            }
        }
    }

    // No explicit terminator; the server closed the connection normally.
    Ok(GraphStream {
        graph,
        end: StreamEnd::ConnectionClosed,
    })
}

/// Splits a raw byte stream into newline-delimited frames, buffering any
/// partial frame that arrives split across reads.
///
/// The buffer holds raw bytes; text is only decoded once a full line is
/// available, so a multibyte character straddling a read boundary is not
/// mangled.
pub(crate) struct FrameDecoder<S> {
    stream: S,
    buffer: Vec<u8>,
    exhausted: bool,
}

impl<S> FrameDecoder<S>
where
    S: Stream<Item = Result<Bytes, ClientError>> + Unpin,
{
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            exhausted: false,
        }
    }

    /// Pull the next complete frame, or `None` once the stream is drained.
    ///
    /// Blank lines are skipped. On end of stream a non-empty remainder is
    /// yielded as a best-effort final frame.
    pub(crate) async fn next_frame(&mut self) -> Result<Option<String>, ClientError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=pos).collect();
                let decoded = String::from_utf8_lossy(&line);
                let frame = decoded.trim();
                if frame.is_empty() {
                    continue;
                }
                return Ok(Some(frame.to_string()));
            }

            if self.exhausted {
                let rest = std::mem::take(&mut self.buffer);
                let decoded = String::from_utf8_lossy(&rest);
                let frame = decoded.trim();
                if frame.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(frame.to_string()));
            }

            match self.stream.next().await {
                Some(Ok(bytes)) => self.buffer.extend_from_slice(&bytes),
                Some(Err(err)) => return Err(err),
                None => self.exhausted = true,
            }
        }
    }
}

/// Outcome of classifying one decoded frame.
///
/// Modeled as a plain enum rather than a `Result` so the coordinator's loop
/// stays uniform and exhaustive: only transport failures are errors, frame
/// content never is.
pub(crate) enum FrameEvent {
    Entities(Vec<Entity>),
    Relationships(Vec<Relationship>),
    Complete,
    /// Not a data frame (comment line, keep-alive, unrelated record).
    Ignored,
    /// A data frame with a `type` tag this client does not know.
    Unrecognized,
    /// A data frame whose payload is not valid JSON.
    Malformed(serde_json::Error),
}

pub(crate) fn classify_frame(frame: &str) -> FrameEvent {
    let Some(payload) = frame.strip_prefix(DATA_PREFIX) else {
        return FrameEvent::Ignored;
    };

    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(StreamEvent::Entities { data }) => FrameEvent::Entities(data),
        Ok(StreamEvent::Relationships { data }) => FrameEvent::Relationships(data),
        Ok(StreamEvent::Complete) => FrameEvent::Complete,
        Ok(StreamEvent::Unknown) => FrameEvent::Unrecognized,
        Err(err) => FrameEvent::Malformed(err),
    }
}
