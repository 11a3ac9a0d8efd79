//! Wire events for the streaming graph ingestion protocol.
//!
//! The streaming endpoint emits newline-delimited records. Records carrying
//! event data start with the literal `data: ` prefix followed by a JSON
//! object tagged by `type`; everything else on the wire (blank keep-alives,
//! comment lines) is ignored by the client.

use serde::{Deserialize, Serialize};

use crate::types::{Entity, Relationship};

/// Literal prefix marking a data-carrying frame.
pub const DATA_PREFIX: &str = "data: ";

/// One event decoded from a stream frame, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A batch of entities to append to the accumulator.
    Entities { data: Vec<Entity> },
    /// A batch of relationships to append to the accumulator.
    Relationships { data: Vec<Relationship> },
    /// Terminal signal: the server finished emitting the graph.
    Complete,
    /// Any `type` tag this client version does not know. Skipped, never fatal.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;

    #[test]
    fn entities_event_deserializes() {
        let json = r#"{"type":"entities","data":[{"id":1,"name":"TiKV"}]}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        match event {
            StreamEvent::Entities { data } => {
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].id, EntityId(1));
            }
            other => panic!("expected entities event, got {other:?}"),
        }
    }

    #[test]
    fn relationships_event_deserializes() {
        let json = r#"{
            "type": "relationships",
            "data": [{"id": 1, "source_entity_id": 1, "target_entity_id": 2}]
        }"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        match event {
            StreamEvent::Relationships { data } => {
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].source_entity_id, EntityId(1));
                assert_eq!(data[0].target_entity_id, EntityId(2));
            }
            other => panic!("expected relationships event, got {other:?}"),
        }
    }

    #[test]
    fn complete_event_deserializes() {
        let event: StreamEvent = serde_json::from_str(r#"{"type":"complete"}"#).unwrap();
        assert_eq!(event, StreamEvent::Complete);
    }

    #[test]
    fn unknown_event_type_is_tolerated() {
        let event: StreamEvent = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(event, StreamEvent::Unknown);
    }

    #[test]
    fn missing_type_is_an_error() {
        let result = serde_json::from_str::<StreamEvent>(r#"{"data":[]}"#);
        assert!(result.is_err());
    }
}
