//! lattice-client: HTTP accessor for the knowledge-base graph admin API.
//!
//! All remote graph reads and writes flow through [`GraphApiClient`]:
//! one-shot lookups and mutations in `queries`/`mutations`, and the
//! incremental streaming ingestion protocol in `stream`.

pub mod client;
pub mod mutations;
pub mod queries;
pub mod stream;

pub use client::{ApiConfig, ClientError, GraphApiClient};
pub use queries::{GraphSearchRequest, RetrieveGraphRequest};
pub use stream::{GraphStream, StreamEnd};
